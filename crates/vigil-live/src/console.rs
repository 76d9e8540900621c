//! Console sink implementations.

use std::io::Write;
use std::sync::Mutex;

use tracing::debug;

use crate::present::ConsoleSink;

/// Console category under which validation output is published.
pub const VALIDATION_CATEGORY: &str = "Validation";

/// Header line printed before a batch of problem messages.
pub const PROBLEMS_HEADER: &str = "Validation problems found:";

/// Records lines in memory; the stock sink for embedding and tests.
#[derive(Default)]
pub struct InMemoryConsole {
    lines: Mutex<Vec<(String, String)>>,
    shown: Mutex<Vec<String>>,
}

impl InMemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(category, line)` pairs written so far.
    pub fn lines(&self) -> Vec<(String, String)> {
        match self.lines.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Lines written under `category`, in order.
    pub fn lines_for(&self, category: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(cat, _)| cat == category)
            .map(|(_, line)| line)
            .collect()
    }

    /// Categories raised via [`ConsoleSink::show`], in call order.
    pub fn shown(&self) -> Vec<String> {
        match self.shown.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ConsoleSink for InMemoryConsole {
    fn println(&self, category: &str, text: &str) {
        match self.lines.lock() {
            Ok(mut guard) => guard.push((category.to_string(), text.to_string())),
            Err(poisoned) => poisoned
                .into_inner()
                .push((category.to_string(), text.to_string())),
        }
    }

    fn show(&self, category: &str) {
        match self.shown.lock() {
            Ok(mut guard) => guard.push(category.to_string()),
            Err(poisoned) => poisoned.into_inner().push(category.to_string()),
        }
    }
}

/// Writes `[category] line` to an arbitrary writer (stderr, a log file).
///
/// There is nothing to raise for a plain writer, so `show` is a no-op.
pub struct WriterConsole<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterConsole<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> ConsoleSink for WriterConsole<W> {
    fn println(&self, category: &str, text: &str) {
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(err) = writeln!(writer, "[{category}] {text}") {
            debug!(error = %err, "console line dropped");
        }
    }

    fn show(&self, _category: &str) {}
}

/// Discards all output.
pub struct NullConsole;

impl ConsoleSink for NullConsole {
    fn println(&self, _category: &str, _text: &str) {}

    fn show(&self, _category: &str) {}
}
