//! Severity classification for validation results.

use serde::{Deserialize, Serialize};

/// Ordered severity of a validation result.
///
/// The ordering is significant: `Ok < Info < Warning < Error < Cancel`,
/// and [`Severity::matches`] builds "at least this severe" checks on top
/// of it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Ok,
    Info,
    Warning,
    Error,
    Cancel,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Cancel => "cancel",
        }
    }

    /// Parse a severity from its string representation.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ok" => Some(Self::Ok),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    /// Map a host-defined numeric severity code onto a recognized severity.
    ///
    /// Recognized codes are 0 (ok), 1 (info), 2 (warning), 4 (error) and
    /// 8 (cancel). An unrecognized code clamps to the nearest lower
    /// recognized severity; negative codes clamp to `Ok`.
    pub fn from_code(code: i32) -> Self {
        match code {
            i32::MIN..=0 => Self::Ok,
            1 => Self::Info,
            2..=3 => Self::Warning,
            4..=7 => Self::Error,
            _ => Self::Cancel,
        }
    }

    pub fn to_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Info => 1,
            Self::Warning => 2,
            Self::Error => 4,
            Self::Cancel => 8,
        }
    }

    /// Whether an exact severity code is recognized, i.e. round-trips
    /// through [`Severity::from_code`] without clamping.
    pub fn is_recognized_code(code: i32) -> bool {
        Self::from_code(code).to_code() == code
    }

    /// Whether this severity is at least as severe as `at_least`.
    pub fn matches(self, at_least: Severity) -> bool {
        self >= at_least
    }

    /// Whether this severity counts as a problem (warning or worse).
    pub fn is_problem(self) -> bool {
        self.matches(Self::Warning)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_ok_info_warning_error_cancel() {
        assert!(Severity::Ok < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Cancel);
    }

    #[test]
    fn matches_means_at_least() {
        assert!(Severity::Error.matches(Severity::Warning));
        assert!(Severity::Warning.matches(Severity::Warning));
        assert!(!Severity::Info.matches(Severity::Warning));
        assert!(Severity::Cancel.matches(Severity::Error));
        assert!(Severity::Warning.is_problem());
        assert!(!Severity::Info.is_problem());
    }

    #[test]
    fn recognized_codes_round_trip() {
        for severity in [
            Severity::Ok,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Cancel,
        ] {
            assert_eq!(Severity::from_code(severity.to_code()), severity);
            assert!(Severity::is_recognized_code(severity.to_code()));
        }
    }

    #[test]
    fn unrecognized_codes_clamp_to_nearest_lower() {
        assert_eq!(Severity::from_code(-5), Severity::Ok);
        assert_eq!(Severity::from_code(3), Severity::Warning);
        assert_eq!(Severity::from_code(5), Severity::Error);
        assert_eq!(Severity::from_code(7), Severity::Error);
        assert_eq!(Severity::from_code(9), Severity::Cancel);
        assert!(!Severity::is_recognized_code(3));
    }

    #[test]
    fn string_round_trip() {
        for severity in [
            Severity::Ok,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Cancel,
        ] {
            assert_eq!(Severity::from_str(severity.as_str()), Some(severity));
        }
        assert_eq!(Severity::from_str("fatal"), None);
    }
}
