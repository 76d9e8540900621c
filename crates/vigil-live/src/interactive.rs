//! Marshalling of dialog presentation onto a single interactive task.
//!
//! Validation events arrive on arbitrary worker tasks, but dialogs must be
//! shown from the one task that owns the interactive session. The channel
//! here queues requests to that task; once it is gone, the handle reports
//! unavailable and the coordinator degrades to the console.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::PresentError;
use crate::present::{DialogRequest, DialogResponse, InteractiveHost};

const PRESENT_QUEUE_DEPTH: usize = 8;

/// The host-side display binding, driven from the interactive task.
///
/// `present` blocks the interactive task while the dialog is up, which is
/// the modal semantics callers expect.
pub trait DialogSurface: Send + 'static {
    fn present(&mut self, request: DialogRequest) -> DialogResponse;
}

impl<F> DialogSurface for F
where
    F: FnMut(DialogRequest) -> DialogResponse + Send + 'static,
{
    fn present(&mut self, request: DialogRequest) -> DialogResponse {
        self(request)
    }
}

type PresentRequest = (DialogRequest, oneshot::Sender<DialogResponse>);

/// Handle that marshals dialog requests onto one presenter task.
///
/// Cloned handles share the task. Requests are answered in arrival order,
/// one at a time.
#[derive(Clone)]
pub struct InteractiveChannel {
    sender: mpsc::Sender<PresentRequest>,
    cancel: CancellationToken,
}

impl InteractiveChannel {
    /// Spawn the presenter task around `surface`.
    pub fn spawn<S: DialogSurface>(surface: S) -> Self {
        let (sender, receiver) = mpsc::channel(PRESENT_QUEUE_DEPTH);
        let cancel = CancellationToken::new();
        tokio::spawn(run_presenter(surface, receiver, cancel.clone()));
        Self { sender, cancel }
    }

    /// Stop the presenter task. Requests still in flight get
    /// [`PresentError::Closed`]; later calls see an unavailable host.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

async fn run_presenter<S: DialogSurface>(
    mut surface: S,
    mut receiver: mpsc::Receiver<PresentRequest>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            request = receiver.recv() => match request {
                Some((dialog, reply)) => {
                    let response = surface.present(dialog);
                    if reply.send(response).is_err() {
                        debug!("dialog response dropped; caller went away");
                    }
                }
                None => break,
            },
        }
    }
}

#[async_trait]
impl InteractiveHost for InteractiveChannel {
    fn is_available(&self) -> bool {
        !self.cancel.is_cancelled() && !self.sender.is_closed()
    }

    async fn present_dialog(&self, request: DialogRequest) -> Result<DialogResponse, PresentError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send((request, reply))
            .await
            .map_err(|_| PresentError::HostUnavailable)?;
        response.await.map_err(|_| PresentError::Closed)
    }
}
