use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::controller::{HeaderInput, HeaderSnapshot, TapTarget};
use crate::scroll::Viewport;
use crate::{Error, Result};

/// Cloneable front door to a running `HeaderRuntime`
///
/// Input sent from any thread is queued onto the runtime's single update
/// stream; nothing here touches controller state directly.
#[derive(Clone)]
pub struct HeaderHandle {
    input_tx: mpsc::UnboundedSender<HeaderInput>,
    snapshot_rx: watch::Receiver<HeaderSnapshot>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl HeaderHandle {
    pub(super) fn new(
        input_tx: mpsc::UnboundedSender<HeaderInput>,
        snapshot_rx: watch::Receiver<HeaderSnapshot>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            input_tx,
            snapshot_rx,
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    pub fn send(&self, input: HeaderInput) -> Result<()> {
        self.input_tx.send(input).map_err(|_| Error::Closed)
    }

    pub fn scroll(&self, offset: f64, viewport: Option<Viewport>) -> Result<()> {
        self.send(HeaderInput::Scroll { offset, viewport })
    }

    pub fn swipe(&self, page: usize) -> Result<()> {
        self.send(HeaderInput::Swipe { page })
    }

    pub fn tap(&self, target: TapTarget) -> Result<()> {
        self.send(HeaderInput::Tap { target })
    }

    pub fn refresh(&self) -> Result<()> {
        self.send(HeaderInput::Refresh)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> HeaderSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// A receiver that wakes on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<HeaderSnapshot> {
        self.snapshot_rx.clone()
    }

    /// Ask the runtime to stop. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }
}
