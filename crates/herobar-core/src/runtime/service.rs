use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::handle::HeaderHandle;
use crate::config::HeaderConfig;
use crate::controller::{Effect, HeaderController, HeaderEvent, HeaderInput, HeaderSnapshot};
use crate::refresh::{RefreshHandle, RefreshOperation, RefreshOutcome};
use crate::Result;

/// How long the loop sleeps when no timer is pending
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Task that owns a `HeaderController` and serializes everything that
/// touches it: host input, timer deadlines and refresh completions
pub struct HeaderRuntime {
    controller: HeaderController,
    operation: Arc<dyn RefreshOperation>,
    input_rx: mpsc::UnboundedReceiver<HeaderInput>,
    shutdown_rx: watch::Receiver<bool>,
    snapshot_tx: watch::Sender<HeaderSnapshot>,
    event_tx: Option<mpsc::UnboundedSender<HeaderEvent>>,
}

impl HeaderRuntime {
    /// Create the runtime and the handle the host talks to it through
    pub fn new(
        config: &HeaderConfig,
        operation: Arc<dyn RefreshOperation>,
    ) -> Result<(Self, HeaderHandle)> {
        let controller = HeaderController::new(config, Instant::now())?;
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let runtime = Self {
            controller,
            operation,
            input_rx,
            shutdown_rx,
            snapshot_tx,
            event_tx: None,
        };
        let handle = HeaderHandle::new(input_tx, snapshot_rx, shutdown_tx);
        Ok((runtime, handle))
    }

    /// Set the event sender for host notifications
    pub fn with_event_sender(mut self, tx: mpsc::UnboundedSender<HeaderEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Send an event to the host (if event channel is configured)
    fn send_event(&self, event: HeaderEvent) {
        if let Some(ref tx) = self.event_tx {
            if tx.send(event).is_err() {
                warn!("Failed to send header event: receiver dropped");
            }
        }
    }

    /// Publish the current snapshot if it differs from the last one
    fn publish(&self) {
        let next = self.controller.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current != next {
                *current = next;
                true
            } else {
                false
            }
        });
    }

    fn apply(&self, effects: Vec<Effect>, tasks: &mut JoinSet<(RefreshHandle, RefreshOutcome)>) {
        for effect in effects {
            match effect {
                Effect::Emit(event) => self.send_event(event),
                Effect::Dispatch(handle) => {
                    let operation = Arc::clone(&self.operation);
                    debug!(%handle, "Dispatching refresh operation");
                    tasks.spawn(async move {
                        let outcome = match operation.refresh().await {
                            Ok(()) => RefreshOutcome::Succeeded,
                            Err(e) => RefreshOutcome::Failed(format!("{e:#}")),
                        };
                        (handle, outcome)
                    });
                }
            }
        }
    }

    /// Process input until shutdown is signalled or every handle is dropped
    pub async fn run(mut self) {
        info!(
            pages = self.controller.pages().len(),
            collapse_threshold = self.controller.collapse_threshold(),
            "Header runtime started"
        );
        self.controller.restart_clock(Instant::now());
        self.publish();

        let mut tasks: JoinSet<(RefreshHandle, RefreshOutcome)> = JoinSet::new();
        let mut shutdown = self.shutdown_rx.clone();

        loop {
            let deadline = self.controller.next_deadline();
            let wake_at = deadline.unwrap_or_else(|| Instant::now() + IDLE_WAIT);

            tokio::select! {
                // Handle shutdown signal
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Header runtime received shutdown signal");
                        break;
                    }
                }

                input = self.input_rx.recv() => {
                    let Some(input) = input else {
                        debug!("All header handles dropped");
                        break;
                    };
                    let effects = self.controller.handle(input, Instant::now());
                    self.publish();
                    self.apply(effects, &mut tasks);
                }

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    let completion = match joined {
                        Ok(completion) => Some(completion),
                        Err(e) if e.is_cancelled() => None,
                        Err(e) => self
                            .controller
                            .in_flight_refresh()
                            .map(|handle| (handle, RefreshOutcome::Failed(format!("refresh task failed: {e}")))),
                    };
                    if let Some((handle, outcome)) = completion {
                        let effects = self.controller.refresh_completed(handle, outcome, Instant::now());
                        self.publish();
                        self.apply(effects, &mut tasks);
                    }
                }

                _ = tokio::time::sleep_until(wake_at), if deadline.is_some() => {
                    let effects = self.controller.poll(Instant::now());
                    self.publish();
                    self.apply(effects, &mut tasks);
                }
            }
        }

        tasks.abort_all();
        self.controller.shutdown();
        self.publish();
        info!("Header runtime stopped");
    }
}
