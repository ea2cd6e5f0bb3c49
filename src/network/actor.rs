//! Network actor - runs view resolutions in Tokio async runtime

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::remote::ViewProvider;

/// Network actor that processes resolve commands
pub struct NetworkActor {
    provider: Arc<dyn ViewProvider>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(provider: Arc<dyn ViewProvider>, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            provider,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::ResolveView { id }) => {
                            let provider = Arc::clone(&self.provider);
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, location = %provider.location(), "Resolving library component");
                                let start = Instant::now();
                                let view = provider.resolve().await;
                                let time_ms = start.elapsed().as_millis() as u64;
                                let _ = response_tx.send(NetworkResponse::ViewResolved { id, view, time_ms });
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(result) = self.active_requests.join_next() => {
                    if let Err(e) = result {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Resolve task panicked");
                        }
                    }
                }
            }
        }
    }
}
