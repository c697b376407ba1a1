//! Network actor - runs store exchanges in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::config::Settings;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, FriendsClient};

/// Network actor that executes store commands concurrently
pub struct NetworkActor {
    client: FriendsClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(settings: &Settings, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        let client = FriendsClient::new(create_client(settings.timeout), settings.api_url.clone());
        Self::with_client(client, response_tx)
    }

    pub fn with_client(client: FriendsClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(command) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();

                            // No cancellation or de-duplication: every command is its own exchange
                            self.active_requests.spawn(async move {
                                tracing::info!(id = ?command.id(), operation = ?command.operation(), "Executing exchange");
                                if let Some(response) = client.execute(command).await {
                                    let _ = response_tx.send(response);
                                }
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(result) = self.active_requests.join_next() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Exchange task failed");
                    }
                }
            }
        }
    }
}
