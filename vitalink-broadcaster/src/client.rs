use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::events::{BroadcastEvent, SessionMessage};

/// A stalled client gets this long per write before it is evicted, so slow
/// viewers never hold up ingestion.
const CLIENT_WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Client connection wrapper
pub struct Client {
    stream: UnixStream,
}

impl Client {
    pub fn new(stream: UnixStream) -> Self {
        Self { stream }
    }

    /// Send event to client
    pub async fn send_event(&mut self, event: &BroadcastEvent) -> Result<()> {
        let json_line = event.to_json_line()?;
        self.stream.write_all(json_line.as_bytes()).await?;
        Ok(())
    }

    /// Replay the current session's buffered messages to a new client
    pub async fn send_catch_up(&mut self, buffer: &[SessionMessage]) -> Result<()> {
        for msg in buffer {
            let event = BroadcastEvent::SessionMessage {
                message: msg.message.clone(),
                timestamp: msg.timestamp.clone(),
            };
            self.send_event(&event).await?;
        }
        Ok(())
    }
}

/// Thread-safe client list manager
pub struct ClientManager {
    clients: Arc<Mutex<Vec<Client>>>,
}

impl ClientManager {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add new client
    pub async fn add_client(&self, client: Client) {
        let mut clients = self.clients.lock().await;
        clients.push(client);
        tracing::info!("New client connected. Total clients: {}", clients.len());
    }

    /// Broadcast event to all clients, removing dead or stalled ones
    pub async fn broadcast(&self, event: &BroadcastEvent) -> Result<()> {
        let mut clients = self.clients.lock().await;
        let mut dead_indices = Vec::new();

        for (idx, client) in clients.iter_mut().enumerate() {
            match tokio::time::timeout(CLIENT_WRITE_TIMEOUT, client.send_event(event)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!("Failed to send to client {}: {}", idx, e);
                    dead_indices.push(idx);
                }
                Err(_) => {
                    tracing::warn!("Client {} write timed out, dropping it", idx);
                    dead_indices.push(idx);
                }
            }
        }

        // Remove dead clients in reverse order
        for idx in dead_indices.iter().rev() {
            clients.remove(*idx);
            tracing::info!("Removed dead client. Remaining: {}", clients.len());
        }

        Ok(())
    }

    /// Get current client count
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Get cloned Arc for sharing
    pub fn clone_arc(&self) -> Arc<Mutex<Vec<Client>>> {
        Arc::clone(&self.clients)
    }
}

impl Default for ClientManager {
    fn default() -> Self {
        Self::new()
    }
}
