use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::net::UnixListener;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use vitalink_protocol::{EventSink, SensorSample};

use crate::client::{Client, ClientManager};
use crate::error::{BroadcasterError, Result};
use crate::events::{BroadcastEvent, SessionMessage};

/// Real-time event broadcaster for viewer clients
pub struct EventBroadcaster {
    socket_path: PathBuf,
    client_manager: ClientManager,
    message_buffer: Arc<RwLock<Vec<SessionMessage>>>,
    accept_task: Arc<Mutex<Option<JoinHandle<()>>>>,
    running: Arc<RwLock<bool>>,
}

impl EventBroadcaster {
    /// Create new broadcaster
    pub async fn new(socket_path: impl AsRef<Path>) -> Result<Self> {
        let socket_path = socket_path.as_ref().to_path_buf();

        Ok(Self {
            socket_path,
            client_manager: ClientManager::new(),
            message_buffer: Arc::new(RwLock::new(Vec::new())),
            accept_task: Arc::new(Mutex::new(None)),
            running: Arc::new(RwLock::new(false)),
        })
    }

    /// Start the broadcaster (listen for clients)
    pub async fn start(&self) -> Result<()> {
        let is_running = *self.running.read().await;
        if is_running {
            return Err(BroadcasterError::AlreadyRunning);
        }

        // Remove existing socket file
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        // Create Unix socket listener
        let listener = UnixListener::bind(&self.socket_path)?;

        // Set secure permissions (0600 = owner-only access)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if self.socket_path.exists() {
                let permissions = std::fs::Permissions::from_mode(0o600);
                std::fs::set_permissions(&self.socket_path, permissions)?;
            }
        }

        tracing::info!(
            "Event broadcaster started on {:?} (permissions: 0600)",
            self.socket_path
        );

        // Mark as running
        *self.running.write().await = true;

        // Spawn client acceptance task
        let client_manager = self.client_manager.clone_arc();
        let buffer = Arc::clone(&self.message_buffer);
        let running = Arc::clone(&self.running);

        let task = tokio::spawn(async move {
            loop {
                // Check if still running
                if !*running.read().await {
                    break;
                }

                match listener.accept().await {
                    Ok((stream, _addr)) => {
                        tracing::info!("New client connection accepted");
                        let mut client = Client::new(stream);

                        // Send catch-up data
                        let buffer_snapshot = buffer.read().await.clone();
                        if let Err(e) = client.send_catch_up(&buffer_snapshot).await {
                            tracing::warn!("Failed to send catch-up data: {}", e);
                            continue;
                        }

                        // Add to client list
                        let mut clients = client_manager.lock().await;
                        clients.push(client);
                        tracing::info!("Client added. Total: {}", clients.len());
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept client: {}", e);
                    }
                }
            }
            tracing::info!("Client acceptance task stopped");
        });

        *self.accept_task.lock().await = Some(task);

        Ok(())
    }

    /// Stop the broadcaster
    pub async fn stop(&self) -> Result<()> {
        let is_running = *self.running.read().await;
        if !is_running {
            return Err(BroadcasterError::NotStarted);
        }

        // Mark as not running
        *self.running.write().await = false;

        // Abort accept task
        if let Some(task) = self.accept_task.lock().await.take() {
            task.abort();
        }

        // Remove socket file
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        tracing::info!("Event broadcaster stopped");
        Ok(())
    }

    /// Start a new session (clears message buffer)
    pub async fn start_session(&self) {
        self.message_buffer.write().await.clear();
        tracing::info!("Session started, message buffer cleared");
    }

    /// End session (buffer stays visible for late-joining viewers)
    pub async fn end_session(&self) {
        tracing::info!("Session ended");
    }

    /// Broadcast one sensor reading. Samples are not buffered.
    pub async fn broadcast_sample(&self, sample: &SensorSample) {
        let event = BroadcastEvent::SensorData {
            data: sample.clone(),
        };

        if let Err(e) = self.client_manager.broadcast(&event).await {
            tracing::error!("Failed to broadcast sensorData: {}", e);
        }
    }

    /// Add session message to buffer and broadcast
    pub async fn add_message(&self, message: impl Into<String>) {
        let message = message.into();
        let timestamp = Self::current_time_string();

        // Add to buffer
        self.message_buffer.write().await.push(SessionMessage {
            message: message.clone(),
            timestamp: timestamp.clone(),
        });

        // Broadcast event
        let event = BroadcastEvent::SessionMessage { message, timestamp };
        if let Err(e) = self.client_manager.broadcast(&event).await {
            tracing::error!("Failed to broadcast sessionMessage: {}", e);
        }
    }

    /// Get current client count
    pub async fn client_count(&self) -> usize {
        self.client_manager.client_count().await
    }

    /// Get buffer size
    pub async fn buffer_size(&self) -> usize {
        self.message_buffer.read().await.len()
    }

    fn current_time_string() -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

impl EventSink for EventBroadcaster {
    async fn sensor_data(&self, sample: &SensorSample) {
        self.broadcast_sample(sample).await;
    }

    async fn session_message(&self, line: &str) {
        self.add_message(line).await;
    }

    async fn session_started(&self) {
        self.start_session().await;
    }

    async fn session_ended(&self) {
        self.end_session().await;
    }
}

impl Drop for EventBroadcaster {
    fn drop(&mut self) {
        // Clean up socket file
        if self.socket_path.exists() {
            let _ = std::fs::remove_file(&self.socket_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_broadcaster_create() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_path_buf();
        std::fs::remove_file(&path).ok();

        let broadcaster = EventBroadcaster::new(path).await.unwrap();
        assert_eq!(broadcaster.client_count().await, 0);
        assert_eq!(broadcaster.buffer_size().await, 0);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_path_buf();
        std::fs::remove_file(&path).ok();

        let broadcaster = EventBroadcaster::new(path).await.unwrap();

        // Start session should clear buffer
        broadcaster.add_message("calibrating").await;
        assert_eq!(broadcaster.buffer_size().await, 1);

        broadcaster.start_session().await;
        assert_eq!(broadcaster.buffer_size().await, 0);

        // Add new message
        broadcaster.add_message("Hello, Ada").await;
        assert_eq!(broadcaster.buffer_size().await, 1);

        // End session should keep buffer
        broadcaster.end_session().await;
        assert_eq!(broadcaster.buffer_size().await, 1);
    }

    #[tokio::test]
    async fn test_samples_are_not_buffered() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_path_buf();
        std::fs::remove_file(&path).ok();

        let broadcaster = EventBroadcaster::new(path).await.unwrap();
        let sample = SensorSample {
            temperature: Some(36.6),
            pulse: Some(72),
            ..Default::default()
        };

        broadcaster.broadcast_sample(&sample).await;
        assert_eq!(broadcaster.buffer_size().await, 0);
    }
}
