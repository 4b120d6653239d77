//! Live event fan-out for Vitalink viewers
//!
//! This crate provides a Unix socket server that broadcasts classified
//! telemetry events to connected viewer clients. It manages multiple
//! concurrent clients, a per-session message buffer, and new-client
//! catch-up.
//!
//! # Features
//!
//! - Unix domain socket server (mode 0600)
//! - Newline-delimited JSON protocol
//! - Multiple concurrent client connections
//! - Per-session message buffer (RAM only)
//! - New client catch-up (replays the buffered messages)
//! - Bounded delivery: a stalled client is evicted, never waited on
//!
//! # Event Types
//!
//! - `sensorData` - one sensor reading, optional keys only when present
//! - `sessionMessage` - one cleaned session/free-text line
//!
//! # Example Usage
//!
//! ```no_run
//! use vitalink_broadcaster::EventBroadcaster;
//! use vitalink_protocol::{EventSink, SensorSample};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let broadcaster = EventBroadcaster::new("/tmp/vitalink_events.sock").await?;
//!     broadcaster.start().await?;
//!
//!     broadcaster.session_message("Hello, Ada").await;
//!
//!     let sample = SensorSample {
//!         temperature: Some(36.6),
//!         pulse: Some(72),
//!         ..Default::default()
//!     };
//!     broadcaster.sensor_data(&sample).await;
//!
//!     broadcaster.stop().await?;
//!     Ok(())
//! }
//! ```

pub mod broadcaster;
pub mod client;
pub mod error;
pub mod events;

// Re-exports
pub use broadcaster::EventBroadcaster;
pub use error::{BroadcasterError, Result};
pub use events::{BroadcastEvent, SessionMessage};
