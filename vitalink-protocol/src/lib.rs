//! Wire protocol for the Vitalink vitals monitor
//!
//! This crate turns the monitor's raw line stream into typed events. The
//! device emits one UTF-8 message per line, optionally prefixed with a
//! framing marker (`<tick> -> payload`). A payload is one of:
//!
//! - a multi-field sensor reading (`Temprature:36.6-Pulse:72-Gas:210-BT:1`,
//!   spelled the way the firmware spells it)
//! - a session greeting (`Hello, <name>`)
//! - a session farewell (`Goodbye - Duration:00:02:10`)
//! - free text, forwarded to viewers verbatim
//!
//! Classification is total: malformed input degrades to
//! [`LineKind::Unrecognized`], never to an error. The [`EventSink`] trait is
//! the seam between the ingestion pipeline and whatever transport delivers
//! events to live subscribers.

pub mod classifier;
pub mod events;
pub mod sink;

// Re-exports
pub use classifier::{classify, ClassifiedLine, LineKind};
pub use events::SensorSample;
pub use sink::EventSink;
