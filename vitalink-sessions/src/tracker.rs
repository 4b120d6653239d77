//! Single-slot state machine for the in-progress session

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::SessionRecord;

/// The session currently occupying the tracker's slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub name: String,
    pub started_at: DateTime<Utc>,
}

/// Tracks at most one in-progress session.
///
/// All transitions are total functions of (current state, event). The only
/// no-op is a farewell with no session open; everything else either fills
/// the slot or drains it into a [`SessionRecord`].
#[derive(Debug, Default)]
pub struct SessionTracker {
    current: Option<ActiveSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `name`.
    ///
    /// A new greeting always wins: an in-progress session is discarded
    /// without producing a record, mirroring the device (it greets again
    /// after a reset without saying goodbye first).
    pub fn on_start(&mut self, name: impl Into<String>, now: DateTime<Utc>) {
        let next = ActiveSession {
            name: name.into(),
            started_at: now,
        };
        if let Some(discarded) = self.current.replace(next) {
            warn!(
                "New greeting while session for '{}' was open; discarding it",
                discarded.name
            );
        }
    }

    /// Close the open session, if any, producing its finalized record.
    ///
    /// `duration` is whatever the device reported, kept verbatim (empty
    /// when the farewell carried none). A farewell while idle returns
    /// `None` and is not an error.
    pub fn on_end(
        &mut self,
        duration: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Option<SessionRecord> {
        let active = self.current.take()?;
        Some(SessionRecord {
            name: active.name,
            start_time: active.started_at,
            end_time: now,
            duration: duration.into(),
        })
    }

    /// Name of the subject currently in session, if one is open.
    pub fn active_subject(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.name.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, secs).unwrap()
    }

    #[test]
    fn test_start_then_end_produces_record() {
        let mut tracker = SessionTracker::new();
        tracker.on_start("Ada", at(0));

        let record = tracker.on_end("00:01:30", at(30)).unwrap();
        assert_eq!(record.name, "Ada");
        assert_eq!(record.start_time, at(0));
        assert_eq!(record.end_time, at(30));
        assert_eq!(record.duration, "00:01:30");
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_end_while_idle_is_noop() {
        let mut tracker = SessionTracker::new();
        assert!(tracker.on_end("00:00:10", at(5)).is_none());
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_second_start_wins() {
        let mut tracker = SessionTracker::new();
        tracker.on_start("Ada", at(0));
        tracker.on_start("Grace", at(10));

        assert_eq!(tracker.active_subject(), Some("Grace"));

        // Only the second session produces a record, with its own start.
        let record = tracker.on_end("00:00:20", at(30)).unwrap();
        assert_eq!(record.name, "Grace");
        assert_eq!(record.start_time, at(10));
    }

    #[test]
    fn test_end_consumes_the_slot() {
        let mut tracker = SessionTracker::new();
        tracker.on_start("Ada", at(0));
        assert!(tracker.on_end("00:00:05", at(5)).is_some());
        assert!(tracker.on_end("00:00:05", at(6)).is_none());
    }
}
