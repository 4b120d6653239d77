//! Line stream → classifier → sink / tracker / store pipeline

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info};

use vitalink_protocol::{classify, EventSink, LineKind};
use vitalink_sessions::{SessionStore, SessionTracker};

/// The ingestion pipeline: one sequential consumer of the device's line
/// stream.
///
/// Per line: classify, forward to the live sink, and feed session events
/// through the tracker; a closed session is appended to the durable store
/// before the next line is pulled. Tracker and store are shared with IPC
/// readers, but this pipeline is their only writer.
pub struct IngestionPipeline {
    tracker: Arc<Mutex<SessionTracker>>,
    store: Arc<SessionStore>,
}

impl IngestionPipeline {
    pub fn new(tracker: Arc<Mutex<SessionTracker>>, store: Arc<SessionStore>) -> Self {
        Self { tracker, store }
    }

    /// Consume the line stream until it closes.
    ///
    /// Classification and persistence failures never end the stream; the
    /// only way out is the source closing.
    pub async fn run<S: EventSink>(&self, mut lines: mpsc::UnboundedReceiver<String>, sink: &S) {
        while let Some(raw) = lines.recv().await {
            self.process_line(&raw, sink).await;
        }
        info!("Line source closed, pipeline stopping");
    }

    /// Handle one line, strictly sequentially with respect to the rest of
    /// the stream.
    async fn process_line<S: EventSink>(&self, raw: &str, sink: &S) {
        let classified = classify(raw);

        match classified.kind {
            LineKind::Sample(sample) => {
                sink.sensor_data(&sample).await;
            }
            LineKind::SessionStart { name } => {
                sink.session_started().await;
                sink.session_message(&classified.text).await;
                self.tracker.lock().unwrap().on_start(name, Utc::now());
            }
            LineKind::SessionEnd { duration } => {
                sink.session_message(&classified.text).await;

                let record = self
                    .tracker
                    .lock()
                    .unwrap()
                    .on_end(duration.unwrap_or_default(), Utc::now());

                if let Some(record) = record {
                    info!(
                        "Session closed for '{}' (duration {:?})",
                        record.name, record.duration
                    );
                    if let Err(e) = self.store.append(record) {
                        // Ingestion survives a persistence failure.
                        error!("Failed to persist session record: {}", e);
                    }
                    sink.session_ended().await;
                }
            }
            LineKind::Unrecognized => {
                sink.session_message(&classified.text).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vitalink_protocol::SensorSample;

    #[derive(Default)]
    struct RecordingSink {
        samples: Mutex<Vec<SensorSample>>,
        messages: Mutex<Vec<String>>,
    }

    impl EventSink for RecordingSink {
        async fn sensor_data(&self, sample: &SensorSample) {
            self.samples.lock().unwrap().push(sample.clone());
        }

        async fn session_message(&self, line: &str) {
            self.messages.lock().unwrap().push(line.to_string());
        }
    }

    fn fixture(tmp: &TempDir) -> (IngestionPipeline, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::open(tmp.path().join("sessions.json")).unwrap());
        let tracker = Arc::new(Mutex::new(SessionTracker::new()));
        let pipeline = IngestionPipeline::new(tracker, Arc::clone(&store));
        (pipeline, store)
    }

    async fn feed(pipeline: &IngestionPipeline, sink: &RecordingSink, lines: &[&str]) {
        let (tx, rx) = mpsc::unbounded_channel();
        for line in lines {
            tx.send(line.to_string()).unwrap();
        }
        drop(tx);
        pipeline.run(rx, sink).await;
    }

    #[tokio::test]
    async fn test_full_session_scenario() {
        let tmp = TempDir::new().unwrap();
        let (pipeline, store) = fixture(&tmp);
        let sink = RecordingSink::default();

        feed(
            &pipeline,
            &sink,
            &[
                "t-> Hello, Ada",
                "t-> Temprature:36.6-Pulse:72",
                "t-> Goodbye - Duration:00:02:10",
            ],
        )
        .await;

        let messages = sink.messages.lock().unwrap();
        assert_eq!(
            *messages,
            vec!["Hello, Ada", "Goodbye - Duration:00:02:10"]
        );

        let samples = sink.samples.lock().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].temperature, Some(36.6));
        assert_eq!(samples[0].pulse, Some(72));

        let records = store.read_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Ada");
        assert_eq!(records[0].duration, "00:02:10");
        assert!(records[0].end_time >= records[0].start_time);
    }

    #[tokio::test]
    async fn test_goodbye_without_duration_records_empty() {
        let tmp = TempDir::new().unwrap();
        let (pipeline, store) = fixture(&tmp);
        let sink = RecordingSink::default();

        feed(&pipeline, &sink, &["Hello, Ada", "Goodbye"]).await;

        let records = store.read_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration, "");
    }

    #[tokio::test]
    async fn test_goodbye_while_idle_is_forwarded_not_recorded() {
        let tmp = TempDir::new().unwrap();
        let (pipeline, store) = fixture(&tmp);
        let sink = RecordingSink::default();

        feed(&pipeline, &sink, &["Goodbye - Duration:00:00:05"]).await;

        assert_eq!(
            *sink.messages.lock().unwrap(),
            vec!["Goodbye - Duration:00:00:05"]
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_second_greeting_wins() {
        let tmp = TempDir::new().unwrap();
        let (pipeline, store) = fixture(&tmp);
        let sink = RecordingSink::default();

        feed(
            &pipeline,
            &sink,
            &["Hello, Ada", "Hello, Grace", "Goodbye - Duration:00:01:00"],
        )
        .await;

        let records = store.read_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Grace");
    }

    #[tokio::test]
    async fn test_unrecognized_lines_are_forwarded() {
        let tmp = TempDir::new().unwrap();
        let (pipeline, store) = fixture(&tmp);
        let sink = RecordingSink::default();

        feed(&pipeline, &sink, &["t-> sensor warm-up complete"]).await;

        assert_eq!(
            *sink.messages.lock().unwrap(),
            vec!["sensor warm-up complete"]
        );
        assert!(sink.samples.lock().unwrap().is_empty());
        assert!(store.is_empty());
    }
}
