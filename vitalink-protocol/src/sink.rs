use crate::events::SensorSample;

/// Outbound seam between the ingestion pipeline and the live fan-out
/// transport.
///
/// The pipeline is the single producer; implementations must not block it
/// indefinitely (bounded or fire-and-forget delivery). All methods are
/// infallible from the pipeline's point of view: delivery problems are the
/// transport's to log and recover from.
#[allow(async_fn_in_trait)]
pub trait EventSink {
    /// Deliver one sensor reading to live subscribers.
    async fn sensor_data(&self, sample: &SensorSample);

    /// Deliver one cleaned session/free-text line to live subscribers.
    async fn session_message(&self, line: &str);

    /// Hook: a session opened. Transports may reset per-session state.
    async fn session_started(&self) {}

    /// Hook: the open session closed.
    async fn session_ended(&self) {}
}
