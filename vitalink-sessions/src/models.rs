use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A finalized usage session.
///
/// Created only by the tracker when a well-formed farewell closes an open
/// session, then appended to the log and never mutated. The serialized
/// shape (`name`/`startTime`/`endTime`/`duration`) is shared by the durable
/// document and the read API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Subject name as announced by the device's greeting.
    pub name: String,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Duration string as reported by the device, kept verbatim (not
    /// reparsed). Empty when the farewell carried no duration.
    pub duration: String,
}
