use serde::{Deserialize, Serialize};
use vitalink_protocol::SensorSample;

/// Event types broadcast to viewer clients
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type")]
pub enum BroadcastEvent {
    /// One sensor reading; sample fields are flattened into the event so
    /// viewers see the plain `Temperature`/`Pulse`/... mapping.
    #[serde(rename = "sensorData")]
    SensorData {
        #[serde(flatten)]
        data: SensorSample,
    },

    /// One cleaned session/free-text line from the device.
    #[serde(rename = "sessionMessage")]
    SessionMessage {
        message: String,
        timestamp: String, // HH:MM:SS format
    },
}

/// Session message kept in the RAM buffer for new-client catch-up
#[derive(Debug, Clone, Serialize)]
pub struct SessionMessage {
    pub message: String,
    pub timestamp: String,
}

impl BroadcastEvent {
    /// Convert event to JSON string with newline
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_data_serialization() {
        let event = BroadcastEvent::SensorData {
            data: SensorSample {
                temperature: Some(36.6),
                pulse: Some(72),
                ..Default::default()
            },
        };
        let json = event.to_json_line().unwrap();
        assert!(json.contains("\"type\":\"sensorData\""));
        assert!(json.contains("\"Temperature\":36.6"));
        assert!(json.contains("\"Pulse\":72"));
        assert!(!json.contains("Gas"));
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn test_session_message_serialization() {
        let event = BroadcastEvent::SessionMessage {
            message: "Hello, Ada".to_string(),
            timestamp: "14:23:15".to_string(),
        };
        let json = event.to_json_line().unwrap();
        assert!(json.contains("\"type\":\"sessionMessage\""));
        assert!(json.contains("\"message\":\"Hello, Ada\""));
        assert!(json.contains("\"timestamp\":\"14:23:15\""));
    }

    #[test]
    fn test_round_trip() {
        let event = BroadcastEvent::SessionMessage {
            message: "Goodbye - Duration:00:02:10".to_string(),
            timestamp: "14:25:25".to_string(),
        };
        let json = event.to_json_line().unwrap();
        let back: BroadcastEvent = serde_json::from_str(json.trim()).unwrap();
        match back {
            BroadcastEvent::SessionMessage { message, .. } => {
                assert_eq!(message, "Goodbye - Duration:00:02:10");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
