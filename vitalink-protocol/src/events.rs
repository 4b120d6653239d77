use serde::{Deserialize, Serialize};

/// One instantaneous multi-field reading from the monitor.
///
/// Samples are ephemeral: they are forwarded to live subscribers and never
/// persisted. Wire field names match what the viewer UI expects; absent
/// fields are omitted from the serialized mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    #[serde(rename = "Temperature", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(rename = "Pulse", skip_serializing_if = "Option::is_none")]
    pub pulse: Option<i64>,

    #[serde(rename = "Gas", skip_serializing_if = "Option::is_none")]
    pub gas: Option<i64>,

    /// Bluetooth link flag as reported by the device (0/1).
    #[serde(rename = "BT connected", skip_serializing_if = "Option::is_none")]
    pub bt_connected: Option<i64>,
}

impl SensorSample {
    /// True when no recognized field was extracted from the line.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.pulse.is_none()
            && self.gas.is_none()
            && self.bt_connected.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_omitted() {
        let sample = SensorSample {
            temperature: Some(36.6),
            pulse: Some(72),
            ..Default::default()
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"Temperature\":36.6"));
        assert!(json.contains("\"Pulse\":72"));
        assert!(!json.contains("Gas"));
        assert!(!json.contains("BT connected"));
    }

    #[test]
    fn test_bt_flag_wire_name() {
        let sample = SensorSample {
            bt_connected: Some(1),
            ..Default::default()
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"BT connected\":1"));
    }
}
