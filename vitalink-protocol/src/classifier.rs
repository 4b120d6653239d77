//! Line classification for the monitor's wire format

use crate::events::SensorSample;

/// Framing marker separating the device's line prefix from the payload.
const FRAME_MARKER: &str = "->";

/// Greeting token opening a session. The subject name follows the comma.
const GREETING_TOKEN: &str = "Hello,";

/// Farewell token closing a session.
const FAREWELL_TOKEN: &str = "Goodbye";

/// Marker introducing the device-reported session duration.
const DURATION_MARKER: &str = "Duration:";

/// A classified line: the cleaned payload plus what it was recognized as.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    /// Payload with the framing prefix stripped and whitespace trimmed.
    pub text: String,
    pub kind: LineKind,
}

/// What a cleaned line was recognized as.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Sensor reading with at least one parsed field.
    Sample(SensorSample),
    /// Session opened for the named subject.
    SessionStart { name: String },
    /// Session closed. `duration` is absent when the device reported none.
    SessionEnd { duration: Option<String> },
    /// No known pattern matched; forwarded to viewers as free text.
    Unrecognized,
}

/// Classify one raw device line.
///
/// Sample detection runs before session detection, so a line matches at most
/// one category. Classification is total: malformed input degrades to
/// [`LineKind::Unrecognized`], never to an error.
pub fn classify(raw: &str) -> ClassifiedLine {
    let text = strip_frame(raw);
    let lower = text.to_lowercase();

    if is_sample_line(&lower) {
        let sample = parse_sample(&text);
        let kind = if sample.is_empty() {
            // Matched the sample pattern but yielded no usable fields.
            LineKind::Unrecognized
        } else {
            LineKind::Sample(sample)
        };
        return ClassifiedLine { text, kind };
    }

    if let Some(rest) = text.strip_prefix(GREETING_TOKEN) {
        let name = rest.trim().to_string();
        return ClassifiedLine {
            text,
            kind: LineKind::SessionStart { name },
        };
    }

    if text.starts_with(FAREWELL_TOKEN) {
        // Older firmware omits the duration entirely; that is still a
        // well-formed farewell.
        let duration = text
            .split_once(DURATION_MARKER)
            .map(|(_, rest)| rest.trim().to_string());
        return ClassifiedLine {
            text,
            kind: LineKind::SessionEnd { duration },
        };
    }

    ClassifiedLine {
        text,
        kind: LineKind::Unrecognized,
    }
}

/// Strip the framing prefix (`<anything> -> `) and surrounding whitespace.
fn strip_frame(raw: &str) -> String {
    let payload = match raw.find(FRAME_MARKER) {
        Some(idx) => &raw[idx + FRAME_MARKER.len()..],
        None => raw,
    };
    payload.trim().to_string()
}

/// A sample line carries both a temperature and a pulse marker. The firmware
/// misspells "Temprature", so both spellings are accepted.
fn is_sample_line(lower: &str) -> bool {
    (lower.contains("temprature:") || lower.contains("temperature:")) && lower.contains("pulse:")
}

/// Extract sensor fields from a sample line.
///
/// Fields are `-`-delimited `key:value` pairs. Keys match by case-insensitive
/// substring; unknown keys are ignored and values that fail to parse drop
/// that field without affecting the rest of the line.
fn parse_sample(text: &str) -> SensorSample {
    let mut sample = SensorSample::default();

    for field in text.split('-') {
        let Some((key, value)) = field.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        if key.contains("temp") {
            if let Ok(v) = value.parse() {
                sample.temperature = Some(v);
            }
        } else if key.contains("pulse") {
            if let Ok(v) = value.parse() {
                sample.pulse = Some(v);
            }
        } else if key.contains("gas") {
            if let Ok(v) = value.parse() {
                sample.gas = Some(v);
            }
        } else if key.contains("bt") {
            if let Ok(v) = value.parse() {
                sample.bt_connected = Some(v);
            }
        }
    }

    sample
}
