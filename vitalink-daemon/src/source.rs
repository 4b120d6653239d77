//! Device line source
//!
//! Opens the monitor's device node (or stdin) and frames it into UTF-8
//! lines feeding the pipeline's channel. The transport assumes the OS tty
//! layer already line-buffers the serial link; port and baud setup happen
//! outside the daemon.

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Sentinel device path that reads from standard input.
pub const STDIN_DEVICE: &str = "-";

/// Open the configured device and spawn the reader task feeding a line
/// channel. The channel closes when the device stream ends.
pub async fn open(device_path: &str) -> Result<mpsc::UnboundedReceiver<String>> {
    if device_path == STDIN_DEVICE {
        info!("Reading telemetry from stdin");
        Ok(spawn_line_reader(tokio::io::stdin()))
    } else {
        let file = File::open(device_path)
            .await
            .with_context(|| format!("Failed to open device {}", device_path))?;
        info!("Reading telemetry from {}", device_path);
        Ok(spawn_line_reader(file))
    }
}

/// Feed lines from any async reader into an unbounded channel consumed by
/// the pipeline (single consumer, strictly in order).
///
/// Read errors end the stream with a warning; they never propagate into
/// the pipeline.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        // Pipeline dropped its receiver; stop reading.
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Device read error, closing line stream: {}", e);
                    break;
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_reader_frames_lines_in_order() {
        let input = Cursor::new(b"first\nsecond\nthird\n".to_vec());
        let mut rx = spawn_line_reader(input);

        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }

        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_channel_closes_on_eof() {
        let input = Cursor::new(Vec::new());
        let mut rx = spawn_line_reader(input);
        assert!(rx.recv().await.is_none());
    }
}
