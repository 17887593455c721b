//! Camera commands received on the bus and handed to the upstream sidecar.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Livestream action requested for a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LivestreamAction {
    /// Start the livestream
    Start,
    /// Stop the livestream
    Stop,
}

impl LivestreamAction {
    /// `start` starts the stream; any other payload stops it.
    #[must_use]
    pub fn from_payload(payload: &[u8]) -> Self {
        if std::str::from_utf8(payload).map(str::trim) == Ok("start") {
            Self::Start
        } else {
            Self::Stop
        }
    }
}

/// A command accepted for a known camera and station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraCommand {
    /// Camera serial
    pub device_serial: String,
    /// Serial of the station the camera streams through
    pub station_serial: String,
    /// Requested action
    pub action: LivestreamAction,
}

/// Spawn a task writing each received command as one JSON line to `writer`.
///
/// The task ends when every sender is dropped.
pub fn spawn_command_writer<W>(mut writer: W) -> (mpsc::Sender<CameraCommand>, JoinHandle<()>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<CameraCommand>(16);

    let handle = tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            let mut line = match serde_json::to_vec(&command) {
                Ok(line) => line,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to encode camera command");
                    continue;
                }
            };
            line.push(b'\n');

            let written = async {
                writer.write_all(&line).await?;
                writer.flush().await
            };
            if let Err(err) = written.await {
                tracing::error!(error = %err, "Failed to write camera command, stopping writer");
                break;
            }

            tracing::info!(
                device_serial = %command.device_serial,
                action = ?command.action,
                "Forwarded camera command"
            );
        }
    });

    (tx, handle)
}
