//! Line-oriented reader delivering upstream events on a channel.

use crate::events::parse_line;
use eufy_bridge_core::BridgeEvent;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

/// Default channel capacity.
pub const DEFAULT_CAPACITY: usize = 100;

/// Reads JSON-lines events from an async source.
pub struct EventReader<R> {
    reader: R,
    capacity: usize,
}

impl<R> EventReader<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Create a reader over `reader`.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Override the channel capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Start reading events.
    ///
    /// Returns a channel receiver that yields events in feed order and
    /// closes when the source reaches end of input. Malformed lines are
    /// logged and skipped.
    pub fn start(self) -> mpsc::Receiver<BridgeEvent> {
        let (tx, rx) = mpsc::channel(self.capacity);

        tokio::spawn(async move {
            let mut lines = BufReader::new(self.reader).lines();
            let mut line_no = 0usize;

            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        tracing::info!(lines = line_no, "Upstream event feed ended");
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read upstream event feed");
                        break;
                    }
                };
                line_no += 1;

                match parse_line(&line) {
                    Ok(Some(event)) => {
                        tracing::debug!(
                            line = line_no,
                            class = %event.class(),
                            serial = event.serial(),
                            "Parsed upstream event"
                        );

                        if tx.send(event).await.is_err() {
                            tracing::warn!("Event receiver dropped, stopping reader");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            line = line_no,
                            "Failed to parse upstream event"
                        );
                    }
                }
            }
        });

        rx
    }
}
