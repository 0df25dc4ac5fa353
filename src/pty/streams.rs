//! PTY Streams
//!
//! Async-facing ends of the channels that bridge the blocking PTY
//! reader and writer threads.

use crate::error::{Error, Result};
use std::sync::mpsc::Sender as StdSender;
use tokio::sync::mpsc::UnboundedReceiver;

/// PTY I/O streams wrapper
#[derive(Debug)]
pub struct PtyStreams {
    /// Receiver for output bytes from the PTY (stdout/stderr)
    output_rx: UnboundedReceiver<Vec<u8>>,
    /// Sender for input bytes to the PTY (stdin)
    input_tx: StdSender<Vec<u8>>,
}

impl PtyStreams {
    /// Create new PTY streams from channels
    pub fn from_channels(
        output_rx: UnboundedReceiver<Vec<u8>>,
        input_tx: StdSender<Vec<u8>>,
    ) -> Self {
        Self {
            output_rx,
            input_tx,
        }
    }

    /// Split into the output receiver and the input sender
    pub fn into_parts(self) -> (UnboundedReceiver<Vec<u8>>, StdSender<Vec<u8>>) {
        (self.output_rx, self.input_tx)
    }
}

/// Queue bytes for the writer thread
pub fn send_input(input_tx: &StdSender<Vec<u8>>, data: &[u8]) -> Result<()> {
    input_tx
        .send(data.to_vec())
        .map_err(|e| Error::PtyInputSendFailed {
            reason: e.to_string(),
        })
}
