//! Execution Output Stream
//!
//! Lines of one command's output, delivered as they arrive.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Lazy, finite, single-consumer stream of raw output lines.
///
/// The stream ends when the producer drops its sender, which the terminal
/// does once the command has finished. It cannot be restarted.
#[derive(Debug)]
pub struct ExecutionStream {
    rx: UnboundedReceiver<String>,
}

impl ExecutionStream {
    /// Wrap an existing receiver
    pub fn new(rx: UnboundedReceiver<String>) -> Self {
        Self { rx }
    }

    /// Create a producer/stream pair
    pub fn channel() -> (UnboundedSender<String>, Self) {
        let (tx, rx) = unbounded_channel();
        (tx, Self::new(rx))
    }

    /// A stream that yields exactly `lines` and then ends
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (tx, stream) = Self::channel();
        for line in lines {
            // Receiver is alive in `stream`
            let _ = tx.send(line.into());
        }
        stream
    }

    /// Wait for the next line; `None` once the command has finished
    pub async fn next_line(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl Stream for ExecutionStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
