//! Output Line Splitting
//!
//! Turns raw PTY bytes into text lines. Chunks arrive at arbitrary
//! boundaries, so both partial lines and partial UTF-8 sequences are
//! carried over to the next chunk.

/// Longest partial line kept before it is emitted as-is
const MAX_PARTIAL_LINE: usize = 64 * 1024;

/// Incremental splitter for terminal output
#[derive(Debug, Default)]
pub struct LineSplitter {
    /// Text of the line being built
    current_line: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending_bytes: Vec<u8>,
}

impl LineSplitter {
    /// Create a new splitter
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every line they complete
    pub fn push_bytes(&mut self, data: &[u8]) -> Vec<String> {
        self.pending_bytes.extend_from_slice(data);

        let mut text = String::with_capacity(self.pending_bytes.len());
        loop {
            match std::str::from_utf8(&self.pending_bytes) {
                Ok(valid) => {
                    text.push_str(valid);
                    self.pending_bytes.clear();
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending_bytes[..valid_up_to]));
                    match e.error_len() {
                        Some(invalid_len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            self.pending_bytes.drain(..valid_up_to + invalid_len);
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes
                            self.pending_bytes.drain(..valid_up_to);
                            break;
                        }
                    }
                }
            }
        }

        self.push_str(&text)
    }

    /// Feed decoded text, returning every line it completes.
    ///
    /// Both `\n` and `\r` end a line, so progress output that redraws itself
    /// with carriage returns shows up as a series of lines. Empty lines are
    /// skipped.
    pub fn push_str(&mut self, text: &str) -> Vec<String> {
        let mut lines = Vec::new();

        for ch in text.chars() {
            match ch {
                '\n' | '\r' => {
                    if !self.current_line.is_empty() {
                        lines.push(std::mem::take(&mut self.current_line));
                    }
                }
                ch => {
                    self.current_line.push(ch);
                    if self.current_line.len() >= MAX_PARTIAL_LINE {
                        lines.push(std::mem::take(&mut self.current_line));
                    }
                }
            }
        }

        lines
    }

    /// Emit whatever partial line is left
    pub fn flush(&mut self) -> Option<String> {
        if !self.pending_bytes.is_empty() {
            let tail = String::from_utf8_lossy(&self.pending_bytes).into_owned();
            self.pending_bytes.clear();
            self.current_line.push_str(&tail);
        }

        if self.current_line.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.current_line))
        }
    }
}
