//! Output Sanitizer
//!
//! Cleans raw terminal lines for display: escape sequences, spinner
//! glyphs and shell-integration markers are removed, and runs of the
//! same line collapse into one entry with a repeat count.

use once_cell::sync::Lazy;
use regex::Regex;

/// CSI/ESC sequences, plus any stray ESC or BEL
static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x1B\x9B][\[()#;?]*(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-PRZcf-nqry=><]|\x1B|\x07")
        .expect("ANSI escape pattern is valid")
});

/// Braille spinner frame at the start of a line
static SPINNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏]\s*").expect("spinner pattern is valid"));

/// OSC 633 marker body left after the ESC has been stripped
static INTEGRATION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\]633;[A-Z](?:;[^\s\x07]*)?").expect("integration marker pattern is valid")
});

/// Line-by-line sanitizer with run-length de-duplication
#[derive(Debug, Default)]
pub struct OutputSanitizer {
    output: Vec<String>,
    duplicate_count: usize,
}

impl OutputSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean a single line; `None` when nothing visible is left.
    ///
    /// Escapes go first so that a marker split by an ESC byte still matches.
    pub fn clean_line(raw: &str) -> Option<String> {
        let text = ANSI_ESCAPE.replace_all(raw, "");
        let text = SPINNER.replace(&text, "");
        let text = INTEGRATION_MARKER.replace_all(&text, "");
        let text = text.trim();

        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }

    /// Add a raw line
    pub fn push(&mut self, raw: &str) {
        let Some(line) = Self::clean_line(raw) else {
            return;
        };

        if self.output.last() == Some(&line) {
            self.duplicate_count += 1;
            return;
        }

        self.close_run();
        self.output.push(line);
    }

    /// Lines so far. A repeat run still in progress is not yet annotated.
    pub fn lines(&self) -> &[String] {
        &self.output
    }

    /// Number of lines emitted so far
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Annotate the last run and return the cleaned output
    pub fn finish(mut self) -> Vec<String> {
        self.close_run();
        self.output
    }

    /// Sanitize a complete sequence of raw lines
    pub fn sanitize_all<I, S>(lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sanitizer = Self::new();
        for line in lines {
            sanitizer.push(line.as_ref());
        }
        sanitizer.finish()
    }

    fn close_run(&mut self) {
        if self.duplicate_count == 0 {
            return;
        }
        if let Some(last) = self.output.last_mut() {
            last.push_str(&format!(" [x{}]", self.duplicate_count + 1));
        }
        self.duplicate_count = 0;
    }
}
