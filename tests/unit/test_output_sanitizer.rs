//! Unit Tests for Output Sanitization
//!
//! Feeds realistic `shadcn` CLI output, as it arrives from a shell with
//! integration markers, through the line splitter, the marker router and
//! the sanitizer.

use shadcn_term::terminal::integration::MarkerRouter;
use shadcn_term::terminal::{LineSplitter, OutputSanitizer};
use tokio::sync::mpsc::unbounded_channel;

const ECHOED_COMMAND: &str =
    "$ printf '\\033]633;C\\007'; npx shadcn@latest init; printf '\\033]633;D;%s\\007\\n' $?\r\n";

fn capture_and_sanitize(chunks: &[&[u8]]) -> Vec<String> {
    let mut splitter = LineSplitter::new();
    let mut router = MarkerRouter::new();
    let (tx, mut rx) = unbounded_channel();
    router.begin_capture(tx);

    for chunk in chunks {
        for line in splitter.push_bytes(chunk) {
            router.route_line(&line);
        }
    }
    if let Some(line) = splitter.flush() {
        router.route_line(&line);
    }

    let mut sanitizer = OutputSanitizer::new();
    while let Ok(line) = rx.try_recv() {
        sanitizer.push(&line);
    }
    sanitizer.finish()
}

#[test]
fn test_repeated_progress_lines_collapse() {
    let output = OutputSanitizer::sanitize_all([
        "Installing…",
        "Installing…",
        "Installing…",
        "Done",
    ]);
    assert_eq!(output, ["Installing… [x3]", "Done"]);
}

#[test]
fn test_clean_output_passes_through() {
    let lines = [
        "Checking registry.",
        "Installing dependencies.",
        "Created 1 file:",
        "- components/ui/button.tsx",
    ];
    assert_eq!(OutputSanitizer::sanitize_all(lines), lines);
}

#[test]
fn test_sanitizing_twice_changes_nothing() {
    let raw = [
        "\x1b]633;C\x07",
        "\x1b[?25l⠋ Checking registry.",
        "\x1b[2K\x1b[1G⠙ Checking registry.",
        "\x1b[32m✔\x1b[39m Checking registry.",
        "\x1b]633;D;0\x07",
    ];
    let once = OutputSanitizer::sanitize_all(raw);
    let twice = OutputSanitizer::sanitize_all(&once);
    assert_eq!(once, ["Checking registry. [x2]", "✔ Checking registry."]);
    assert_eq!(twice, once);
}

#[test]
fn test_spinner_redraws_over_carriage_returns() {
    let output = capture_and_sanitize(&[
        ECHOED_COMMAND.as_bytes(),
        "\x1b]633;C\x07".as_bytes(),
        "⠋ Installing dependencies.\r⠙ Installing dependencies.\r".as_bytes(),
        "⠹ Installing dependencies.\r\x1b[32m✔\x1b[39m Installing dependencies.\r\n".as_bytes(),
        "Success! Project initialization completed.\r\n".as_bytes(),
        "\x1b]633;D;0\x07\r\n".as_bytes(),
        "$ ".as_bytes(),
    ]);

    assert_eq!(
        output,
        [
            "Installing dependencies. [x3]",
            "✔ Installing dependencies.",
            "Success! Project initialization completed."
        ]
    );
}

#[test]
fn test_multibyte_glyph_split_between_reads() {
    let bytes = "✔ Done.\n".as_bytes();
    let output = capture_and_sanitize(&[
        "\x1b]633;C\x07".as_bytes(),
        &bytes[..1],
        &bytes[1..2],
        &bytes[2..],
        "\x1b]633;D;0\x07\n".as_bytes(),
    ]);
    assert_eq!(output, ["✔ Done."]);
}

#[test]
fn test_blank_and_escape_only_lines_are_dropped() {
    let output = OutputSanitizer::sanitize_all(["", "   ", "\x1b[0m", "\x07", "⠼  ", "ok"]);
    assert_eq!(output, ["ok"]);
}

#[test]
fn test_incremental_push_matches_batch() {
    let raw = ["a", "a", "b", "b", "b", "c"];
    let mut sanitizer = OutputSanitizer::new();
    for line in raw {
        sanitizer.push(line);
    }
    assert_eq!(sanitizer.len(), 3);
    assert_eq!(sanitizer.finish(), OutputSanitizer::sanitize_all(raw));
}
