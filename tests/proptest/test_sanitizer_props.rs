//! Property-based tests for output sanitizing and line splitting

use proptest::prelude::*;
use shadcn_term::terminal::{LineSplitter, OutputSanitizer};

/// A line that is already clean: printable, trimmed, no escapes or markers
fn clean_line() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 .,:/()@-]{0,40}[a-zA-Z0-9.]"
}

/// Clean lines with no two neighbours equal
fn distinct_run() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(clean_line(), 0..20).prop_map(|mut lines| {
        lines.dedup();
        lines
    })
}

fn split_all(splitter: &mut LineSplitter, chunks: &[&[u8]]) -> Vec<String> {
    let mut lines = Vec::new();
    for chunk in chunks {
        lines.extend(splitter.push_bytes(chunk));
    }
    lines.extend(splitter.flush());
    lines
}

proptest! {
    #[test]
    fn test_sanitizer_doesnt_panic(lines in prop::collection::vec("\\PC*", 0..10)) {
        let _ = OutputSanitizer::sanitize_all(&lines);
    }

    #[test]
    fn test_output_never_contains_escape_or_bell(
        before in "\\PC{0,30}",
        after in "\\PC{0,30}",
        code in 0u8..108u8,
    ) {
        let raw = format!("{}\x1b[{}m{}\x07\x1b", before, code, after);
        for line in OutputSanitizer::sanitize_all([raw]) {
            prop_assert!(!line.contains('\x1b'));
            prop_assert!(!line.contains('\x07'));
        }
    }

    #[test]
    fn test_clean_lines_pass_through_unchanged(lines in distinct_run()) {
        prop_assert_eq!(OutputSanitizer::sanitize_all(&lines), lines);
    }

    #[test]
    fn test_decorations_are_removed(lines in distinct_run()) {
        let decorated: Vec<String> = lines
            .iter()
            .map(|line| format!("\x1b[2K\x1b[1G⠋ \x1b[36m{}\x1b[39m  ", line))
            .collect();
        prop_assert_eq!(OutputSanitizer::sanitize_all(&decorated), lines);
    }

    #[test]
    fn test_repeats_collapse_with_count(line in clean_line(), n in 2usize..50) {
        let output = OutputSanitizer::sanitize_all(std::iter::repeat(line.as_str()).take(n));
        prop_assert_eq!(output, vec![format!("{} [x{}]", line, n)]);
    }

    #[test]
    fn test_chunk_boundaries_dont_change_lines(
        text in "[a-zé✔⠋ \r\n]{0,200}",
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = text.as_bytes();
        let at = cut.index(bytes.len() + 1);

        let whole = split_all(&mut LineSplitter::new(), &[bytes]);
        let chunked = split_all(&mut LineSplitter::new(), &[&bytes[..at], &bytes[at..]]);
        prop_assert_eq!(chunked, whole);
    }

    #[test]
    fn test_split_lines_have_no_line_breaks(text in "[a-z \r\n]{0,200}") {
        for line in split_all(&mut LineSplitter::new(), &[text.as_bytes()]) {
            prop_assert!(!line.is_empty());
            prop_assert!(!line.contains('\n'));
            prop_assert!(!line.contains('\r'));
        }
    }
}
