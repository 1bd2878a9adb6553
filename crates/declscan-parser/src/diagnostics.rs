//! Pretty-printing [`ParseError`] with `ariadne` (§7) — presentation
//! only, never consulted by the grammar itself.
//!
//! Grounded in the same crate `meshc` reaches for to render its
//! diagnostics. The wrinkle here is that [`LineSpan`] is line-based
//! (§9 design note), while `ariadne` wants a byte range into the source
//! text; [`line_span_to_byte_range`] bridges the two by walking the
//! source once.

use ariadne::{Color, Label, Report, ReportKind, Source};

use declscan_common::{LineSpan, ParseError};

/// Render a [`ParseError`] as a human-readable report against `source`,
/// writing to `writer`.
pub fn render(error: &ParseError, source_file: &str, source: &str, writer: &mut impl std::io::Write) {
    let range = line_span_to_byte_range(source, error.span);
    Report::build(ReportKind::Error, source_file, range.start)
        .with_message(error.kind.to_string())
        .with_label(
            Label::new((source_file, range))
                .with_message(error.kind.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .write((source_file, Source::from(source)), writer)
        .ok();
}

/// Convert a 1-based, inclusive [`LineSpan`] to a 0-based byte range into
/// `source`, by walking its lines once. Falls back to an empty range at
/// the end of the source if the span names a line past the end (a
/// defensive case — tokenizers should never hand back a span outside
/// their own source).
fn line_span_to_byte_range(source: &str, span: LineSpan) -> std::ops::Range<usize> {
    let mut start = None;
    let mut end = None;
    let mut offset = 0usize;
    for (idx, line) in source.split_inclusive('\n').enumerate() {
        let line_no = idx as u32 + 1;
        if line_no == span.start {
            start = Some(offset);
        }
        if line_no == span.end {
            end = Some(offset + line.len());
        }
        offset += line.len();
    }
    let start = start.unwrap_or(source.len());
    let end = end.unwrap_or(source.len()).max(start);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_range_covers_named_lines() {
        let source = "a\nbb\nccc\n";
        let range = line_span_to_byte_range(source, LineSpan::new(2, 2));
        assert_eq!(&source[range], "bb\n");
    }

    #[test]
    fn byte_range_spans_multiple_lines() {
        let source = "a\nbb\nccc\n";
        let range = line_span_to_byte_range(source, LineSpan::new(1, 2));
        assert_eq!(&source[range], "a\nbb\n");
    }

    #[test]
    fn render_does_not_panic_on_a_real_error() {
        let err = ParseError::unexpected_token(
            declscan_common::TokenKind::Class,
            declscan_common::TokenKind::Function,
            LineSpan::single(2),
        );
        let mut out = Vec::new();
        render(&err, "test.src", "<open>\nfunction f() {}\n", &mut out);
        assert!(!out.is_empty());
    }
}
