//! Call Locator: finds `MARKER[name](...)` invocations in model output.
//!
//! The model is taught to request a tool by writing, anywhere in its free-form
//! reply, a line such as:
//!
//! ```text
//! TOOL[write_file]("app.py", "print('hi (there)')")
//! ```
//!
//! [`ToolCallSyntax::locate`] scans the full response text and returns one
//! [`Invocation`] per well-formed occurrence, left to right. The scan has two
//! independent parts:
//!
//! 1. A linear search for `MARKER[` followed by an identifier
//!    (`[A-Za-z0-9_]+`) and `]`.
//! 2. For each such header, a quote-aware parenthesis match starting at the
//!    `(` that must immediately follow the `]`.
//!
//! Because step 1 does not know about the quote state tracked in step 2, a
//! marker that appears *inside* a quoted argument of another invocation is
//! located as an invocation of its own:
//!
//! ```text
//! TOOL[write_file]("notes.md", "call TOOL[read_file](a.py) later")
//!                                    ^^^^^^^^^^^^^^^^^^^^^ also located
//! ```
//!
//! This mirrors how the agent has always behaved and is pinned by a
//! regression test below.
//!
//! Malformed headers (no `(`) and unterminated argument lists are skipped;
//! the locator never fails, it only returns fewer invocations.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default invocation marker taught to the model.
pub const DEFAULT_MARKER: &str = "TOOL";

/// One located tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Tool name between the brackets (`[A-Za-z0-9_]+`)
    pub tool_name: String,
    /// Text between the outer parentheses, trimmed
    pub raw_arguments: String,
    /// Byte range of the whole invocation, marker through closing `)`
    pub source_span: Range<usize>,
}

/// The textual syntax used to recognise invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallSyntax {
    marker: String,
    /// `marker` + `[`, cached for the search
    prefix: String,
}

impl ToolCallSyntax {
    pub fn new(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        let prefix = format!("{}[", marker);
        Self { marker, prefix }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Render an invocation in this syntax, e.g. `TOOL[read_file](main.py)`.
    pub fn render(&self, tool_name: &str, raw_arguments: &str) -> String {
        format!("{}[{}]({})", self.marker, tool_name, raw_arguments)
    }

    /// Locate every well-formed invocation in `text`, in order of appearance.
    pub fn locate(&self, text: &str) -> Vec<Invocation> {
        let bytes = text.as_bytes();
        let mut invocations = Vec::new();
        let mut cursor = 0;

        if self.marker.is_empty() {
            return invocations;
        }

        while let Some(found) = text[cursor..].find(&self.prefix) {
            let marker_start = cursor + found;
            let name_start = marker_start + self.prefix.len();
            let name_len = bytes[name_start..]
                .iter()
                .take_while(|b| is_identifier_byte(**b))
                .count();
            let name_end = name_start + name_len;

            if name_len == 0 || bytes.get(name_end) != Some(&b']') {
                cursor = name_start;
                continue;
            }

            // Resume marker search right after `]`, not after the argument
            // list: markers inside arguments are still found.
            let open = name_end + 1;
            cursor = open;
            let tool_name = &text[name_start..name_end];

            if bytes.get(open) != Some(&b'(') {
                continue;
            }

            // Unterminated argument lists are dropped
            if let Some(close) = find_closing_paren(bytes, open) {
                invocations.push(Invocation {
                    tool_name: tool_name.to_string(),
                    raw_arguments: text[open + 1..close].trim().to_string(),
                    source_span: marker_start..close + 1,
                });
            }
        }

        invocations
    }
}

impl Default for ToolCallSyntax {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

/// Locate invocations using the given marker.
pub fn locate_invocations(text: &str, marker: &str) -> Vec<Invocation> {
    ToolCallSyntax::new(marker).locate(text)
}

/// Whether `marker` can be used as an invocation marker.
///
/// Markers are restricted to identifier characters so that they can never
/// contain the `[`, `(` or quote characters the scanner depends on.
pub fn is_valid_marker(marker: &str) -> bool {
    !marker.is_empty() && marker.bytes().all(is_identifier_byte)
}

/// Remove every located invocation from `text` and trim the result.
///
/// Spans that overlap or nest (see the module docs) are merged first.
pub fn strip_invocations(text: &str, invocations: &[Invocation]) -> String {
    let mut spans: Vec<Range<usize>> = invocations
        .iter()
        .map(|inv| inv.source_span.clone())
        .filter(|span| span.end <= text.len() && span.start < span.end)
        .collect();
    spans.sort_by_key(|span| span.start);

    let mut cleaned = String::with_capacity(text.len());
    let mut last = 0;
    for span in spans {
        if span.end <= last {
            continue;
        }
        let start = span.start.max(last);
        cleaned.push_str(&text[last..start]);
        last = span.end;
    }
    cleaned.push_str(&text[last..]);

    cleaned.trim().to_string()
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find the `)` that balances the `(` at `open`, ignoring parentheses inside
/// quoted regions. Returns `None` if the text ends first.
fn find_closing_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut quote: Option<u8> = None;

    for i in open..bytes.len() {
        let b = bytes[i];

        if (b == b'"' || b == b'\'') && !is_escaped(bytes, i) {
            match quote {
                None => quote = Some(b),
                Some(q) if q == b => quote = None,
                Some(_) => {}
            }
        }

        if quote.is_none() {
            match b {
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
    }

    None
}

/// A character is escaped when preceded by an odd run of backslashes.
fn is_escaped(bytes: &[u8], index: usize) -> bool {
    let run = bytes[..index]
        .iter()
        .rev()
        .take_while(|b| **b == b'\\')
        .count();
    run % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locate(text: &str) -> Vec<Invocation> {
        ToolCallSyntax::default().locate(text)
    }

    #[test]
    fn test_no_marker_yields_nothing() {
        assert!(locate("Just a plain answer (with parens) and [brackets].").is_empty());
        assert!(locate("").is_empty());
    }

    #[test]
    fn test_single_invocation() {
        let text = "Let me read that.\n\nTOOL[read_file](main.py)\n\nNow analyzing...";
        let calls = locate(text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "read_file");
        assert_eq!(calls[0].raw_arguments, "main.py");
        assert_eq!(&text[calls[0].source_span.clone()], "TOOL[read_file](main.py)");
    }

    #[test]
    fn test_custom_marker() {
        let text = "Let me read that.\n\nTOOLMARKER[read_file](main.py)\n\nNow analyzing...";
        let calls = locate_invocations(text, "TOOLMARKER");

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "read_file");
        assert_eq!(calls[0].raw_arguments, "main.py");
    }

    #[test]
    fn test_quoted_arguments() {
        let calls = locate(r#"TOOL[write_file]("test.txt", "Hello!")"#);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, r#""test.txt", "Hello!""#);
    }

    #[test]
    fn test_two_invocations_in_order() {
        let text = "First:\nTOOL[write_file](\"a.py\", \"x = 1, y = 2\")\nThen:\nTOOL[edit_file](\"a.py\", \"old\", \"new\")";
        let calls = locate(text);

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name, "write_file");
        assert_eq!(calls[0].raw_arguments, r#""a.py", "x = 1, y = 2""#);
        assert_eq!(calls[1].tool_name, "edit_file");
        assert_eq!(calls[1].raw_arguments, r#""a.py", "old", "new""#);
        assert!(calls[0].source_span.end <= calls[1].source_span.start);
    }

    #[test]
    fn test_parens_inside_quotes_do_not_close() {
        let text = r#"TOOL[write_file]("app.py", "print(')')") trailing"#;
        let calls = locate(text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, r#""app.py", "print(')')""#);
    }

    #[test]
    fn test_nested_parens_outside_quotes() {
        let calls = locate("TOOL[run_command](echo $(date))");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, "echo $(date)");
    }

    #[test]
    fn test_escaped_quote_keeps_quoted_region() {
        let text = r#"TOOL[write_file]("a.txt", "say \"hi)\" now")"#;
        let calls = locate(text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, r#""a.txt", "say \"hi)\" now""#);
    }

    #[test]
    fn test_double_backslash_does_not_escape_quote() {
        let text = r#"TOOL[write_file]("a.txt", "dir\\") rest"#;
        let calls = locate(text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, r#""a.txt", "dir\\""#);
    }

    #[test]
    fn test_missing_paren_is_skipped() {
        let calls = locate("TOOL[read_file] main.py\nTOOL[list_files](.)");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "list_files");
    }

    #[test]
    fn test_unterminated_is_skipped() {
        assert!(locate("TOOL[write_file](\"a.txt\", \"never closed").is_empty());
        assert!(locate("TOOL[read_file](main.py").is_empty());
    }

    #[test]
    fn test_invalid_names_are_skipped() {
        assert!(locate("TOOL[](x)").is_empty());
        assert!(locate("TOOL[read file](x)").is_empty());
        assert!(locate("TOOL[read-file](x)").is_empty());
    }

    #[test]
    fn test_empty_argument_list() {
        let calls = locate("TOOL[show_todos]()");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, "");
    }

    #[test]
    fn test_marker_inside_quoted_argument_is_also_located() {
        let text = r#"TOOL[write_file]("notes.md", "call TOOL[read_file](a.py) later")"#;
        let calls = locate(text);

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name, "write_file");
        assert_eq!(
            calls[0].raw_arguments,
            r#""notes.md", "call TOOL[read_file](a.py) later""#
        );
        assert_eq!(calls[1].tool_name, "read_file");
        assert_eq!(calls[1].raw_arguments, "a.py");
        // The nested span lies inside the outer one
        assert!(calls[1].source_span.start > calls[0].source_span.start);
        assert!(calls[1].source_span.end < calls[0].source_span.end);
    }

    #[test]
    fn test_non_ascii_text_around_invocations() {
        let text = "日本語の説明 TOOL[read_file](ファイル.txt) 終わり";
        let calls = locate(text);

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, "ファイル.txt");
    }

    #[test]
    fn test_strip_invocations() {
        let text = "Let me read that.\n\nTOOL[read_file](main.py)\n\nNow analyzing...";
        let calls = locate(text);
        assert_eq!(
            strip_invocations(text, &calls),
            "Let me read that.\n\n\n\nNow analyzing..."
        );
    }

    #[test]
    fn test_strip_merges_nested_spans() {
        let text = r#"Before TOOL[write_file]("n.md", "TOOL[read_file](a.py)") after"#;
        let calls = locate(text);
        assert_eq!(calls.len(), 2);
        assert_eq!(strip_invocations(text, &calls), "Before  after");
    }

    #[test]
    fn test_strip_leaves_malformed_text() {
        let text = "TOOL[read_file] oops\nTOOL[list_files](.)";
        let calls = locate(text);
        assert_eq!(strip_invocations(text, &calls), "TOOL[read_file] oops");
    }

    #[test]
    fn test_render_round_trips_through_locate() {
        let syntax = ToolCallSyntax::new("CALL");
        let rendered = syntax.render("list_files", "src");
        let calls = syntax.locate(&rendered);

        assert_eq!(rendered, "CALL[list_files](src)");
        assert_eq!(calls[0].raw_arguments, "src");
    }

    #[test]
    fn test_is_valid_marker() {
        assert!(is_valid_marker("TOOL"));
        assert!(is_valid_marker("TOOL_MARKER2"));
        assert!(!is_valid_marker(""));
        assert!(!is_valid_marker("TO OL"));
        assert!(!is_valid_marker("TOOL["));
    }
}
