//! Escape decoding for file content written by the model.
//!
//! Content arguments of `write_file` and `edit_file` arrive with escape
//! sequences still in place (`\n`, `\"`, ...). [`unescape_content`] decodes
//! them. Unknown escapes such as `\d` are kept as written so that regular
//! expressions and Windows paths survive. If the text contains a malformed
//! escape, only `\n`, `\t` and `\r` are replaced and everything else is left
//! untouched.

use thiserror::Error;

/// A malformed escape sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("dangling backslash at end of input")]
    Dangling,

    #[error("invalid \\x escape at byte {0}")]
    InvalidHex(usize),

    #[error("invalid \\u escape at byte {0}")]
    InvalidUnicode(usize),
}

/// Decode escape sequences, falling back to newline/tab/CR replacement.
pub fn unescape_content(content: &str) -> String {
    match try_unescape(content) {
        Ok(decoded) => decoded,
        Err(_) => content
            .replace("\\n", "\n")
            .replace("\\t", "\t")
            .replace("\\r", "\r"),
    }
}

/// Decode escape sequences strictly.
///
/// Supported: `\n \t \r \0 \\ \" \'`, `\xHH` and `\uXXXX` / `\u{X..}`.
pub fn try_unescape(content: &str) -> Result<String, EscapeError> {
    if !content.contains('\\') {
        return Ok(content.to_string());
    }

    let mut out = String::with_capacity(content.len());
    let mut chars = content.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some((_, next)) = chars.next() else {
            return Err(EscapeError::Dangling);
        };

        match next {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'x' => {
                let hex = take_hex(&mut chars, 2);
                let value = (hex.len() == 2)
                    .then(|| u8::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .filter(|v| v.is_ascii())
                    .ok_or(EscapeError::InvalidHex(pos))?;
                out.push(value as char);
            }
            'u' => {
                let code = if chars.peek().map(|(_, c)| *c) == Some('{') {
                    chars.next();
                    let hex = take_hex(&mut chars, 6);
                    if chars.next().map(|(_, c)| c) != Some('}') || hex.is_empty() {
                        return Err(EscapeError::InvalidUnicode(pos));
                    }
                    hex
                } else {
                    let hex = take_hex(&mut chars, 4);
                    if hex.len() != 4 {
                        return Err(EscapeError::InvalidUnicode(pos));
                    }
                    hex
                };
                let ch = u32::from_str_radix(&code, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(EscapeError::InvalidUnicode(pos))?;
                out.push(ch);
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn take_hex(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    max: usize,
) -> String {
    let mut hex = String::new();
    while hex.len() < max {
        match chars.peek() {
            Some((_, c)) if c.is_ascii_hexdigit() => {
                hex.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(unescape_content("hello world"), "hello world");
        assert_eq!(unescape_content("日本語"), "日本語");
    }

    #[test]
    fn test_common_escapes() {
        assert_eq!(
            unescape_content(r"def hello():\n    print('Hi')"),
            "def hello():\n    print('Hi')"
        );
        assert_eq!(unescape_content(r"a\tb\r\n"), "a\tb\r\n");
        assert_eq!(unescape_content(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape_content(r"it\'s"), "it's");
        assert_eq!(unescape_content(r"C:\\temp"), r"C:\temp");
    }

    #[test]
    fn test_hex_and_unicode() {
        assert_eq!(unescape_content(r"\x41\x42"), "AB");
        assert_eq!(unescape_content(r"\u00e9t\u00e9"), "été");
        assert_eq!(unescape_content(r"\u{1F600}"), "\u{1F600}");
    }

    #[test]
    fn test_unknown_escape_is_kept() {
        assert_eq!(unescape_content(r"\d+\.\w"), r"\d+\.\w");
    }

    #[test]
    fn test_malformed_falls_back() {
        // Dangling backslash: only \n, \t, \r are replaced
        assert_eq!(unescape_content(r#"line1\nline2 \"q\" \"#), "line1\nline2 \\\"q\\\" \\");
        // Truncated \u
        assert_eq!(unescape_content(r"a\u12\tb"), "a\\u12\tb");
    }

    #[test]
    fn test_try_unescape_errors() {
        assert_eq!(try_unescape("abc\\"), Err(EscapeError::Dangling));
        assert_eq!(try_unescape(r"\xZZ"), Err(EscapeError::InvalidHex(0)));
        assert_eq!(try_unescape(r"ok \u{110000}"), Err(EscapeError::InvalidUnicode(3)));
        assert_eq!(try_unescape(r"\u{41"), Err(EscapeError::InvalidUnicode(0)));
    }
}
