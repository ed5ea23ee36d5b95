//! Argument Splitter: turns a raw argument list into positional strings.
//!
//! The input is the trimmed text between the outer parentheses of an
//! invocation (see [`super::invocation`]). Arguments are separated by commas
//! that sit outside any quoted region and outside nested parentheses.
//!
//! | Input | Output |
//! |-------|--------|
//! | `main.py` | `["main.py"]` |
//! | `"a.py", "x = 1, y = 2"` | `["a.py", "x = 1, y = 2"]` |
//! | `"f.py", "print('a, b')"` | `["f.py", "print('a, b')"]` |
//! | `pending` | `["pending"]` |
//! | (empty) | `[]` |
//!
//! Rules, applied left to right:
//!
//! - Inside a quoted region a backslash and the character after it are copied
//!   verbatim; escape sequences are decoded later by the tool that needs them.
//! - A quote character only opens or closes a region at nesting depth zero.
//!   The delimiting quotes are dropped; the other quote kind inside a region
//!   is kept as text.
//! - Parentheses outside quotes change the nesting depth.
//! - Each argument is trimmed. A trailing empty fragment is dropped, but an
//!   empty argument between two commas is kept.

/// Split a raw argument list into positional arguments.
pub fn split_arguments(raw: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth: i32 = 0;
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c == '\\' && quote.is_some() {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
            continue;
        }

        if (c == '"' || c == '\'') && depth == 0 {
            match quote {
                None => quote = Some(c),
                Some(q) if q == c => quote = None,
                Some(_) => current.push(c),
            }
            continue;
        }

        if quote.is_none() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
        }

        if c == ',' && quote.is_none() && depth == 0 {
            args.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(c);
        }
    }

    let last = current.trim();
    if !last.is_empty() {
        args.push(last.to_string());
    }

    args
}
