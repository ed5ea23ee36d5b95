//! String utilities for the domain layer.

/// Shorten `s` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts characters rather than bytes, so previews of multibyte text keep
/// the same visual width as ASCII.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string.
pub fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Human-readable byte size: `512.0B`, `1.5KB`, `3.2MB`, ...
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    for unit in UNITS.iter().take(UNITS.len() - 1) {
        if size < 1024.0 {
            return format!("{:.1}{}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1}{}", size, UNITS[UNITS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello...");
        assert_eq!(truncate_chars("あのねあのね", 3), "あのね...");
    }

    #[test]
    fn test_truncate_bytes_boundary() {
        let s = "あのね"; // 3 bytes per char
        assert_eq!(truncate_bytes(s, 4), "あ");
        assert_eq!(truncate_bytes(s, 9), "あのね");
        assert_eq!(truncate_bytes("hello world", 5), "hello");
        assert_eq!(truncate_bytes("", 10), "");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.0B");
        assert_eq!(format_size(512), "512.0B");
        assert_eq!(format_size(1536), "1.5KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 * 1024), "3.0TB");
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024 * 1024), "2048.0TB");
    }
}
