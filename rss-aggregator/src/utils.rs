/// Text processing utilities
pub mod text {
    /// Keep at most `max_chars` characters. Never splits a code point.
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => text[..byte_index].to_string(),
            None => text.to_string(),
        }
    }

    /// Like [`truncate_chars`], with a trailing `...` when anything was cut.
    pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
        let truncated = truncate_chars(text, max_chars);
        if truncated.len() < text.len() {
            format!("{}...", truncated)
        } else {
            truncated
        }
    }

    /// Escape text for use in HTML element content and quoted attributes.
    pub fn escape_html(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}
