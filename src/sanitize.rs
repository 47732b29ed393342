//! Escaping of markup-significant characters in free-text fields.
//!
//! Applied exactly once, at the create/update boundary, after validation and
//! before persistence. Idempotence is not part of the contract, so stored
//! text is never re-sanitized.

/// Escape `<`, `>`, `"`, `'` and `/` to their entity equivalents.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_five_characters() {
        assert_eq!(
            escape_html(r#"<a href="/x" title='t'>"#),
            "&lt;a href=&quot;&#x2F;x&quot; title=&#x27;t&#x27;&gt;"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_html("What is your favorite color?"), "What is your favorite color?");
    }

    #[test]
    fn script_tag_is_neutralized() {
        let stored = escape_html("<script>alert(1)</script>Pick one?");
        assert!(stored.starts_with("&lt;script&gt;"));
        assert!(!stored.contains('<'));
        assert!(!stored.contains('>'));
    }

    #[test]
    fn escaping_happens_per_character() {
        let stored = escape_html("a < b > c");
        assert_eq!(stored, "a &lt; b &gt; c");
    }
}
