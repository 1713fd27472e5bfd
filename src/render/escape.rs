/// Escape HTML special characters so `text` is safe both as element content
/// and inside a double- or single-quoted attribute value.
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&#34;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
pub(crate) fn html_unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&#34;x&#34;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn safe_text_is_unchanged() {
        let text = "fn main() { println!(\u{201c}hi\u{201d}); }";
        assert_eq!(html_escape(text), text);
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn unescape_restores_original() {
        for line in ["a < b && c > d", "&amp; already escaped", "\"quoted\" 'single'", "plain"] {
            assert_eq!(html_unescape(&html_escape(line)), line);
        }
    }
}
