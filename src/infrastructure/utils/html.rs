use ammonia::{Builder, UrlRelative};

/// Strips scripts, event handlers and other unsafe markup from post bodies.
pub fn sanitize_html(content: &str) -> String {
    Builder::default()
        .link_rel(Some("nofollow noopener noreferrer"))
        .url_relative(UrlRelative::Deny)
        .clean(content)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_removed() {
        let cleaned = sanitize_html(r#"<p onclick="x()">Hi</p><script>alert(1)</script>"#);
        assert_eq!(cleaned, "<p>Hi</p>");
    }

    #[test]
    fn links_get_safe_rel() {
        let cleaned = sanitize_html(r#"<a href="https://example.com">x</a>"#);
        assert!(cleaned.contains(r#"rel="nofollow noopener noreferrer""#));
    }
}
