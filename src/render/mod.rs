//! Description rendering
//!
//! Builds the HTML description body from structured fields. Purely a
//! presentation concern; nothing in the pipeline's correctness rides on the
//! markup produced here.

/// Renders a description from optional image, optional category line, and
/// body text. Newlines in the body become `<br>`.
pub fn render_description(image: Option<&str>, category: Option<&str>, body: &str) -> String {
    let mut out = String::new();

    if let Some(image) = image {
        out.push_str(&format!("<img src=\"{}\">", image));
    }

    if let Some(category) = category {
        out.push_str(&format!("<p><strong>{}</strong></p>", category));
    }

    out.push_str("<p>");
    out.push_str(&body.replace('\n', "<br>"));
    out.push_str("</p>");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_only() {
        let html = render_description(None, None, "hello");
        assert_eq!(html, "<p>hello</p>");
    }

    #[test]
    fn test_newlines_become_breaks() {
        let html = render_description(None, None, "line1\nline2");
        assert_eq!(html, "<p>line1<br>line2</p>");
    }

    #[test]
    fn test_image_and_category() {
        let html = render_description(
            Some("https://example.com/a.jpg"),
            Some("Release"),
            "body",
        );
        assert!(html.starts_with("<img src=\"https://example.com/a.jpg\">"));
        assert!(html.contains("<strong>Release</strong>"));
        assert!(html.ends_with("<p>body</p>"));
    }
}
