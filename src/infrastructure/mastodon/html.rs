//! Plain-text rendering of Mastodon status HTML

use scraper::Html;
use serde_json::Value;

/// Field holding the tag-stripped status content
pub const CONTENT_TEXT_FIELD: &str = "content_text";

/// Concatenate the text nodes of an HTML fragment, dropping all tags.
///
/// Character references are decoded; block elements add no separators.
pub fn strip_html_tags(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<String>()
}

/// Add `content_text` next to `content` on a status object
pub fn add_content_text(status: &mut Value) {
    let Some(object) = status.as_object_mut() else {
        return;
    };

    let text = object
        .get("content")
        .and_then(Value::as_str)
        .map(strip_html_tags)
        .unwrap_or_default();

    object.insert(CONTENT_TEXT_FIELD.to_string(), Value::String(text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_tags() {
        let html = r#"<p>Hello <a href="https://example.social/@bob" class="mention">@<span>bob</span></a></p><p>second</p>"#;
        assert_eq!(strip_html_tags(html), "Hello @bobsecond");
    }

    #[test]
    fn test_decodes_entities() {
        assert_eq!(strip_html_tags("<p>fish &amp; chips &lt;3</p>"), "fish & chips <3");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(strip_html_tags("no markup"), "no markup");
    }

    #[test]
    fn test_add_content_text() {
        let mut status = json!({"id": "1", "content": "<p>hi <br>there</p>"});
        add_content_text(&mut status);
        assert_eq!(status["content_text"], "hi there");
        assert_eq!(status["content"], "<p>hi <br>there</p>");
    }

    #[test]
    fn test_missing_content_yields_empty_text() {
        let mut status = json!({"id": "1"});
        add_content_text(&mut status);
        assert_eq!(status["content_text"], "");
    }
}
