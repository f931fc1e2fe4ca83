//! Minimal HTML handling for inline and block HTML nodes.
//!
//! Markdown destined for Notion only ever carries a handful of HTML shapes:
//! `<br>` variants for forced line breaks and comments used to annotate the
//! source. Everything else passes through lowercased so downstream tooling
//! sees a stable form.

/// Normalize a raw HTML fragment for inclusion in rich text.
///
/// Break tags become a newline, comments vanish, and anything else is
/// trimmed and lowercased.
pub fn sanitize(raw: &str) -> String {
    let tag = raw.trim().to_lowercase();
    match tag.as_str() {
        "<br>" | "<br/>" | "<br />" => "\n".to_string(),
        _ if tag.starts_with("<!--") && tag.ends_with("-->") => String::new(),
        _ => tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_tags_become_newlines() {
        assert_eq!(sanitize("<br>"), "\n");
        assert_eq!(sanitize("<BR/>"), "\n");
        assert_eq!(sanitize("  <br />  "), "\n");
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(sanitize("<!-- note to self -->"), "");
    }

    #[test]
    fn other_tags_pass_through_lowercased() {
        assert_eq!(sanitize("<SPAN>"), "<span>");
    }
}
