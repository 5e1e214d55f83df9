//! Inline markup translation.
//!
//! OneNote stores rich text as a small HTML subset inside text runs. This
//! module rewrites that subset into Markdown through a fixed sequence of
//! regex passes, then strips whatever markup is left. The pass order
//! matters: anchors go first so nested styling inside link text is stripped
//! rather than half-translated, and the final strip pass cleans up any tag
//! the earlier passes did not recognize.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::page::{ContentNode, NodeBody};

static RE_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\s+[^>]*href=["']([^"']*)["'][^>]*>(.*?)</a>"#).unwrap()
});
static RE_BOLD_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<span\s+[^>]*font-weight\s*:\s*bold[^>]*>(.*?)</span>").unwrap()
});
static RE_BOLD_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(?:b|strong)\b[^>]*>(.*?)</(?:b|strong)>").unwrap());
static RE_ITALIC_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<span\s+[^>]*font-style\s*:\s*italic[^>]*>(.*?)</span>").unwrap()
});
static RE_ITALIC_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(?:i|em)\b[^>]*>(.*?)</(?:i|em)>").unwrap());
static RE_STRIKE_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<span\s+[^>]*text-decoration\s*:\s*line-through[^>]*>(.*?)</span>").unwrap()
});
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static RE_MULTISPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Translate one raw text run into Markdown.
pub fn translate(raw: &str) -> String {
    let text = RE_ANCHOR.replace_all(raw, |caps: &Captures| {
        format!("[{}]({})", strip_tags(&caps[2]), &caps[1])
    });
    let text = RE_BOLD_SPAN.replace_all(&text, |caps: &Captures| {
        format!("**{}**", strip_tags(&caps[1]))
    });
    let text = RE_BOLD_TAG.replace_all(&text, "**${1}**");
    let text = RE_ITALIC_SPAN.replace_all(&text, |caps: &Captures| {
        format!("*{}*", strip_tags(&caps[1]))
    });
    let text = RE_ITALIC_TAG.replace_all(&text, "*${1}*");
    let text = RE_STRIKE_SPAN.replace_all(&text, |caps: &Captures| {
        format!("~~{}~~", strip_tags(&caps[1]))
    });
    let text = strip_tags(&text);
    let text = decode_entities(&text);
    RE_MULTISPACE.replace_all(&text, " ").trim().to_string()
}

/// Collect the Markdown text of a unit's runs, joined with single spaces.
///
/// Runs that are blank in the source, or that translate to nothing, are
/// dropped. Non-text bodies yield the empty string.
pub fn collect_text(node: &ContentNode) -> String {
    let NodeBody::Text(ref runs) = node.body else {
        return String::new();
    };

    let mut parts = Vec::new();
    for run in runs {
        let raw = run.trim();
        if raw.is_empty() {
            continue;
        }
        let converted = translate(raw);
        if !converted.is_empty() {
            parts.push(converted);
        }
    }
    parts.join(" ")
}

/// Remove every remaining tag
fn strip_tags(text: &str) -> String {
    RE_TAG.replace_all(text, "").into_owned()
}

/// Decode HTML character entities.
///
/// `&nbsp;` and `&apos;` are mapped up front; doing so before the general
/// decode keeps `&amp;nbsp;` decoding to the literal `&nbsp;`.
fn decode_entities(text: &str) -> String {
    let text = text.replace("&nbsp;", "\u{a0}").replace("&apos;", "'");
    html_escape::decode_html_entities(&text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ImageData;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(translate("Hello World"), "Hello World");
    }

    #[test]
    fn test_bold_span() {
        assert_eq!(
            translate(r#"<span style='font-weight:bold'>Hi</span>"#),
            "**Hi**"
        );
        assert_eq!(
            translate(r#"<span style="color:red; font-weight: bold">Hi</span>"#),
            "**Hi**"
        );
    }

    #[test]
    fn test_bold_and_italic_tags() {
        assert_eq!(translate("<b>bold</b>"), "**bold**");
        assert_eq!(translate(r#"<strong class="x">bold</strong>"#), "**bold**");
        assert_eq!(translate("<i>it</i>"), "*it*");
        assert_eq!(translate("<em>it</em>"), "*it*");
    }

    #[test]
    fn test_tags_match_case_insensitively() {
        assert_eq!(translate("<B>x</B>"), "**x**");
        assert_eq!(translate("<EM>y</EM>"), "*y*");
    }

    #[test]
    fn test_italic_span_and_strike_span() {
        assert_eq!(
            translate(r#"<span style="font-style: italic">it</span>"#),
            "*it*"
        );
        assert_eq!(
            translate(r#"<span style="text-decoration:line-through">old</span>"#),
            "~~old~~"
        );
    }

    #[test]
    fn test_anchor() {
        assert_eq!(
            translate(r#"<a href="https://example.com">Link</a>"#),
            "[Link](https://example.com)"
        );
    }

    #[test]
    fn test_anchor_inner_markup_is_stripped() {
        let raw = r#"<a href="https://x.y">click <span style="font-weight:bold">here</span></a>"#;
        assert_eq!(translate(raw), "[click here](https://x.y)");
    }

    #[test]
    fn test_unknown_tags_are_stripped() {
        assert_eq!(translate("<u>plain</u>"), "plain");
        assert_eq!(translate(r#"<span style="color: blue">text</span>"#), "text");
    }

    #[test]
    fn test_matching_spans_newlines() {
        assert_eq!(translate("<b>one\ntwo</b>"), "**one\ntwo**");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(translate("a &amp; b"), "a & b");
        assert_eq!(translate("&lt;tag&gt;"), "<tag>");
        assert_eq!(translate("&quot;q&quot; &apos;a&apos;"), "\"q\" 'a'");
        assert_eq!(translate("&#65;&#x42;"), "AB");
        assert_eq!(translate("a&nbsp;b"), "a\u{a0}b");
    }

    #[test]
    fn test_double_escaped_entity_decodes_once() {
        assert_eq!(translate("&amp;nbsp;"), "&nbsp;");
    }

    #[test]
    fn test_spaces_collapsed_and_trimmed() {
        assert_eq!(translate("  a    b  "), "a b");
        assert_eq!(translate("<b>a</b>   <i>b</i>"), "**a** *b*");
    }

    #[test]
    fn test_translating_own_output_is_a_no_op() {
        let once = translate("<b>bold</b> &amp; <i>it</i>");
        assert_eq!(translate(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(translate(""), "");
        assert_eq!(translate("<br>"), "");
    }

    #[test]
    fn test_collect_text_joins_runs() {
        let mut node = ContentNode::text("one");
        node.add_run("  ");
        node.add_run("<b>two</b>");
        assert_eq!(collect_text(&node), "one **two**");
    }

    #[test]
    fn test_collect_text_non_text_body() {
        let node = ContentNode::image(ImageData::new("QUJD", None));
        assert_eq!(collect_text(&node), "");
    }
}
