//! HTML parsing into a [`DocumentTree`].
//!
//! This module is the boundary between raw markup and the owned tree the
//! transform works on. Parsing uses `scraper`'s HTML5 parser; comments,
//! doctypes and processing instructions are dropped since the tree only models
//! text and elements.
//!
//! # Example
//!
//! ```rust
//! use linkmark_core::DocumentTree;
//!
//! let tree = DocumentTree::parse_fragment(r#"<p><a href="https://example.com">https://example.com</a></p>"#);
//! assert_eq!(tree.children.len(), 1);
//! assert_eq!(tree.to_html(), r#"<p><a href="https://example.com">https://example.com</a></p>"#);
//! ```

use scraper::{ElementRef, Html};

use crate::tree::{AttrValue, DocumentTree, Element, Node};

impl DocumentTree {
    /// Parses an HTML fragment, such as the rendered body of one document.
    pub fn parse_fragment(html: &str) -> Self {
        let parsed = Html::parse_fragment(html);
        let root = convert_element(parsed.root_element());
        Self { children: root.children, doctype: false }
    }

    /// Parses a complete HTML document. The tree holds the `html` element as
    /// its single root and serializes with a doctype.
    pub fn parse_document(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let root = convert_element(parsed.root_element());
        Self { children: vec![Node::Element(root)], doctype: true }
    }

    /// Parses either form, sniffing for a doctype or `<html>` tag.
    pub fn parse(html: &str) -> Self {
        if looks_like_document(html) { Self::parse_document(html) } else { Self::parse_fragment(html) }
    }
}

/// Whether the markup starts like a full document rather than a fragment.
///
/// A byte order mark, whitespace and comments ahead of the doctype are skipped.
pub fn looks_like_document(html: &str) -> bool {
    let mut head = html.trim_start_matches('\u{feff}').trim_start();
    while let Some(comment) = head.strip_prefix("<!--") {
        match comment.find("-->") {
            Some(end) => head = comment[end + 3..].trim_start(),
            None => return false,
        }
    }
    let prefix: String = head.chars().take(15).collect::<String>().to_ascii_lowercase();
    prefix.starts_with("<!doctype") || prefix.starts_with("<html")
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut converted = Element::new(value.name());

    for (name, attr) in value.attrs() {
        if name == "class" {
            let tokens = attr.split_whitespace().map(str::to_string).collect();
            converted.attributes.set(name, AttrValue::List(tokens));
        } else {
            converted.attributes.set(name, attr);
        }
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            converted.children.push(Node::Element(convert_element(child_element)));
        } else if let Some(text) = child.value().as_text() {
            converted.children.push(Node::text(&**text));
        }
    }

    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let tree = DocumentTree::parse_fragment("<p>Hello <strong>world</strong></p><p>Again</p>");
        assert_eq!(tree.children.len(), 2);
        let first = tree.children[0].as_element().unwrap();
        assert_eq!(first.tag_name, "p");
        assert_eq!(first.text_content(), "Hello world");
    }

    #[test]
    fn test_class_parses_as_list() {
        let tree = DocumentTree::parse_fragment(r#"<pre class="shiki  language-pseudocode"><code>x</code></pre>"#);
        let pre = tree.children[0].as_element().unwrap();
        assert_eq!(
            pre.attributes.get("class"),
            Some(&AttrValue::List(vec!["shiki".to_string(), "language-pseudocode".to_string()]))
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        let tree = DocumentTree::parse_fragment("<p>a<!-- note -->b</p>");
        assert_eq!(tree.to_html(), "<p>ab</p>");
    }

    #[test]
    fn test_parse_document_round_trip() {
        let html = "<!DOCTYPE html><html><head><title>T</title></head><body><p>x</p></body></html>";
        let tree = DocumentTree::parse(html);
        assert!(tree.doctype);
        assert_eq!(tree.to_html(), html);
    }

    #[test]
    fn test_looks_like_document() {
        assert!(looks_like_document("  <!doctype html><html></html>"));
        assert!(looks_like_document("<HTML lang=\"en\">"));
        assert!(!looks_like_document("<p>fragment</p>"));
        assert!(!looks_like_document("<!-- unterminated <html>"));
    }

    #[test]
    fn test_document_after_bom_or_comment() {
        let document = "<!DOCTYPE html><html><head><title>T</title></head><body><p>x</p></body></html>";
        for input in [format!("\u{feff}{}", document), format!("<!-- c -->\n{}", document)] {
            assert!(looks_like_document(&input));
            let tree = DocumentTree::parse(&input);
            assert!(tree.doctype);
            assert_eq!(tree.to_html(), document);
        }
    }

    #[test]
    fn test_attribute_order_preserved() {
        let html = r#"<p><a href="https://example.com" class="ext" data-x="1">https://example.com</a></p>"#;
        assert_eq!(DocumentTree::parse_fragment(html).to_html(), html);
    }
}
