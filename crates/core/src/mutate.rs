//! Node rewriting: mention anchors, algorithm containers and embed frames.
//!
//! Class names and data attributes here are the contract with the site's
//! stylesheet and runtime scripts.

use url::Url;

use crate::collect::MENTION_MARKER;
use crate::metadata::MetadataRecord;
use crate::pseudocode::{AlgorithmBlock, StepLine};
use crate::tree::{Element, Node};
use crate::urls::{bare_host, bare_host_of, strip_scheme};

/// Label for the fallback link under an embed frame.
pub const EMBED_OPEN_LABEL: &str = "Open in new tab";

/// Hosts whose `/embeds/` pages take a theme query parameter, and its name.
const THEMED_EMBED_HOSTS: &[(&str, &str)] = &[("dune.com", "darkMode")];

/// Theme parameters recognized in embed URLs.
const THEME_PARAMS: &[&str] = &["darkMode", "theme"];

/// Rewrites an anchor in place into its mention form.
pub fn apply_mention(anchor: &mut Element, record: &MetadataRecord, title: &str) {
    anchor.add_class("link-mention");
    anchor.set_attr(MENTION_MARKER, "true");

    let has_icon = record.icon.is_some();
    let mut icon = Element::new("span")
        .with_class("link-mention__icon")
        .with_attr("data-host", record.host_label.as_str())
        .with_attr("data-has-icon", if has_icon { "true" } else { "false" });

    if let Some(src) = &record.icon {
        icon = icon.with_child(
            Element::new("img")
                .with_attr("src", src.as_str())
                .with_attr("alt", "")
                .with_attr("loading", "lazy")
                .with_attr("decoding", "async"),
        );
    }

    let title = Element::new("span").with_class("link-mention__title").with_text(title);

    anchor.children = vec![icon.into(), title.into()];
}

/// Structured markup for a parsed algorithm.
pub fn render_algorithm(block: &AlgorithmBlock) -> Node {
    let mut container = Element::new("div").with_class("algorithm").with_attr("data-algorithm", "true");

    if let Some(title) = &block.title {
        container = container.with_child(Element::new("div").with_class("algorithm-title").with_text(title));
    }

    if !block.io.is_empty() {
        let mut io = Element::new("div").with_class("algorithm-io");
        for entry in &block.io {
            io = io.with_child(
                Element::new("div")
                    .with_class("algorithm-io-row")
                    .with_attr("data-io", entry.label.as_str().to_lowercase())
                    .with_child(
                        Element::new("span").with_class("algorithm-io-label").with_text(&format!("{}:", entry.label)),
                    )
                    .with_child(Element::new("span").with_class("algorithm-io-value").with_text(&entry.value)),
            );
        }
        container = container.with_child(io);
    }

    let mut steps = Element::new("div").with_class("algorithm-steps");
    for step in &block.steps {
        let row = match step {
            StepLine::Step { number, text } => Element::new("div")
                .with_class("algorithm-step")
                .with_attr("data-step", number.as_str())
                .with_child(
                    Element::new("span").with_class("algorithm-step-number").with_text(&format!("{}:", number)),
                )
                .with_child(Element::new("span").with_class("algorithm-step-text").with_text(text)),
            StepLine::Line { text } => Element::new("div").with_class("algorithm-line").with_text(text),
            StepLine::Spacer => Element::new("div").with_class("algorithm-spacer").with_attr("aria-hidden", "true"),
        };
        steps = steps.with_child(row);
    }

    container.with_child(steps).into()
}

/// Theme query parameter the embedded page understands, if any.
pub fn embed_theme_param(url: &Url) -> Option<&'static str> {
    for (key, _) in url.query_pairs() {
        if let Some(param) = THEME_PARAMS.iter().find(|param| **param == key) {
            return Some(*param);
        }
    }

    let host = bare_host(url)?;
    THEMED_EMBED_HOSTS
        .iter()
        .find(|(themed, _)| *themed == host)
        .filter(|_| url.path().contains("/embeds/"))
        .map(|(_, param)| *param)
}

/// Embed frame replacing a single-link paragraph.
pub fn render_embed(href: &str) -> Node {
    let parsed = Url::parse(href).ok();
    let host = bare_host_of(href).unwrap_or_else(|| strip_scheme(href).to_string());

    let mut frame = Element::new("div")
        .with_class("embed-frame")
        .with_attr("data-embed-url", href)
        .with_attr("data-embed-host", host.as_str());

    if let Some(param) = parsed.as_ref().and_then(embed_theme_param) {
        frame = frame.with_attr("data-embed-theme-param", param);
    }

    let iframe = Element::new("iframe")
        .with_class("embed-frame__iframe")
        .with_attr("src", href)
        .with_attr("title", format!("Embedded content from {}", host))
        .with_attr("loading", "lazy")
        .with_attr("referrerpolicy", "no-referrer")
        .with_attr("allowfullscreen", "");

    let meta = Element::new("div")
        .with_class("embed-frame__meta")
        .with_child(Element::new("span").with_class("embed-frame__host").with_text(&host))
        .with_child(
            Element::new("a")
                .with_class("embed-frame__link")
                .with_attr("href", href)
                .with_attr("target", "_blank")
                .with_attr("rel", "noopener noreferrer")
                .with_text(EMBED_OPEN_LABEL),
        );

    frame.with_child(iframe).with_child(meta).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pseudocode::parse_pseudocode;
    use crate::tree::DocumentTree;

    #[test]
    fn test_apply_mention_with_icon() {
        let mut anchor = Element::new("a").with_attr("href", "https://github.com/acme/widget").with_text("x");
        let record = MetadataRecord {
            title: None,
            icon: Some("https://github.com/favicon.ico".to_string()),
            host_label: "GI".to_string(),
            derived_title: None,
            oembed_title: None,
        };
        apply_mention(&mut anchor, &record, "GitHub — acme/widget");

        let html = DocumentTree::from_nodes(vec![anchor.into()]).to_html();
        assert_eq!(
            html,
            concat!(
                r#"<a href="https://github.com/acme/widget" class="link-mention" data-link-mention="true">"#,
                r#"<span class="link-mention__icon" data-host="GI" data-has-icon="true">"#,
                r#"<img src="https://github.com/favicon.ico" alt="" loading="lazy" decoding="async"></span>"#,
                r#"<span class="link-mention__title">GitHub — acme/widget</span></a>"#
            )
        );
    }

    #[test]
    fn test_apply_mention_without_icon_keeps_classes() {
        let mut anchor = Element::new("a").with_attr("class", "external").with_text("x");
        apply_mention(&mut anchor, &MetadataRecord::unfetched("https://example.com"), "Example");

        assert_eq!(anchor.class_list(), vec!["external", "link-mention"]);
        let icon = anchor.children[0].as_element().unwrap();
        assert_eq!(icon.attr("data-has-icon"), Some("false"));
        assert_eq!(icon.attr("data-host"), Some("EX"));
        assert!(icon.children.is_empty());
        assert_eq!(anchor.children[1].text_content(), "Example");
    }

    #[test]
    fn test_render_algorithm_structure() {
        let lines: Vec<String> = ["Algorithm Sort", "Input: A", "Output:", "1: go", "", "done"]
            .iter()
            .map(|l| l.to_string())
            .collect();
        let block = parse_pseudocode(&lines).unwrap();
        let node = render_algorithm(&block);
        let container = node.as_element().unwrap();

        let sections: Vec<_> = container.child_elements().map(|el| el.class_list()[0].clone()).collect();
        assert_eq!(sections, vec!["algorithm-title", "algorithm-io", "algorithm-steps"]);

        let io = container.child_elements().nth(1).unwrap();
        assert_eq!(io.children.len(), 2);
        assert_eq!(io.children[1].text_content(), "Output:");

        let steps = container.child_elements().nth(2).unwrap();
        let kinds: Vec<_> = steps.child_elements().map(|el| el.class_list()[0].clone()).collect();
        assert_eq!(kinds, vec!["algorithm-step", "algorithm-spacer", "algorithm-line"]);
        assert_eq!(steps.children[0].text_content(), "1: go");
    }

    #[test]
    fn test_render_algorithm_without_title_or_io() {
        let block = AlgorithmBlock {
            title: None,
            io: Vec::new(),
            steps: vec![StepLine::Step { number: "1".to_string(), text: " x".to_string() }],
        };
        let node = render_algorithm(&block);
        let container = node.as_element().unwrap();
        assert_eq!(container.child_elements().count(), 1);
    }

    #[test]
    fn test_render_embed_dune() {
        let node = render_embed("https://dune.com/embeds/123/456?embed=true");
        let frame = node.as_element().unwrap();

        assert!(frame.has_class("embed-frame"));
        assert_eq!(frame.attr("data-embed-url"), Some("https://dune.com/embeds/123/456?embed=true"));
        assert_eq!(frame.attr("data-embed-host"), Some("dune.com"));
        assert_eq!(frame.attr("data-embed-theme-param"), Some("darkMode"));

        let iframe = frame.child_elements().next().unwrap();
        assert_eq!(iframe.tag_name, "iframe");
        assert_eq!(iframe.attr("loading"), Some("lazy"));
        assert_eq!(iframe.attr("referrerpolicy"), Some("no-referrer"));
        assert_eq!(iframe.attr("allowfullscreen"), Some(""));
    }

    #[test]
    fn test_embed_theme_param() {
        let parse = |href: &str| Url::parse(href).unwrap();
        assert_eq!(embed_theme_param(&parse("https://example.com/embed/1?theme=dark")), Some("theme"));
        assert_eq!(embed_theme_param(&parse("https://example.com/embed/1?darkMode=true")), Some("darkMode"));
        assert_eq!(embed_theme_param(&parse("https://www.dune.com/embeds/1/2")), Some("darkMode"));
        assert_eq!(embed_theme_param(&parse("https://dune.com/queries/1?embed=true")), None);
        assert_eq!(embed_theme_param(&parse("https://youtube.com/embed/abc")), None);
    }
}
