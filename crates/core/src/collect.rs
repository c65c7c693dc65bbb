//! Candidate collection: one depth-first pass that classifies nodes.
//!
//! At each element, in order of precedence:
//! 1. a `pre` block recognized as pseudocode becomes an algorithm candidate;
//! 2. a `p` whose only meaningful child is one embeddable link becomes an
//!    embed candidate;
//! 3. any other unprocessed external `a` with bare text becomes a mention
//!    candidate.
//!
//! Candidate subtrees are not descended into, so no candidate path is ever
//! nested inside another and rewriting one never invalidates the others.

use crate::config::{PLAIN_TEXT_LANGUAGES, TransformConfig};
use crate::pseudocode::{AlgorithmBlock, literal_lines, looks_like_pseudocode, parse_pseudocode};
use crate::tree::{DocumentTree, Element, Node, NodePath};
use crate::urls::{is_bare_link_text, is_embeddable, is_external_link};

/// Marker attribute set on enriched anchors.
pub const MENTION_MARKER: &str = "data-link-mention";

/// A bare link waiting for metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub path: NodePath,
    pub href: String,
    /// The anchor's visible text, trimmed
    pub fallback_text: String,
}

/// A paragraph holding a single embeddable link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedCandidate {
    pub path: NodePath,
    pub href: String,
}

/// A `pre` block that parsed as pseudocode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmCandidate {
    pub path: NodePath,
    pub block: AlgorithmBlock,
}

/// Everything found in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub mentions: Vec<LinkCandidate>,
    pub embeds: Vec<EmbedCandidate>,
    pub algorithms: Vec<AlgorithmCandidate>,
}

impl Candidates {
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty() && self.embeds.is_empty() && self.algorithms.is_empty()
    }
}

/// Walks the tree once and returns all candidates in document order.
pub fn collect_candidates(tree: &DocumentTree, config: &TransformConfig) -> Candidates {
    let mut candidates = Candidates::default();
    let mut path = Vec::new();
    for (index, child) in tree.children.iter().enumerate() {
        path.push(index);
        visit(child, &mut path, config, &mut candidates);
        path.pop();
    }
    candidates
}

fn visit(node: &Node, path: &mut NodePath, config: &TransformConfig, candidates: &mut Candidates) {
    let Node::Element(element) = node else {
        return;
    };

    if config.algorithms
        && element.is("pre")
        && let Some(block) = pseudocode_block(element, config)
    {
        candidates.algorithms.push(AlgorithmCandidate { path: path.clone(), block });
        return;
    }

    if config.embeds
        && element.is("p")
        && let Some(href) = sole_embeddable_link(element)
    {
        candidates.embeds.push(EmbedCandidate { path: path.clone(), href: href.to_string() });
        return;
    }

    if element.is("a") {
        if config.mentions
            && let Some(candidate) = mention_candidate(element, path)
        {
            candidates.mentions.push(candidate);
        }
        return;
    }

    for (index, child) in element.children.iter().enumerate() {
        path.push(index);
        visit(child, path, config, candidates);
        path.pop();
    }
}

/// Language declared on a code block: `data-language` on the `pre`, or a
/// `language-*` class on the `pre` or its `code` child.
pub fn declared_language(pre: &Element) -> Option<String> {
    if let Some(language) = pre.attr("data-language").filter(|l| !l.is_empty()) {
        return Some(language.to_lowercase());
    }

    let from_class = |element: &Element| {
        element
            .class_list()
            .iter()
            .find_map(|class| class.strip_prefix("language-").map(str::to_lowercase))
            .filter(|language| !language.is_empty())
    };

    if let Some(language) = from_class(pre) {
        return Some(language);
    }

    let code = pre.child_elements().find(|child| child.is("code"))?;
    code.attr("data-language").filter(|l| !l.is_empty()).map(str::to_lowercase).or_else(|| from_class(code))
}

fn pseudocode_block(pre: &Element, config: &TransformConfig) -> Option<AlgorithmBlock> {
    let language = declared_language(pre)?;
    let lines = literal_lines(&pre.text_content());

    let matches = config.is_pseudocode_language(&language)
        || (PLAIN_TEXT_LANGUAGES.contains(&language.as_str()) && looks_like_pseudocode(&lines));

    if matches { parse_pseudocode(&lines) } else { None }
}

/// The href of the paragraph's only meaningful child, when that child is an
/// anchor pointing at embeddable content.
fn sole_embeddable_link(paragraph: &Element) -> Option<&str> {
    let mut meaningful = paragraph.children.iter().filter(|child| !child.is_blank_text());
    let only = meaningful.next()?;
    if meaningful.next().is_some() {
        return None;
    }

    let anchor = only.as_element().filter(|element| element.is("a"))?;
    let href = anchor.attr("href")?.trim();
    if is_embeddable(href) { Some(href) } else { None }
}

fn mention_candidate(anchor: &Element, path: &NodePath) -> Option<LinkCandidate> {
    let href = anchor.attr("href")?.trim();
    if !is_external_link(href) || is_processed(anchor) || is_embeddable(href) {
        return None;
    }

    let text = anchor.text_content();
    if !is_bare_link_text(&text, href) {
        return None;
    }

    Some(LinkCandidate { path: path.clone(), href: href.to_string(), fallback_text: text.trim().to_string() })
}

pub fn is_processed(anchor: &Element) -> bool {
    anchor.attr(MENTION_MARKER) == Some("true")
}
