//! Document tree model.
//!
//! A [`DocumentTree`] owns an ordered list of root [`Node`]s. Nodes are a
//! closed sum of text and elements; every traversal and mutation site matches
//! on both variants. Nodes are addressed by a [`NodePath`], the list of child
//! indices leading from the roots to the node.

use std::fmt;

/// Child-index path from the tree roots to a node.
pub type NodePath = Vec<usize>;

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Elements whose text children are written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["iframe", "noembed", "noframes", "script", "style", "xmp"];

/// An attribute value: a plain string or a space-separated token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    List(Vec<String>),
}

impl AttrValue {
    /// Renders the value as it would appear in markup.
    pub fn to_attr_string(&self) -> String {
        match self {
            AttrValue::Str(value) => value.clone(),
            AttrValue::List(tokens) => tokens.join(" "),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

/// Insertion-ordered attribute map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-case tag name
    pub tag_name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag_name: &str) -> Self {
        Self { tag_name: tag_name.to_ascii_lowercase(), attributes: Attributes::new(), children: Vec::new() }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.set(name, value);
        self
    }

    /// Builder-style class setter, replacing any existing class list.
    pub fn with_class(mut self, class: &str) -> Self {
        self.attributes.set("class", AttrValue::List(vec![class.to_string()]));
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.with_child(Node::text(text))
    }

    /// Returns a string attribute value. List values are not returned.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self.attributes.get(name)? {
            AttrValue::Str(value) => Some(value.as_str()),
            AttrValue::List(_) => None,
        }
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) {
        self.attributes.set(name, value);
    }

    /// Class tokens, whether stored as a list or a raw string.
    pub fn class_list(&self) -> Vec<String> {
        match self.attributes.get("class") {
            Some(AttrValue::List(tokens)) => tokens.clone(),
            Some(AttrValue::Str(raw)) => raw.split_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list().iter().any(|c| c == class)
    }

    /// Appends a class token unless already present.
    pub fn add_class(&mut self, class: &str) {
        let mut tokens = self.class_list();
        if !tokens.iter().any(|c| c == class) {
            tokens.push(class.to_string());
        }
        self.attributes.set("class", AttrValue::List(tokens));
    }

    pub fn is(&self, tag_name: &str) -> bool {
        self.tag_name == tag_name
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag_name);
        for (name, value) in self.attributes.iter() {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(&value.to_attr_string()));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag_name.as_str()) {
            return;
        }

        let raw = RAW_TEXT_ELEMENTS.contains(&self.tag_name.as_str());
        for child in &self.children {
            match child {
                Node::Text(text) if raw => out.push_str(&text.value),
                other => other.write_html(out),
            }
        }

        out.push_str("</");
        out.push_str(&self.tag_name);
        out.push('>');
    }
}

/// A text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(Text),
    Element(Element),
}

impl Node {
    pub fn text(value: &str) -> Self {
        Node::Text(Text { value: value.to_string() })
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Whether this node is a text node holding only whitespace.
    pub fn is_blank_text(&self) -> bool {
        match self {
            Node::Text(text) => text.value.trim().is_empty(),
            Node::Element(_) => false,
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&text.value),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape_text(&text.value)),
            Node::Element(element) => element.write_html(out),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An owned document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTree {
    /// Top-level nodes
    pub children: Vec<Node>,
    /// Whether `to_html` should emit a doctype
    pub doctype: bool,
}

impl DocumentTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(children: Vec<Node>) -> Self {
        Self { children, doctype: false }
    }

    /// Get a node by path
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get(*first)?;
        for index in rest {
            node = node.as_element()?.children.get(*index)?;
        }
        Some(node)
    }

    /// Get a mutable node by path
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for index in rest {
            node = node.as_element_mut()?.children.get_mut(*index)?;
        }
        Some(node)
    }

    /// Replace the node at `path`. Returns false when the path does not resolve.
    pub fn replace(&mut self, path: &[usize], replacement: Node) -> bool {
        match self.node_at_mut(path) {
            Some(node) => {
                *node = replacement;
                true
            }
            None => false,
        }
    }

    /// Depth-first, pre-order visit of every node with its path.
    pub fn visit<F>(&self, mut callback: F)
    where
        F: FnMut(&[usize], &Node),
    {
        fn walk<F: FnMut(&[usize], &Node)>(node: &Node, path: &mut Vec<usize>, callback: &mut F) {
            callback(path, node);
            if let Node::Element(element) = node {
                for (index, child) in element.children.iter().enumerate() {
                    path.push(index);
                    walk(child, path, callback);
                    path.pop();
                }
            }
        }

        let mut path = Vec::new();
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            walk(child, &mut path, &mut callback);
            path.pop();
        }
    }

    /// Total number of nodes in the tree
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.visit(|_, _| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Serializes the tree back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if self.doctype {
            out.push_str("<!DOCTYPE html>");
        }
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }
}

impl fmt::Display for DocumentTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn escape_text(value: &str) -> String {
    value.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
