//! Owned HTML node tree and declarative positional paths into it.
//!
//! The federation pages carry no ids or classes worth selecting on, so data is
//! located by position. Positions are written down as [`NodePath`]s so that a
//! layout change surfaces as one [`LayoutError`] naming the path and the step
//! that no longer matches.

use scraper::{Html, Node};
use std::fmt;
use thiserror::Error;

pub const DOCUMENT_NODE: &str = "#document";
pub const TEXT_NODE: &str = "#text";
pub const COMMENT_NODE: &str = "#comment";
pub const DOCTYPE_NODE: &str = "#documentType";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// One node of the parsed document. Elements carry their tag name and
/// attributes in source order, text nodes carry their `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomNode {
    pub name: String,
    pub attrs: Vec<Attribute>,
    pub value: Option<String>,
    pub children: Vec<DomNode>,
}

impl DomNode {
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            value: None,
            children: Vec::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            name: TEXT_NODE.to_string(),
            attrs: Vec::new(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_element(&self, tag: &str) -> bool {
        self.name == tag
    }

    pub fn has_attrs(&self) -> bool {
        !self.attrs.is_empty()
    }

    /// Value of the first child when it is a text node.
    pub fn first_text(&self) -> Option<&str> {
        self.children.first().and_then(|child| child.value.as_deref())
    }

    /// Children with the given tag that carry at least one attribute.
    pub fn attributed_children<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a DomNode> {
        self.children
            .iter()
            .filter(move |child| child.is_element(tag) && child.has_attrs())
    }
}

/// Parses a whole HTML document with html5ever into an owned tree rooted at
/// a `#document` node.
pub fn parse_document(html: &str) -> DomNode {
    let document = Html::parse_document(html);
    convert(document.tree.root())
}

fn convert(node: ego_tree::NodeRef<'_, Node>) -> DomNode {
    let mut converted = match node.value() {
        Node::Element(element) => DomNode {
            name: element.name().to_string(),
            attrs: element
                .attrs()
                .map(|(name, value)| Attribute {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            value: None,
            children: Vec::new(),
        },
        Node::Text(text) => DomNode::text(&**text),
        Node::Comment(comment) => DomNode {
            value: Some((**comment).to_string()),
            ..DomNode::element(COMMENT_NODE)
        },
        Node::Doctype(_) => DomNode::element(DOCTYPE_NODE),
        _ => DomNode::element(DOCUMENT_NODE),
    };

    converted.children = node.children().map(convert).collect();
    converted
}

/// One navigation step of a [`NodePath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Descend to the child at this index, text nodes included.
    Child(usize),
    /// Descend to the first child element with this tag name.
    FirstElement(&'static str),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Child(index) => write!(f, "child #{}", index),
            Self::FirstElement(tag) => write!(f, "first <{}>", tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("layout drift on path '{path}': step {step} ({expected}) not found under <{found}>")]
pub struct LayoutError {
    pub path: &'static str,
    pub step: usize,
    pub expected: Step,
    pub found: String,
}

/// Named, ordered list of steps from a node down to a descendant.
#[derive(Debug, Clone, Copy)]
pub struct NodePath {
    name: &'static str,
    steps: &'static [Step],
}

impl NodePath {
    pub const fn new(name: &'static str, steps: &'static [Step]) -> Self {
        Self { name, steps }
    }

    pub fn resolve<'a>(&self, root: &'a DomNode) -> Result<&'a DomNode, LayoutError> {
        self.steps
            .iter()
            .enumerate()
            .try_fold(root, |node, (index, step)| {
                let next = match *step {
                    Step::Child(position) => node.children.get(position),
                    Step::FirstElement(tag) => {
                        node.children.iter().find(|child| child.is_element(tag))
                    }
                };
                next.ok_or_else(|| LayoutError {
                    path: self.name,
                    step: index,
                    expected: *step,
                    found: node.name.clone(),
                })
            })
    }
}
