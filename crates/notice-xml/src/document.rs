//! Arena representation of an XML document.
//!
//! Nodes live in one vector and refer to each other by [`NodeId`]; moving an
//! element is a detach from its parent's child list followed by an append,
//! so the node itself (attributes, subtree) is never copied.

use std::borrow::Cow;

use crate::error::XmlError;
use crate::text::unescape_raw;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An attribute with its value kept escaped, as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub raw_value: String,
}

impl Attribute {
    pub fn value(&self) -> Result<Cow<'_, str>, XmlError> {
        unescape_raw(&self.raw_value, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written (`cbc:ID`).
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Written as `<name/>` when it still has no children.
    pub self_closing: bool,
}

impl Element {
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(Element),
    /// Escaped character data.
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    Declaration(String),
    DocType(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct XmlDocument {
    nodes: Vec<Node>,
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlDocument {
    /// An empty document holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The single top-level element.
    pub fn document_element(&self) -> Option<NodeId> {
        self.child_elements(self.root()).next()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element(_))
    }

    /// Element name, or `None` for other node kinds.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
    }

    /// First child element whose qualified name is `name`.
    pub fn find_child_element(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.child_elements(id)
            .find(|&child| self.name(child) == Some(name))
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&sibling| sibling == id)?;
        position.checked_sub(1).map(|prev| siblings[prev])
    }

    /// True for comments and whitespace-only text, the nodes that travel with
    /// the element they precede.
    pub fn is_formatting(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::Comment(_) => true,
            NodeKind::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Unescaped concatenation of all descendant text, like XPath `string()`.
    pub fn text_content(&self, id: NodeId) -> Result<String, XmlError> {
        let mut out = String::new();
        self.collect_text(id, &mut out)?;
        Ok(out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> Result<(), XmlError> {
        match self.kind(id) {
            NodeKind::Text(raw) => out.push_str(&unescape_raw(raw, "text")?),
            NodeKind::CData(content) => out.push_str(content),
            NodeKind::Element(_) | NodeKind::Document => {
                for &child in self.children(id) {
                    self.collect_text(child, out)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Unescaped value of the named attribute.
    pub fn attribute_value(&self, id: NodeId, name: &str) -> Result<Option<String>, XmlError> {
        match self.element(id).and_then(|element| element.attribute(name)) {
            Some(attr) => Ok(Some(attr.value()?.into_owned())),
            None => Ok(None),
        }
    }

    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Appends a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.0].parent.is_none(), "node is attached");
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Removes the node from its parent's child list; the subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Detach followed by append at the end of the same parent.
    pub fn move_to_end(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.detach(id);
            self.append_child(parent, id);
        }
    }

    /// All nodes reachable from the document node, in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }
}

pub fn local_name(qualified: &str) -> &str {
    qualified
        .split_once(':')
        .map_or(qualified, |(_, local)| local)
}
