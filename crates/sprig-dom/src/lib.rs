//! Node tree for the sprig renderer.
//!
//! The tree is an arena: every node lives in one `Vec` and refers to its
//! parent and children through [`NodeId`] indices. Children are owned
//! downward (a node appears in exactly one parent's child list), the parent
//! link is a plain back-index, and dropping the [`DomTree`] tears down the
//! whole document at once.
//!
//! # Shape
//!
//! Index 0 is always the [`NodeType::Document`] node. The markup builder
//! attaches exactly one `html` element under it, which is the document
//! element (the "root" as far as styling and layout are concerned).

use std::collections::HashMap;

/// Map of attribute names to values for an element.
///
/// Insertion order is irrelevant; names are stored case-folded by the
/// markup builder.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the node arena.
///
/// Ids are stable for the lifetime of the tree: nodes are never removed
/// from the arena, only re-parented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A node in the arena together with its structural links.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is.
    pub node_type: NodeType,

    /// Non-owning back-reference to the parent. `None` for the document
    /// node and for nodes that have been allocated but not yet attached.
    pub parent: Option<NodeId>,

    /// Owned children in document order.
    pub children: Vec<NodeId>,
}

/// The node variants the renderer understands.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The arena root. Carries no markup of its own.
    Document,
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A run of character data.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Case-folded tag name (`div`, `p`, `input`, ...).
    pub tag_name: String,
    /// Attribute list.
    pub attrs: AttributesMap,
    /// Whether this element currently holds keyboard focus. Only `input`
    /// elements are ever focused.
    pub focused: bool,
}

impl ElementData {
    /// Create element data for `tag_name` with the given attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: AttributesMap) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs,
            focused: false,
        }
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether the element's tag equals `tag` (tags are stored case-folded).
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.tag_name == tag
    }
}

/// Arena-based node tree.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes, indexed by `NodeId`. The document node is at index 0.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document node id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node is allocated up front.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node and return its id.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent` and point its parent
    /// link back at `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Parent of a node, if attached.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Parent of a node if that parent is an element.
    ///
    /// The document node is not an element, so for the `html` element this
    /// returns `None`; the cascade uses this to decide between inheriting
    /// and seeding from defaults.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.as_element(p).is_some())
    }

    /// Children of a node in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Whether `descendant` is a strict descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over the strict ancestors of a node, nearest first, ending
    /// with the document node.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over the subtree rooted at `id` in pre-order (parent before
    /// children, children in document order).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> PreorderIterator<'_> {
        PreorderIterator {
            tree: self,
            stack: vec![id],
        }
    }

    /// Iterate over every attached node in document order, starting with
    /// the document node.
    #[must_use]
    pub fn iter_all(&self) -> PreorderIterator<'_> {
        self.descendants(NodeId::ROOT)
    }

    /// Element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Tag name if this node is an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// Read an attribute of an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id).and_then(|e| e.attribute(name))
    }

    /// Set an attribute on an element node.
    ///
    /// Returns `false` (and changes nothing) when `id` is not an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let Some(element) = self.as_element_mut(id) else {
            return false;
        };
        let _ = element
            .attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        true
    }

    /// The `html` element: the first element child of the document node.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }

    /// The first `head` child of the document element.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.skeleton_child("head")
    }

    /// The first `body` child of the document element.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.skeleton_child("body")
    }

    fn skeleton_child(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some_and(|e| e.is(tag)))
    }

    /// Concatenated text of all text nodes under `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| self.as_text(n))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct PreorderIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreorderIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
