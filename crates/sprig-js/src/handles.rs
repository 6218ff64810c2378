//! Opaque node handles exposed to scripts.
//!
//! Scripts never see `NodeId`s directly. Each node that crosses into the
//! interpreter is given a small integer handle; the same node always maps to
//! the same handle for the lifetime of the table, and handles are never
//! reused. A table lives exactly as long as the document it indexes.

use std::collections::HashMap;

use sprig_dom::NodeId;

/// Bidirectional map between script handles and tree nodes.
#[derive(Debug, Default)]
pub struct HandleTable {
    nodes: Vec<NodeId>,
    handles: HashMap<NodeId, u32>,
}

impl HandleTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle for `node`, allocating the next one on first sight.
    pub fn handle_for(&mut self, node: NodeId) -> u32 {
        if let Some(&handle) = self.handles.get(&node) {
            return handle;
        }
        let handle = self.nodes.len() as u32;
        self.nodes.push(node);
        let _ = self.handles.insert(node, handle);
        handle
    }

    /// The node behind `handle`, if it was ever issued.
    #[must_use]
    pub fn node(&self, handle: u32) -> Option<NodeId> {
        self.nodes.get(handle as usize).copied()
    }

    /// Number of handles issued so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no handle has been issued yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
