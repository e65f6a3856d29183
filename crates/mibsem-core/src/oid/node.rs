//! OID tree node.

use std::sync::OnceLock;

use crate::ids::{NodeId, SymbolId};

/// A node in the OID tree.
#[derive(Debug)]
pub struct OidNode {
    pub(super) arc: u32,
    pub(super) name: Option<String>,
    pub(super) parent: Option<NodeId>,
    /// Sorted ascending by arc, one entry per arc.
    pub(super) children: Vec<NodeId>,
    pub(super) symbol: Option<SymbolId>,
    /// Dotted form, filled on first request once the node hangs off a root.
    pub(super) dotted: OnceLock<String>,
}

impl OidNode {
    pub(super) fn new(arc: u32, name: Option<String>) -> Self {
        Self {
            arc,
            name,
            parent: None,
            children: Vec::new(),
            symbol: None,
            dotted: OnceLock::new(),
        }
    }

    /// The arc (subidentifier) at this position.
    #[must_use]
    pub fn arc(&self) -> u32 {
        self.arc
    }

    /// Name of this arc, if one was declared.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent node; `None` for roots and detached nodes.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children sorted by arc.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The symbol declared at this node.
    #[must_use]
    pub fn symbol(&self) -> Option<SymbolId> {
        self.symbol
    }

    /// `name(arc)`, or just the arc.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name}({})", self.arc),
            None => self.arc.to_string(),
        }
    }
}
