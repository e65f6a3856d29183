//! Arena-backed OID tree shared by all loaded modules.
//!
//! Nodes are addressed by [`NodeId`]. Parent and symbol links are plain
//! handles, so the tree has no ownership cycles. Removed nodes leave a
//! tombstone and their handle is never reused.
//!
//! Invariants:
//!
//! - children are sorted ascending by arc, with at most one child per arc
//! - a node is bound to at most one symbol
//! - roots are never pruned

use tracing::{debug, trace};

use super::{Oid, OidNode};
use crate::diagnostics::{FileLocation, MibLog};
use crate::error::{Result, SemanticError};
use crate::ids::{NodeId, SymbolId};

/// Diagnostic sink for merges: recoverable name conflicts become warnings
/// at `location` instead of errors.
pub struct MergeLog<'a> {
    /// Receives the warnings.
    pub log: &'a mut MibLog,
    /// Location of the declaration being inserted.
    pub location: &'a FileLocation,
}

impl<'a> MergeLog<'a> {
    /// Create a merge log.
    pub fn new(log: &'a mut MibLog, location: &'a FileLocation) -> Self {
        Self { log, location }
    }
}

/// The OID tree.
#[derive(Debug, Default)]
pub struct OidTree {
    nodes: Vec<Option<OidNode>>,
    roots: Vec<NodeId>,
    live: usize,
}

impl OidTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Check if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Get a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&OidNode> {
        self.nodes.get(id.to_index())?.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut OidNode> {
        self.nodes.get_mut(id.to_index())?.as_mut()
    }

    fn get(&self, id: NodeId) -> Result<&OidNode> {
        self.node(id).ok_or_else(|| stale(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut OidNode> {
        self.node_mut(id).ok_or_else(|| stale(id))
    }

    fn arc_of(&self, id: NodeId) -> u32 {
        self.node(id).map_or(0, OidNode::arc)
    }

    /// Root nodes sorted by arc.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// The root at `arc`.
    #[must_use]
    pub fn root(&self, arc: u32) -> Option<NodeId> {
        self.lookup_by_value(None, arc)
    }

    /// Children of `parent`, or the roots for `None`.
    #[must_use]
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.roots,
            Some(id) => self.node(id).map_or(&[][..], OidNode::children),
        }
    }

    fn children_mut(&mut self, parent: Option<NodeId>) -> Result<&mut Vec<NodeId>> {
        match parent {
            None => Ok(&mut self.roots),
            Some(id) => Ok(&mut self.get_mut(id)?.children),
        }
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Check if a node is a root.
    #[must_use]
    pub fn is_root(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|n| n.parent.is_none() && self.lookup_by_value(None, n.arc) == Some(id))
    }

    /// Create a detached node, to be placed with [`OidTree::insert`].
    pub fn create_node(&mut self, arc: u32, name: Option<String>) -> Result<NodeId> {
        let id = NodeId::from_index(self.nodes.len()).ok_or_else(|| SemanticError::OidConflict {
            arc,
            detail: "node arena is full".into(),
            location: None,
        })?;
        self.nodes.push(Some(OidNode::new(arc, name)));
        self.live += 1;
        Ok(id)
    }

    /// Create `name(arc)` under `parent` (or as a root) and insert it,
    /// merging with an existing node at the same arc.
    pub fn child(
        &mut self,
        parent: Option<NodeId>,
        arc: u32,
        name: Option<&str>,
        log: Option<&mut MergeLog<'_>>,
    ) -> Result<NodeId> {
        if let Some(existing) = self.lookup_by_value(parent, arc)
            && (name.is_none() || self.get(existing)?.name.as_deref() == name)
        {
            return Ok(existing);
        }
        let node = self.create_node(arc, name.map(str::to_string))?;
        self.insert(parent, node, log)
    }

    /// Insert a detached node under `parent` (or as a root).
    ///
    /// An existing child with the same arc is merged with the new node.
    /// Returns the node that now occupies the arc, which callers must use
    /// in place of `child`.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        child: NodeId,
        log: Option<&mut MergeLog<'_>>,
    ) -> Result<NodeId> {
        let node = self.get(child)?;
        let arc = node.arc;
        if node.parent.is_some() {
            return Err(SemanticError::OidConflict {
                arc,
                detail: "node is already attached to another parent".into(),
                location: None,
            });
        }

        // Declarations are mostly appended in ascending order, so scan from
        // the end.
        let siblings = self.children(parent);
        let mut position = siblings.len();
        let mut existing = None;
        for (i, &id) in siblings.iter().enumerate().rev() {
            let sibling_arc = self.arc_of(id);
            if sibling_arc == arc {
                existing = Some((i, id));
                break;
            }
            if sibling_arc < arc {
                break;
            }
            position = i;
        }

        match existing {
            Some((_, id)) if id == child => Ok(child),
            Some((i, id)) => {
                let survivor = self.merge(id, child, log)?;
                if survivor != id {
                    self.children_mut(parent)?[i] = survivor;
                    self.get_mut(survivor)?.parent = parent;
                }
                Ok(survivor)
            }
            None => {
                self.children_mut(parent)?.insert(position, child);
                self.get_mut(child)?.parent = parent;
                trace!(arc, position, "inserted OID node");
                Ok(child)
            }
        }
    }

    /// Merge two declarations of the same arc. `a` is the node already in
    /// the tree, `b` the detached newcomer.
    fn merge(&mut self, a: NodeId, b: NodeId, mut log: Option<&mut MergeLog<'_>>) -> Result<NodeId> {
        let (na, nb) = (self.get(a)?, self.get(b)?);
        let arc = na.arc;

        if let (Some(sa), Some(sb)) = (na.symbol, nb.symbol) {
            return Err(SemanticError::OidConflict {
                arc,
                detail: format!("both declarations are bound to a symbol ({sa} and {sb})"),
                location: None,
            });
        }

        let name = match (&na.name, &nb.name) {
            (Some(x), Some(y)) if x != y => {
                let (kept, dropped) = if nb.symbol.is_some() { (y, x) } else { (x, y) };
                match log.as_deref_mut() {
                    Some(sink) => sink.log.add_warning(
                        sink.location.clone(),
                        format!("OID arc {arc} declared as both '{x}' and '{y}', keeping '{kept}' over '{dropped}'"),
                    ),
                    None => {
                        return Err(SemanticError::OidConflict {
                            arc,
                            detail: format!("conflicting names '{x}' and '{y}'"),
                            location: None,
                        });
                    }
                }
                Some(kept.clone())
            }
            (Some(x), _) => Some(x.clone()),
            (None, y) => y.clone(),
        };

        let b_wins = nb.symbol.is_some()
            || (na.symbol.is_none() && na.children.is_empty() && !nb.children.is_empty());
        let (survivor, loser) = if b_wins { (b, a) } else { (a, b) };
        debug!(arc, ?survivor, ?loser, "merging OID nodes");

        let removed = self.remove(loser)?;
        self.get_mut(survivor)?.name = name;
        for grandchild in removed.children {
            self.get_mut(grandchild)?.parent = None;
            self.insert(Some(survivor), grandchild, log.as_deref_mut())?;
        }
        Ok(survivor)
    }

    fn remove(&mut self, id: NodeId) -> Result<OidNode> {
        let node = self
            .nodes
            .get_mut(id.to_index())
            .and_then(Option::take)
            .ok_or_else(|| stale(id))?;
        self.live -= 1;
        Ok(node)
    }

    /// Find the child of `parent` (or the root) with the given arc.
    #[must_use]
    pub fn lookup_by_value(&self, parent: Option<NodeId>, arc: u32) -> Option<NodeId> {
        let siblings = self.children(parent);
        // Arcs are usually dense, so the child for arc n tends to sit at n-1.
        if let Some(i) = (arc as usize).checked_sub(1)
            && let Some(&id) = siblings.get(i)
            && self.arc_of(id) == arc
        {
            return Some(id);
        }
        siblings
            .binary_search_by_key(&arc, |&id| self.arc_of(id))
            .ok()
            .map(|i| siblings[i])
    }

    /// Find the child of `parent` (or the root) with the given name.
    #[must_use]
    pub fn lookup_by_name(&self, parent: Option<NodeId>, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.node(id).is_some_and(|n| n.name() == Some(name)))
    }

    /// Find the node at a numeric OID.
    #[must_use]
    pub fn lookup_oid(&self, oid: &Oid) -> Option<NodeId> {
        let mut current = None;
        for &arc in oid.arcs() {
            current = Some(self.lookup_by_value(current, arc)?);
        }
        current
    }

    /// Find a node by the names along its path, `["iso", "org", "dod"]`.
    #[must_use]
    pub fn find_by_name_path(&self, path: &[&str]) -> Option<NodeId> {
        let mut current = None;
        for name in path {
            current = Some(self.lookup_by_name(current, name)?);
        }
        current
    }

    /// Path from the top ancestor down to `id`, and whether that ancestor
    /// is a root.
    fn path(&self, id: NodeId) -> (Vec<NodeId>, bool) {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(node_id);
            current = self.parent(node_id);
        }
        path.reverse();
        let anchored = path.first().is_some_and(|&top| self.is_root(top));
        (path, anchored)
    }

    /// Numeric OID of a node.
    #[must_use]
    pub fn oid(&self, id: NodeId) -> Oid {
        let (path, _) = self.path(id);
        Oid::new(path.into_iter().map(|n| self.arc_of(n)).collect())
    }

    /// Dotted OID of a node, `1.3.6.1`.
    #[must_use]
    pub fn dotted(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        if let Some(cached) = node.dotted.get() {
            return cached.clone();
        }
        let (path, anchored) = self.path(id);
        let dotted = Oid::new(path.into_iter().map(|n| self.arc_of(n)).collect()).to_dotted();
        // Detached subtrees may still move, so only anchored paths are cached.
        if anchored {
            let _ = node.dotted.set(dotted.clone());
        }
        dotted
    }

    /// Name and arc of every component, `iso(1).org(3).dod(6)`.
    #[must_use]
    pub fn detail(&self, id: NodeId) -> String {
        let (path, _) = self.path(id);
        path.into_iter()
            .filter_map(|n| self.node(n))
            .map(OidNode::label)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Preorder traversal from `start`, or over the whole tree for `None`.
    #[must_use]
    pub fn walk(&self, start: Option<NodeId>) -> Walk<'_> {
        let stack = match start {
            None => self.roots.iter().rev().copied().collect(),
            Some(id) if self.node(id).is_some() => vec![id],
            Some(_) => Vec::new(),
        };
        Walk { tree: self, stack }
    }

    /// Bind a symbol to a node. The first symbol wins: returns `false` and
    /// leaves the node unchanged if another symbol is already bound.
    pub fn attach_symbol(&mut self, id: NodeId, symbol: SymbolId) -> bool {
        match self.node_mut(id) {
            Some(node) if node.symbol.is_none() => {
                node.symbol = Some(symbol);
                true
            }
            Some(node) => node.symbol == Some(symbol),
            None => false,
        }
    }

    /// Unbind `symbol` from a node. Returns `false` if it was not bound.
    pub fn detach_symbol(&mut self, id: NodeId, symbol: SymbolId) -> bool {
        match self.node_mut(id) {
            Some(node) if node.symbol == Some(symbol) => {
                node.symbol = None;
                true
            }
            _ => false,
        }
    }

    /// Remove `id` and then its ancestors for as long as they have no
    /// symbol and no children. Roots are kept. Returns the number of nodes
    /// removed.
    pub fn prune(&mut self, id: NodeId) -> usize {
        let mut removed = 0;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                break;
            };
            if node.symbol.is_some() || !node.children.is_empty() || self.is_root(node_id) {
                break;
            }
            let parent = node.parent;
            if let Some(parent_id) = parent
                && let Some(parent_node) = self.node_mut(parent_id)
            {
                parent_node.children.retain(|&c| c != node_id);
            }
            if self.remove(node_id).is_ok() {
                removed += 1;
            }
            current = parent;
        }
        if removed > 0 {
            trace!(removed, "pruned OID nodes");
        }
        removed
    }
}

fn stale(id: NodeId) -> SemanticError {
    SemanticError::OidConflict {
        arc: 0,
        detail: format!("node {} no longer exists", id.to_raw()),
        location: None,
    }
}

/// Preorder iterator over node handles, see [`OidTree::walk`].
pub struct Walk<'a> {
    tree: &'a OidTree,
    stack: Vec<NodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(Some(id)).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ModuleId;

    fn symbol(index: u32) -> SymbolId {
        SymbolId::new(ModuleId::from_raw(1).unwrap(), index)
    }

    fn arcs(tree: &OidTree, parent: Option<NodeId>) -> Vec<u32> {
        tree.children(parent).iter().map(|&c| tree.arc_of(c)).collect()
    }

    /// `iso(1).org(3).dod(6).internet(1).private(4).enterprises(1)`.
    fn enterprises(tree: &mut OidTree) -> NodeId {
        let mut current = None;
        for (arc, name) in [(1, "iso"), (3, "org"), (6, "dod"), (1, "internet"), (4, "private"), (1, "enterprises")] {
            current = Some(tree.child(current, arc, Some(name), None).unwrap());
        }
        current.unwrap()
    }

    #[test]
    fn test_insert_keeps_children_sorted() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, Some("iso"), None).unwrap();
        for arc in [5, 1, 9, 3, 7] {
            tree.child(Some(root), arc, None, None).unwrap();
        }
        assert_eq!(arcs(&tree, Some(root)), [1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_insert_same_arc_merges() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        let first = tree.child(Some(root), 4, None, None).unwrap();
        let second = tree.create_node(4, Some("private".into())).unwrap();
        let merged = tree.insert(Some(root), second, None).unwrap();

        assert_eq!(merged, first);
        assert_eq!(tree.children(Some(root)).len(), 1);
        assert_eq!(tree.node(merged).unwrap().name(), Some("private"));
        assert!(tree.node(second).is_none());
    }

    #[test]
    fn test_merge_combines_children() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();

        let a = tree.child(Some(root), 5, Some("foo"), None).unwrap();
        tree.child(Some(a), 1, None, None).unwrap();

        let b = tree.create_node(5, None).unwrap();
        tree.child(Some(b), 2, None, None).unwrap();
        let merged = tree.insert(Some(root), b, None).unwrap();

        assert_eq!(tree.children(Some(root)).len(), 1);
        assert_eq!(tree.node(merged).unwrap().name(), Some("foo"));
        assert_eq!(arcs(&tree, Some(merged)), [1, 2]);
        for &child in tree.children(Some(merged)) {
            assert_eq!(tree.parent(child), Some(merged));
        }
    }

    #[test]
    fn test_merge_prefers_node_with_children() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        let a = tree.child(Some(root), 5, None, None).unwrap();

        let b = tree.create_node(5, Some("bar".into())).unwrap();
        tree.child(Some(b), 3, None, None).unwrap();
        let merged = tree.insert(Some(root), b, None).unwrap();

        assert_eq!(merged, b);
        assert!(tree.node(a).is_none());
        assert_eq!(tree.children(Some(root)), &[b]);
        assert_eq!(tree.parent(b), Some(root));
        assert_eq!(tree.dotted(tree.children(Some(b))[0]), "1.5.3");
    }

    #[test]
    fn test_merge_recurses_into_shared_arcs() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        let a = tree.child(Some(root), 2, None, None).unwrap();
        let a1 = tree.child(Some(a), 1, Some("x"), None).unwrap();
        tree.child(Some(a1), 1, None, None).unwrap();

        let b = tree.create_node(2, None).unwrap();
        let b1 = tree.child(Some(b), 1, None, None).unwrap();
        tree.child(Some(b1), 2, None, None).unwrap();
        let merged = tree.insert(Some(root), b, None).unwrap();

        let x = tree.lookup_by_value(Some(merged), 1).unwrap();
        assert_eq!(tree.node(x).unwrap().name(), Some("x"));
        assert_eq!(arcs(&tree, Some(x)), [1, 2]);
    }

    #[test]
    fn test_merge_two_symbols_fails() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        let a = tree.child(Some(root), 3, None, None).unwrap();
        assert!(tree.attach_symbol(a, symbol(0)));

        let b = tree.create_node(3, None).unwrap();
        assert!(tree.attach_symbol(b, symbol(1)));
        let err = tree.insert(Some(root), b, None).unwrap_err();
        assert!(matches!(err, SemanticError::OidConflict { arc: 3, .. }));
    }

    #[test]
    fn test_name_conflict_with_log_warns() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        tree.child(Some(root), 7, Some("x"), None).unwrap();

        let mut log = MibLog::new();
        let location = FileLocation::new("M2", 3, 1);
        let b = tree.create_node(7, Some("y".into())).unwrap();
        let merged = tree
            .insert(Some(root), b, Some(&mut MergeLog::new(&mut log, &location)))
            .unwrap();

        assert_eq!(tree.node(merged).unwrap().name(), Some("x"));
        assert_eq!(log.warning_count(), 1);
        assert_eq!(log.entries()[0].location, location);
    }

    #[test]
    fn test_name_conflict_prefers_symbol_side() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        tree.child(Some(root), 7, Some("x"), None).unwrap();

        let mut log = MibLog::new();
        let location = FileLocation::new("M2", 3, 1);
        let b = tree.create_node(7, Some("y".into())).unwrap();
        tree.attach_symbol(b, symbol(4));
        let merged = tree
            .insert(Some(root), b, Some(&mut MergeLog::new(&mut log, &location)))
            .unwrap();

        assert_eq!(merged, b);
        assert_eq!(tree.node(merged).unwrap().name(), Some("y"));
    }

    #[test]
    fn test_name_conflict_without_log_fails() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        tree.child(Some(root), 7, Some("x"), None).unwrap();
        let b = tree.create_node(7, Some("y".into())).unwrap();
        let err = tree.insert(Some(root), b, None).unwrap_err();
        assert!(matches!(err, SemanticError::OidConflict { arc: 7, .. }));
    }

    #[test]
    fn test_lookup_by_value_sparse_arcs() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        for arc in [2, 3, 10, 200] {
            tree.child(Some(root), arc, None, None).unwrap();
        }
        for arc in [2, 3, 10, 200] {
            let found = tree.lookup_by_value(Some(root), arc).unwrap();
            assert_eq!(tree.arc_of(found), arc);
        }
        assert!(tree.lookup_by_value(Some(root), 1).is_none());
        assert!(tree.lookup_by_value(Some(root), 0).is_none());
        assert!(tree.lookup_by_value(Some(root), 4).is_none());
    }

    #[test]
    fn test_renderings() {
        let mut tree = OidTree::new();
        let ent = enterprises(&mut tree);
        let acme = tree.child(Some(ent), 9999, Some("acme"), None).unwrap();

        assert_eq!(tree.dotted(acme), "1.3.6.1.4.1.9999");
        assert_eq!(tree.dotted(acme), "1.3.6.1.4.1.9999");
        assert_eq!(
            tree.detail(acme),
            "iso(1).org(3).dod(6).internet(1).private(4).enterprises(1).acme(9999)"
        );
        assert_eq!(tree.oid(acme), Oid::from_dotted("1.3.6.1.4.1.9999").unwrap());
        assert_eq!(tree.lookup_oid(&tree.oid(acme)), Some(acme));
        assert_eq!(
            tree.find_by_name_path(&["iso", "org", "dod", "internet", "private", "enterprises", "acme"]),
            Some(acme)
        );
    }

    #[test]
    fn test_walk_is_preorder() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        let a = tree.child(Some(root), 1, None, None).unwrap();
        tree.child(Some(a), 1, None, None).unwrap();
        tree.child(Some(root), 2, None, None).unwrap();

        let visited: Vec<_> = tree.walk(None).map(|id| tree.dotted(id)).collect();
        assert_eq!(visited, ["1", "1.1", "1.1.1", "1.2"]);
    }

    #[test]
    fn test_attach_first_symbol_wins() {
        let mut tree = OidTree::new();
        let root = tree.child(None, 1, None, None).unwrap();
        assert!(tree.attach_symbol(root, symbol(0)));
        assert!(!tree.attach_symbol(root, symbol(1)));
        assert_eq!(tree.node(root).unwrap().symbol(), Some(symbol(0)));
        assert!(!tree.detach_symbol(root, symbol(1)));
        assert!(tree.detach_symbol(root, symbol(0)));
    }

    #[test]
    fn test_prune_stops_at_shared_ancestor() {
        let mut tree = OidTree::new();
        let ent = enterprises(&mut tree);
        let acme = tree.child(Some(ent), 9999, Some("acme"), None).unwrap();
        let widgets = tree.child(Some(acme), 1, Some("widgets"), None).unwrap();
        let gadgets = tree.child(Some(acme), 2, Some("gadgets"), None).unwrap();
        tree.attach_symbol(gadgets, symbol(2));

        assert_eq!(tree.prune(widgets), 1);
        assert!(tree.node(acme).is_some());
        assert_eq!(arcs(&tree, Some(acme)), [2]);

        tree.detach_symbol(gadgets, symbol(2));
        let before = tree.len();
        let removed = tree.prune(gadgets);
        assert_eq!(before - removed, tree.len());
        assert!(tree.node(acme).is_none());
        assert!(tree.root(1).is_some());
    }
}
