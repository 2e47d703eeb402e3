//! Arena-backed request tree.
//!
//! Nodes live in a slab indexed by [`NodeId`]; parents and children refer
//! to each other by id, so structural edits never move node payloads.
//! Detached fragments travel as plain [`Subtree`] values, which is what the
//! importers produce and [`RequestTree::graft`] consumes.

mod insert;
mod ops;

pub use ops::DeleteOutcome;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::record::RequestRecord;

/// Opaque handle to a node in a [`RequestTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw slab index, for diagnostics.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Node {
    record: RequestRecord,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    expanded: bool,
}

/// A detached tree fragment, used by importers and copy/graft operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtree {
    /// The fragment's own record.
    pub record: RequestRecord,
    /// Whether the node should render expanded once grafted.
    pub expanded: bool,
    /// Child fragments, in order.
    pub children: Vec<Subtree>,
}

impl Subtree {
    /// A childless fragment, collapsed by default.
    #[must_use]
    pub const fn leaf(record: RequestRecord) -> Self {
        Self {
            record,
            expanded: false,
            children: Vec::new(),
        }
    }

    /// A folder fragment with the given children, expanded by default.
    #[must_use]
    pub const fn folder(record: RequestRecord, children: Vec<Self>) -> Self {
        Self {
            record,
            expanded: true,
            children,
        }
    }

    /// Total number of records in the fragment, itself included.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// The mutable request tree.
///
/// The root is an unnamed folder that is never rendered; top-level groups
/// are its direct children.
#[derive(Debug, Clone)]
pub struct RequestTree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Default for RequestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTree {
    /// An empty tree containing only the hidden root folder.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            record: RequestRecord::folder(""),
            parent: None,
            children: Vec::new(),
            expanded: true,
        };
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
        }
    }

    /// The hidden root id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// True when only the root remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// True if `id` refers to a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(Option::is_some)
    }

    /// The record stored at `id`.
    pub fn record(&self, id: NodeId) -> DomainResult<&RequestRecord> {
        self.node(id).map(|n| &n.record)
    }

    /// Mutable access to the record stored at `id`.
    pub fn record_mut(&mut self, id: NodeId) -> DomainResult<&mut RequestRecord> {
        self.node_mut(id).map(|n| &mut n.record)
    }

    /// The parent of `id`, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    /// Ordered children of `id` (empty slice for unknown ids).
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| &n.children)
    }

    /// Whether `id` renders expanded.
    #[must_use]
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.node(id).is_ok_and(|n| n.expanded)
    }

    /// Sets the expansion flag of `id`.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> DomainResult<()> {
        self.node_mut(id)?.expanded = expanded;
        Ok(())
    }

    /// Appends `record` as a direct child of `parent` and re-sorts the
    /// siblings. Folders start expanded.
    pub fn add_child(&mut self, parent: NodeId, record: RequestRecord) -> DomainResult<NodeId> {
        self.node(parent)?;
        let expanded = record.is_folder();
        let id = self.alloc(record, expanded, Some(parent));
        self.push_child(parent, id);
        self.sort_children(parent);
        Ok(id)
    }

    /// Grafts a detached fragment under `parent`, returning the new root id
    /// of the grafted branch. Siblings of the graft point are re-sorted.
    pub fn graft(&mut self, parent: NodeId, fragment: Subtree) -> DomainResult<NodeId> {
        self.node(parent)?;
        let id = self.graft_inner(parent, fragment);
        self.sort_children(parent);
        Ok(id)
    }

    /// Clones the branch rooted at `id` into a detached fragment.
    pub fn extract(&self, id: NodeId) -> DomainResult<Subtree> {
        let node = self.node(id)?;
        let children = node
            .children
            .iter()
            .filter_map(|&child| self.extract(child).ok())
            .collect();
        Ok(Subtree {
            record: node.record.clone(),
            expanded: node.expanded,
            children,
        })
    }

    /// True if `ancestor` is `id` itself or lies on `id`'s parent chain.
    #[must_use]
    pub fn is_self_or_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Re-sorts the children of `id`: request leaves first, then folders,
    /// each group ordered by display string.
    pub(crate) fn sort_children(&mut self, id: NodeId) {
        let Ok(node) = self.node(id) else { return };
        let mut kids = node.children.clone();
        kids.sort_by_cached_key(|&kid| {
            self.node(kid).map_or_else(
                |_| (true, String::new()),
                |n| (n.record.is_folder(), n.record.to_string()),
            )
        });
        if let Ok(node) = self.node_mut(id) {
            node.children = kids;
        }
    }

    fn graft_inner(&mut self, parent: NodeId, fragment: Subtree) -> NodeId {
        let id = self.alloc(fragment.record, fragment.expanded, Some(parent));
        self.push_child(parent, id);
        for child in fragment.children {
            self.graft_inner(id, child);
        }
        self.sort_children(id);
        id
    }

    fn alloc(&mut self, record: RequestRecord, expanded: bool, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            record,
            parent,
            children: Vec::new(),
            expanded,
        };
        for (index, slot) in self.nodes.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(node);
                return NodeId(index);
            }
        }
        self.nodes.push(Some(node));
        NodeId(self.nodes.len() - 1)
    }

    fn push_child(&mut self, parent: NodeId, child: NodeId) {
        if let Ok(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Unlinks `id` from its parent without freeing it.
    pub(crate) fn detach(&mut self, id: NodeId) -> DomainResult<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Ok(node) = self.node_mut(parent) {
                node.children.retain(|&c| c != id);
            }
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Re-links a detached `id` under `parent` and re-sorts the siblings.
    pub(crate) fn attach(&mut self, parent: NodeId, id: NodeId) -> DomainResult<()> {
        self.node(parent)?;
        self.node_mut(id)?.parent = Some(parent);
        self.push_child(parent, id);
        self.sort_children(parent);
        Ok(())
    }

    /// Frees `id` and every descendant. The root cannot be freed.
    pub(crate) fn free(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        let children = self.children(id).to_vec();
        for child in children {
            self.free(child);
        }
        if let Some(slot) = self.nodes.get_mut(id.0) {
            *slot = None;
        }
    }

    fn node(&self, id: NodeId) -> DomainResult<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(DomainError::UnknownNode(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(DomainError::UnknownNode(id.0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_child_sorts_leaves_before_folders() {
        let mut tree = RequestTree::new();
        let root = tree.root();
        tree.add_child(root, RequestRecord::folder("alpha")).unwrap();
        let leaf = tree
            .add_child(root, RequestRecord::default_request("zeta"))
            .unwrap();
        assert_eq!(tree.children(root)[0], leaf);
    }

    #[test]
    fn test_graft_preserves_fragment_shape() {
        let mut tree = RequestTree::new();
        let fragment = Subtree::folder(
            RequestRecord::folder("group"),
            vec![
                Subtree::leaf(RequestRecord::default_request("one")),
                Subtree::leaf(RequestRecord::default_request("two")),
            ],
        );
        let id = tree.graft(tree.root(), fragment.clone()).unwrap();
        assert_eq!(tree.extract(id).unwrap(), fragment);
    }

    #[test]
    fn test_free_reuses_slots() {
        let mut tree = RequestTree::new();
        let a = tree
            .add_child(tree.root(), RequestRecord::default_request("a"))
            .unwrap();
        tree.detach(a).unwrap();
        tree.free(a);
        let b = tree
            .add_child(tree.root(), RequestRecord::default_request("b"))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_is_self_or_ancestor() {
        let mut tree = RequestTree::new();
        let folder = tree
            .add_child(tree.root(), RequestRecord::folder("f"))
            .unwrap();
        let leaf = tree
            .add_child(folder, RequestRecord::default_request("r"))
            .unwrap();
        assert!(tree.is_self_or_ancestor(folder, leaf));
        assert!(tree.is_self_or_ancestor(leaf, leaf));
        assert!(!tree.is_self_or_ancestor(leaf, folder));
    }
}
