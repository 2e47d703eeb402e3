//! Structural tree operations driven by the editor: delete, row-based
//! drag moves, duplication, renames, and import merging.

use crate::error::{DomainError, DomainResult};
use crate::tree::{NodeId, RequestTree, Subtree};

/// Result of a delete: how many records went away and which node the
/// editor should select next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Records removed, cascaded empty folders included.
    pub removed: usize,
    /// Suggested replacement selection, `None` when the tree emptied out.
    pub selection: Option<NodeId>,
}

impl RequestTree {
    /// Deletes the branch rooted at `id`.
    ///
    /// Ancestor folders left childless by the removal are cascaded away.
    /// The suggested selection is the sibling that took the removed node's
    /// place, else the last remaining sibling, else the surviving parent.
    pub fn delete(&mut self, id: NodeId) -> DomainResult<DeleteOutcome> {
        if id == self.root() {
            return Err(DomainError::UnknownNode(id.index()));
        }
        let parent = self
            .parent(id)
            .ok_or(DomainError::UnknownNode(id.index()))?;
        let index = self
            .children(parent)
            .iter()
            .position(|&c| c == id)
            .unwrap_or(0);
        let mut removed = self.extract(id)?.count();
        self.detach(id)?;
        self.free(id);

        let mut anchor = parent;
        let mut anchor_index = index;
        while anchor != self.root() && self.children(anchor).is_empty() {
            let up = self.parent(anchor).unwrap_or_else(|| self.root());
            anchor_index = self
                .children(up)
                .iter()
                .position(|&c| c == anchor)
                .unwrap_or(0);
            self.detach(anchor)?;
            self.free(anchor);
            removed += 1;
            anchor = up;
        }

        let siblings = self.children(anchor);
        let selection = siblings
            .get(anchor_index)
            .or_else(|| siblings.last())
            .copied()
            .or_else(|| (anchor != self.root()).then_some(anchor));
        Ok(DeleteOutcome { removed, selection })
    }

    /// The nodes currently visible in the tree view, top to bottom. The
    /// hidden root is excluded and collapsed branches contribute only their
    /// folder row.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<NodeId> {
        let mut rows = Vec::new();
        self.collect_rows(self.root(), &mut rows);
        rows
    }

    fn collect_rows(&self, id: NodeId, rows: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            rows.push(child);
            if self.is_expanded(child) {
                self.collect_rows(child, rows);
            }
        }
    }

    /// Reparents the node at visible row `from` to the drop position `to`.
    ///
    /// Row 0 means "above everything": the node becomes a top-level entry.
    /// Dropping onto a folder moves into it; dropping onto a leaf moves
    /// next to it. Moving a node into its current parent is a no-op, and
    /// moving a folder into its own branch is refused. Consumed path
    /// depths are deliberately left untouched, so the moved node keeps its
    /// short label.
    pub fn move_row(&mut self, from: usize, to: usize) -> DomainResult<()> {
        let rows = self.visible_rows();
        let source = *rows.get(from).ok_or(DomainError::RowOutOfRange(from))?;
        let destination = if to == 0 {
            self.root()
        } else {
            let index = if to < from { to - 1 } else { to };
            let target = *rows.get(index).ok_or(DomainError::RowOutOfRange(to))?;
            if self.record(target)?.is_folder() {
                target
            } else {
                self.parent(target).unwrap_or_else(|| self.root())
            }
        };
        if Some(destination) == self.parent(source) {
            return Ok(());
        }
        if self.is_self_or_ancestor(source, destination) {
            return Err(DomainError::CyclicMove);
        }
        self.detach(source)?;
        self.attach(destination, source)
    }

    /// Duplicates the branch rooted at `id` as a sibling, suffixing the
    /// copy's label.
    pub fn copy(&mut self, id: NodeId) -> DomainResult<NodeId> {
        let parent = self
            .parent(id)
            .ok_or(DomainError::UnknownNode(id.index()))?;
        let mut fragment = self.extract(id)?;
        let base = if fragment.record.name().is_empty() {
            fragment.record.display_label()
        } else {
            fragment.record.name().to_string()
        };
        fragment.record.set_name(format!("{base} (Copy)"));
        self.graft(parent, fragment)
    }

    /// Renames `id` and re-sorts its siblings.
    pub fn rename(&mut self, id: NodeId, name: impl Into<String>) -> DomainResult<()> {
        self.record_mut(id)?.set_name(name);
        if let Some(parent) = self.parent(id) {
            self.sort_children(parent);
        }
        Ok(())
    }

    /// Merges imported fragments into the top level.
    ///
    /// An imported folder whose label matches an existing top-level folder
    /// pours its children into that folder; everything else is appended as
    /// a new top-level entry.
    pub fn merge_roots(&mut self, fragments: Vec<Subtree>) -> DomainResult<()> {
        let root = self.root();
        for fragment in fragments {
            if fragment.record.is_folder() {
                let label = fragment.record.display_label();
                let existing = self.children(root).iter().copied().find(|&child| {
                    self.record(child)
                        .is_ok_and(|r| r.is_folder() && r.display_label() == label)
                });
                if let Some(target) = existing {
                    for child in fragment.children {
                        self.graft(target, child)?;
                    }
                    continue;
                }
            }
            self.graft(root, fragment)?;
        }
        Ok(())
    }
}
