//! URL prefix-merge insertion.
//!
//! Incoming records are placed by walking the tree along their derived
//! path segments: shared prefixes descend into existing groups, diverging
//! suffixes splice an unnamed prefix folder above the divergence point.

use crate::error::DomainResult;
use crate::record::RequestRecord;
use crate::tree::{NodeId, RequestTree};

impl RequestTree {
    /// Inserts `record` at the position its URL dictates.
    ///
    /// Records without any derived segments (empty URL) land directly under
    /// the root. Otherwise the first segment selects (or creates) a
    /// top-level group and the remainder is merged below it. Re-inserting a
    /// record with an identity already in the tree updates that node in
    /// place instead of duplicating it.
    pub fn insert(&mut self, mut record: RequestRecord) -> DomainResult<NodeId> {
        let root = self.root();
        let Some(first) = record.segment_at(0).map(str::to_string) else {
            record.set_depth(0);
            return self.add_child(root, record);
        };

        for child in self.children(root).to_vec() {
            let child_record = self.record(child)?;
            if child_record.is_folder() && child_record.segment_at(0) == Some(first.as_str()) {
                return self.add_entry(child, record, 0);
            }
        }

        let group = self.add_child(root, RequestRecord::path_folder(vec![first]))?;
        record.set_depth(1);
        self.add_child(group, record)
    }

    /// Merges `record` into the branch rooted at `node_id`, whose segment
    /// at `depth` is already known to match.
    fn add_entry(
        &mut self,
        node_id: NodeId,
        mut record: RequestRecord,
        mut depth: usize,
    ) -> DomainResult<NodeId> {
        // extend the matched prefix past the entry segment
        depth += 1;
        loop {
            let node = self.record(node_id)?;
            match (node.segment_at(depth), record.segment_at(depth)) {
                (Some(a), Some(b)) if a == b => depth += 1,
                _ => break,
            }
        }

        if self.record(node_id)?.is_folder() {
            if depth < self.record(node_id)?.max_depth() {
                // the incoming path diverges inside this folder's own prefix
                return self.split(node_id, record, depth);
            }

            // folder prefix fully matched: try to descend into a child
            // sharing the next segment, newest sibling first
            let children = self.children(node_id).to_vec();
            for &child in children.iter().rev() {
                let descend = {
                    let child_record = self.record(child)?;
                    match (child_record.segment_at(depth), record.segment_at(depth)) {
                        (Some(a), Some(b)) => a == b,
                        _ => false,
                    }
                };
                if descend {
                    return self.add_entry(child, record, depth);
                }
            }

            let node = self.record(node_id)?;
            if node.segment_at(depth).is_none()
                && record.segment_at(depth).is_none()
                && node.identity() == record.identity()
            {
                return Ok(node_id);
            }

            record.set_depth(depth);
            return self.add_child(node_id, record);
        }

        // leaf with the same identity is updated in place
        if self.record(node_id)?.identity() == record.identity() {
            self.record_mut(node_id)?.update_from(&record);
            return Ok(node_id);
        }
        self.split(node_id, record, depth)
    }

    /// Splices an unnamed folder covering the common prefix above
    /// `node_id`, then hangs both the existing node and `record` below it.
    fn split(
        &mut self,
        node_id: NodeId,
        mut record: RequestRecord,
        depth: usize,
    ) -> DomainResult<NodeId> {
        let parent = self.parent(node_id).unwrap_or_else(|| self.root());
        let existing = self.record(node_id)?;
        let prefix = existing
            .segments()
            .get(..depth)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        let old_depth = existing.depth();

        let mut group = RequestRecord::path_folder(prefix);
        group.set_depth(old_depth);

        self.detach(node_id)?;
        let group_id = self.add_child(parent, group)?;
        self.record_mut(node_id)?.set_depth(depth);
        self.attach(group_id, node_id)?;
        record.set_depth(depth);
        self.add_child(group_id, record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::RequestDetails;
    use crate::request::{BodyKind, HttpMethod};
    use crate::NO_AUTH_KEY;
    use pretty_assertions::assert_eq;

    fn request(name: &str, method: HttpMethod, url: &str) -> RequestRecord {
        RequestRecord::request(
            name,
            RequestDetails {
                url: url.to_string(),
                method,
                auth_key: NO_AUTH_KEY.to_string(),
                headers: Vec::new(),
                params: Vec::new(),
                body: String::new(),
                body_kind: BodyKind::Json,
            },
        )
    }

    #[test]
    fn test_shared_host_merges_into_one_group() {
        let mut tree = RequestTree::new();
        tree.insert(request("users", HttpMethod::Get, "https://api.x.com/users"))
            .unwrap();
        tree.insert(request("posts", HttpMethod::Get, "https://api.x.com/posts"))
            .unwrap();

        let roots = tree.children(tree.root());
        assert_eq!(roots.len(), 1);
        let group = roots[0];
        assert_eq!(tree.record(group).unwrap().segments(), ["api.x.com"]);
        assert_eq!(tree.children(group).len(), 2);
    }

    #[test]
    fn test_distinct_hosts_get_distinct_groups() {
        let mut tree = RequestTree::new();
        tree.insert(request("a", HttpMethod::Get, "https://one.example/a"))
            .unwrap();
        tree.insert(request("b", HttpMethod::Get, "https://two.example/b"))
            .unwrap();
        assert_eq!(tree.children(tree.root()).len(), 2);
    }

    #[test]
    fn test_diverging_suffix_splices_prefix_folder() {
        let mut tree = RequestTree::new();
        let first = tree
            .insert(request("one", HttpMethod::Get, "https://api.x.com/v1/users/1"))
            .unwrap();
        let second = tree
            .insert(request("two", HttpMethod::Get, "https://api.x.com/v1/users/2"))
            .unwrap();

        // both leaves end up sharing a spliced api.x.com/v1/users folder
        let first_parent = tree.parent(first).unwrap();
        assert_eq!(first_parent, tree.parent(second).unwrap());
        let folder = tree.record(first_parent).unwrap();
        assert!(folder.is_folder());
        assert_eq!(folder.segments(), ["api.x.com", "v1", "users"]);
        assert_eq!(tree.record(first).unwrap().depth(), 3);
        assert_eq!(tree.record(first).unwrap().display_label(), "one");
    }

    #[test]
    fn test_unnamed_leaves_label_by_path_remainder() {
        let mut tree = RequestTree::new();
        let a = tree
            .insert(request("", HttpMethod::Get, "https://api.x.com/a"))
            .unwrap();
        let b = tree
            .insert(request("", HttpMethod::Get, "https://api.x.com/b"))
            .unwrap();

        let group = tree.children(tree.root())[0];
        assert_eq!(tree.record(group).unwrap().display_label(), "api.x.com");
        assert_eq!(tree.record(a).unwrap().display_label(), "a");
        assert_eq!(tree.record(b).unwrap().display_label(), "b");
    }

    #[test]
    fn test_reinsert_same_identity_updates_in_place() {
        let mut tree = RequestTree::new();
        let url = "https://api.x.com/users";
        let id = tree.insert(request("users", HttpMethod::Get, url)).unwrap();
        let count = tree.len();

        let mut newer = request("users", HttpMethod::Get, url);
        if let Some(details) = newer.details_mut() {
            details.body = "{}".to_string();
        }
        let updated = tree.insert(newer).unwrap();

        assert_eq!(updated, id);
        assert_eq!(tree.len(), count);
        assert_eq!(tree.record(id).unwrap().details().unwrap().body, "{}");
    }

    #[test]
    fn test_same_url_different_method_keeps_both() {
        let mut tree = RequestTree::new();
        let url = "https://api.x.com/users";
        let get = tree.insert(request("users", HttpMethod::Get, url)).unwrap();
        let del = tree
            .insert(request("users", HttpMethod::Delete, url))
            .unwrap();
        assert_ne!(get, del);
        assert_eq!(tree.parent(get), tree.parent(del));
    }

    #[test]
    fn test_empty_url_lands_under_root() {
        let mut tree = RequestTree::new();
        let id = tree.insert(request("draft", HttpMethod::Get, "")).unwrap();
        assert_eq!(tree.parent(id), Some(tree.root()));
    }

    #[test]
    fn test_folder_prefix_extension_descends() {
        let mut tree = RequestTree::new();
        tree.insert(request("list", HttpMethod::Get, "https://api.x.com/users"))
            .unwrap();
        tree.insert(request("item", HttpMethod::Get, "https://api.x.com/users/7"))
            .unwrap();
        tree.insert(request(
            "avatar",
            HttpMethod::Get,
            "https://api.x.com/users/7/avatar",
        ))
        .unwrap();

        // top group api.x.com, then users subtree shared by all three
        let top = tree.children(tree.root())[0];
        assert_eq!(tree.record(top).unwrap().segments(), ["api.x.com"]);
    }
}
