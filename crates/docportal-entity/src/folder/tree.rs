//! Adjacency index over folder rows.
//!
//! Folders reference their parent by id. [`FolderTree`] materializes those
//! references into parent and child maps so the hierarchy can be walked
//! without per-node queries. Every traversal is iterative and tracks
//! visited ids, so corrupt data containing a parent cycle cannot cause
//! unbounded work.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docportal_core::{AppError, AppResult};

/// The part of a folder row the tree needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FolderLink {
    /// Folder ID.
    pub id: Uuid,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<Uuid>,
    /// Folder name.
    pub name: String,
}

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
}

/// Parent/child index over a set of folders.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    nodes: HashMap<Uuid, FolderLink>,
    children: HashMap<Option<Uuid>, Vec<Uuid>>,
}

impl FolderTree {
    /// Build the index. Children keep the order in which they were supplied.
    pub fn new(links: impl IntoIterator<Item = FolderLink>) -> Self {
        let mut tree = Self::default();
        for link in links {
            if tree.nodes.contains_key(&link.id) {
                continue;
            }
            tree.children.entry(link.parent_id).or_default().push(link.id);
            tree.nodes.insert(link.id, link);
        }
        tree
    }

    /// Number of folders in the index.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index holds no folders.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether a folder is part of the index.
    pub fn contains(&self, id: Uuid) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Look up a folder.
    pub fn get(&self, id: Uuid) -> Option<&FolderLink> {
        self.nodes.get(&id)
    }

    /// Direct children of a folder, or root folders when `parent` is `None`.
    pub fn children(&self, parent: Option<Uuid>) -> &[Uuid] {
        self.children
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every folder in the subtree rooted at `root`, root first.
    ///
    /// Returns an empty list if `root` is unknown.
    pub fn subtree(&self, root: Uuid) -> Vec<Uuid> {
        self.subtrees([root])
    }

    /// Union of the subtrees rooted at each of `roots`, each id once.
    pub fn subtrees(&self, roots: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();

        for root in roots {
            if !self.contains(root) {
                continue;
            }
            let mut stack = vec![root];
            while let Some(id) = stack.pop() {
                if !visited.insert(id) {
                    continue;
                }
                out.push(id);
                for &child in self.children(Some(id)).iter().rev() {
                    if !visited.contains(&child) {
                        stack.push(child);
                    }
                }
            }
        }

        out
    }

    /// Aggregate subtree sizes for every folder in one post-order pass.
    ///
    /// `direct` maps a folder to the bytes of the files directly inside it.
    /// The result maps every indexed folder to its direct bytes plus the
    /// aggregate of all of its children.
    pub fn aggregate_sizes(&self, direct: &HashMap<Uuid, u64>) -> HashMap<Uuid, u64> {
        let mut totals: HashMap<Uuid, u64> = HashMap::with_capacity(self.nodes.len());
        let mut seen = HashSet::with_capacity(self.nodes.len());

        for &start in self.nodes.keys() {
            if seen.contains(&start) {
                continue;
            }
            let mut stack = vec![(start, false)];
            while let Some((id, expanded)) = stack.pop() {
                if expanded {
                    let own = direct.get(&id).copied().unwrap_or(0);
                    // A child that is still open here was reached through a
                    // cycle and is counted by its own ancestor instead.
                    let total = self
                        .children(Some(id))
                        .iter()
                        .filter_map(|child| totals.get(child))
                        .fold(own, |acc, size| acc.saturating_add(*size));
                    totals.insert(id, total);
                    continue;
                }
                if !seen.insert(id) {
                    continue;
                }
                stack.push((id, true));
                for &child in self.children(Some(id)) {
                    if !seen.contains(&child) {
                        stack.push((child, false));
                    }
                }
            }
        }

        totals
    }

    /// Breadcrumb trail from the root down to `id`, inclusive.
    ///
    /// Fails with `NotFound` if `id` is unknown and with `Internal` if the
    /// parent chain references a missing folder or loops.
    pub fn breadcrumbs(&self, id: Uuid) -> AppResult<Vec<Breadcrumb>> {
        let mut trail = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(id);

        while let Some(folder_id) = current {
            if !visited.insert(folder_id) {
                return Err(AppError::internal(format!(
                    "Folder hierarchy contains a cycle at {folder_id}"
                )));
            }
            let node = self.nodes.get(&folder_id).ok_or_else(|| {
                if folder_id == id {
                    AppError::not_found(format!("Folder {id} not found"))
                } else {
                    AppError::internal(format!(
                        "Folder {folder_id} referenced as a parent does not exist"
                    ))
                }
            })?;
            trail.push(Breadcrumb {
                id: node.id,
                name: node.name.clone(),
            });
            current = node.parent_id;
        }

        trail.reverse();
        Ok(trail)
    }
}
