//! Normalized in-memory catalog tree.
//!
//! The store is keyed by node id with explicit parent/child links, built
//! incrementally from partially-fetched subtrees. All updates are explicit
//! `(Store, Event) -> Store` transitions threaded by the caller; there is no
//! ambient context and no in-place mutation, so concurrent readers never see
//! a half-updated tree. Merging the same fetched page twice yields the same
//! store.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use storefront_core::{deep_merge, CatalogId};

use crate::catalog::Catalog;

/// One normalized node. `raw` keeps the last fetched document (shallow-merged
/// across fetches) for UI fields the normalized shape does not model.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogNode {
    pub id: CatalogId,
    pub name: String,
    pub parent_id: Option<CatalogId>,
    pub status_id: Option<i64>,
    pub child_ids: Vec<CatalogId>,
    pub raw: Value,
}

/// State transitions applied to a [`CatalogStore`].
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A page of children fetched for `parent_id` (`None` = roots).
    ChildrenFetched {
        parent_id: Option<CatalogId>,
        catalogs: Vec<Catalog>,
    },
    CatalogSelected(Option<CatalogId>),
    Reset,
}

/// Normalized store of catalog nodes for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogStore {
    pub nodes: HashMap<CatalogId, CatalogNode>,
    /// Ids with no parent, in discovery order.
    pub root_ids: Vec<CatalogId>,
    pub selected: Option<CatalogId>,
    children_loaded: HashSet<Option<CatalogId>>,
}

/// One breadcrumb entry. The synthetic root carries `id: None`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Crumb {
    pub id: Option<CatalogId>,
    pub name: String,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &CatalogId) -> Option<&CatalogNode> {
        self.nodes.get(id)
    }

    /// Whether a children page was already merged for `parent_id`.
    pub fn children_loaded(&self, parent_id: Option<&CatalogId>) -> bool {
        self.children_loaded.contains(&parent_id.cloned())
    }

    /// The single state-transition function. Consumes the store and returns
    /// the next one; callers thread the value explicitly.
    pub fn apply(mut self, event: StoreEvent) -> Self {
        match event {
            StoreEvent::ChildrenFetched {
                parent_id,
                catalogs,
            } => {
                for catalog in &catalogs {
                    self.upsert(catalog);
                }
                let fetched_ids: Vec<CatalogId> =
                    catalogs.iter().map(|c| c.id.clone()).collect();

                match &parent_id {
                    None => append_unique(&mut self.root_ids, fetched_ids),
                    Some(parent) => {
                        let node = self
                            .nodes
                            .entry(parent.clone())
                            .or_insert_with(|| placeholder_node(parent));
                        append_unique(&mut node.child_ids, fetched_ids);
                    }
                }
                self.children_loaded.insert(parent_id);
                self
            }
            StoreEvent::CatalogSelected(id) => Self { selected: id, ..self },
            StoreEvent::Reset => Self::new(),
        }
    }

    fn upsert(&mut self, incoming: &Catalog) {
        let raw_incoming = serde_json::to_value(incoming).unwrap_or(Value::Null);
        let prev = self.nodes.get(&incoming.id);

        let raw = match prev {
            Some(node) => deep_merge(&[&node.raw, &raw_incoming]),
            None => raw_incoming,
        };
        // An incoming record replaces child links only when it explicitly
        // carries a children list; otherwise previously discovered children
        // are preserved.
        let child_ids = match &incoming.children {
            Some(children) => children.clone(),
            None => prev.map(|n| n.child_ids.clone()).unwrap_or_default(),
        };

        self.nodes.insert(
            incoming.id.clone(),
            CatalogNode {
                id: incoming.id.clone(),
                name: incoming.name.clone(),
                parent_id: incoming.parent_id.clone(),
                status_id: incoming.status_id,
                child_ids,
                raw,
            },
        );
    }

    /// Breadcrumb path from the synthetic "Home" root to `selected`.
    ///
    /// Walks `parent_id` links upward, tracking visited ids: a cycle in
    /// corrupt parent data stops the walk and returns what was accumulated
    /// instead of looping forever. A node missing from the store stops the
    /// walk the same way.
    pub fn breadcrumbs(&self, selected: Option<&CatalogId>) -> Vec<Crumb> {
        let home = Crumb {
            id: None,
            name: "Home".to_string(),
        };
        let Some(selected) = selected else {
            return vec![home];
        };

        let mut chain = Vec::new();
        let mut seen: HashSet<&CatalogId> = HashSet::new();
        let mut cursor = Some(selected);

        while let Some(id) = cursor {
            if !seen.insert(id) {
                break;
            }
            let Some(node) = self.nodes.get(id) else {
                break;
            };
            chain.push(Crumb {
                id: Some(node.id.clone()),
                name: if node.name.is_empty() {
                    node.id.to_string()
                } else {
                    node.name.clone()
                },
            });
            cursor = node.parent_id.as_ref();
        }

        chain.push(home);
        chain.reverse();
        chain
    }
}

fn placeholder_node(id: &CatalogId) -> CatalogNode {
    CatalogNode {
        id: id.clone(),
        name: id.to_string(),
        parent_id: None,
        status_id: None,
        child_ids: Vec::new(),
        raw: Value::Null,
    }
}

fn append_unique(target: &mut Vec<CatalogId>, incoming: Vec<CatalogId>) {
    for id in incoming {
        if !target.contains(&id) {
            target.push(id);
        }
    }
}

/// Walk from `start` to the root via the external store, root-first.
///
/// Used to materialize every ancestor's membership when only a leaf was
/// fetched directly (deep link). `fetch` is the persistence collaborator;
/// cancellation and supersession of stale results are the caller's concern.
pub fn ancestor_chain(
    start: &CatalogId,
    mut fetch: impl FnMut(&CatalogId) -> Option<Catalog>,
) -> Vec<Catalog> {
    let mut chain = Vec::new();
    let mut seen: HashSet<CatalogId> = HashSet::new();
    let mut cursor = Some(start.clone());

    while let Some(id) = cursor {
        if !seen.insert(id.clone()) {
            break;
        }
        let Some(catalog) = fetch(&id) else {
            break;
        };
        cursor = catalog.parent_id.clone();
        chain.push(catalog);
    }

    chain.reverse();
    chain
}

/// Would re-parenting `child` under `new_parent` close a cycle?
///
/// Walks upward from `new_parent`; hitting `child` (or a revisit) means the
/// assignment must be rejected.
pub fn would_create_cycle(
    child: &CatalogId,
    new_parent: Option<&CatalogId>,
    mut fetch: impl FnMut(&CatalogId) -> Option<Catalog>,
) -> bool {
    let mut seen: HashSet<CatalogId> = HashSet::new();
    let mut cursor = new_parent.cloned();

    while let Some(id) = cursor {
        if &id == child {
            return true;
        }
        if !seen.insert(id.clone()) {
            // Pre-existing corruption upstream; reject rather than extend it.
            return true;
        }
        cursor = fetch(&id).and_then(|c| c.parent_id);
    }
    false
}
