// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use super::RemoteStore;
use crate::api::{CreateMenu, CreateTree, UpdateMenu};
use crate::client::ApiError;
use crate::model::{fixtures, MenuNode, TreeCounts, TreeSummary};

/// In-process [`RemoteStore`].
///
/// Backs `--demo` mode and the controller tests. Mirrors the backend's
/// observable behavior: surrogate id/uuid/timestamp assignment, hierarchy
/// assembly on fetch, cascade delete, and the same error body shapes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    trees: Vec<TreeSummary>,
    // Flat rows; `children` stays unset here and is assembled on fetch.
    nodes: Vec<MenuNode>,
    next_tree_id: i64,
    next_node_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner { trees: Vec::new(), nodes: Vec::new(), next_tree_id: 1, next_node_id: 1 }),
        }
    }

    /// A store pre-seeded with the demo navigation tree.
    pub fn demo() -> Self {
        let (trees, nodes) = fixtures::flat_demo_data();
        let next_tree_id = trees.iter().map(|tree| tree.id).max().unwrap_or(0) + 1;
        let next_node_id = nodes.iter().map(|node| node.id).max().unwrap_or(0) + 1;
        Self { inner: Mutex::new(Inner { trees, nodes, next_tree_id, next_node_id }) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store lock poisoned")
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn bad_request(message: &str) -> ApiError {
    ApiError { status_code: 400, message: message.to_owned(), error: "Bad Request".to_owned() }
}

fn not_found(message: String) -> ApiError {
    ApiError { status_code: 404, message, error: "Not Found".to_owned() }
}

/// Nests flat rows into the hierarchical form the `/menus/tree` endpoints
/// return: roots in insertion order, children under their parent.
fn assemble(rows: &[MenuNode]) -> Vec<MenuNode> {
    fn build(rows: &[MenuNode], parent_id: Option<i64>) -> Vec<MenuNode> {
        rows.iter()
            .filter(|row| row.parent_id == parent_id)
            .map(|row| {
                let mut node = row.clone();
                node.children = Some(build(rows, Some(row.id)));
                node
            })
            .collect()
    }
    build(rows, None)
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_trees(&self) -> Result<Vec<TreeSummary>, ApiError> {
        let inner = self.lock();
        Ok(inner
            .trees
            .iter()
            .map(|tree| {
                let menus = inner
                    .nodes
                    .iter()
                    .filter(|node| node.tree_id.as_deref() == Some(tree.tree_id.as_str()))
                    .count() as u64;
                TreeSummary { count: Some(TreeCounts { menus }), ..tree.clone() }
            })
            .collect())
    }

    async fn create_tree(&self, data: &CreateTree) -> Result<TreeSummary, ApiError> {
        if data.tree_name.trim().is_empty() {
            return Err(bad_request("treeName should not be empty"));
        }
        let mut inner = self.lock();
        let tree_id = data.tree_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        if inner.trees.iter().any(|tree| tree.tree_id == tree_id) {
            return Err(ApiError {
                status_code: 409,
                message: format!("Tree {tree_id} already exists"),
                error: "Conflict".to_owned(),
            });
        }
        let timestamp = now();
        let tree = TreeSummary {
            id: inner.next_tree_id,
            tree_id,
            tree_name: data.tree_name.clone(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
            count: Some(TreeCounts { menus: 0 }),
            menus: None,
        };
        inner.next_tree_id += 1;
        inner.trees.push(tree.clone());
        Ok(tree)
    }

    async fn fetch_tree(&self, tree_id: Option<&str>) -> Result<Vec<MenuNode>, ApiError> {
        let inner = self.lock();
        let rows: Vec<MenuNode> = match tree_id {
            Some(tree_id) => inner
                .nodes
                .iter()
                .filter(|node| node.tree_id.as_deref() == Some(tree_id))
                .cloned()
                .collect(),
            None => inner.nodes.clone(),
        };
        Ok(assemble(&rows))
    }

    async fn create_node(&self, data: &CreateMenu) -> Result<MenuNode, ApiError> {
        if data.name.trim().is_empty() {
            return Err(bad_request("name should not be empty"));
        }
        let mut inner = self.lock();
        let (depth, tree_id) = match data.parent_id {
            Some(parent_id) => {
                let parent = inner
                    .nodes
                    .iter()
                    .find(|node| node.id == parent_id)
                    .ok_or_else(|| not_found(format!("Menu {parent_id} not found")))?;
                if data.tree_id.is_some() && data.tree_id != parent.tree_id {
                    return Err(bad_request("parent belongs to a different tree"));
                }
                (parent.depth + 1, parent.tree_id.clone())
            }
            None => (0, data.tree_id.clone()),
        };
        let timestamp = now();
        let node = MenuNode {
            id: inner.next_node_id,
            uuid: Uuid::new_v4().to_string(),
            name: data.name.clone(),
            tree_id,
            depth,
            parent_id: data.parent_id,
            children: None,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        inner.next_node_id += 1;
        inner.nodes.push(node.clone());
        Ok(node)
    }

    async fn update_node(&self, id: i64, patch: &UpdateMenu) -> Result<MenuNode, ApiError> {
        if patch.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(bad_request("name should not be empty"));
        }
        let mut inner = self.lock();
        let node = inner
            .nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or_else(|| not_found(format!("Menu {id} not found")))?;
        if let Some(name) = &patch.name {
            node.name = name.clone();
        }
        if let Some(depth) = patch.depth {
            node.depth = depth;
        }
        if let Some(parent_id) = patch.parent_id {
            node.parent_id = Some(parent_id);
        }
        node.updated_at = now();
        Ok(node.clone())
    }

    async fn delete_node(&self, id: i64) -> Result<(), ApiError> {
        let mut inner = self.lock();
        if !inner.nodes.iter().any(|node| node.id == id) {
            return Err(not_found(format!("Menu {id} not found")));
        }
        // Cascade: expand the doomed id set until no child references remain.
        let mut doomed = vec![id];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let parent_id = doomed[cursor];
            cursor += 1;
            for node in &inner.nodes {
                if node.parent_id == Some(parent_id) && !doomed.contains(&node.id) {
                    doomed.push(node.id);
                }
            }
        }
        inner.nodes.retain(|node| !doomed.contains(&node.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{collect_ids, depth_violations, find_node};

    #[tokio::test]
    async fn demo_store_assembles_hierarchy() {
        let store = MemoryStore::demo();
        let nodes = store.fetch_tree(Some("nav")).await.expect("fetch nav");
        assert!(depth_violations(&nodes).is_empty());
        let phones = find_node(&nodes, 4).expect("node 4");
        assert_eq!(phones.name, "Phones");
        assert_eq!(phones.depth, 2);
        assert_eq!(collect_ids(&nodes), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn fetch_without_tree_returns_all_roots() {
        let store = MemoryStore::demo();
        let nodes = store.fetch_tree(None).await.expect("fetch all");
        assert_eq!(nodes.len(), 3);
    }

    #[tokio::test]
    async fn list_trees_counts_menus() {
        let store = MemoryStore::demo();
        let trees = store.list_trees().await.expect("list trees");
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].tree_id, "nav");
        assert_eq!(trees[0].menu_count(), 5);
        assert_eq!(trees[1].menu_count(), 0);
    }

    #[tokio::test]
    async fn create_node_derives_depth_from_parent() {
        let store = MemoryStore::demo();
        let created = store
            .create_node(&CreateMenu {
                name: "Tablets".to_owned(),
                tree_id: Some("nav".to_owned()),
                depth: None,
                parent_id: Some(3),
            })
            .await
            .expect("create");
        assert_eq!(created.depth, 2);
        assert_eq!(created.parent_id, Some(3));
        assert!(!created.uuid.is_empty());
        let nodes = store.fetch_tree(Some("nav")).await.expect("fetch");
        assert!(depth_violations(&nodes).is_empty());
    }

    #[tokio::test]
    async fn create_node_rejects_empty_name() {
        let store = MemoryStore::demo();
        let err = store
            .create_node(&CreateMenu { name: "   ".to_owned(), ..CreateMenu::default() })
            .await
            .expect_err("empty name");
        assert_eq!(err.status_code, 400);
        assert_eq!(err.error, "Bad Request");
    }

    #[tokio::test]
    async fn create_node_rejects_missing_parent() {
        let store = MemoryStore::demo();
        let err = store
            .create_node(&CreateMenu {
                name: "Orphan".to_owned(),
                parent_id: Some(99),
                ..CreateMenu::default()
            })
            .await
            .expect_err("missing parent");
        assert_eq!(err.status_code, 404);
    }

    #[tokio::test]
    async fn update_node_changes_name_only() {
        let store = MemoryStore::demo();
        let updated = store
            .update_node(1, &UpdateMenu { name: Some("Start".to_owned()), ..UpdateMenu::default() })
            .await
            .expect("update");
        assert_eq!(updated.name, "Start");
        assert_eq!(updated.depth, 0);
        let nodes = store.fetch_tree(Some("nav")).await.expect("fetch");
        assert_eq!(find_node(&nodes, 1).expect("node 1").name, "Start");
    }

    #[tokio::test]
    async fn update_unknown_node_is_not_found() {
        let store = MemoryStore::demo();
        let err = store
            .update_node(99, &UpdateMenu { name: Some("X".to_owned()), ..UpdateMenu::default() })
            .await
            .expect_err("unknown id");
        assert_eq!(err.status_code, 404);
        assert_eq!(err.message, "Menu 99 not found");
    }

    #[tokio::test]
    async fn delete_cascades_to_descendants() {
        let store = MemoryStore::demo();
        store.delete_node(2).await.expect("delete");
        let nodes = store.fetch_tree(Some("nav")).await.expect("fetch");
        assert_eq!(collect_ids(&nodes), vec![1, 5]);
    }

    #[tokio::test]
    async fn create_tree_assigns_key_when_absent() {
        let store = MemoryStore::new();
        let tree = store
            .create_tree(&CreateTree { tree_id: None, tree_name: "Sidebar".to_owned() })
            .await
            .expect("create tree");
        assert!(!tree.tree_id.is_empty());
        assert_eq!(tree.menu_count(), 0);
        let trees = store.list_trees().await.expect("list");
        assert_eq!(trees.len(), 1);
    }

    #[tokio::test]
    async fn create_tree_rejects_duplicate_key() {
        let store = MemoryStore::demo();
        let err = store
            .create_tree(&CreateTree {
                tree_id: Some("nav".to_owned()),
                tree_name: "Other".to_owned(),
            })
            .await
            .expect_err("duplicate");
        assert_eq!(err.status_code, 409);
    }
}
