// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tree-state controller.
//!
//! [`MenuState`] is the client's view of one tree plus UI-only state
//! (selection, expansion, editing draft, breadcrumb, loading/error flags).
//! It is a snapshot of server state as of the last successful fetch, never
//! patched incrementally: every successful mutation re-fetches the tree.
//!
//! Each remote call runs through three phases — pending ([`MenuState`]
//! `begin_request`, sets `loading` and clears `error`), fulfilled/rejected
//! (one `finish_*` applier per operation). The appliers are pure so the
//! whole state machine is testable without a network or a runtime.
//!
//! [`MenuController`] owns a `MenuState` and orchestrates the calls over a
//! [`RemoteStore`]. State is session-scoped: independent controllers are
//! fully isolated.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::api::{CreateMenu, CreateTree, UpdateMenu};
use crate::client::ApiError;
use crate::model::{collect_ids, find_node_mut, node_trail, MenuNode, TreeSummary};
use crate::store::RemoteStore;

/// Partial update for the open editing draft.
///
/// Only the name is editable through the form; depth and parent are fixed
/// at draft creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub name: Option<String>,
}

impl DraftPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()) }
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuState {
    nodes: Vec<MenuNode>,
    selected_node_id: Option<i64>,
    expanded_node_ids: BTreeSet<i64>,
    selected_tree_id: Option<String>,
    available_trees: Vec<TreeSummary>,
    is_dirty: bool,
    editing_node: Option<MenuNode>,
    breadcrumb: Vec<String>,
    loading: bool,
    error: Option<String>,
    is_adding_child: bool,
    parent_for_new_child: Option<i64>,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    pub fn selected_node_id(&self) -> Option<i64> {
        self.selected_node_id
    }

    pub fn expanded_node_ids(&self) -> &BTreeSet<i64> {
        &self.expanded_node_ids
    }

    pub fn selected_tree_id(&self) -> Option<&str> {
        self.selected_tree_id.as_deref()
    }

    pub fn available_trees(&self) -> &[TreeSummary] {
        &self.available_trees
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn editing_node(&self) -> Option<&MenuNode> {
        self.editing_node.as_ref()
    }

    pub fn breadcrumb(&self) -> &[String] {
        &self.breadcrumb
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_adding_child(&self) -> bool {
        self.is_adding_child
    }

    pub fn parent_for_new_child(&self) -> Option<i64> {
        self.parent_for_new_child
    }

    /// Whether the save control is enabled: a draft must be open, its
    /// trimmed name non-empty, and — when editing an existing node — the
    /// draft must actually have changed.
    pub fn can_save(&self) -> bool {
        let Some(draft) = &self.editing_node else {
            return false;
        };
        if draft.name.trim().is_empty() {
            return false;
        }
        self.is_adding_child || self.is_dirty
    }

    // ---- pure transitions -------------------------------------------------

    /// Select a node: copy it into the editing draft and rebuild the
    /// breadcrumb. Unknown ids are a no-op; ids normally come straight from
    /// the rendered tree.
    pub fn select_node(&mut self, id: i64) {
        let Some(trail) = node_trail(&self.nodes, id) else {
            return;
        };
        self.breadcrumb = trail.breadcrumb();
        self.editing_node = Some(trail.node.clone());
        self.selected_node_id = Some(id);
        self.is_dirty = false;
        self.is_adding_child = false;
        self.parent_for_new_child = None;
    }

    pub fn toggle_expand(&mut self, id: i64) {
        if !self.expanded_node_ids.remove(&id) {
            self.expanded_node_ids.insert(id);
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded_node_ids = collect_ids(&self.nodes).into_iter().collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded_node_ids.clear();
    }

    /// Merge fields into the open draft and mark it dirty. No draft, or an
    /// empty patch, is a no-op.
    pub fn update_draft(&mut self, patch: DraftPatch) {
        if patch.is_empty() {
            return;
        }
        let Some(draft) = self.editing_node.as_mut() else {
            return;
        };
        if let Some(name) = patch.name {
            draft.name = name;
        }
        self.is_dirty = true;
    }

    /// Open a create-draft under `parent_id` at the parent's depth plus
    /// one. A missing parent falls back to depth 0; that is defensive and
    /// not expected in normal flow.
    pub fn start_adding_child(&mut self, parent_id: i64) {
        let depth = node_trail(&self.nodes, parent_id).map_or(0, |trail| trail.node.depth + 1);
        self.is_adding_child = true;
        self.parent_for_new_child = Some(parent_id);
        self.is_dirty = false;
        self.editing_node = Some(blank_draft(depth, Some(parent_id)));
    }

    /// Open a create-draft for a new root node, regardless of selection.
    pub fn start_adding_root(&mut self) {
        self.is_adding_child = true;
        self.parent_for_new_child = None;
        self.is_dirty = false;
        self.editing_node = Some(blank_draft(0, None));
    }

    /// Discard the draft and leave add mode.
    pub fn cancel_adding(&mut self) {
        self.is_adding_child = false;
        self.parent_for_new_child = None;
        self.editing_node = None;
        self.is_dirty = false;
    }

    pub fn set_tree(&mut self, tree_id: Option<String>) {
        self.selected_tree_id = tree_id;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // ---- request phases ---------------------------------------------------

    pub fn begin_request(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn reject(&mut self, err: ApiError) {
        self.loading = false;
        self.error = Some(err.message);
    }

    /// Tree list arrived: replace `available_trees` and auto-select the
    /// first tree when none is selected yet.
    pub fn finish_trees(&mut self, result: Result<Vec<TreeSummary>, ApiError>) {
        match result {
            Ok(trees) => {
                self.loading = false;
                if self.selected_tree_id.is_none() {
                    if let Some(first) = trees.first() {
                        self.selected_tree_id = Some(first.tree_id.clone());
                    }
                }
                self.available_trees = trees;
            }
            Err(err) => self.reject(err),
        }
    }

    /// A new tree was created: append it and make it the selected tree.
    pub fn finish_tree_created(&mut self, result: Result<TreeSummary, ApiError>) {
        match result {
            Ok(tree) => {
                self.loading = false;
                self.selected_tree_id = Some(tree.tree_id.clone());
                self.available_trees.push(tree);
            }
            Err(err) => self.reject(err),
        }
    }

    /// Hierarchical nodes arrived: replace the snapshot and auto-expand the
    /// top level. On failure the previous snapshot stays intact.
    pub fn finish_nodes(&mut self, result: Result<Vec<MenuNode>, ApiError>) {
        match result {
            Ok(nodes) => {
                self.loading = false;
                if !nodes.is_empty() {
                    self.expanded_node_ids = nodes.iter().map(|node| node.id).collect();
                }
                self.nodes = nodes;
            }
            Err(err) => self.reject(err),
        }
    }

    /// Create settled. On success the draft is consumed; the caller
    /// re-fetches the tree to pick up the new node.
    pub fn finish_node_created(&mut self, result: Result<MenuNode, ApiError>) {
        match result {
            Ok(_) => {
                self.loading = false;
                self.is_adding_child = false;
                self.parent_for_new_child = None;
                self.editing_node = None;
                self.is_dirty = false;
            }
            Err(err) => self.reject(err),
        }
    }

    /// Update settled. On success the returned fields are shallow-merged
    /// over the first depth-first match, preserving that node's children.
    pub fn finish_node_updated(&mut self, result: Result<MenuNode, ApiError>) {
        match result {
            Ok(updated) => {
                self.loading = false;
                self.is_dirty = false;
                if let Some(node) = find_node_mut(&mut self.nodes, updated.id) {
                    node.uuid = updated.uuid.clone();
                    node.name = updated.name.clone();
                    node.tree_id = updated.tree_id.clone();
                    node.depth = updated.depth;
                    node.parent_id = updated.parent_id;
                    node.created_at = updated.created_at.clone();
                    node.updated_at = updated.updated_at.clone();
                }
                if self.editing_node.as_ref().is_some_and(|draft| draft.id == updated.id) {
                    self.editing_node = Some(updated);
                }
            }
            Err(err) => self.reject(err),
        }
    }

    /// Delete settled. Deleting the selected node clears selection and
    /// draft; any other id leaves them alone.
    pub fn finish_node_deleted(&mut self, id: i64, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.loading = false;
                if self.selected_node_id == Some(id) {
                    self.selected_node_id = None;
                    self.editing_node = None;
                }
            }
            Err(err) => self.reject(err),
        }
    }
}

fn blank_draft(depth: u32, parent_id: Option<i64>) -> MenuNode {
    MenuNode {
        id: 0,
        uuid: String::new(),
        name: String::new(),
        tree_id: None,
        depth,
        parent_id,
        children: None,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

/// Orchestrates remote calls and owns the session's [`MenuState`].
///
/// Mutations follow write-then-refetch: after a successful create, update,
/// or delete the controller re-fetches the selected tree so the snapshot
/// matches the server again. Failed mutations leave the snapshot untouched
/// (only `loading`/`error` change), so the error stays visible until the
/// user retries or dismisses it.
pub struct MenuController {
    store: Arc<dyn RemoteStore>,
    state: MenuState,
}

impl MenuController {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store, state: MenuState::new() }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MenuState {
        &mut self.state
    }

    pub async fn load_trees(&mut self) {
        self.state.begin_request();
        let result = self.store.list_trees().await;
        self.state.finish_trees(result);
    }

    pub async fn load_tree(&mut self) {
        self.state.begin_request();
        let tree_id = self.state.selected_tree_id.clone();
        let result = self.store.fetch_tree(tree_id.as_deref()).await;
        self.state.finish_nodes(result);
    }

    /// Select a tree and load its nodes as a dependent effect.
    pub async fn select_tree(&mut self, tree_id: impl Into<String>) {
        self.state.set_tree(Some(tree_id.into()));
        self.load_tree().await;
    }

    pub async fn create_tree(&mut self, tree_name: &str) {
        if tree_name.trim().is_empty() {
            return;
        }
        self.state.begin_request();
        let result = self
            .store
            .create_tree(&CreateTree { tree_id: None, tree_name: tree_name.to_owned() })
            .await;
        let created = result.is_ok();
        self.state.finish_tree_created(result);
        if created {
            self.load_trees().await;
            self.load_tree().await;
        }
    }

    /// Persist the open draft: create when in add mode, otherwise update
    /// the selected node's name. Guarded by [`MenuState::can_save`]; an
    /// invalid draft never reaches the network.
    pub async fn save_draft(&mut self) {
        if !self.state.can_save() {
            return;
        }
        if self.state.is_adding_child {
            let Some(draft) = self.state.editing_node.clone() else {
                return;
            };
            let request = CreateMenu {
                name: draft.name,
                tree_id: self.state.selected_tree_id.clone(),
                depth: Some(draft.depth),
                parent_id: draft.parent_id,
            };
            self.state.begin_request();
            let result = self.store.create_node(&request).await;
            let created = result.is_ok();
            self.state.finish_node_created(result);
            if created {
                self.load_tree().await;
            }
        } else if let Some(id) = self.state.selected_node_id {
            let Some(draft) = self.state.editing_node.as_ref() else {
                return;
            };
            let patch = UpdateMenu { name: Some(draft.name.clone()), ..UpdateMenu::default() };
            self.state.begin_request();
            let result = self.store.update_node(id, &patch).await;
            let updated = result.is_ok();
            self.state.finish_node_updated(result);
            if updated {
                self.load_tree().await;
            }
        }
    }

    /// Delete the selected node (the backend cascades to descendants),
    /// then re-fetch. No selection is a no-op.
    pub async fn delete_selected(&mut self) {
        let Some(id) = self.state.selected_node_id else {
            return;
        };
        self.state.begin_request();
        let result = self.store.delete_node(id).await;
        let deleted = result.is_ok();
        self.state.finish_node_deleted(id, result);
        if deleted {
            self.load_tree().await;
        }
    }
}

#[cfg(test)]
mod tests;
