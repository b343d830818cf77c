// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rstest::rstest;

use super::{DraftPatch, MenuController, MenuState};
use crate::api::{CreateMenu, CreateTree, UpdateMenu};
use crate::client::ApiError;
use crate::model::{depth_violations, find_node, fixtures, MenuNode, TreeSummary};
use crate::store::{MemoryStore, RemoteStore};

/// Counts calls and fails every one of them with the network error shape.
#[derive(Default)]
struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::network())
    }
}

#[async_trait]
impl RemoteStore for FailingStore {
    async fn list_trees(&self) -> Result<Vec<TreeSummary>, ApiError> {
        self.fail()
    }

    async fn create_tree(&self, _data: &CreateTree) -> Result<TreeSummary, ApiError> {
        self.fail()
    }

    async fn fetch_tree(&self, _tree_id: Option<&str>) -> Result<Vec<MenuNode>, ApiError> {
        self.fail()
    }

    async fn create_node(&self, _data: &CreateMenu) -> Result<MenuNode, ApiError> {
        self.fail()
    }

    async fn update_node(&self, _id: i64, _patch: &UpdateMenu) -> Result<MenuNode, ApiError> {
        self.fail()
    }

    async fn delete_node(&self, _id: i64) -> Result<(), ApiError> {
        self.fail()
    }
}

fn demo_controller() -> MenuController {
    MenuController::new(Arc::new(MemoryStore::demo()))
}

async fn loaded_controller() -> MenuController {
    let mut controller = demo_controller();
    controller.load_trees().await;
    controller.load_tree().await;
    controller
}

fn state_with_nodes(nodes: Vec<MenuNode>) -> MenuState {
    let mut state = MenuState::new();
    state.finish_nodes(Ok(nodes));
    state
}

/// Root A (id=1) with child B (id=2), the two-level scenario tree.
fn ab_tree() -> Vec<MenuNode> {
    let mut a = fixtures::node(1, "A", "nav", 0, None);
    a.children = Some(vec![fixtures::node(2, "B", "nav", 1, Some(1))]);
    vec![a]
}

// ---- loading ---------------------------------------------------------------

#[tokio::test]
async fn load_trees_auto_selects_first_tree() {
    let mut controller = demo_controller();
    controller.load_trees().await;
    let state = controller.state();
    assert_eq!(state.available_trees().len(), 2);
    assert_eq!(state.selected_tree_id(), Some("nav"));
    assert!(!state.loading());
    assert_eq!(state.error(), None);
}

#[tokio::test]
async fn load_trees_keeps_existing_selection() {
    let mut controller = demo_controller();
    controller.state_mut().set_tree(Some("footer".to_owned()));
    controller.load_trees().await;
    assert_eq!(controller.state().selected_tree_id(), Some("footer"));
}

#[tokio::test]
async fn load_trees_failure_sets_error_and_keeps_state() {
    let mut controller = MenuController::new(Arc::new(FailingStore::default()));
    controller.load_trees().await;
    let state = controller.state();
    assert!(!state.loading());
    assert_eq!(state.error(), Some("Network error or server unavailable"));
    assert!(state.available_trees().is_empty());
    assert_eq!(state.selected_tree_id(), None);
}

#[tokio::test]
async fn load_tree_replaces_nodes_and_expands_top_level() {
    let controller = loaded_controller().await;
    let state = controller.state();
    assert_eq!(state.nodes().len(), 3);
    assert!(depth_violations(state.nodes()).is_empty());
    // Top-level ids only; deeper levels start collapsed.
    let expanded: Vec<i64> = state.expanded_node_ids().iter().copied().collect();
    assert_eq!(expanded, vec![1, 2, 5]);
}

#[tokio::test]
async fn load_tree_failure_leaves_nodes_unchanged() {
    let mut controller = MenuController::new(Arc::new(FailingStore::default()));
    controller.state_mut().set_tree(Some("nav".to_owned()));
    controller.load_tree().await;
    let state = controller.state();
    assert!(!state.loading());
    assert_eq!(state.error(), Some("Network error or server unavailable"));
    assert!(state.nodes().is_empty());
}

// Arrival order wins: a stale slow fetch landing after a newer fast one
// overwrites it. There is no request-generation stamping; the TUI shell
// cannot hit this because it serializes calls, but the state machine
// itself is last-write-wins.
#[test]
fn stale_fetch_result_overwrites_newer() {
    let mut state = MenuState::new();
    state.begin_request();
    state.begin_request();
    state.finish_nodes(Ok(ab_tree()));
    assert_eq!(state.nodes().len(), 1);
    state.finish_nodes(Ok(Vec::new()));
    assert!(state.nodes().is_empty());
}

// ---- selection and breadcrumb ----------------------------------------------

#[test]
fn select_node_builds_breadcrumb_root_first() {
    let mut state = state_with_nodes(ab_tree());
    state.select_node(2);
    assert_eq!(state.selected_node_id(), Some(2));
    assert_eq!(state.breadcrumb(), ["A", "B"]);
    assert!(!state.is_dirty());
    assert!(!state.is_adding_child());
    assert_eq!(state.editing_node().map(|node| node.name.as_str()), Some("B"));
}

#[test]
fn select_unknown_node_is_a_no_op() {
    let mut state = state_with_nodes(ab_tree());
    state.select_node(2);
    let before = state.clone();
    state.select_node(99);
    assert_eq!(state, before);
}

#[test]
fn selecting_another_node_discards_draft_state() {
    let mut state = state_with_nodes(ab_tree());
    state.select_node(2);
    state.update_draft(DraftPatch::name("B2"));
    assert!(state.is_dirty());
    state.select_node(1);
    assert!(!state.is_dirty());
    assert_eq!(state.editing_node().map(|node| node.name.as_str()), Some("A"));
    assert_eq!(state.breadcrumb(), ["A"]);
}

// ---- expansion --------------------------------------------------------------

#[test]
fn toggle_expand_is_symmetric() {
    let mut state = state_with_nodes(ab_tree());
    let before = state.expanded_node_ids().contains(&1);
    state.toggle_expand(1);
    assert_ne!(state.expanded_node_ids().contains(&1), before);
    state.toggle_expand(1);
    assert_eq!(state.expanded_node_ids().contains(&1), before);
}

#[test]
fn expand_all_covers_every_level() {
    let mut state = state_with_nodes(fixtures::nested_nav_tree());
    state.collapse_all();
    assert!(state.expanded_node_ids().is_empty());
    state.expand_all();
    let expanded: Vec<i64> = state.expanded_node_ids().iter().copied().collect();
    assert_eq!(expanded, vec![1, 2, 3, 4, 5]);
}

// ---- drafts -----------------------------------------------------------------

#[test]
fn empty_patch_does_not_dirty_the_draft() {
    let mut state = state_with_nodes(ab_tree());
    state.select_node(2);
    state.update_draft(DraftPatch::default());
    assert!(!state.is_dirty());
    state.update_draft(DraftPatch::name("renamed"));
    assert!(state.is_dirty());
}

#[test]
fn update_draft_without_open_draft_is_a_no_op() {
    let mut state = state_with_nodes(ab_tree());
    state.update_draft(DraftPatch::name("ghost"));
    assert!(!state.is_dirty());
    assert!(state.editing_node().is_none());
}

#[test]
fn start_adding_child_precomputes_depth_and_parent() {
    let mut state = state_with_nodes(fixtures::nested_nav_tree());
    state.start_adding_child(3);
    let draft = state.editing_node().expect("draft");
    assert_eq!(draft.depth, 2);
    assert_eq!(draft.parent_id, Some(3));
    assert_eq!(draft.name, "");
    assert_eq!(draft.id, 0);
    assert!(draft.uuid.is_empty());
    assert!(state.is_adding_child());
    assert_eq!(state.parent_for_new_child(), Some(3));
    assert!(!state.is_dirty());
}

#[test]
fn start_adding_child_with_missing_parent_falls_back_to_root_depth() {
    let mut state = state_with_nodes(ab_tree());
    state.start_adding_child(99);
    assert_eq!(state.editing_node().expect("draft").depth, 0);
}

#[test]
fn start_adding_root_ignores_current_selection() {
    let mut state = state_with_nodes(fixtures::nested_nav_tree());
    state.select_node(4);
    state.start_adding_root();
    let draft = state.editing_node().expect("draft");
    assert_eq!(draft.depth, 0);
    assert_eq!(draft.parent_id, None);
    assert_eq!(state.parent_for_new_child(), None);
}

#[test]
fn cancel_adding_restores_idle_state() {
    let mut state = state_with_nodes(ab_tree());
    state.start_adding_child(1);
    state.update_draft(DraftPatch::name("half-typed"));
    state.cancel_adding();
    assert!(!state.is_adding_child());
    assert!(state.editing_node().is_none());
    assert!(!state.is_dirty());
    assert_eq!(state.parent_for_new_child(), None);
}

#[rstest]
#[case::no_draft(None, false)]
#[case::clean_edit(Some(None), false)]
#[case::blank_rename(Some(Some("   ")), false)]
#[case::dirty_rename(Some(Some("Named")), true)]
fn can_save_requires_open_dirty_named_draft(
    #[case] draft: Option<Option<&str>>,
    #[case] expected: bool,
) {
    let mut state = state_with_nodes(ab_tree());
    if let Some(rename) = draft {
        state.select_node(2);
        if let Some(name) = rename {
            state.update_draft(DraftPatch::name(name));
        }
    }
    assert_eq!(state.can_save(), expected);
}

#[test]
fn can_save_in_add_mode_needs_only_a_name() {
    let mut state = state_with_nodes(ab_tree());
    state.start_adding_root();
    assert!(!state.can_save());
    state.update_draft(DraftPatch::name("New root"));
    assert!(state.can_save());
}

// ---- save -------------------------------------------------------------------

#[tokio::test]
async fn save_draft_with_whitespace_name_never_reaches_the_network() {
    let store = Arc::new(FailingStore::default());
    let mut controller = MenuController::new(store.clone());
    controller.state_mut().finish_nodes(Ok(ab_tree()));
    controller.state_mut().start_adding_root();
    controller.state_mut().update_draft(DraftPatch::name("  "));
    let before_dirty = controller.state().is_dirty();
    controller.save_draft().await;
    assert_eq!(store.call_count(), 0);
    assert_eq!(controller.state().is_dirty(), before_dirty);
    assert!(controller.state().is_adding_child());
}

#[tokio::test]
async fn save_draft_without_changes_is_a_no_op() {
    let store = Arc::new(FailingStore::default());
    let mut controller = MenuController::new(store.clone());
    controller.state_mut().finish_nodes(Ok(ab_tree()));
    controller.state_mut().select_node(2);
    controller.save_draft().await;
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn save_draft_creates_child_and_refetches() {
    let mut controller = loaded_controller().await;
    controller.state_mut().select_node(3);
    controller.state_mut().start_adding_child(3);
    controller.state_mut().update_draft(DraftPatch::name("Tablets"));
    controller.save_draft().await;

    let state = controller.state();
    assert_eq!(state.error(), None);
    assert!(!state.is_adding_child());
    assert!(state.editing_node().is_none());
    assert!(!state.is_dirty());
    // The refetched snapshot contains the persisted node with server fields.
    let created = find_node(state.nodes(), 6).expect("created node");
    assert_eq!(created.name, "Tablets");
    assert_eq!(created.depth, 2);
    assert_eq!(created.parent_id, Some(3));
    assert!(!created.uuid.is_empty());
    assert!(depth_violations(state.nodes()).is_empty());
}

#[tokio::test]
async fn save_draft_creates_root_node() {
    let mut controller = loaded_controller().await;
    controller.state_mut().start_adding_root();
    controller.state_mut().update_draft(DraftPatch::name("Contact"));
    controller.save_draft().await;

    let created = find_node(controller.state().nodes(), 6).expect("created node");
    assert_eq!(created.depth, 0);
    assert_eq!(created.parent_id, None);
}

#[tokio::test]
async fn save_draft_updates_name_and_refetches() {
    let mut controller = loaded_controller().await;
    controller.state_mut().select_node(1);
    controller.state_mut().update_draft(DraftPatch::name("Start"));
    controller.save_draft().await;

    let state = controller.state();
    assert!(!state.is_dirty());
    assert_eq!(state.error(), None);
    assert_eq!(find_node(state.nodes(), 1).expect("node 1").name, "Start");
}

#[tokio::test]
async fn failed_create_keeps_draft_and_reports_error() {
    let store = Arc::new(FailingStore::default());
    let mut controller = MenuController::new(store.clone());
    controller.state_mut().finish_nodes(Ok(ab_tree()));
    controller.state_mut().start_adding_child(1);
    controller.state_mut().update_draft(DraftPatch::name("Doomed"));
    controller.save_draft().await;

    let state = controller.state();
    assert_eq!(state.error(), Some("Network error or server unavailable"));
    assert!(!state.loading());
    // No partial application: no refetch happened, the snapshot is intact.
    assert_eq!(store.call_count(), 1);
    assert_eq!(state.nodes().len(), 1);
}

// ---- update merge -----------------------------------------------------------

#[test]
fn update_merge_preserves_children() {
    let mut state = state_with_nodes(ab_tree());
    state.select_node(1);
    let mut updated = fixtures::node(1, "A renamed", "nav", 0, None);
    updated.updated_at = "2026-02-01T00:00:00.000Z".to_owned();
    state.finish_node_updated(Ok(updated));

    let node = find_node(state.nodes(), 1).expect("node 1");
    assert_eq!(node.name, "A renamed");
    assert!(node.has_children(), "children pointer survives the merge");
    assert_eq!(state.editing_node().expect("draft").name, "A renamed");
    assert!(!state.is_dirty());
}

#[test]
fn update_merge_leaves_unrelated_draft_alone() {
    let mut state = state_with_nodes(ab_tree());
    state.select_node(2);
    state.finish_node_updated(Ok(fixtures::node(1, "A renamed", "nav", 0, None)));
    assert_eq!(state.editing_node().expect("draft").name, "B");
}

// ---- delete -----------------------------------------------------------------

#[tokio::test]
async fn delete_selected_clears_selection_and_cascades() {
    let mut controller = loaded_controller().await;
    controller.state_mut().select_node(2);
    controller.delete_selected().await;

    let state = controller.state();
    assert_eq!(state.selected_node_id(), None);
    assert!(state.editing_node().is_none());
    assert_eq!(state.error(), None);
    // Products and its whole subtree are gone after the refetch.
    assert!(find_node(state.nodes(), 2).is_none());
    assert!(find_node(state.nodes(), 4).is_none());
    assert!(find_node(state.nodes(), 1).is_some());
}

#[test]
fn deleting_a_non_selected_node_keeps_selection() {
    let mut state = state_with_nodes(ab_tree());
    state.select_node(1);
    state.finish_node_deleted(2, Ok(()));
    assert_eq!(state.selected_node_id(), Some(1));
    assert!(state.editing_node().is_some());
}

#[tokio::test]
async fn delete_without_selection_is_a_no_op() {
    let store = Arc::new(FailingStore::default());
    let mut controller = MenuController::new(store.clone());
    controller.delete_selected().await;
    assert_eq!(store.call_count(), 0);
}

// ---- trees ------------------------------------------------------------------

#[tokio::test]
async fn create_tree_selects_the_new_tree() {
    let mut controller = loaded_controller().await;
    controller.create_tree("Sidebar").await;

    let state = controller.state();
    assert_eq!(state.available_trees().len(), 3);
    let selected = state.selected_tree_id().expect("selected tree");
    let tree = state
        .available_trees()
        .iter()
        .find(|tree| tree.tree_id == selected)
        .expect("new tree listed");
    assert_eq!(tree.tree_name, "Sidebar");
    // The dependent node fetch ran for the new, empty tree.
    assert!(state.nodes().is_empty());
}

#[tokio::test]
async fn create_tree_with_blank_name_is_a_no_op() {
    let store = Arc::new(FailingStore::default());
    let mut controller = MenuController::new(store.clone());
    controller.create_tree("   ").await;
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn select_tree_fetches_its_nodes() {
    let mut controller = loaded_controller().await;
    assert!(!controller.state().nodes().is_empty());
    controller.select_tree("footer").await;
    assert_eq!(controller.state().selected_tree_id(), Some("footer"));
    assert!(controller.state().nodes().is_empty());
}

// ---- dirty-flag ordering rule ----------------------------------------------

#[tokio::test]
async fn is_dirty_is_false_after_load_select_save_and_cancel() {
    let mut controller = loaded_controller().await;
    assert!(!controller.state().is_dirty());

    controller.state_mut().select_node(1);
    assert!(!controller.state().is_dirty());

    controller.state_mut().update_draft(DraftPatch::name("Start"));
    assert!(controller.state().is_dirty());
    controller.save_draft().await;
    assert!(!controller.state().is_dirty());

    controller.state_mut().start_adding_root();
    controller.state_mut().update_draft(DraftPatch::name("x"));
    assert!(controller.state().is_dirty());
    controller.state_mut().cancel_adding();
    assert!(!controller.state().is_dirty());
}

#[test]
fn clear_error_dismisses_the_banner() {
    let mut state = MenuState::new();
    state.finish_nodes(Err(ApiError::network()));
    assert!(state.error().is_some());
    state.clear_error();
    assert_eq!(state.error(), None);
}
