// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Remote tree store seam.
//!
//! The controller talks to the backend only through [`RemoteStore`]:
//! [`HttpStore`] delegates to the REST façades, [`MemoryStore`] is an
//! in-process stand-in for demo mode and tests.

use async_trait::async_trait;

use crate::api::{CreateMenu, CreateTree, UpdateMenu};
use crate::client::ApiError;
use crate::model::{MenuNode, TreeSummary};

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// The subset of the backend contract the tree-state controller needs.
///
/// The remote store is ground truth: mutations here do not return enough
/// to patch local state incrementally, so the controller re-fetches the
/// tree after every successful write.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_trees(&self) -> Result<Vec<TreeSummary>, ApiError>;

    async fn create_tree(&self, data: &CreateTree) -> Result<TreeSummary, ApiError>;

    /// Hierarchical nodes for one tree, or for all trees when `tree_id`
    /// is absent.
    async fn fetch_tree(&self, tree_id: Option<&str>) -> Result<Vec<MenuNode>, ApiError>;

    async fn create_node(&self, data: &CreateMenu) -> Result<MenuNode, ApiError>;

    async fn update_node(&self, id: i64, patch: &UpdateMenu) -> Result<MenuNode, ApiError>;

    /// Deletes the node and all of its descendants.
    async fn delete_node(&self, id: i64) -> Result<(), ApiError>;
}
