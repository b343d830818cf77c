// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, ApiError};
use crate::model::MenuNode;

/// Request body for `POST /menus`.
///
/// `parentId` is serialized even when null: the backend distinguishes
/// "root node" (explicit null) from an omitted field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenu {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    pub parent_id: Option<i64>,
}

/// Recursive request body for `POST /menus/tree` (bulk create).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreeMenu {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CreateTreeMenu>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenu {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// `GET /menus/trees` groups the flat node list by tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeGroup {
    pub tree_id: String,
    pub menus: Vec<MenuNode>,
}

#[derive(Debug, Clone)]
pub struct MenuApi {
    client: ApiClient,
}

impl MenuApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create a single menu node.
    pub async fn create(&self, data: &CreateMenu) -> Result<MenuNode, ApiError> {
        self.client.post("/menus", data).await
    }

    /// Bulk-create a subtree in one request.
    pub async fn create_tree(&self, data: &CreateTreeMenu) -> Result<MenuNode, ApiError> {
        self.client.post("/menus/tree", data).await
    }

    /// All nodes as a flat list.
    pub async fn get_all(&self) -> Result<Vec<MenuNode>, ApiError> {
        self.client.get("/menus").await
    }

    /// All nodes grouped by tree.
    pub async fn get_all_trees(&self) -> Result<Vec<TreeGroup>, ApiError> {
        self.client.get("/menus/trees").await
    }

    /// Hierarchical nodes for one tree.
    pub async fn get_tree_by_id(&self, tree_id: &str) -> Result<Vec<MenuNode>, ApiError> {
        self.client.get(&format!("/menus/tree/{tree_id}")).await
    }

    /// Hierarchical nodes across all trees.
    pub async fn get_tree(&self) -> Result<Vec<MenuNode>, ApiError> {
        self.client.get("/menus/tree").await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<MenuNode, ApiError> {
        self.client.get(&format!("/menus/{id}")).await
    }

    pub async fn get_by_uuid(&self, uuid: &str) -> Result<MenuNode, ApiError> {
        self.client.get(&format!("/menus/uuid/{uuid}")).await
    }

    pub async fn update(&self, id: i64, data: &UpdateMenu) -> Result<MenuNode, ApiError> {
        self.client.patch(&format!("/menus/{id}"), data).await
    }

    /// Delete a node; the backend cascades to all descendants.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/menus/{id}")).await
    }
}
