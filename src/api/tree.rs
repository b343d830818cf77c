// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::Serialize;

use crate::client::{ApiClient, ApiError};
use crate::model::TreeSummary;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,
    pub tree_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TreeApi {
    client: ApiClient,
}

impl TreeApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, data: &CreateTree) -> Result<TreeSummary, ApiError> {
        self.client.post("/trees", data).await
    }

    /// All trees, each annotated with its menu count.
    pub async fn get_all(&self) -> Result<Vec<TreeSummary>, ApiError> {
        self.client.get("/trees").await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<TreeSummary, ApiError> {
        self.client.get(&format!("/trees/{id}")).await
    }

    /// Lookup by the `treeId` business key instead of the surrogate id.
    pub async fn get_by_tree_id(&self, tree_id: &str) -> Result<TreeSummary, ApiError> {
        self.client.get(&format!("/trees/treeId/{tree_id}")).await
    }

    pub async fn update(&self, id: i64, data: &UpdateTree) -> Result<TreeSummary, ApiError> {
        self.client.patch(&format!("/trees/{id}"), data).await
    }

    /// Delete a tree; the backend cascades to all of its menus.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/trees/{id}")).await
    }
}
