// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use async_trait::async_trait;

use super::RemoteStore;
use crate::api::{CreateMenu, CreateTree, MenuApi, TreeApi, UpdateMenu};
use crate::client::{ApiClient, ApiError};
use crate::model::{MenuNode, TreeSummary};

/// [`RemoteStore`] over the REST backend.
#[derive(Debug, Clone)]
pub struct HttpStore {
    menus: MenuApi,
    trees: TreeApi,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = ApiClient::new(base_url);
        Self::with_client(client)
    }

    pub fn with_client(client: ApiClient) -> Self {
        Self { menus: MenuApi::new(client.clone()), trees: TreeApi::new(client) }
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list_trees(&self) -> Result<Vec<TreeSummary>, ApiError> {
        self.trees.get_all().await
    }

    async fn create_tree(&self, data: &CreateTree) -> Result<TreeSummary, ApiError> {
        self.trees.create(data).await
    }

    async fn fetch_tree(&self, tree_id: Option<&str>) -> Result<Vec<MenuNode>, ApiError> {
        match tree_id {
            Some(tree_id) => self.menus.get_tree_by_id(tree_id).await,
            None => self.menus.get_tree().await,
        }
    }

    async fn create_node(&self, data: &CreateMenu) -> Result<MenuNode, ApiError> {
        self.menus.create(data).await
    }

    async fn update_node(&self, id: i64, patch: &UpdateMenu) -> Result<MenuNode, ApiError> {
        self.menus.update(id, patch).await
    }

    async fn delete_node(&self, id: i64) -> Result<(), ApiError> {
        self.menus.delete(id).await
    }
}
