// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::node::MenuNode;

/// A named menu tree, identified by the opaque `treeId` business key.
///
/// `GET /trees` annotates each tree with a `_count.menus` aggregate; the
/// detail endpoints may instead embed the owned `menus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    pub id: i64,
    pub tree_id: String,
    pub tree_name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, rename = "_count", skip_serializing_if = "Option::is_none")]
    pub count: Option<TreeCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menus: Option<Vec<MenuNode>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeCounts {
    pub menus: u64,
}

impl TreeSummary {
    pub fn menu_count(&self) -> u64 {
        self.count.map(|count| count.menus).unwrap_or(0)
    }

    /// Display label for the tree selector, e.g. `Navigation (5 items)`.
    pub fn label(&self) -> String {
        format!("{} ({} items)", self.tree_name, self.menu_count())
    }
}
