// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Trees own menu nodes; nodes carry a name, a depth, and an optional parent.
//! The hierarchical form (`children` populated) is what the backend returns
//! from the `/menus/tree` endpoints and what the controller holds.

pub(crate) mod fixtures;
pub mod node;
pub mod tree;

pub use node::{collect_ids, depth_violations, find_node, find_node_mut, node_trail, MenuNode};
pub use tree::{TreeCounts, TreeSummary};
