// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Espalier — terminal admin client for hierarchical menu trees.
//!
//! The crate is a single-crate layout: a REST transport (`client`), typed
//! endpoint façades (`api`), a remote-store seam (`store`), the tree-state
//! controller the UI runs against (`controller`), and the ratatui shell
//! (`tui`).

pub mod api;
pub mod client;
pub mod controller;
pub mod model;
pub mod store;
pub mod tui;
