// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed façades over the backend REST contract.
//!
//! One method per endpoint, pure request shaping. No retries, no caching;
//! errors pass through from the transport unchanged.

pub mod menu;
pub mod tree;

pub use menu::{CreateMenu, CreateTreeMenu, MenuApi, TreeGroup, UpdateMenu};
pub use tree::{CreateTree, TreeApi, UpdateTree};
