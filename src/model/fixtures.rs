// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::node::MenuNode;
use super::tree::TreeSummary;

pub(crate) fn node(
    id: i64,
    name: &str,
    tree_id: &str,
    depth: u32,
    parent_id: Option<i64>,
) -> MenuNode {
    MenuNode {
        id,
        uuid: format!("00000000-0000-4000-8000-{id:012}"),
        name: name.to_owned(),
        tree_id: Some(tree_id.to_owned()),
        depth,
        parent_id,
        children: None,
        created_at: "2026-01-01T00:00:00.000Z".to_owned(),
        updated_at: "2026-01-01T00:00:00.000Z".to_owned(),
    }
}

#[cfg(test)]
fn with_children(mut parent: MenuNode, children: Vec<MenuNode>) -> MenuNode {
    parent.children = Some(children);
    parent
}

#[cfg(test)]
/// The `nav` demo tree in hierarchical form:
///
/// ```text
/// Home (1)
/// Products (2)
/// └─ Electronics (3)
///    └─ Phones (4)
/// About (5)
/// ```
pub(crate) fn nested_nav_tree() -> Vec<MenuNode> {
    vec![
        node(1, "Home", "nav", 0, None),
        with_children(
            node(2, "Products", "nav", 0, None),
            vec![with_children(
                node(3, "Electronics", "nav", 1, Some(2)),
                vec![node(4, "Phones", "nav", 2, Some(3))],
            )],
        ),
        node(5, "About", "nav", 0, None),
    ]
}

/// The same demo data as flat rows (children unset), plus a second empty
/// tree, the way the in-memory store keeps them.
pub(crate) fn flat_demo_data() -> (Vec<TreeSummary>, Vec<MenuNode>) {
    let trees = vec![
        TreeSummary {
            id: 1,
            tree_id: "nav".to_owned(),
            tree_name: "Navigation".to_owned(),
            created_at: "2026-01-01T00:00:00.000Z".to_owned(),
            updated_at: "2026-01-01T00:00:00.000Z".to_owned(),
            count: None,
            menus: None,
        },
        TreeSummary {
            id: 2,
            tree_id: "footer".to_owned(),
            tree_name: "Footer".to_owned(),
            created_at: "2026-01-01T00:00:00.000Z".to_owned(),
            updated_at: "2026-01-01T00:00:00.000Z".to_owned(),
            count: None,
            menus: None,
        },
    ];
    let nodes = vec![
        node(1, "Home", "nav", 0, None),
        node(2, "Products", "nav", 0, None),
        node(3, "Electronics", "nav", 1, Some(2)),
        node(4, "Phones", "nav", 2, Some(3)),
        node(5, "About", "nav", 0, None),
    ];
    (trees, nodes)
}
