// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

/// One entry in a menu tree.
///
/// The numeric `id` is the mutation key; `uuid` is stable and immutable after
/// creation. `children` is only populated when the node was fetched in
/// hierarchical form. A draft (not-yet-persisted) node uses `id == 0` and an
/// empty `uuid`/timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    pub id: i64,
    #[serde(default)]
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_id: Option<String>,
    pub depth: u32,
    pub parent_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuNode>>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl MenuNode {
    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|children| !children.is_empty())
    }

    pub fn child_slice(&self) -> &[MenuNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// Locates `id` in a nested node list by depth-first search (first match).
pub fn find_node(nodes: &[MenuNode], id: i64) -> Option<&MenuNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(node.child_slice(), id) {
            return Some(found);
        }
    }
    None
}

pub fn find_node_mut(nodes: &mut [MenuNode], id: i64) -> Option<&mut MenuNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_deref_mut() {
            if let Some(found) = find_node_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Depth-first lookup that also yields the ancestor chain, root first.
///
/// Selection, breadcrumb building, parent-name display, and update merging
/// all go through this one traversal.
pub fn node_trail(nodes: &[MenuNode], id: i64) -> Option<NodeTrail<'_>> {
    let mut ancestors = Vec::new();
    let node = trail_step(nodes, id, &mut ancestors)?;
    Some(NodeTrail { ancestors, node })
}

fn trail_step<'a>(
    nodes: &'a [MenuNode],
    id: i64,
    ancestors: &mut Vec<&'a MenuNode>,
) -> Option<&'a MenuNode> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        ancestors.push(node);
        if let Some(found) = trail_step(node.child_slice(), id, ancestors) {
            return Some(found);
        }
        ancestors.pop();
    }
    None
}

#[derive(Debug, Clone)]
pub struct NodeTrail<'a> {
    pub ancestors: Vec<&'a MenuNode>,
    pub node: &'a MenuNode,
}

impl NodeTrail<'_> {
    /// Ancestor names plus the node's own name, root first.
    pub fn breadcrumb(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.ancestors.iter().map(|node| node.name.clone()).collect();
        names.push(self.node.name.clone());
        names
    }
}

/// Every node id in the nested list, pre-order.
pub fn collect_ids(nodes: &[MenuNode]) -> Vec<i64> {
    let mut ids = Vec::new();
    collect_ids_into(nodes, &mut ids);
    ids
}

fn collect_ids_into(nodes: &[MenuNode], ids: &mut Vec<i64>) {
    for node in nodes {
        ids.push(node.id);
        collect_ids_into(node.child_slice(), ids);
    }
}

/// Ids of nodes violating the depth/parent invariant: a node's depth must be
/// its parent's depth plus one, or zero for a root, and nested children must
/// reference their enclosing node as parent.
pub fn depth_violations(nodes: &[MenuNode]) -> Vec<i64> {
    let mut violations = Vec::new();
    check_level(nodes, None, 0, &mut violations);
    violations
}

fn check_level(nodes: &[MenuNode], parent_id: Option<i64>, depth: u32, violations: &mut Vec<i64>) {
    for node in nodes {
        if node.depth != depth || node.parent_id != parent_id {
            violations.push(node.id);
        }
        check_level(node.child_slice(), Some(node.id), depth + 1, violations);
    }
}
