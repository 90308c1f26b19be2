use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::Point;
use crate::foundation::error::{GraphError, GraphResult};
use crate::graph::connections::Connections;
use crate::graph::model::GraphKind;
use crate::placement::components::arrange_graph_components;
use crate::placement::{TreesSettings, check_roots_exist, explicit_root};

#[derive(Debug)]
struct TreeNode {
    key: String,
    depth: usize,
    children: Vec<usize>,
    width: usize,
    left: usize,
}

pub(super) fn place(
    connections: &Connections,
    vertex_radius: f64,
    settings: &TreesSettings,
) -> GraphResult<BTreeMap<String, Point>> {
    check_roots_exist(connections, &settings.roots)?;
    let mut layouts = Vec::new();
    for component in connections.components() {
        let root = match explicit_root(&settings.roots, &component)? {
            Some(root) => root.clone(),
            None => infer_root(connections, &component)?,
        };
        layouts.push(layout_tree(connections, &root, vertex_radius, settings));
    }
    Ok(arrange_graph_components(
        layouts,
        vertex_radius,
        settings.min_vertex_spacing,
    ))
}

/// Directed components use their only in-degree-0 vertex; everything else falls back to the
/// smallest key.
fn infer_root(connections: &Connections, component: &[String]) -> GraphResult<String> {
    if connections.kind() == GraphKind::Directed {
        let sources = component
            .iter()
            .filter(|k| connections.in_degree(k) == 0)
            .collect::<Vec<_>>();
        if sources.len() > 1 {
            let names = sources
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(GraphError::ambiguous_root(format!(
                "vertices [{names}] have no incoming edges; pass an explicit root"
            )));
        }
        if let Some(only) = sources.first() {
            return Ok((*only).clone());
        }
    }
    component
        .first()
        .cloned()
        .ok_or_else(|| GraphError::configuration("empty component"))
}

/// Layered layout of the spanning tree reached from `root`.
///
/// Depth-first with an explicit stack; subtree widths come from a reverse pre-order pass so
/// that every parent is centered above its children.
fn layout_tree(
    connections: &Connections,
    root: &str,
    vertex_radius: f64,
    settings: &TreesSettings,
) -> BTreeMap<String, Point> {
    let mut arena = vec![TreeNode {
        key: root.to_owned(),
        depth: 0,
        children: Vec::new(),
        width: 1,
        left: 0,
    }];
    let mut seen = BTreeSet::from([root.to_owned()]);
    let mut stack = vec![0usize];
    let mut preorder = Vec::new();

    while let Some(idx) = stack.pop() {
        preorder.push(idx);
        let depth = arena[idx].depth + 1;
        let key = arena[idx].key.clone();
        let mut children = Vec::new();
        for next in connections.neighbors(&key) {
            if seen.insert(next.clone()) {
                arena.push(TreeNode {
                    key: next.clone(),
                    depth,
                    children: Vec::new(),
                    width: 1,
                    left: 0,
                });
                children.push(arena.len() - 1);
            }
        }
        stack.extend(children.iter().rev());
        arena[idx].children = children;
    }

    for &idx in preorder.iter().rev() {
        let width = arena[idx]
            .children
            .iter()
            .map(|&c| arena[c].width)
            .sum::<usize>();
        arena[idx].width = width.max(1);
    }
    for &idx in &preorder {
        let mut cursor = arena[idx].left;
        for c in arena[idx].children.clone() {
            arena[c].left = cursor;
            cursor += arena[c].width;
        }
    }

    let column = 2.0 * vertex_radius + settings.min_column_distance;
    let row = 2.0 * vertex_radius + settings.min_row_distance;
    arena
        .into_iter()
        .map(|node| {
            let col = node.left as f64 + (node.width as f64 - 1.0) / 2.0;
            (node.key, Point::new(col * column, node.depth as f64 * row))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/placement/trees.rs"]
mod tests;
