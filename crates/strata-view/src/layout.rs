//! Compound layout: sizes and parent-relative positions for visible nodes
//!
//! Pure functions over a model and a snapshot. The parent/children structure
//! is assumed acyclic; the aggregator guarantees that upstream.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{GraphModel, GraphNode};
use crate::state::ViewState;

pub const SINGULAR_NODE_WIDTH: f64 = 100.0;
pub const SINGULAR_NODE_HEIGHT: f64 = 50.0;
pub const MIN_COMPOUND_WIDTH: f64 = 100.0;
pub const MIN_COMPOUND_HEIGHT: f64 = 50.0;
pub const COMPOUND_PADDING: f64 = 30.0;
pub const NODE_PADDING: f64 = 60.0;
pub const LEVEL_PADDING: f64 = 60.0;

/// Offset of a node relative to its parent container (or the canvas origin
/// for roots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Computed layout for one snapshot: a size and a parent-relative position
/// per visible node id.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub positions: HashMap<String, Position>,
    pub sizes: HashMap<String, Size>,
}

pub fn layout(model: &GraphModel, state: &ViewState) -> Layout {
    let visible: HashSet<String> = crate::project::visible_nodes(model, state)
        .iter()
        .map(|n| n.id.clone())
        .collect();

    let mut result = Layout::default();
    for root in model.roots() {
        if visible.contains(root) {
            measure(model, state, &visible, root, &mut result.sizes);
        }
    }

    let roots: Vec<&GraphNode> = model
        .roots()
        .iter()
        .filter(|root| visible.contains(*root))
        .map(|root| model.get(root))
        .collect();
    place_level_groups(model, state, &visible, &roots, 0.0, 0.0, &mut result);
    result
}

/// Bottom-up sizing. The branch follows the expansion state, not the visible
/// child count: an expanded container whose children are all hidden still
/// renders as a compound box at the minimum compound size plus padding.
fn measure(
    model: &GraphModel,
    state: &ViewState,
    visible: &HashSet<String>,
    id: &str,
    sizes: &mut HashMap<String, Size>,
) -> Size {
    let node = model.get(id);

    let size = if !state.is_expanded(id) {
        Size {
            width: SINGULAR_NODE_WIDTH,
            height: SINGULAR_NODE_HEIGHT,
        }
    } else {
        let children = visible_children(model, node, state, visible);
        let mut level_widths: BTreeMap<u32, f64> = BTreeMap::new();
        let mut level_heights: BTreeMap<u32, f64> = BTreeMap::new();
        for child in &children {
            let child_size = measure(model, state, visible, &child.id, sizes);
            let width = level_widths.entry(child.level).or_insert(-NODE_PADDING);
            *width += child_size.width + NODE_PADDING;
            let height = level_heights.entry(child.level).or_insert(0.0);
            *height = height.max(child_size.height);
        }

        let widest = level_widths.values().fold(0.0_f64, |a, w| a.max(*w));
        let stacked = if level_heights.is_empty() {
            0.0
        } else {
            level_heights.values().sum::<f64>()
                + LEVEL_PADDING * (level_heights.len() as f64 - 1.0)
        };
        Size {
            width: widest.max(MIN_COMPOUND_WIDTH) + 2.0 * COMPOUND_PADDING,
            height: stacked.max(MIN_COMPOUND_HEIGHT) + 2.0 * COMPOUND_PADDING,
        }
    };

    sizes.insert(id.to_string(), size);
    size
}

/// Top-down placement of one container's visible children (or the forest
/// roots), in coordinates relative to the container.
fn place_level_groups(
    model: &GraphModel,
    state: &ViewState,
    visible: &HashSet<String>,
    children: &[&GraphNode],
    x0: f64,
    y0: f64,
    result: &mut Layout,
) {
    let mut by_level: BTreeMap<u32, Vec<&GraphNode>> = BTreeMap::new();
    for child in children {
        by_level.entry(child.level).or_default().push(*child);
    }
    for row in by_level.values_mut() {
        row.sort_by(|a, b| b.label.cmp(&a.label));
    }

    let rows: Vec<(f64, Vec<&GraphNode>)> = by_level
        .into_values()
        .map(|row| {
            let width = row.iter().map(|n| result.sizes[&n.id].width).sum::<f64>()
                + NODE_PADDING * (row.len() as f64 - 1.0);
            (width, row)
        })
        .collect();
    let widest = rows.iter().map(|(width, _)| *width).fold(0.0_f64, f64::max);

    let mut y = y0;
    for (width, row) in &rows {
        // Narrower rows shift right by half the difference, centering them
        // under the widest row.
        let mut x = x0 + (widest - width) / 2.0;
        let mut row_height = 0.0_f64;
        for child in row {
            let size = result.sizes[&child.id];
            result
                .positions
                .insert(child.id.clone(), Position { x, y });

            let grandchildren = visible_children(model, child, state, visible);
            if !grandchildren.is_empty() {
                place_level_groups(
                    model,
                    state,
                    visible,
                    &grandchildren,
                    COMPOUND_PADDING,
                    COMPOUND_PADDING,
                    result,
                );
            }

            x += size.width + NODE_PADDING;
            row_height = row_height.max(size.height);
        }
        y += row_height + LEVEL_PADDING;
    }
}

fn visible_children<'a>(
    model: &'a GraphModel,
    node: &GraphNode,
    state: &ViewState,
    visible: &HashSet<String>,
) -> Vec<&'a GraphNode> {
    if !state.is_expanded(&node.id) {
        return Vec::new();
    }
    node.children
        .iter()
        .filter(|child| visible.contains(*child))
        .map(|child| model.get(child))
        .collect()
}
