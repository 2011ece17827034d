//! Binary space partition of the map interior into room regions.
//!
//! Nodes live in a slot-map arena owned by [`BspTree`]; dropping the tree drops every
//! node at once. A node is either a leaf or split into exactly two children that tile it.

use slotmap::{SlotMap, new_key_type};
use tracing::trace;

use crate::queue::PriorityQueue;
use crate::rng::Generator;
use crate::types::{Pos, Rect, Size};

new_key_type! {
    pub struct NodeId;
}

/// Direction a split cuts through a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Divides the width: children sit side by side.
    X,
    /// Divides the height: children sit one above the other.
    Y,
}

#[derive(Clone, Debug)]
struct BspNode {
    region: Rect,
    depth: u32,
    parent: Option<NodeId>,
    children: Option<(NodeId, NodeId)>,
    /// Axis and absolute coordinate of the first cell of the second child.
    split: Option<(Axis, i32)>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRules {
    pub min_region: Size,
    pub max_region: Size,
    pub deviation: f64,
    pub max_depth: u32,
}

#[derive(Clone, Debug)]
pub struct BspTree {
    nodes: SlotMap<NodeId, BspNode>,
    root: NodeId,
}

impl BspTree {
    pub fn new(region: Rect) -> Self {
        let mut nodes = SlotMap::with_key();
        let root =
            nodes.insert(BspNode { region, depth: 0, parent: None, children: None, split: None });
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn region(&self, node: NodeId) -> Option<Rect> {
        self.nodes.get(node).map(|n| n.region)
    }

    pub fn depth(&self, node: NodeId) -> Option<u32> {
        self.nodes.get(node).map(|n| n.depth)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> Option<(NodeId, NodeId)> {
        self.nodes.get(node).and_then(|n| n.children)
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.children.is_none())
    }

    pub fn split_line(&self, node: NodeId) -> Option<(Axis, i32)> {
        self.nodes.get(node).and_then(|n| n.split)
    }

    /// The other child of this node's parent; `None` for the root.
    pub fn sibling(&self, node: NodeId) -> Option<NodeId> {
        let (first, second) = self.children(self.parent(node)?)?;
        Some(if first == node { second } else { first })
    }

    /// Midpoint of the line separating the two children of `node`.
    pub fn split_midpoint(&self, node: NodeId) -> Option<Pos> {
        let region = self.region(node)?;
        let (axis, at) = self.split_line(node)?;
        Some(match axis {
            Axis::X => Pos { y: region.y + region.height / 2, x: at },
            Axis::Y => Pos { y: at, x: region.x + region.width / 2 },
        })
    }

    /// Cuts a leaf into two children, the first `position` cells wide (or tall).
    /// Returns `None` without touching the tree when the node is already split or a
    /// child would be empty.
    pub fn split(&mut self, node: NodeId, position: i32, axis: Axis) -> Option<(NodeId, NodeId)> {
        let parent = self.nodes.get(node)?;
        if parent.children.is_some() {
            return None;
        }
        let region = parent.region;
        let depth = parent.depth + 1;
        let extent = match axis {
            Axis::X => region.width,
            Axis::Y => region.height,
        };
        if position <= 0 || position >= extent {
            return None;
        }

        let (first, second, at) = match axis {
            Axis::X => (
                Rect::new(region.x, region.y, position, region.height),
                Rect::new(region.x + position, region.y, region.width - position, region.height),
                region.x + position,
            ),
            Axis::Y => (
                Rect::new(region.x, region.y, region.width, position),
                Rect::new(region.x, region.y + position, region.width, region.height - position),
                region.y + position,
            ),
        };

        let child = |region| BspNode { region, depth, parent: Some(node), children: None, split: None };
        let first = self.nodes.insert(child(first));
        let second = self.nodes.insert(child(second));
        if let Some(parent) = self.nodes.get_mut(node) {
            parent.children = Some((first, second));
            parent.split = Some((axis, at));
        }
        Some((first, second))
    }

    /// Splits `node` and its descendants until regions fit `max_region`, depth runs
    /// out, or neither axis can hold two `min_region` children. Returns the number of
    /// splits made.
    pub fn recursively_split<G>(&mut self, node: NodeId, generator: &mut G, rules: &SplitRules) -> usize
    where
        G: Generator + ?Sized,
    {
        let Some(base_depth) = self.depth(node) else {
            return 0;
        };
        let mut splits = 0;
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            let Some(region) = self.region(current) else {
                continue;
            };
            let depth = self.depth(current).unwrap_or(base_depth) - base_depth;
            let Some((axis, position)) = choose_split(region, depth, generator, rules) else {
                continue;
            };
            if let Some((first, second)) = self.split(current, position, axis) {
                splits += 1;
                pending.push(second);
                pending.push(first);
            }
        }
        trace!(splits, "regions partitioned");
        splits
    }

    /// Leaves under `node`, ordered by preorder traversal index.
    pub fn leaves(&self, node: NodeId) -> PriorityQueue<NodeId> {
        let mut queue = PriorityQueue::new();
        for (index, id) in self.preorder(node).into_iter().enumerate() {
            if self.is_leaf(id) {
                queue.push(id, index as i64);
            }
        }
        queue
    }

    /// Every node under `node` including itself, ordered by preorder traversal index.
    pub fn all_nodes(&self, node: NodeId) -> PriorityQueue<NodeId> {
        let mut queue = PriorityQueue::new();
        for (index, id) in self.preorder(node).into_iter().enumerate() {
            queue.push(id, index as i64);
        }
        queue
    }

    fn preorder(&self, node: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            order.push(current);
            if let Some((first, second)) = self.children(current) {
                stack.push(second);
                stack.push(first);
            }
        }
        order
    }
}

fn choose_split<G>(region: Rect, depth: u32, generator: &mut G, rules: &SplitRules) -> Option<(Axis, i32)>
where
    G: Generator + ?Sized,
{
    if depth >= rules.max_depth {
        return None;
    }
    if region.width <= rules.max_region.width && region.height <= rules.max_region.height {
        return None;
    }
    let min = rules.min_region;
    let axis = match (region.width >= 2 * min.width, region.height >= 2 * min.height) {
        (true, true) => {
            if generator.coin_flip() {
                Axis::X
            } else {
                Axis::Y
            }
        }
        (true, false) => Axis::X,
        (false, true) => Axis::Y,
        (false, false) => return None,
    };
    let (extent, minimum) = match axis {
        Axis::X => (region.width, min.width),
        Axis::Y => (region.height, min.height),
    };
    let center = extent / 2;
    let spread = (f64::from(center) * rules.deviation) as i32;
    let low = (center - spread).max(minimum);
    let high = (center + spread).min(extent - minimum);
    Some((axis, generator.generate(low, high)))
}
