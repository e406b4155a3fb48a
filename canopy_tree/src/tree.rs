// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed binary space-partitioning tree.

use core::fmt::Debug;
use core::ops::Range;

use canopy_geom::Bound;

/// Handle to a node in a [`SpatialTree`].
///
/// Only meaningful for the tree that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree.
    pub const ROOT: Self = Self(0);

    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    /// Position of the node in its tree's arena.
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Partitioning family, which also fixes the bounding-volume variant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TreeKind {
    /// Axis-aligned splits with [`Bound::Rect`] volumes.
    #[default]
    Kd,
    /// Two-pivot splits with [`Bound::Ball`] volumes.
    Metric,
}

/// One node: a contiguous run of physical rows and the volume enclosing them.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) bound: Bound,
    pub(crate) begin: usize,
    pub(crate) count: usize,
    pub(crate) children: Option<(NodeId, NodeId)>,
}

impl Node {
    /// Volume enclosing every point stored under this node.
    pub fn bound(&self) -> &Bound {
        &self.bound
    }

    /// Physical rows stored under this node.
    pub fn range(&self) -> Range<usize> {
        self.begin..self.begin + self.count
    }

    /// First physical row.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Number of points stored under this node.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Left child of an internal node.
    pub fn left(&self) -> Option<NodeId> {
        self.children.map(|(l, _)| l)
    }

    /// Right child of an internal node.
    pub fn right(&self) -> Option<NodeId> {
        self.children.map(|(_, r)| r)
    }
}

/// Immutable binary partition of a table's physical rows.
///
/// Produced by [`IndexedTable::build`](crate::IndexedTable::build). Nodes are
/// stored in an arena in creation order: the root is [`NodeId::ROOT`] and
/// every child has a larger id than its parent. Accessors taking a [`NodeId`]
/// panic if the id comes from a different tree.
#[derive(Clone)]
pub struct SpatialTree {
    pub(crate) kind: TreeKind,
    pub(crate) leaf_size: usize,
    pub(crate) nodes: Vec<Node>,
}

impl Debug for SpatialTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpatialTree")
            .field("kind", &self.kind)
            .field("leaf_size", &self.leaf_size)
            .field("nodes", &self.nodes.len())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl SpatialTree {
    /// Partitioning family.
    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    /// Maximum number of points per leaf.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.get()]
    }

    /// Left child of `id`, or `None` for a leaf.
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left()
    }

    /// Right child of `id`, or `None` for a leaf.
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right()
    }

    /// Whether `id` is a leaf.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).is_leaf()
    }

    /// Volume of `id`.
    pub fn bound(&self, id: NodeId) -> &Bound {
        self.node(id).bound()
    }

    /// Physical rows under `id`.
    pub fn range(&self, id: NodeId) -> Range<usize> {
        self.node(id).range()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a built tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node id with its node, parents before children.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i), n))
    }

    /// Ids of the leaves, in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().filter(|(_, n)| n.is_leaf()).map(|(id, _)| id)
    }

    /// Number of levels; a lone root has height 1.
    pub fn height(&self) -> usize {
        let mut depth = vec![0_usize; self.nodes.len()];
        let mut height = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let d = depth[i] + 1;
            height = height.max(d);
            if let Some((l, r)) = node.children {
                depth[l.get()] = d;
                depth[r.get()] = d;
            }
        }
        height
    }
}
