use crate::converter::Converter;
use crate::distance::Metric;
use crate::error::{Error, Result};
use crate::node::{Direction, Node, NodeId};
use std::mem;
use std::ops::Index;

/// Number of axes a grid spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimensionality {
    Two,
    Three,
}

impl Dimensionality {
    pub const fn count(self) -> usize {
        match self {
            Dimensionality::Two => 2,
            Dimensionality::Three => 3,
        }
    }
}

/// How a grid is connected: its dimensionality and whether diagonal
/// moves are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPolicy {
    pub dimensionality: Dimensionality,
    pub diagonals: bool,
}

/// Neighbor set and metric that a policy resolves to.
struct Strategy {
    directions: &'static [Direction],
    metric: Metric,
}

static ORTHOGONAL_2D: Strategy = Strategy {
    directions: &Direction::ORTHOGONAL_2D,
    metric: Metric::Manhattan,
};
static DIAGONAL_2D: Strategy = Strategy {
    directions: &Direction::DIAGONAL_2D,
    metric: Metric::Euclidean,
};
static ORTHOGONAL_3D: Strategy = Strategy {
    directions: &Direction::ORTHOGONAL_3D,
    metric: Metric::Manhattan,
};
static DIAGONAL_3D: Strategy = Strategy {
    directions: &Direction::ALL,
    metric: Metric::Euclidean,
};

impl GridPolicy {
    pub const fn new(dimensionality: Dimensionality, diagonals: bool) -> Self {
        GridPolicy {
            dimensionality,
            diagonals,
        }
    }

    pub const fn orthogonal_2d() -> Self {
        Self::new(Dimensionality::Two, false)
    }

    pub const fn diagonal_2d() -> Self {
        Self::new(Dimensionality::Two, true)
    }

    pub const fn orthogonal_3d() -> Self {
        Self::new(Dimensionality::Three, false)
    }

    pub const fn diagonal_3d() -> Self {
        Self::new(Dimensionality::Three, true)
    }

    fn strategy(self) -> &'static Strategy {
        match (self.dimensionality, self.diagonals) {
            (Dimensionality::Two, false) => &ORTHOGONAL_2D,
            (Dimensionality::Two, true) => &DIAGONAL_2D,
            (Dimensionality::Three, false) => &ORTHOGONAL_3D,
            (Dimensionality::Three, true) => &DIAGONAL_3D,
        }
    }

    /// Directions every node of this policy links through.
    pub fn directions(self) -> &'static [Direction] {
        self.strategy().directions
    }

    /// Metric used for edge costs and the heuristic.
    pub fn metric(self) -> Metric {
        self.strategy().metric
    }
}

/// Owner of a lattice of [`Node`]s and their neighbor graph.
///
/// Nodes are stored flat in row-major order: `x + width * y` in 2D and
/// `x + width * (y + height * z)` in 3D.
#[derive(Debug, Clone)]
pub struct Grid {
    nodes: Vec<Node>,
    size: Vec<usize>,
    policy: GridPolicy,
    converter: Converter,
    start: Option<NodeId>,
    goal: Option<NodeId>,
}

impl Grid {
    /// Builds a grid with the given extents, placing nodes with the default converter.
    pub fn new(size: &[usize], policy: GridPolicy) -> Result<Self> {
        Self::with_converter(size, policy, Converter::default())
    }

    pub fn with_converter(size: &[usize], policy: GridPolicy, converter: Converter) -> Result<Self> {
        let mut grid = Grid {
            nodes: Vec::new(),
            size: Vec::new(),
            policy,
            converter,
            start: None,
            goal: None,
        };
        grid.create(size)?;
        Ok(grid)
    }

    /// Rebuilds the node set for new extents. Start and goal are unbound and
    /// every node comes back passable.
    pub fn create(&mut self, size: &[usize]) -> Result<()> {
        let count = node_count(self.policy, size)?;
        self.size = size.to_vec();
        self.start = None;
        self.goal = None;
        self.generate_map(count);
        self.generate_neighbors();
        tracing::debug!(
            size = ?self.size,
            diagonals = self.policy.diagonals,
            nodes = count,
            "generated grid"
        );
        Ok(())
    }

    fn generate_map(&mut self, count: usize) {
        let directions = self.policy.directions();
        let diagonals = self.policy.diagonals;
        self.nodes = (0..count)
            .map(|i| {
                let indices = self.unflatten(i);
                Node::new(self.converter.to_position(&indices), diagonals, directions)
            })
            .collect();
    }

    fn generate_neighbors(&mut self) {
        for i in 0..self.nodes.len() {
            let indices = self.unflatten(i);
            for &direction in self.policy.directions() {
                let link = self.step(&indices, direction);
                self.nodes[i].set_neighbor(direction, link);
            }
        }
    }

    /// Node one move away from `indices`, `None` past the boundary.
    fn step(&self, indices: &[usize], direction: Direction) -> Option<NodeId> {
        let offset = direction.offset();
        let mut target = [0usize; 3];
        for (axis, (&i, &extent)) in indices.iter().zip(&self.size).enumerate() {
            let moved = i.checked_add_signed(offset[axis])?;
            if moved >= extent {
                return None;
            }
            target[axis] = moved;
        }
        Some(NodeId(self.flatten(&target[..indices.len()])))
    }

    fn flatten(&self, indices: &[usize]) -> usize {
        indices
            .iter()
            .zip(&self.size)
            .rev()
            .fold(0, |acc, (&i, &extent)| acc * extent + i)
    }

    fn unflatten(&self, mut index: usize) -> Vec<usize> {
        self.size
            .iter()
            .map(|&extent| {
                let i = index % extent;
                index /= extent;
                i
            })
            .collect()
    }

    /// Flat node index of the cell at `indices`.
    pub fn index(&self, indices: &[usize]) -> Result<NodeId> {
        if indices.len() != self.size.len() {
            return Err(Error::DimensionMismatch {
                expected: self.size.len(),
                found: indices.len(),
            });
        }
        if indices.iter().zip(&self.size).any(|(i, extent)| i >= extent) {
            return Err(Error::IndexOutOfRange {
                index: indices
                    .iter()
                    .map(|&i| isize::try_from(i).unwrap_or(isize::MAX))
                    .collect(),
                size: self.size.clone(),
            });
        }
        Ok(NodeId(self.flatten(indices)))
    }

    /// Dimensional indices of a node.
    pub fn indices_of(&self, id: NodeId) -> Result<Vec<usize>> {
        self.check_id(id)?;
        Ok(self.unflatten(id.0))
    }

    /// Node whose cell contains the spatial `position`.
    pub fn index_at_position(&self, position: &[f64]) -> Result<NodeId> {
        if position.len() != self.size.len() {
            return Err(Error::DimensionMismatch {
                expected: self.size.len(),
                found: position.len(),
            });
        }
        let raw = self.converter.to_indices(position);
        let in_bounds = raw
            .iter()
            .zip(&self.size)
            .all(|(&i, &extent)| i >= 0 && (i as usize) < extent);
        if !in_bounds {
            return Err(Error::IndexOutOfRange {
                index: raw,
                size: self.size.clone(),
            });
        }
        let indices: Vec<usize> = raw.into_iter().map(|i| i as usize).collect();
        Ok(NodeId(self.flatten(&indices)))
    }

    fn check_id(&self, id: NodeId) -> Result<()> {
        if id.0 >= self.nodes.len() {
            return Err(Error::FlatIndexOutOfRange {
                index: id.0,
                len: self.nodes.len(),
            });
        }
        Ok(())
    }

    /// Binds start and goal by dimensional indices. Nothing changes on error.
    pub fn setup(&mut self, start: &[usize], goal: &[usize]) -> Result<()> {
        let start = self.index(start)?;
        let goal = self.index(goal)?;
        self.start = Some(start);
        self.goal = Some(goal);
        Ok(())
    }

    /// Binds start and goal by flat node index. Nothing changes on error.
    pub fn setup_flat(&mut self, start: usize, goal: usize) -> Result<()> {
        self.check_id(NodeId(start))?;
        self.check_id(NodeId(goal))?;
        self.start = Some(NodeId(start));
        self.goal = Some(NodeId(goal));
        Ok(())
    }

    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    pub fn size(&self) -> &[usize] {
        &self.size
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.policy.dimensionality
    }

    pub fn policy(&self) -> GridPolicy {
        self.policy
    }

    pub fn converter(&self) -> Converter {
        self.converter
    }

    /// Swaps the converter and re-places every node. Links and passability are kept.
    pub fn set_converter(&mut self, converter: Converter) {
        self.converter = converter;
        for i in 0..self.nodes.len() {
            let position = self.converter.to_position(&self.unflatten(i));
            self.nodes[i].set_position(&position);
        }
    }

    /// The whole map, in flat index order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Marks the cell at `indices` as passable or blocked.
    pub fn set_passable(&mut self, indices: &[usize], passable: bool) -> Result<()> {
        let id = self.index(indices)?;
        self.nodes[id.0].set_passable(passable);
        Ok(())
    }

    pub fn for_all_nodes<F>(&self, mut action: F)
    where
        F: FnMut(NodeId, &Node),
    {
        for (i, node) in self.nodes.iter().enumerate() {
            action(NodeId(i), node);
        }
    }

    /// Cost of moving between two nodes under the grid's metric.
    pub fn distance(&self, p: NodeId, q: NodeId) -> Result<f64> {
        self.check_id(p)?;
        self.check_id(q)?;
        Ok(self
            .policy
            .metric()
            .between(self[p].position(), self[q].position()))
    }

    /// Estimated remaining cost from `node` to the bound goal.
    pub fn heuristic(&self, node: NodeId) -> Result<f64> {
        let goal = self.goal.ok_or(Error::NotPrepared)?;
        self.distance(node, goal)
    }

    /// Walks parent links from `id` back to the node that has none.
    ///
    /// The result runs from `id` to the search start.
    pub fn path_to(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.check_id(id)?;
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self[current].parent() {
            assert!(
                path.len() < self.nodes.len(),
                "parent chain starting at {id} loops"
            );
            path.push(parent);
            current = parent;
        }
        Ok(path)
    }

    /// Copy of the grid with search parents cleared. Start, goal, positions
    /// and passability carry over.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.clear_parents();
        copy
    }

    pub(crate) fn clear_parents(&mut self) {
        for node in &mut self.nodes {
            node.set_parent(None);
        }
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.nodes[id.0].set_parent(Some(parent));
    }
}

impl Index<NodeId> for Grid {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

fn node_count(policy: GridPolicy, size: &[usize]) -> Result<usize> {
    let invalid = || Error::InvalidSize {
        size: size.to_vec(),
    };
    if size.len() != policy.dimensionality.count() || size.contains(&0) {
        return Err(invalid());
    }
    let count = size
        .iter()
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .ok_or_else(invalid)?;
    // the node arena must stay within what a single allocation can hold
    match count.checked_mul(mem::size_of::<Node>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(count),
        _ => Err(invalid()),
    }
}
