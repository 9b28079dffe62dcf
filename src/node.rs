use std::fmt;

/// Index of a node in its grid's node array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Neighboring positions a node can link to.
///
/// Up and Down move along `y` (Up toward 0), Left and Right along `x`,
/// Front and Back along `z` (Front toward 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
    UpRight,
    UpLeft,
    DownRight,
    DownLeft,
    Front,
    Back,
    FrontUp,
    FrontDown,
    FrontLeft,
    FrontRight,
    FrontUpRight,
    FrontDownRight,
    FrontUpLeft,
    FrontDownLeft,
    BackUp,
    BackDown,
    BackLeft,
    BackRight,
    BackUpRight,
    BackDownRight,
    BackUpLeft,
    BackDownLeft,
}

impl Direction {
    pub const ORTHOGONAL_2D: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    pub const DIAGONAL_2D: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
        Direction::UpRight,
        Direction::UpLeft,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    pub const ORTHOGONAL_3D: [Direction; 6] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
        Direction::Front,
        Direction::Back,
    ];

    pub const ALL: [Direction; 26] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
        Direction::UpRight,
        Direction::UpLeft,
        Direction::DownRight,
        Direction::DownLeft,
        Direction::Front,
        Direction::Back,
        Direction::FrontUp,
        Direction::FrontDown,
        Direction::FrontLeft,
        Direction::FrontRight,
        Direction::FrontUpRight,
        Direction::FrontDownRight,
        Direction::FrontUpLeft,
        Direction::FrontDownLeft,
        Direction::BackUp,
        Direction::BackDown,
        Direction::BackLeft,
        Direction::BackRight,
        Direction::BackUpRight,
        Direction::BackDownRight,
        Direction::BackUpLeft,
        Direction::BackDownLeft,
    ];

    /// Lattice step `(dx, dy, dz)` taken when moving in this direction.
    pub const fn offset(self) -> [isize; 3] {
        let (dx, dy, dz) = match self {
            Direction::Up => (0, -1, 0),
            Direction::Down => (0, 1, 0),
            Direction::Right => (1, 0, 0),
            Direction::Left => (-1, 0, 0),
            Direction::UpRight => (1, -1, 0),
            Direction::UpLeft => (-1, -1, 0),
            Direction::DownRight => (1, 1, 0),
            Direction::DownLeft => (-1, 1, 0),
            Direction::Front => (0, 0, -1),
            Direction::Back => (0, 0, 1),
            Direction::FrontUp => (0, -1, -1),
            Direction::FrontDown => (0, 1, -1),
            Direction::FrontLeft => (-1, 0, -1),
            Direction::FrontRight => (1, 0, -1),
            Direction::FrontUpRight => (1, -1, -1),
            Direction::FrontDownRight => (1, 1, -1),
            Direction::FrontUpLeft => (-1, -1, -1),
            Direction::FrontDownLeft => (-1, 1, -1),
            Direction::BackUp => (0, -1, 1),
            Direction::BackDown => (0, 1, 1),
            Direction::BackLeft => (-1, 0, 1),
            Direction::BackRight => (1, 0, 1),
            Direction::BackUpRight => (1, -1, 1),
            Direction::BackDownRight => (1, 1, 1),
            Direction::BackUpLeft => (-1, -1, 1),
            Direction::BackDownLeft => (-1, 1, 1),
        };
        [dx, dy, dz]
    }
}

/// A single lattice cell.
///
/// Neighbor links and the parent are indices into the owning grid's node
/// array. The neighbor slots are fixed when the node is built: one per
/// direction of the grid policy, in policy order, with `None` marking a
/// boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    position: Vec<f64>,
    passable: bool,
    diagonals: bool,
    directions: &'static [Direction],
    neighbors: Box<[Option<NodeId>]>,
    parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(position: Vec<f64>, diagonals: bool, directions: &'static [Direction]) -> Self {
        Node {
            position,
            passable: true,
            diagonals,
            directions,
            neighbors: vec![None; directions.len()].into_boxed_slice(),
            parent: None,
        }
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    /// Moves the node. Only coordinates present in `position` are replaced.
    pub fn set_position(&mut self, position: &[f64]) {
        for (slot, &value) in self.position.iter_mut().zip(position) {
            *slot = value;
        }
    }

    pub fn is_passable(&self) -> bool {
        self.passable
    }

    pub fn set_passable(&mut self, passable: bool) {
        self.passable = passable;
    }

    pub fn uses_diagonals(&self) -> bool {
        self.diagonals
    }

    /// The directions this node has slots for.
    pub fn directions(&self) -> &'static [Direction] {
        self.directions
    }

    /// Linked node in `direction`, `None` at a boundary or when the node
    /// has no slot for that direction.
    pub fn neighbor(&self, direction: Direction) -> Option<NodeId> {
        self.slot(direction).and_then(|i| self.neighbors[i])
    }

    /// Every neighbor slot in direction order, including empty ones.
    pub fn neighbors(&self) -> &[Option<NodeId>] {
        &self.neighbors
    }

    /// Neighbors that exist, in direction order.
    pub fn linked_neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.neighbors.iter().flatten().copied()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn set_neighbor(&mut self, direction: Direction, node: Option<NodeId>) {
        if let Some(i) = self.slot(direction) {
            self.neighbors[i] = node;
        }
    }

    fn slot(&self, direction: Direction) -> Option<usize> {
        self.directions.iter().position(|&d| d == direction)
    }
}
