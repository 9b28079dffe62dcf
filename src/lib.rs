//! A* search over 2D and 3D lattices.
//!
//! A [`Grid`] owns every [`Node`] and wires their neighbor links according
//! to a [`GridPolicy`]: orthogonal or diagonal moves, in two or three
//! dimensions. An [`AStar`] engine takes the grid and runs the search
//! either one expansion at a time ([`SteppedSearch::calculate_step`]) or
//! to completion ([`SteppedSearch::calculate_all`]).
//!
//! ```
//! use lattice_astar::{AStar, Grid, GridPolicy, SteppedSearch};
//!
//! let grid = Grid::new(&[3, 3], GridPolicy::orthogonal_2d())?;
//! let mut search = AStar::new(grid);
//! search.prepare(&[0, 0], &[2, 2])?;
//! let path = search.calculate_all()?;
//! assert_eq!(path.len(), 5);
//! # Ok::<(), lattice_astar::Error>(())
//! ```

pub mod algorithms;
pub mod config;
pub mod converter;
pub mod distance;
pub mod error;
pub mod grid;
pub mod node;
pub mod simulation;
pub mod statistics;

pub use algorithms::a_star::{AStar, SearchState};
pub use algorithms::common::SteppedSearch;
pub use converter::Converter;
pub use distance::{euclidean, manhattan, Metric};
pub use error::{Error, ErrorKind, Result};
pub use grid::{Dimensionality, Grid, GridPolicy};
pub use node::{Direction, Node, NodeId};
