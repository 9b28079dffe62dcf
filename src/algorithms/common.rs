use crate::error::Result;
use crate::grid::Grid;
use crate::node::NodeId;

/// A search that advances one expansion per call, so callers can
/// interleave it with their own work (one step per rendered frame, say).
pub trait SteppedSearch {
    /// Runs a single expansion. Does nothing once the search is tested.
    fn calculate_step(&mut self) -> Result<()>;

    /// Steps until the search is tested and returns the resulting path.
    fn calculate_all(&mut self) -> Result<&[NodeId]>;

    fn is_tested(&self) -> bool;

    fn is_solvable(&self) -> bool;

    /// Closest approach to the goal, `None` until tested.
    fn best_try(&self) -> Option<&[NodeId]>;

    fn grid(&self) -> &Grid;
}
