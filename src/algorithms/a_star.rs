use crate::algorithms::common::SteppedSearch;
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::node::{Node, NodeId};
use rustc_hash::FxHashSet;

/// Where an [`AStar`] run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// No successful `prepare` yet, or the grid was handed out for editing.
    Unprepared,
    /// Open set seeded with the start node.
    Ready,
    /// At least one expansion done, goal not reached yet.
    Stepping,
    /// Goal reached; `path` holds the optimal route.
    Solved,
    /// Open set ran dry; only `best_try` is available.
    Exhausted,
}

/// Stepwise A* search over a [`Grid`] it owns.
///
/// Paths come back goal-first: they start at the node that ended the
/// search and walk parent links back to the start node.
#[derive(Debug, Clone)]
pub struct AStar {
    grid: Grid,
    state: SearchState,
    // Insertion ordered so the first of several equal f-scores wins.
    open_set: Vec<NodeId>,
    in_open: FxHashSet<NodeId>,
    g_score: Vec<f64>,
    f_score: Vec<f64>,
    expanded: Vec<NodeId>,
    current: Option<NodeId>,
    path: Option<Vec<NodeId>>,
    best_try: Option<Vec<NodeId>>,
    calculating: bool,
    steps: usize,
}

impl AStar {
    /// Creates an engine over `grid`. Call [`AStar::prepare`] before stepping.
    pub fn new(grid: Grid) -> Self {
        AStar {
            grid,
            state: SearchState::Unprepared,
            open_set: Vec::new(),
            in_open: FxHashSet::default(),
            g_score: Vec::new(),
            f_score: Vec::new(),
            expanded: Vec::new(),
            current: None,
            path: None,
            best_try: None,
            calculating: false,
            steps: 0,
        }
    }

    /// Binds start and goal by dimensional indices and resets the run.
    ///
    /// On error the engine is left exactly as it was.
    pub fn prepare(&mut self, start: &[usize], goal: &[usize]) -> Result<()> {
        self.grid.setup(start, goal)?;
        self.reset()
    }

    /// Like [`AStar::prepare`], with flat node indices.
    pub fn prepare_flat(&mut self, start: usize, goal: usize) -> Result<()> {
        self.grid.setup_flat(start, goal)?;
        self.reset()
    }

    fn reset(&mut self) -> Result<()> {
        let start = self.grid.start().ok_or(Error::NotPrepared)?;
        let start_h = self.grid.heuristic(start)?;

        self.grid.clear_parents();
        let (g_score, f_score) = (&mut self.g_score, &mut self.f_score);
        g_score.clear();
        f_score.clear();
        self.grid.for_all_nodes(|_, _| {
            g_score.push(f64::INFINITY);
            f_score.push(f64::INFINITY);
        });
        self.g_score[start.index()] = 0.0;
        self.f_score[start.index()] = start_h;

        self.open_set.clear();
        self.in_open.clear();
        self.open_set.push(start);
        self.in_open.insert(start);
        self.expanded.clear();
        self.current = None;
        self.path = None;
        self.best_try = None;
        self.calculating = false;
        self.steps = 0;
        self.state = SearchState::Ready;

        tracing::debug!(
            start = %start,
            goal = ?self.grid.goal(),
            heuristic = start_h,
            "prepared search"
        );
        Ok(())
    }

    fn lowest_f_score(&self) -> Option<NodeId> {
        let mut lowest: Option<NodeId> = None;
        for &id in &self.open_set {
            match lowest {
                Some(min) if self.f_score[id.index()] >= self.f_score[min.index()] => {}
                _ => lowest = Some(id),
            }
        }
        lowest
    }

    fn expand(&mut self, current: NodeId) -> Result<()> {
        if let Some(pos) = self.open_set.iter().position(|&id| id == current) {
            self.open_set.remove(pos);
        }
        self.in_open.remove(&current);
        self.expanded.push(current);

        let current_g = self.g_score[current.index()];
        let slots = self.grid[current].neighbors().len();
        for slot in 0..slots {
            let Some(neighbor) = self.grid[current].neighbors()[slot] else {
                continue;
            };
            if !self.grid[neighbor].is_passable() {
                continue;
            }
            let tentative = current_g + self.grid.distance(current, neighbor)?;
            if tentative < self.g_score[neighbor.index()] {
                self.grid.set_parent(neighbor, current);
                self.g_score[neighbor.index()] = tentative;
                self.f_score[neighbor.index()] = tentative + self.grid.heuristic(neighbor)?;
                if self.in_open.insert(neighbor) {
                    self.open_set.push(neighbor);
                }
            }
        }
        tracing::trace!(
            node = %current,
            g = current_g,
            open = self.open_set.len(),
            "expanded node"
        );
        Ok(())
    }

    fn solve(&mut self, goal: NodeId) -> Result<()> {
        let path = self.grid.path_to(goal)?;
        tracing::debug!(
            steps = self.steps,
            hops = path.len() - 1,
            cost = self.g_score[goal.index()],
            "goal reached"
        );
        self.best_try = Some(path.clone());
        self.path = Some(path);
        self.state = SearchState::Solved;
        self.calculating = false;
        Ok(())
    }

    /// Settles for the reached node closest to the goal. Ties go to the
    /// lower f-score, then to whichever was expanded first.
    fn exhaust(&mut self) -> Result<()> {
        let mut best: Option<(NodeId, f64)> = None;
        for &id in &self.expanded {
            let h = self.grid.heuristic(id)?;
            let better = match best {
                None => true,
                Some((min, min_h)) => {
                    h < min_h || (h == min_h && self.f_score[id.index()] < self.f_score[min.index()])
                }
            };
            if better {
                best = Some((id, h));
            }
        }
        let closest = match best {
            Some((id, _)) => id,
            None => self.grid.start().ok_or(Error::NotPrepared)?,
        };

        tracing::debug!(
            steps = self.steps,
            expanded = self.expanded.len(),
            closest = %closest,
            "open set exhausted; goal unreachable"
        );
        self.best_try = Some(self.grid.path_to(closest)?);
        self.path = None;
        self.state = SearchState::Exhausted;
        self.calculating = false;
        Ok(())
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_tested(&self) -> bool {
        matches!(self.state, SearchState::Solved | SearchState::Exhausted)
    }

    pub fn is_solvable(&self) -> bool {
        self.state == SearchState::Solved
    }

    /// True while a run is in progress.
    pub fn is_calculating(&self) -> bool {
        self.calculating
    }

    /// Optimal path, goal first. `None` until solved.
    pub fn path(&self) -> Option<&[NodeId]> {
        self.path.as_deref()
    }

    /// Path to the goal, or to the closest reachable node when the goal
    /// is walled off. `None` until tested.
    pub fn best_try(&self) -> Option<&[NodeId]> {
        self.best_try.as_deref()
    }

    /// Node picked by the most recent step.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Frontier nodes in insertion order.
    pub fn open_set(&self) -> &[NodeId] {
        &self.open_set
    }

    pub fn g_score(&self, id: NodeId) -> Option<f64> {
        self.g_score.get(id.index()).copied()
    }

    pub fn f_score(&self, id: NodeId) -> Option<f64> {
        self.f_score.get(id.index()).copied()
    }

    /// Calls to `calculate_step` that did work since the last `prepare`.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of expansions since the last `prepare`.
    pub fn expanded(&self) -> usize {
        self.expanded.len()
    }

    pub fn map(&self) -> &[Node] {
        self.grid.nodes()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access for editing obstacles between runs. Discards the
    /// current run; `prepare` must be called again before stepping.
    pub fn grid_mut(&mut self) -> &mut Grid {
        self.state = SearchState::Unprepared;
        self.calculating = false;
        self.current = None;
        self.path = None;
        self.best_try = None;
        &mut self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

impl TryFrom<Option<Grid>> for AStar {
    type Error = Error;

    fn try_from(grid: Option<Grid>) -> Result<Self> {
        grid.map(AStar::new).ok_or(Error::MissingGrid)
    }
}

impl SteppedSearch for AStar {
    fn calculate_step(&mut self) -> Result<()> {
        match self.state {
            SearchState::Unprepared => return Err(Error::NotPrepared),
            SearchState::Solved | SearchState::Exhausted => return Ok(()),
            SearchState::Ready | SearchState::Stepping => {}
        }
        self.steps += 1;

        let Some(current) = self.lowest_f_score() else {
            return self.exhaust();
        };
        self.state = SearchState::Stepping;
        self.calculating = true;
        self.current = Some(current);

        if Some(current) == self.grid.goal() {
            return self.solve(current);
        }
        self.expand(current)
    }

    fn calculate_all(&mut self) -> Result<&[NodeId]> {
        if self.state == SearchState::Unprepared {
            return Err(Error::NotPrepared);
        }
        while !self.is_tested() {
            self.calculate_step()?;
        }
        Ok(self
            .path
            .as_deref()
            .or(self.best_try.as_deref())
            .unwrap_or_default())
    }

    fn is_tested(&self) -> bool {
        AStar::is_tested(self)
    }

    fn is_solvable(&self) -> bool {
        AStar::is_solvable(self)
    }

    fn best_try(&self) -> Option<&[NodeId]> {
        AStar::best_try(self)
    }

    fn grid(&self) -> &Grid {
        AStar::grid(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPolicy;

    fn engine(size: &[usize], policy: GridPolicy) -> AStar {
        AStar::new(Grid::new(size, policy).unwrap())
    }

    fn cells(search: &AStar, path: &[NodeId]) -> Vec<Vec<usize>> {
        path.iter()
            .map(|&id| search.grid().indices_of(id).unwrap())
            .collect()
    }

    #[test]
    fn stepping_before_prepare_fails() {
        let mut search = engine(&[3, 3], GridPolicy::orthogonal_2d());
        assert_eq!(search.calculate_step(), Err(Error::NotPrepared));
        assert_eq!(search.calculate_all().unwrap_err(), Error::NotPrepared);
        assert_eq!(search.state(), SearchState::Unprepared);
    }

    #[test]
    fn missing_grid_is_rejected() {
        assert_eq!(AStar::try_from(None).unwrap_err(), Error::MissingGrid);
        let grid = Grid::new(&[2, 2], GridPolicy::orthogonal_2d()).unwrap();
        assert!(AStar::try_from(Some(grid)).is_ok());
    }

    #[test]
    fn prepare_seeds_scores_and_open_set() {
        let mut search = engine(&[3, 3], GridPolicy::orthogonal_2d());
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        let start = NodeId(0);
        assert_eq!(search.state(), SearchState::Ready);
        assert_eq!(search.open_set(), &[start]);
        assert_eq!(search.g_score(start), Some(0.0));
        assert_eq!(search.f_score(start), Some(80.0));
        assert_eq!(search.g_score(NodeId(4)), Some(f64::INFINITY));
        assert_eq!(search.path(), None);
        assert_eq!(search.best_try(), None);
    }

    #[test]
    fn failed_prepare_keeps_previous_run() {
        let mut search = engine(&[3, 3], GridPolicy::orthogonal_2d());
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        search.calculate_all().unwrap();
        let before = search.path().map(<[NodeId]>::to_vec);

        let err = search.prepare(&[0, 0], &[5, 5]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::IndexOutOfRange);
        assert!(search.is_tested());
        assert_eq!(search.path().map(<[NodeId]>::to_vec), before);
        assert_eq!(search.grid().goal(), Some(NodeId(8)));
    }

    #[test]
    fn first_step_expands_the_start() {
        let mut search = engine(&[3, 3], GridPolicy::orthogonal_2d());
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        search.calculate_step().unwrap();
        assert_eq!(search.state(), SearchState::Stepping);
        assert!(search.is_calculating());
        assert_eq!(search.current(), Some(NodeId(0)));
        // Down links before Right in the orthogonal direction order
        assert_eq!(search.open_set(), &[NodeId(3), NodeId(1)]);
        assert_eq!(search.grid()[NodeId(1)].parent(), Some(NodeId(0)));
        assert_eq!(search.g_score(NodeId(1)), Some(20.0));
        assert_eq!(search.f_score(NodeId(1)), Some(80.0));
    }

    #[test]
    fn equal_scores_keep_the_earliest_entry() {
        let mut search = engine(&[3, 3], GridPolicy::orthogonal_2d());
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        search.calculate_step().unwrap();
        search.calculate_step().unwrap();
        // both frontier nodes had f = 80; the first inserted wins
        assert_eq!(search.current(), Some(NodeId(3)));
    }

    #[test]
    fn solves_an_open_grid() {
        let mut search = engine(&[3, 3], GridPolicy::orthogonal_2d());
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        let path = search.calculate_all().unwrap().to_vec();
        assert!(search.is_solvable());
        assert_eq!(search.state(), SearchState::Solved);
        assert!(!search.is_calculating());
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&NodeId(8)));
        assert_eq!(path.last(), Some(&NodeId(0)));
        assert_eq!(search.best_try(), Some(&path[..]));
        assert_eq!(search.g_score(NodeId(8)), Some(80.0));
    }

    #[test]
    fn diagonal_grid_cuts_corners() {
        let mut search = engine(&[3, 3], GridPolicy::diagonal_2d());
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        let path = search.calculate_all().unwrap().to_vec();
        assert_eq!(
            cells(&search, &path),
            vec![vec![2, 2], vec![1, 1], vec![0, 0]]
        );
    }

    #[test]
    fn walled_goal_falls_back_to_best_try() {
        let mut grid = Grid::new(&[4, 3], GridPolicy::orthogonal_2d()).unwrap();
        for y in 0..3 {
            grid.set_passable(&[2, y], false).unwrap();
        }
        let mut search = AStar::new(grid);
        search.prepare(&[0, 0], &[3, 2]).unwrap();
        let best = search.calculate_all().unwrap().to_vec();

        assert!(search.is_tested());
        assert!(!search.is_solvable());
        assert_eq!(search.state(), SearchState::Exhausted);
        assert_eq!(search.path(), None);
        assert_eq!(search.best_try(), Some(&best[..]));
        // (1, 2) is the reachable cell nearest to (3, 2)
        assert_eq!(cells(&search, &best[..1]), vec![vec![1, 2]]);
        assert_eq!(best.last(), Some(&NodeId(0)));
        assert_eq!(search.expanded(), 6);
    }

    #[test]
    fn impassable_goal_is_never_entered() {
        let mut grid = Grid::new(&[3, 1], GridPolicy::orthogonal_2d()).unwrap();
        grid.set_passable(&[2, 0], false).unwrap();
        let mut search = AStar::new(grid);
        search.prepare(&[0, 0], &[2, 0]).unwrap();
        let best = search.calculate_all().unwrap().to_vec();
        assert!(!search.is_solvable());
        assert_eq!(best, vec![NodeId(1), NodeId(0)]);
    }

    #[test]
    fn single_cell_grid_is_trivially_solved() {
        let mut search = engine(&[1, 1], GridPolicy::orthogonal_2d());
        search.prepare(&[0, 0], &[0, 0]).unwrap();
        assert_eq!(search.calculate_all().unwrap(), &[NodeId(0)]);
        assert!(search.is_solvable());
        assert_eq!(search.steps(), 1);
    }

    #[test]
    fn steps_after_completion_are_no_ops() {
        let mut search = engine(&[2, 2], GridPolicy::orthogonal_2d());
        search.prepare(&[0, 0], &[1, 1]).unwrap();
        search.calculate_all().unwrap();
        let steps = search.steps();
        search.calculate_step().unwrap();
        assert_eq!(search.steps(), steps);
        assert!(search.is_solvable());
    }

    #[test]
    fn editing_the_grid_requires_a_new_prepare() {
        let mut search = engine(&[3, 3], GridPolicy::orthogonal_2d());
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        search.calculate_all().unwrap();

        search.grid_mut().set_passable(&[1, 0], false).unwrap();
        assert_eq!(search.state(), SearchState::Unprepared);
        assert_eq!(search.calculate_step(), Err(Error::NotPrepared));

        search.prepare(&[0, 0], &[2, 2]).unwrap();
        let path = search.calculate_all().unwrap().to_vec();
        assert!(!path.contains(&NodeId(1)));
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn flat_prepare_binds_by_index() {
        let mut search = engine(&[3, 3], GridPolicy::orthogonal_2d());
        search.prepare_flat(2, 6).unwrap();
        let path = search.calculate_all().unwrap().to_vec();
        assert_eq!(path.first(), Some(&NodeId(6)));
        assert_eq!(path.last(), Some(&NodeId(2)));
        assert!(search.prepare_flat(0, 42).is_err());
    }
}
