use crate::algorithms::a_star::AStar;
use crate::algorithms::common::SteppedSearch;
use crate::config::Config;
use crate::converter::Converter;
use crate::error::Result;
use crate::grid::{Grid, GridPolicy};
use crate::node::NodeId;
use crate::statistics::SearchStatistics;
use pathfinding::prelude::bfs;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use std::fmt::Write;
use std::thread;
use std::time::Duration;

/// Grid layout for one run: extents, endpoints and wall cells.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub size: Vec<usize>,
    pub policy: GridPolicy,
    pub start: Vec<usize>,
    pub goal: Vec<usize>,
    pub walls: FxHashSet<Vec<usize>>,
}

impl Scenario {
    /// Lays out a scenario from `config`. Endpoints not given on the command
    /// line are drawn from opposite halves of the grid.
    pub fn generate(config: &Config, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let size = config.size();

        let start = config.start.clone().unwrap_or_else(|| {
            size.iter()
                .map(|&extent| rng.gen_range(0..(extent / 2).max(1)))
                .collect()
        });
        let goal = config.goal.clone().unwrap_or_else(|| {
            size.iter()
                .map(|&extent| rng.gen_range(extent / 2..extent.max(1)))
                .collect()
        });

        // endpoints are never walled
        let cells = size
            .iter()
            .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
            .unwrap_or(usize::MAX);
        let target = config.num_walls.min(cells.saturating_sub(2));
        let mut walls = FxHashSet::default();
        let mut attempts = 0;
        while walls.len() < target && attempts < target.saturating_mul(3) {
            let cell: Vec<usize> = size
                .iter()
                .map(|&extent| rng.gen_range(0..extent.max(1)))
                .collect();
            if cell != start && cell != goal {
                walls.insert(cell);
            }
            attempts += 1;
        }

        tracing::debug!(?start, ?goal, walls = walls.len(), "generated scenario");
        Scenario {
            size,
            policy: config.policy(),
            start,
            goal,
            walls,
        }
    }

    pub fn build_grid(&self, converter: Converter) -> Result<Grid> {
        let mut grid = Grid::with_converter(&self.size, self.policy, converter)?;
        for wall in &self.walls {
            grid.set_passable(wall, false)?;
        }
        Ok(grid)
    }
}

/// Drives an [`AStar`] search built from a [`Config`], optionally
/// printing one frame per step.
pub struct Simulation {
    search: AStar,
    config: Config,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self> {
        let scenario = Scenario::generate(&config, config.seed);
        Self::with_scenario(config, &scenario)
    }

    pub fn with_scenario(config: Config, scenario: &Scenario) -> Result<Self> {
        let converter = Converter::new(config.separation, config.offset)?;
        let mut search = AStar::new(scenario.build_grid(converter)?);
        search.prepare(&scenario.start, &scenario.goal)?;
        Ok(Simulation { search, config })
    }

    pub fn search(&self) -> &AStar {
        &self.search
    }

    pub fn run(&mut self) -> Result<SearchStatistics> {
        let visualize = !self.config.no_visualization && !self.config.quiet;
        if visualize {
            let delay = Duration::from_millis(self.config.delay_ms);
            while !self.search.is_tested() {
                self.search.calculate_step()?;
                println!("Step {}", self.search.steps());
                println!("{}", render(&self.search));
                thread::sleep(delay);
            }
        } else {
            self.search.calculate_all()?;
        }

        let stats = SearchStatistics::from_search(&self.search)
            .with_reference(reference_hops(self.search.grid()));
        tracing::info!(
            steps = stats.steps,
            solvable = stats.solvable,
            hops = ?stats.path_hops,
            "search finished"
        );
        Ok(stats)
    }
}

/// Fewest moves from the grid's start to its goal through passable cells,
/// found by breadth-first search.
pub fn reference_hops(grid: &Grid) -> Option<usize> {
    let start = grid.start()?;
    let goal = grid.goal()?;
    let route = bfs(
        &start,
        |&id: &NodeId| {
            grid[id]
                .linked_neighbors()
                .filter(|&n| grid[n].is_passable())
                .collect::<Vec<_>>()
        },
        |&id| id == goal,
    )?;
    Some(route.len() - 1)
}

/// Text picture of the search. 3D grids are drawn one z-layer at a time.
///
/// `S` start, `G` goal, `#` wall, `@` current, `o` open, `x` expanded,
/// `*` path, `.` untouched.
pub fn render(search: &AStar) -> String {
    let grid = search.grid();
    let open: FxHashSet<NodeId> = search.open_set().iter().copied().collect();
    let route: FxHashSet<NodeId> = search
        .best_try()
        .map(|p| p.iter().copied().collect())
        .unwrap_or_default();

    let size = grid.size();
    let (width, height) = (size[0], size[1]);
    let depth = size.get(2).copied().unwrap_or(1);
    let mut out = String::new();

    for z in 0..depth {
        if size.len() == 3 {
            let _ = writeln!(out, "z = {}", z);
        }
        for y in 0..height {
            for x in 0..width {
                let indices = [x, y, z];
                let Ok(id) = grid.index(&indices[..size.len()]) else {
                    continue;
                };
                let c = if Some(id) == grid.start() {
                    'S'
                } else if Some(id) == grid.goal() {
                    'G'
                } else if !grid[id].is_passable() {
                    '#'
                } else if route.contains(&id) {
                    '*'
                } else if Some(id) == search.current() {
                    '@'
                } else if open.contains(&id) {
                    'o'
                } else if search.g_score(id).is_some_and(f64::is_finite) {
                    'x'
                } else {
                    '.'
                };
                out.push(c);
                out.push(' ');
            }
            out.push('\n');
        }
    }
    out
}
