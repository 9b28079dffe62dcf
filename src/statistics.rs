use crate::algorithms::a_star::AStar;
use std::fmt;

/// Summary of one finished (or abandoned) search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    pub steps: usize,
    pub expanded: usize,
    pub solvable: bool,
    /// Moves along the returned path; `None` if the run never finished.
    pub path_hops: Option<usize>,
    /// g-score of the node the returned path ends at.
    pub path_cost: Option<f64>,
    /// Hop count of a shortest route found by an independent search, if computed.
    pub reference_hops: Option<usize>,
}

impl SearchStatistics {
    pub fn from_search(search: &AStar) -> Self {
        let result = search.path().or(search.best_try());
        SearchStatistics {
            steps: search.steps(),
            expanded: search.expanded(),
            solvable: search.is_solvable(),
            path_hops: result.map(|p| p.len().saturating_sub(1)),
            path_cost: result
                .and_then(|p| p.first())
                .and_then(|&id| search.g_score(id)),
            reference_hops: None,
        }
    }

    pub fn with_reference(mut self, hops: Option<usize>) -> Self {
        self.reference_hops = hops;
        self
    }

    /// Hops taken relative to the reference route; 1.0 is optimal.
    pub fn route_efficiency(&self) -> Option<f64> {
        match (self.path_hops, self.reference_hops) {
            (Some(hops), Some(reference)) if reference > 0 => Some(hops as f64 / reference as f64),
            _ => None,
        }
    }
}

impl fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Nodes expanded: {}", self.expanded)?;
        writeln!(f, "Solvable: {}", if self.solvable { "yes" } else { "no" })?;
        match self.path_hops {
            Some(hops) if self.solvable => writeln!(f, "Path length: {} hops", hops)?,
            Some(hops) => writeln!(f, "Best try length: {} hops", hops)?,
            None => writeln!(f, "Path length: not calculated")?,
        }
        if let Some(cost) = self.path_cost {
            writeln!(f, "Path cost: {:.3}", cost)?;
        }
        if let Some(reference) = self.reference_hops {
            writeln!(f, "Reference shortest route: {} hops", reference)?;
        }
        if let Some(efficiency) = self.route_efficiency() {
            writeln!(f, "Route efficiency: {:.3}", efficiency)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::SteppedSearch;
    use crate::grid::{Grid, GridPolicy};

    #[test]
    fn summarises_a_solved_run() {
        let grid = Grid::new(&[3, 3], GridPolicy::orthogonal_2d()).unwrap();
        let mut search = AStar::new(grid);
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        search.calculate_all().unwrap();

        let stats = SearchStatistics::from_search(&search).with_reference(Some(4));
        assert!(stats.solvable);
        assert_eq!(stats.path_hops, Some(4));
        assert_eq!(stats.path_cost, Some(80.0));
        assert_eq!(stats.route_efficiency(), Some(1.0));
        let text = stats.to_string();
        assert!(text.contains("Path length: 4 hops"));
        assert!(text.contains("Route efficiency: 1.000"));
    }

    #[test]
    fn unfinished_run_has_no_path() {
        let grid = Grid::new(&[3, 3], GridPolicy::orthogonal_2d()).unwrap();
        let mut search = AStar::new(grid);
        search.prepare(&[0, 0], &[2, 2]).unwrap();
        search.calculate_step().unwrap();

        let stats = SearchStatistics::from_search(&search);
        assert_eq!(stats.steps, 1);
        assert_eq!(stats.path_hops, None);
        assert_eq!(stats.route_efficiency(), None);
        assert!(stats.to_string().contains("not calculated"));
    }
}
