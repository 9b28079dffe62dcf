use crate::grid::{Dimensionality, GridPolicy};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Step through an A* search on a 2D or 3D grid", long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub width: usize,

    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Third extent; giving it switches to a 3D grid.
    #[arg(long)]
    pub depth: Option<usize>,

    /// Allow diagonal moves.
    #[arg(long, default_value_t = false)]
    pub diagonals: bool,

    #[arg(long, default_value_t = 50)]
    pub num_walls: usize,

    /// Seed for wall and endpoint placement.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start cell as comma separated indices, e.g. `0,3`.
    #[arg(long, value_delimiter = ',')]
    pub start: Option<Vec<usize>>,

    /// Goal cell as comma separated indices.
    #[arg(long, value_delimiter = ',')]
    pub goal: Option<Vec<usize>>,

    #[arg(long, default_value_t = 20.0)]
    pub separation: f64,

    #[arg(long, default_value_t = 20.0)]
    pub offset: f64,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Config {
    pub fn policy(&self) -> GridPolicy {
        let dimensionality = match self.depth {
            Some(_) => Dimensionality::Three,
            None => Dimensionality::Two,
        };
        GridPolicy::new(dimensionality, self.diagonals)
    }

    pub fn size(&self) -> Vec<usize> {
        let mut size = vec![self.width, self.height];
        size.extend(self.depth);
        size
    }
}
