use thiserror::Error;

/// Convenient result alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller passed something the operation can't work with.
    InvalidArgument,
    /// A search was driven before `prepare` succeeded.
    NotPrepared,
    /// Indices pointed outside the grid.
    IndexOutOfRange,
}

/// Top-level library error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Raised when an A* engine is built without a grid to search.
    #[error("the A* engine needs a grid to operate on")]
    MissingGrid,

    /// Raised when a distance is requested for a point with no coordinates.
    #[error("points can't be of 0 dimensions")]
    EmptyPoint,

    /// Raised when two vectors (or an index array and a grid) disagree on dimensionality.
    #[error("expected {expected} dimensions, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Raised when grid extents are zero, of the wrong count, or too large to address.
    #[error("invalid grid size {size:?}")]
    InvalidSize { size: Vec<usize> },

    /// Raised when a coordinate converter can't map positions back to indices.
    #[error("invalid node separation {separation}")]
    InvalidConverter { separation: f64 },

    /// Raised when stepping a search (or asking for a heuristic) with no goal bound.
    #[error("search has not been prepared; call prepare() first")]
    NotPrepared,

    /// Raised when dimensional indices fall outside the grid.
    #[error("index {index:?} is out of range for grid of size {size:?}")]
    IndexOutOfRange { index: Vec<isize>, size: Vec<usize> },

    /// Raised when a flat node index falls outside the node array.
    #[error("node index {index} is out of range for {len} nodes")]
    FlatIndexOutOfRange { index: usize, len: usize },
}

impl Error {
    /// Which family of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingGrid
            | Error::EmptyPoint
            | Error::DimensionMismatch { .. }
            | Error::InvalidSize { .. }
            | Error::InvalidConverter { .. } => ErrorKind::InvalidArgument,
            Error::NotPrepared => ErrorKind::NotPrepared,
            Error::IndexOutOfRange { .. } | Error::FlatIndexOutOfRange { .. } => {
                ErrorKind::IndexOutOfRange
            }
        }
    }
}
