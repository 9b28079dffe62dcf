use crate::error::{Error, Result};

/// Maps dimensional grid indices to spatial coordinates and back.
///
/// Each coordinate is `index * separation + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converter {
    separation: f64,
    offset: f64,
}

impl Default for Converter {
    fn default() -> Self {
        Converter {
            separation: 20.0,
            offset: 20.0,
        }
    }
}

impl Converter {
    /// Creates a converter with the given node separation and placement offset.
    pub fn new(separation: f64, offset: f64) -> Result<Self> {
        if separation == 0.0 || !separation.is_finite() || !offset.is_finite() {
            return Err(Error::InvalidConverter { separation });
        }
        Ok(Converter { separation, offset })
    }

    /// Converter whose separation and offset are both `value`.
    pub fn uniform(value: f64) -> Result<Self> {
        Self::new(value, value)
    }

    pub fn separation(&self) -> f64 {
        self.separation
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Spatial coordinates of the cell at `indices`.
    pub fn to_position(&self, indices: &[usize]) -> Vec<f64> {
        indices
            .iter()
            .map(|&i| i as f64 * self.separation + self.offset)
            .collect()
    }

    /// Dimensional indices of the cell containing `position`.
    ///
    /// Values are truncated toward zero, so positions left of the offset
    /// may come back negative; bounds are the grid's business.
    pub fn to_indices(&self, position: &[f64]) -> Vec<isize> {
        position
            .iter()
            .map(|&p| ((p - self.offset) / self.separation) as isize)
            .collect()
    }
}
