use crate::error::{Error, Result};

/// Distance metric used by a grid for both edge costs and its heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Manhattan,
    Euclidean,
}

impl Metric {
    /// Distance between two points known to share dimensionality.
    pub(crate) fn between(self, p: &[f64], q: &[f64]) -> f64 {
        match self {
            Metric::Manhattan => manhattan_unchecked(p, q),
            Metric::Euclidean => euclidean_unchecked(p, q),
        }
    }

    /// Checked variant of the metric, see [`euclidean`] and [`manhattan`].
    pub fn distance(self, p: &[f64], q: &[f64]) -> Result<f64> {
        check_points(p, q)?;
        Ok(self.between(p, q))
    }
}

fn check_points(p: &[f64], q: &[f64]) -> Result<()> {
    if p.is_empty() || q.is_empty() {
        return Err(Error::EmptyPoint);
    }
    if p.len() != q.len() {
        return Err(Error::DimensionMismatch {
            expected: p.len(),
            found: q.len(),
        });
    }
    Ok(())
}

/// Euclidean (L2) distance from `p` to `q`.
///
/// Fails if either point has no coordinates or the two differ in length.
pub fn euclidean(p: &[f64], q: &[f64]) -> Result<f64> {
    check_points(p, q)?;
    Ok(euclidean_unchecked(p, q))
}

/// Manhattan (L1) distance from `p` to `q`.
///
/// Fails under the same conditions as [`euclidean`].
pub fn manhattan(p: &[f64], q: &[f64]) -> Result<f64> {
    check_points(p, q)?;
    Ok(manhattan_unchecked(p, q))
}

#[inline]
fn euclidean_unchecked(p: &[f64], q: &[f64]) -> f64 {
    p.iter()
        .zip(q)
        .map(|(a, b)| (b - a) * (b - a))
        .sum::<f64>()
        .sqrt()
}

#[inline]
fn manhattan_unchecked(p: &[f64], q: &[f64]) -> f64 {
    p.iter().zip(q).map(|(a, b)| (a - b).abs()).sum()
}
