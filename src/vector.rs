//! Dimension-agnostic vector arithmetic
//!
//! Every operation accepts anything that can present itself as an ordered
//! list of components (`Euclidean`) and normalizes it before doing the math.

use std::borrow::Cow;

use glam::DVec2;

use crate::error::VectorError;
use crate::renderer::{DevicePoint, LogicalPoint};

/// A value that can present itself as an ordered sequence of components
pub trait Euclidean {
    fn euclidean(&self) -> Cow<'_, [f64]>;
}

impl Euclidean for [f64] {
    fn euclidean(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> Euclidean for [f64; N] {
    fn euclidean(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Euclidean for Vec<f64> {
    fn euclidean(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Euclidean for DVec2 {
    fn euclidean(&self) -> Cow<'_, [f64]> {
        Cow::Owned(self.to_array().to_vec())
    }
}

impl Euclidean for LogicalPoint {
    fn euclidean(&self) -> Cow<'_, [f64]> {
        Cow::Owned(vec![self.x, self.y])
    }
}

impl Euclidean for DevicePoint {
    fn euclidean(&self) -> Cow<'_, [f64]> {
        Cow::Owned(vec![self.x, self.y])
    }
}

/// Canonical component list of any vector-like value
pub fn to_sequence<V: Euclidean + ?Sized>(v: &V) -> Vec<f64> {
    v.euclidean().into_owned()
}

/// Element-wise sum, or an error when the dimensions differ
pub fn try_add<A, B>(v1: &A, v2: &B) -> Result<Vec<f64>, VectorError>
where
    A: Euclidean + ?Sized,
    B: Euclidean + ?Sized,
{
    let (a, b) = (v1.euclidean(), v2.euclidean());
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x + y).collect())
}

/// Element-wise sum
///
/// # Panics
/// If the two inputs have different dimensions. That is a caller bug; use
/// [`try_add`] when the lengths are not known up front.
pub fn add<A, B>(v1: &A, v2: &B) -> Vec<f64>
where
    A: Euclidean + ?Sized,
    B: Euclidean + ?Sized,
{
    match try_add(v1, v2) {
        Ok(sum) => sum,
        Err(e) => panic!("{e}"),
    }
}

/// Multiply every component by `a`
pub fn scale<V: Euclidean + ?Sized>(a: f64, v: &V) -> Vec<f64> {
    v.euclidean().iter().map(|x| x * a).collect()
}

/// Sum of element-wise products. Lengths are not checked.
pub fn dot<A, B>(v1: &A, v2: &B) -> f64
where
    A: Euclidean + ?Sized,
    B: Euclidean + ?Sized,
{
    v1.euclidean()
        .iter()
        .zip(v2.euclidean().iter())
        .map(|(x, y)| x * y)
        .sum()
}

/// Euclidean length
pub fn magnitude<V: Euclidean + ?Sized>(v: &V) -> f64 {
    let v = v.euclidean();
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// `v` divided by its length
///
/// A zero vector divides by zero and comes back as NaN components.
pub fn unit<V: Euclidean + ?Sized>(v: &V) -> Vec<f64> {
    let size = magnitude(v);
    v.euclidean().iter().map(|x| x / size).collect()
}

/// First two components as a `DVec2` (missing components read as zero)
pub fn to_dvec2<V: Euclidean + ?Sized>(v: &V) -> DVec2 {
    let v = v.euclidean();
    DVec2::new(
        v.first().copied().unwrap_or(0.0),
        v.get(1).copied().unwrap_or(0.0),
    )
}
