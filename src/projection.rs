//! Euclidean projections used as primitives by the catalog
//!
//! The simplex projection is the workhorse: the operator-norm prox
//! applies it to singular values, and `prox_max`/`prox_norm_inf` reach
//! it through the Moreau identity. Both projections here are
//! deterministic, shape-preserving pure functions.

use ndarray::prelude::*;
use ndarray::NdFloat;

/// Threshold `theta` such that `sum_i max(x_i - theta, 0) = r`.
///
/// Sort-and-scan rule: with entries sorted descending, `theta` is fixed
/// by the longest prefix whose entries stay above it. Exposed
/// crate-internally so operators working on matrix operands can apply
/// the thresholding elementwise without materializing a flattened copy.
pub(crate) fn simplex_threshold<S: NdFloat>(mut vals: Vec<S>, r: S) -> S {
    debug_assert!(r > S::zero());
    vals.sort_unstable_by(|a, b| b.partial_cmp(a).unwrap());
    let mut cumsum = S::zero();
    let mut theta = S::zero();
    for (j, &u) in vals.iter().enumerate() {
        cumsum = cumsum + u;
        let candidate = (cumsum - r) / S::from(j + 1).unwrap();
        if u > candidate {
            theta = candidate;
        }
    }
    theta
}

/// Euclidean projection onto the simplex `{x >= 0, sum(x) = r}`.
pub fn proj_simplex<S: NdFloat>(x: ArrayView1<S>, r: S) -> Array1<S> {
    let theta = simplex_threshold(x.iter().cloned().collect(), r);
    x.mapv(|xi| (xi - theta).max(S::zero()))
}

/// Euclidean projection onto the l1 ball `{x : ||x||_1 <= r}`.
///
/// Points inside the ball are fixed; outside, the projection reduces to
/// a simplex projection of the absolute values with the signs restored.
pub fn proj_l1_ball<S: NdFloat>(x: ArrayView1<S>, r: S) -> Array1<S> {
    let l1 = x.fold(S::zero(), |acc, &xi| acc + xi.abs());
    if l1 <= r {
        return x.to_owned();
    }
    let theta = simplex_threshold(x.iter().map(|xi| xi.abs()).collect(), r);
    x.mapv(|xi| xi.signum() * (xi.abs() - theta).max(S::zero()))
}
