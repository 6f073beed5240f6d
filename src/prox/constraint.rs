//! Projections onto constraint sets
//!
//! The prox of a set indicator is the Euclidean projection onto the
//! set, so the step size only matters through the composition
//! parameters. Box, nonnegativity, and nonpositivity act per entry;
//! the second-order cone and the PSD cone act jointly.

use ndarray::prelude::*;
use ndarray::NdFloat;
use ndarray_linalg::{Eigh, Lapack, Scalar, UPLO};

use super::matrix::{require_symmetric, DEFAULT_SYMMETRY_TOL};
use crate::compose::{prox_compose, Compose};
use crate::errors::{ProxError, ProxResult};

/// Projection onto the box `[lo, hi]`, elementwise. Either bound may be
/// infinite; `lo > hi` is rejected as an empty set.
pub fn prox_box_constr<S, D>(
    v: ArrayView<S, D>,
    lo: S,
    hi: S,
    params: &Compose<S, D>,
) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    if lo > hi {
        return Err(ProxError::EmptyInterval);
    }
    prox_compose(|w, _t| Ok(w.mapv_into(|wi| wi.max(lo).min(hi))), v, params)
}

/// Projection onto the nonnegative orthant.
pub fn prox_nonneg_constr<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, _t| Ok(w.mapv_into(|wi| wi.max(S::zero()))), v, params)
}

/// Projection onto the nonpositive orthant.
pub fn prox_nonpos_constr<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, _t| Ok(w.mapv_into(|wi| wi.min(S::zero()))), v, params)
}

/// Projection onto the second-order cone
/// `{(x, s) : ||x||_2 <= s}`, with `s` stored as the last entry.
pub fn prox_soc<S>(v: ArrayView1<S>, params: &Compose<S, Ix1>) -> ProxResult<Array1<S>>
where
    S: NdFloat,
{
    prox_compose(
        |mut w, _t| {
            let n = w.len();
            let tau = w[n - 1];
            let nx = w
                .slice(s![..n - 1])
                .fold(S::zero(), |acc, &x| acc + x * x)
                .sqrt();
            if nx <= tau {
                Ok(w)
            } else if nx <= -tau {
                Ok(Array::zeros(n))
            } else {
                let two = S::from(2.).unwrap();
                let alpha = (nx + tau) / two;
                let ratio = alpha / nx;
                w.slice_mut(s![..n - 1]).map_inplace(|x| *x = *x * ratio);
                w[n - 1] = alpha;
                Ok(w)
            }
        },
        v,
        params,
    )
}

/// Projection onto the positive-semidefinite cone: eigendecompose and
/// clamp negative eigenvalues at zero. The input must be symmetric
/// within [`DEFAULT_SYMMETRY_TOL`], matching the log-determinant
/// operator's precondition contract.
pub fn prox_psd_cone<S>(v: ArrayView2<S>, params: &Compose<S, Ix2>) -> ProxResult<Array2<S>>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    prox_compose(
        |w, _t| {
            require_symmetric(&w.view(), S::from(DEFAULT_SYMMETRY_TOL).unwrap())?;
            let half = S::from(0.5).unwrap();
            let w_symm = (&w + &w.t()) * half;
            let (s, u) = w_symm.eigh(UPLO::Lower)?;
            let s_new = s.mapv(|si| si.max(S::zero()));
            Ok((&u * &s_new).dot(&u.t()))
        },
        v,
        params,
    )
}
