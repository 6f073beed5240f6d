//! Quadratic operators: proxes that reduce to a linear solve
//!
//! Adding a quadratic to the proximity term keeps the problem
//! quadratic, so the minimizer is the solution of a square
//! positive-definite linear system. Both operators here build the
//! system once per call and hand it to the dense LU solver.

use ndarray::prelude::*;
use ndarray::NdFloat;
use ndarray_linalg::{Eigh, Lapack, Scalar, Solve, UPLO};

use super::matrix::{require_symmetric, DEFAULT_SYMMETRY_TOL};
use crate::compose::{prox_compose, Compose};
use crate::errors::{ProxError, ProxResult};

/// Prox of the quadratic form `f(x) = x^T Q x` for symmetric positive
/// semidefinite `Q`: solves `(2t Q + I) x = v`.
pub fn prox_quad_form<S>(
    v: ArrayView1<S>,
    q: ArrayView2<S>,
    params: &Compose<S, Ix1>,
) -> ProxResult<Array1<S>>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    prox_compose(
        |w, t| {
            let tol = S::from(DEFAULT_SYMMETRY_TOL).unwrap();
            require_symmetric(&q, tol)?;
            let n = q.dim().0;
            if w.len() != n {
                return Err(ProxError::ShapeMismatch {
                    expected: vec![n],
                    found: vec![w.len()],
                });
            }
            let (evals, _) = q.eigh(UPLO::Lower)?;
            if evals.iter().any(|&e| e < -tol) {
                return Err(ProxError::NotPositiveSemidefinite);
            }
            let two = S::from(2.).unwrap();
            let mut a = q.to_owned() * (two * t);
            a.diag_mut().map_inplace(|d| *d = *d + S::one());
            Ok(a.solve_into(w)?)
        },
        v,
        params,
    )
}

/// Prox of the affine least-squares penalty `f(x) = ||F x - g||_2^2`,
/// via the normal equations `(2t F^T F + I) x = 2t F^T g + v`.
pub fn prox_sum_squares_affine<S>(
    v: ArrayView1<S>,
    f: ArrayView2<S>,
    g: ArrayView1<S>,
    params: &Compose<S, Ix1>,
) -> ProxResult<Array1<S>>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    prox_compose(
        |w, t| {
            let (m, n) = f.dim();
            if g.len() != m {
                return Err(ProxError::ShapeMismatch {
                    expected: vec![m],
                    found: vec![g.len()],
                });
            }
            if w.len() != n {
                return Err(ProxError::ShapeMismatch {
                    expected: vec![n],
                    found: vec![w.len()],
                });
            }
            let two = S::from(2.).unwrap();
            let mut a = f.t().dot(&f) * (two * t);
            a.diag_mut().map_inplace(|d| *d = *d + S::one());
            let rhs = f.t().dot(&g) * (two * t) + &w;
            Ok(a.solve_into(rhs)?)
        },
        v,
        params,
    )
}
