//! Spectral operators: closed forms on eigenvalues and singular values
//!
//! These are the operators where per-entry evaluation is wrong: the
//! closed form acts on the spectrum of the matrix, so each call pays
//! for one factorization, applies a scalar map to the decomposition's
//! values, and reassembles with the original bases. Decompositions are
//! strictly call-scoped; nothing is cached between invocations.

use ndarray::prelude::*;
use ndarray::NdFloat;
use ndarray_linalg::{Eigh, Lapack, Scalar, SVD, UPLO};

use super::scalar;
use crate::compose::{prox_compose, Compose, Term};
use crate::errors::{ProxError, ProxResult};
use crate::projection::proj_simplex;

/// Default absolute tolerance for the symmetry precondition of
/// [`prox_neg_log_det`] and [`prox_psd_cone`](super::prox_psd_cone).
pub const DEFAULT_SYMMETRY_TOL: f64 = 1e-8;

/// Fail unless `b` is square and equal to its transpose within `tol`,
/// measured as the largest absolute entry of `B - B^T`.
///
/// The check runs on the raw input, before any symmetrization, so a
/// genuinely asymmetric matrix produced by an upstream bug is reported
/// instead of being silently averaged away.
pub(crate) fn require_symmetric<S: NdFloat>(b: &ArrayView2<S>, tol: S) -> ProxResult<()> {
    let (rows, cols) = b.dim();
    if rows != cols {
        return Err(ProxError::NotSquare { rows, cols });
    }
    let mut worst = S::zero();
    for ((i, j), &x) in b.indexed_iter() {
        let d = (x - b[[j, i]]).abs();
        if d > worst {
            worst = d;
        }
    }
    if worst > tol {
        Err(ProxError::NotSymmetric)
    } else {
        Ok(())
    }
}

/// Prox of the negative log-determinant `f(X) = -ln det X` over
/// symmetric matrices, using [`DEFAULT_SYMMETRY_TOL`] for the symmetry
/// precondition.
pub fn prox_neg_log_det<S>(b: ArrayView2<S>, params: &Compose<S, Ix2>) -> ProxResult<Array2<S>>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    prox_neg_log_det_tol(b, S::from(DEFAULT_SYMMETRY_TOL).unwrap(), params)
}

/// Prox of the negative log-determinant with a caller-chosen symmetry
/// tolerance.
///
/// Algorithm
/// ---------
/// Symmetrize as $`(B + B^T)/2`$ for numerical robustness (after the
/// precondition check on the raw input), eigendecompose, and map each
/// eigenvalue through the scalar closed form of
/// [`scalar::neg_log`](super::scalar::neg_log):
/// ```math
/// s' = \begin{cases}
/// (s + \sqrt{s^2 + 4t})/2 & s \geq 0 \\
/// 2t / (\sqrt{s^2 + 4t} - s) & s < 0
/// \end{cases}
/// ```
/// then reassemble $`X = U \mathrm{diag}(s') U^T`$. Both branches are
/// algebraically identical; the second avoids cancellation for
/// large-negative eigenvalues. Every reconstructed eigenvalue is
/// strictly positive, so the result is always positive definite.
pub fn prox_neg_log_det_tol<S>(
    b: ArrayView2<S>,
    symm_tol: S,
    params: &Compose<S, Ix2>,
) -> ProxResult<Array2<S>>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    prox_compose(
        |w, t| {
            require_symmetric(&w.view(), symm_tol)?;
            let half = S::from(0.5).unwrap();
            let w_symm = (&w + &w.t()) * half;
            let (s, u) = w_symm.eigh(UPLO::Lower)?;
            let s_new = s.mapv(|si| scalar::neg_log(si, t));
            Ok((&u * &s_new).dot(&u.t()))
        },
        b,
        params,
    )
}

/// Prox of the operator norm `f(B) = sigma_max(B)`: project the
/// singular values, scaled by `1/t`, onto the probability simplex and
/// rescale. Rectangular inputs are fine; only the `min(m, n)` leading
/// singular vectors take part in the reconstruction.
// TODO: switch to svddc(UVTFlag::Some) to avoid materializing the full
// U and V^T for very rectangular inputs.
pub fn prox_sigma_max<S>(b: ArrayView2<S>, params: &Compose<S, Ix2>) -> ProxResult<Array2<S>>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    prox_compose(
        |w, t| {
            let (u, s, vt) = w.svd(true, true)?;
            // both factors were requested above
            let (u, vt) = (u.unwrap(), vt.unwrap());
            let k = s.len();
            let scaled = s.mapv(|si| si / t);
            let s_new = proj_simplex(scaled.view(), S::one()).mapv(|si| si * t);
            Ok((&u.slice(s![.., ..k]) * &s_new).dot(&vt.slice(s![..k, ..])))
        },
        b,
        params,
    )
}

/// Prox of the trace `f(B) = tr(C^T B)`.
///
/// With `c = None` the coefficient defaults to the identity and the
/// kernel is the exact diagonal shift `B - t I` (square input
/// required). A general same-shape `C` makes `t f(scale * B - offset)`
/// purely linear in `B`, so it never reaches a kernel at all:
/// `t * scale * C` is folded into the engine's linear term and the base
/// function degenerates to a constant. Either way the remaining
/// composition parameters apply exactly.
pub fn prox_trace<S>(
    b: ArrayView2<S>,
    c: Option<ArrayView2<S>>,
    params: &Compose<S, Ix2>,
) -> ProxResult<Array2<S>>
where
    S: NdFloat,
{
    match c {
        None => prox_compose(
            |mut w, t| {
                let (rows, cols) = w.dim();
                if rows != cols {
                    return Err(ProxError::NotSquare { rows, cols });
                }
                w.diag_mut().map_inplace(|d| *d = *d - t);
                Ok(w)
            },
            b,
            params,
        ),
        Some(c) => {
            params.validate(b.shape())?;
            if c.shape() != b.shape() {
                return Err(ProxError::ShapeMismatch {
                    expected: b.shape().to_vec(),
                    found: c.shape().to_vec(),
                });
            }
            let mut lin = match &params.lin_term {
                Term::Uniform(u) => Array::from_elem(b.raw_dim(), *u),
                Term::Full(a) => a.clone(),
            };
            lin.scaled_add(params.t * params.scale, &c);
            let folded = Compose {
                lin_term: lin.into(),
                ..params.clone()
            };
            prox_compose(|w, _t| Ok(w), b, &folded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;

    fn random_spd(n: usize) -> Array2<f64> {
        let q: Array2<f64> = Array::random((n, n), Normal::new(0., 1.).unwrap());
        let mut b = q.t().dot(&q);
        b.diag_mut().map_inplace(|d| *d += 1.0);
        b
    }

    fn random_symm(n: usize) -> Array2<f64> {
        let a: Array2<f64> = Array::random((n, n), Normal::new(0., 1.).unwrap());
        (&a + &a.t()) * 0.5
    }

    #[test]
    fn neg_log_det_output_is_positive_definite() {
        // Indefinite symmetric input: the output spectrum must still be
        // strictly positive.
        let b = random_symm(8);
        let x = prox_neg_log_det(b.view(), &Compose::step(0.3)).unwrap();
        let (evals, _) = x.eigh(UPLO::Lower).unwrap();
        assert!(evals.iter().all(|&e| e > 0.0));
    }

    #[test]
    fn neg_log_det_preserves_symmetry() {
        let b = random_symm(6);
        let x = prox_neg_log_det(b.view(), &Compose::step(1.2)).unwrap();
        assert_abs_diff_eq!(x, x.t().to_owned(), epsilon = 1e-10);
    }

    #[test]
    fn neg_log_det_rejects_asymmetric_input() {
        let mut b = random_symm(4);
        b[[0, 3]] += 0.5;
        assert_eq!(
            prox_neg_log_det(b.view(), &Compose::default()),
            Err(ProxError::NotSymmetric)
        );
    }

    #[test]
    fn neg_log_det_rejects_rectangular_input() {
        let b = Array2::<f64>::zeros((3, 4));
        assert_eq!(
            prox_neg_log_det(b.view(), &Compose::default()),
            Err(ProxError::NotSquare { rows: 3, cols: 4 })
        );
    }

    #[test]
    fn neg_log_det_tolerance_is_explicit() {
        let mut b = random_symm(4);
        b[[1, 2]] += 1e-6;
        // strict tolerance rejects, loose tolerance accepts
        assert_eq!(
            prox_neg_log_det_tol(b.view(), 1e-9, &Compose::default()),
            Err(ProxError::NotSymmetric)
        );
        assert!(prox_neg_log_det_tol(b.view(), 1e-4, &Compose::default()).is_ok());
    }

    #[test]
    fn neg_log_det_fixed_point_equation() {
        // The minimizer satisfies X - t X^{-1} = B, i.e. X^2 - BX = tI,
        // since X and the symmetrized B share an eigenbasis.
        let t = 0.3;
        let b = random_spd(10);
        let x = prox_neg_log_det(b.view(), &Compose::step(t)).unwrap();
        let residual = x.dot(&x) - b.dot(&x);
        let mut eye = Array2::<f64>::zeros((10, 10));
        eye.diag_mut().map_inplace(|d| *d = t);
        assert_abs_diff_eq!(residual, eye, epsilon = 1e-8);
    }

    #[test]
    fn neg_log_det_near_singular_spectrum() {
        // Eigenvalues straddling zero exercise both branch formulas on
        // the same call.
        let b = array![[1e-10, 0.0], [0.0, -1e-10]];
        let t = 0.5;
        let x = prox_neg_log_det(b.view(), &Compose::step(t)).unwrap();
        let (evals, _) = x.eigh(UPLO::Lower).unwrap();
        for &e in evals.iter() {
            assert!(e > 0.0);
            assert_abs_diff_eq!(e, t.sqrt(), epsilon = 1e-6);
        }
    }

    #[test]
    fn sigma_max_identity_scenario() {
        // All five singular values of I are 1; projecting [1/2; ...]
        // onto the simplex spreads the mass evenly, so the result is
        // exactly 0.4 * I.
        let b = Array2::<f64>::eye(5);
        let x = prox_sigma_max(b.view(), &Compose::step(2.0)).unwrap();
        let mut expect = Array2::<f64>::zeros((5, 5));
        expect.diag_mut().map_inplace(|d| *d = 0.4);
        assert_abs_diff_eq!(x, expect, epsilon = 1e-10);
        let s = x.svd(false, false).unwrap().1;
        assert!(s[0] <= 1.0);
    }

    #[test]
    fn sigma_max_never_grows_the_norm() {
        let b: Array2<f64> = Array::random((7, 4), Normal::new(0., 2.).unwrap());
        // stay in the regime sum(s) >= t, where the simplex projection
        // can only lower the top singular value
        for &t in &[0.1, 1.0, 5.0] {
            let x = prox_sigma_max(b.view(), &Compose::step(t)).unwrap();
            let s_in = b.svd(false, false).unwrap().1;
            let s_out = x.svd(false, false).unwrap().1;
            assert!(s_out[0] <= s_in[0] + 1e-10);
        }
    }

    #[test]
    fn trace_is_an_exact_diagonal_shift() {
        let b = array![[5.0]];
        let x = prox_trace(b.view(), None, &Compose::default()).unwrap();
        assert_eq!(x, array![[4.0]]);

        let b = array![[1.0, 2.0], [3.0, 4.0]];
        let x = prox_trace(b.view(), None, &Compose::step(0.25)).unwrap();
        assert_eq!(x, array![[0.75, 2.0], [3.0, 3.75]]);
    }

    #[test]
    fn trace_rejects_rectangular_without_coefficient() {
        let b = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            prox_trace(b.view(), None, &Compose::default()),
            Err(ProxError::NotSquare { rows: 2, cols: 3 })
        );
    }

    #[test]
    fn trace_with_coefficient_composes_exactly() {
        // Linear objective: the fully composed minimizer has the exact
        // closed form x = (v - lin - t*scale*C) / (2*quad + 1).
        let b: Array2<f64> = Array::random((3, 4), Normal::new(0., 1.).unwrap());
        let c: Array2<f64> = Array::random((3, 4), Normal::new(0., 1.).unwrap());
        let (t, scale, lin, quad) = (0.7, -2.0, 0.4, 1.5);
        let params = Compose {
            t,
            scale,
            lin_term: lin.into(),
            quad_term: quad,
            ..Compose::default()
        };
        let x = prox_trace(b.view(), Some(c.view()), &params).unwrap();
        let expect = (&b - lin - &(&c * (t * scale))) / (2. * quad + 1.);
        assert_abs_diff_eq!(x, expect, epsilon = 1e-12);
    }

    #[test]
    fn trace_coefficient_shape_is_checked() {
        let b = Array2::<f64>::zeros((2, 2));
        let c = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            prox_trace(b.view(), Some(c.view()), &Compose::default()),
            Err(ProxError::ShapeMismatch {
                expected: vec![2, 2],
                found: vec![2, 3],
            })
        );
    }
}
