//! Norms and support functions
//!
//! The l1 norm is separable and reuses the scalar soft threshold; the
//! l2/Frobenius norm shrinks the whole operand as a single block. The
//! max function and the l-infinity norm are support functions of the
//! simplex and the l1 ball, so their proxes follow from the Moreau
//! identity
//! ```math
//! \mathrm{prox}_{tf}(v) = v - t \, \Pi_{\partial f^*}(v / t)
//! ```
//! with the projection supplied by [`crate::projection`]. The nuclear
//! norm is the spectral counterpart of the l1 norm: a soft threshold on
//! singular values.

use ndarray::prelude::*;
use ndarray::NdFloat;
use ndarray_linalg::{Lapack, Scalar, SVD};

use super::scalar;
use crate::compose::{prox_compose, Compose};
use crate::errors::ProxResult;
use crate::projection::simplex_threshold;

/// Prox of the l1 norm `f(x) = ||x||_1`: the elementwise soft threshold.
pub fn prox_norm1<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::abs(wi, t))), v, params)
}

/// Prox of the l2 (Frobenius) norm of the whole operand: block soft
/// threshold. Operands with norm below `t` collapse to zero.
pub fn prox_norm2<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(
        |w, t| {
            let n2 = w.fold(S::zero(), |acc, &x| acc + x * x).sqrt();
            if n2 <= t {
                return Ok(Array::zeros(w.raw_dim()));
            }
            let shrink = S::one() - t / n2;
            Ok(w * shrink)
        },
        v,
        params,
    )
}

/// Prox of the l-infinity norm over all entries, via the Moreau
/// identity with the l1-ball projection.
pub fn prox_norm_inf<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(
        |w, t| {
            let l1 = w.fold(S::zero(), |acc, &x| acc + (x / t).abs());
            if l1 <= S::one() {
                // v/t inside the ball: the minimizer is exactly zero
                return Ok(Array::zeros(w.raw_dim()));
            }
            let theta = simplex_threshold(w.iter().map(|&x| (x / t).abs()).collect(), S::one());
            Ok(w.mapv_into(|wi| {
                let zi = wi / t;
                wi - t * zi.signum() * (zi.abs() - theta).max(S::zero())
            }))
        },
        v,
        params,
    )
}

/// Prox of the max function over all entries, via the Moreau identity
/// with the simplex projection.
pub fn prox_max<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(
        |w, t| {
            let theta = simplex_threshold(w.iter().map(|&x| x / t).collect(), S::one());
            Ok(w.mapv_into(|wi| wi - t * (wi / t - theta).max(S::zero())))
        },
        v,
        params,
    )
}

/// Prox of the group lasso `f(B) = sum_j ||B_{:,j}||_2`: the block soft
/// threshold applied to each column independently.
pub fn prox_group_lasso<S>(v: ArrayView2<S>, params: &Compose<S, Ix2>) -> ProxResult<Array2<S>>
where
    S: NdFloat,
{
    prox_compose(
        |mut w, t| {
            for mut col in w.axis_iter_mut(Axis(1)) {
                let n2 = col.fold(S::zero(), |acc, &x| acc + x * x).sqrt();
                if n2 <= t {
                    col.fill(S::zero());
                } else {
                    let shrink = S::one() - t / n2;
                    col.map_inplace(|x| *x = *x * shrink);
                }
            }
            Ok(w)
        },
        v,
        params,
    )
}

/// Prox of the nuclear norm `f(B) = sum_k sigma_k(B)`: a soft threshold
/// on the singular values, reassembled with the original singular
/// vectors.
pub fn prox_norm_nuc<S>(v: ArrayView2<S>, params: &Compose<S, Ix2>) -> ProxResult<Array2<S>>
where
    S: NdFloat + Scalar<Real = S> + Lapack,
{
    prox_compose(
        |w, t| {
            let (u, s, vt) = w.svd(true, true)?;
            // both factors were requested above
            let (u, vt) = (u.unwrap(), vt.unwrap());
            let k = s.len();
            let s_new = s.mapv(|si| (si - t).max(S::zero()));
            Ok((&u.slice(s![.., ..k]) * &s_new).dot(&vt.slice(s![..k, ..])))
        },
        v,
        params,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray_rand::rand_distr::Normal;
    use ndarray_rand::RandomExt;

    #[test]
    fn norm1_is_the_soft_threshold() {
        let v = array![3.0, -0.5, -4.0];
        let x = prox_norm1(v.view(), &Compose::step(1.0)).unwrap();
        assert_abs_diff_eq!(x, array![2.0, 0.0, -3.0], epsilon = 1e-15);
    }

    #[test]
    fn norm2_shrinks_radially() {
        let v = array![3.0, 4.0];
        let x = prox_norm2(v.view(), &Compose::step(1.0)).unwrap();
        // ||v|| = 5, shrink factor 4/5
        assert_abs_diff_eq!(x, array![2.4, 3.2], epsilon = 1e-12);
        // inside the threshold everything collapses
        let x = prox_norm2(v.view(), &Compose::step(6.0)).unwrap();
        assert_abs_diff_eq!(x, array![0.0, 0.0], epsilon = 1e-15);
    }

    #[test]
    fn norm2_direction_is_preserved() {
        let v: Array1<f64> = Array::random(20, Normal::new(0., 1.).unwrap());
        let x = prox_norm2(v.view(), &Compose::step(0.3)).unwrap();
        let vn = v.fold(0.0, |a, &e| a + e * e).sqrt();
        let xn = x.fold(0.0, |a, &e| a + e * e).sqrt();
        assert_abs_diff_eq!(xn, (vn - 0.3).max(0.0), epsilon = 1e-10);
        if xn > 0.0 {
            assert_abs_diff_eq!(&x / xn, &v / vn, epsilon = 1e-10);
        }
    }

    #[test]
    fn max_optimality_conditions() {
        // minimizer x of t*max(x) + 0.5||x - v||^2: the shifted entries
        // tie at the max, the others are untouched, and the total shift
        // equals t.
        let v = array![4.0, 1.0, 3.9, -2.0];
        let t = 1.0;
        let x = prox_max(v.view(), &Compose::step(t)).unwrap();
        let m = x.fold(f64::NEG_INFINITY, |a, &e| a.max(e));
        assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[3], -2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[0], m, epsilon = 1e-9);
        assert_abs_diff_eq!(x[2], m, epsilon = 1e-9);
        assert_abs_diff_eq!(v.sum() - x.sum(), t, epsilon = 1e-9);
    }

    #[test]
    fn norm_inf_optimality_conditions() {
        let v = array![4.0, -3.9, 1.0];
        let t = 1.0;
        let x = prox_norm_inf(v.view(), &Compose::step(t)).unwrap();
        // the large entries are pulled to a common absolute level
        assert_abs_diff_eq!(x[0], -x[1], epsilon = 1e-9);
        assert_abs_diff_eq!(x[2], 1.0, epsilon = 1e-9);
        // total l1 shift equals t
        let shift: f64 = v.iter().zip(x.iter()).map(|(a, b)| (a - b).abs()).sum();
        assert_abs_diff_eq!(shift, t, epsilon = 1e-9);
    }

    #[test]
    fn norm_inf_small_inputs_collapse() {
        let v = array![0.2, -0.1];
        let x = prox_norm_inf(v.view(), &Compose::step(1.0)).unwrap();
        assert_abs_diff_eq!(x, array![0.0, 0.0], epsilon = 1e-15);
    }

    #[test]
    fn group_lasso_acts_per_column() {
        let v = array![[3.0, 0.1], [4.0, 0.2]];
        let x = prox_group_lasso(v.view(), &Compose::step(1.0)).unwrap();
        // first column has norm 5: shrink by 4/5; second is inside
        assert_abs_diff_eq!(x, array![[2.4, 0.0], [3.2, 0.0]], epsilon = 1e-12);
    }

    #[test]
    fn norm_nuc_soft_thresholds_singular_values() {
        let b: Array2<f64> = Array::random((6, 4), Normal::new(0., 1.).unwrap());
        let t = 0.8;
        let x = prox_norm_nuc(b.view(), &Compose::step(t)).unwrap();
        let s_in = b.svd(false, false).unwrap().1;
        let s_out = x.svd(false, false).unwrap().1;
        for (si, so) in s_in.iter().zip(s_out.iter()) {
            assert_abs_diff_eq!(*so, (si - t).max(0.0), epsilon = 1e-8);
        }
    }
}
