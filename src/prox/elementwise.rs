//! Elementwise operators: separable functions applied per coordinate
//!
//! Every operator here is the prox of a sum of identical scalar terms,
//! so evaluating it on a vector or matrix is exactly the scalar closed
//! form of [`super::scalar`] applied independently to each entry. The
//! entry points are thin adapters: they route the operand through the
//! composition engine and map the kernel over the adjusted array, for
//! any dimension `D`.

use ndarray::prelude::*;
use ndarray::{NdFloat, Zip};

use super::scalar;
use crate::compose::{prox_compose, Compose};
use crate::errors::{ProxError, ProxResult};

/// Prox of `f(x) = sum_i |x_i|`.
pub fn prox_abs<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::abs(wi, t))), v, params)
}

/// Prox of the zero function; reduces to the identity map at `t` and
/// to a pure affine adjustment under composition.
pub fn prox_constant<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::constant(wi, t))), v, params)
}

/// Prox of `f(x) = sum_i e^{x_i}`.
pub fn prox_exp<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::exp(wi, t))), v, params)
}

/// Prox of the Huber penalty with threshold `m`, summed over entries.
pub fn prox_huber<S, D>(v: ArrayView<S, D>, m: S, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::huber(wi, t, m))), v, params)
}

/// Prox of `f(x) = sum_i x_i`.
pub fn prox_identity<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::identity(wi, t))), v, params)
}

/// Prox of the logistic loss `f(x) = sum_i ln(1 + e^{-y_i x_i})`.
///
/// `y = None` uses the constant label `-1`, recovering the plain
/// penalty `sum_i ln(1 + e^{x_i})`; otherwise `y` must match the
/// operand shape exactly.
pub fn prox_logistic<S, D>(
    v: ArrayView<S, D>,
    y: Option<ArrayView<S, D>>,
    params: &Compose<S, D>,
) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    match y {
        None => prox_compose(
            |w, t| Ok(w.mapv_into(|wi| scalar::logistic(wi, t, -S::one()))),
            v,
            params,
        ),
        Some(y) => {
            if y.shape() != v.shape() {
                return Err(ProxError::ShapeMismatch {
                    expected: v.shape().to_vec(),
                    found: y.shape().to_vec(),
                });
            }
            prox_compose(
                |mut w, t| {
                    Zip::from(&mut w)
                        .and(&y)
                        .apply(|wi, &yi| *wi = scalar::logistic(*wi, t, yi));
                    Ok(w)
                },
                v,
                params,
            )
        }
    }
}

/// Prox of the negative part `f(x) = sum_i max(-x_i, 0)`.
pub fn prox_neg<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::neg(wi, t))), v, params)
}

/// Prox of the negative entropy `f(x) = sum_i x_i ln x_i`.
pub fn prox_neg_entr<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::neg_entr(wi, t))), v, params)
}

/// Prox of `f(x) = -sum_i ln x_i`.
pub fn prox_neg_log<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::neg_log(wi, t))), v, params)
}

/// Prox of the positive part `f(x) = sum_i max(x_i, 0)`.
pub fn prox_pos<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::pos(wi, t))), v, params)
}

/// Prox of `f(x) = sum_i x_i^2 = ||x||_2^2`.
pub fn prox_sum_squares<S, D>(v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
{
    prox_compose(|w, t| Ok(w.mapv_into(|wi| scalar::sum_squares(wi, t))), v, params)
}
