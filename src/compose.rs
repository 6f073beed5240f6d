//! Composition of proximal operators with affine and quadratic terms
//!
//! Splitting algorithms rarely need the proximal operator of a bare
//! function $`f`$; they need it for a transformed objective
//! ```math
//! g(x) = t f(\alpha x - \beta) + \langle c, x \rangle + d \|x\|_2^2
//! ```
//! with a step size $`t > 0`$, a nonzero scale $`\alpha`$, an offset
//! $`\beta`$, a linear term $`c`$, and a quadratic term $`d \geq 0`$.
//! Completing the square in the proximity term and substituting
//! $`y = \alpha x - \beta`$ reduces
//! $`\mathrm{arg\,min}_x\, g(x) + \frac12 \|x - v\|_2^2`$ to a single
//! call of the base operator:
//! ```math
//! \begin{aligned}
//! \rho &= 2d + 1 \\
//! u &= (v - c) / \rho \\
//! y^\star &= \mathrm{prox}_{f}\!\left(\alpha u - \beta,\; t\alpha^2/\rho\right) \\
//! x^\star &= (y^\star + \beta) / \alpha
//! \end{aligned}
//! ```
//! The reduction is numerically exact and is shape-agnostic: the same
//! formula applies whether `v` is a scalar (`Ix0`), a vector (`Ix1`),
//! or a matrix (`Ix2`), with scalar `offset`/`lin_term` broadcasting
//! against `v`'s shape.

use ndarray::prelude::*;
use ndarray::NdFloat;

use crate::errors::{ProxError, ProxResult};

/// A broadcastable term of a composition: a single value repeated over
/// every entry of the operand, or a full array of matching shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Term<S, D: Dimension> {
    Uniform(S),
    Full(Array<S, D>),
}

impl<S: NdFloat, D: Dimension> Term<S, D> {
    fn check_shape(&self, shape: &[usize]) -> ProxResult<()> {
        match self {
            Term::Uniform(_) => Ok(()),
            Term::Full(a) if a.shape() == shape => Ok(()),
            Term::Full(a) => Err(ProxError::ShapeMismatch {
                expected: shape.to_vec(),
                found: a.shape().to_vec(),
            }),
        }
    }

    fn sub_from(&self, arr: &mut Array<S, D>) {
        match self {
            Term::Uniform(c) => {
                let c = *c;
                arr.mapv_inplace(|x| x - c);
            }
            Term::Full(a) => *arr -= a,
        }
    }

    fn add_to(&self, arr: &mut Array<S, D>) {
        match self {
            Term::Uniform(c) => {
                let c = *c;
                arr.mapv_inplace(|x| x + c);
            }
            Term::Full(a) => *arr += a,
        }
    }
}

impl<S: NdFloat, D: Dimension> Default for Term<S, D> {
    fn default() -> Self {
        Term::Uniform(S::zero())
    }
}

impl<D: Dimension> From<f64> for Term<f64, D> {
    fn from(c: f64) -> Self {
        Term::Uniform(c)
    }
}

impl<D: Dimension> From<f32> for Term<f32, D> {
    fn from(c: f32) -> Self {
        Term::Uniform(c)
    }
}

impl<S: NdFloat, D: Dimension> From<Array<S, D>> for Term<S, D> {
    fn from(a: Array<S, D>) -> Self {
        Term::Full(a)
    }
}

/// Composition parameters for a transformed proximal objective.
///
/// Defaults to the untransformed problem:
/// `t = 1, scale = 1, offset = 0, lin_term = 0, quad_term = 0`.
/// Fields are public; construct the common cases with
/// [`Compose::default`] or [`Compose::step`] and override the rest
/// with struct-update syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct Compose<S, D: Dimension> {
    /// Step size (strength of the proximal regularization).
    pub t: S,
    /// Pre-transform multiplier, must be nonzero.
    pub scale: S,
    /// Pre-transform shift.
    pub offset: Term<S, D>,
    /// Linear penalty coefficient.
    pub lin_term: Term<S, D>,
    /// Quadratic penalty coefficient, must be nonnegative.
    pub quad_term: S,
}

impl<S: NdFloat, D: Dimension> Default for Compose<S, D> {
    fn default() -> Self {
        Compose {
            t: S::one(),
            scale: S::one(),
            offset: Term::default(),
            lin_term: Term::default(),
            quad_term: S::zero(),
        }
    }
}

impl<S: NdFloat, D: Dimension> Compose<S, D> {
    /// Plain proximal step of size `t`, no affine transformation.
    pub fn step(t: S) -> Self {
        Compose {
            t,
            ..Compose::default()
        }
    }

    /// Check all parameters against the operand shape. Runs once at
    /// the engine boundary so catalog entries never re-validate.
    pub fn validate(&self, shape: &[usize]) -> ProxResult<()> {
        if !(self.t > S::zero()) || !self.t.is_finite() {
            return Err(ProxError::BadStepSize);
        }
        if self.scale == S::zero() || !self.scale.is_finite() {
            return Err(ProxError::ZeroScale);
        }
        if self.quad_term < S::zero() || !self.quad_term.is_finite() {
            return Err(ProxError::NegativeQuadTerm);
        }
        self.offset.check_shape(shape)?;
        self.lin_term.check_shape(shape)
    }
}

/// Evaluate the proximal operator of the transformed objective
/// $`t f(\alpha x - \beta) + \langle c, x \rangle + d\|x\|_2^2`$
/// given the base operator of $`f`$.
///
/// `prox` receives the algebraically adjusted point and step size and
/// must solve the standard problem
/// $`\mathrm{arg\,min}_y\, t' f(y) + \frac12\|y - w\|_2^2`$.
/// Every catalog entry routes through here, so the reduction is
/// derived exactly once.
pub fn prox_compose<S, D, F>(prox: F, v: ArrayView<S, D>, params: &Compose<S, D>) -> ProxResult<Array<S, D>>
where
    S: NdFloat,
    D: Dimension,
    F: FnOnce(Array<S, D>, S) -> ProxResult<Array<S, D>>,
{
    params.validate(v.shape())?;

    let two = S::from(2.).unwrap();
    let rho = two * params.quad_term + S::one();
    let scale = params.scale;

    // w = scale * (v - lin_term) / rho - offset
    let mut w = v.to_owned();
    params.lin_term.sub_from(&mut w);
    w.mapv_inplace(|x| x * scale / rho);
    params.offset.sub_from(&mut w);

    let t_eff = params.t * scale * scale / rho;
    let mut x = prox(w, t_eff)?;

    // x = (y + offset) / scale
    params.offset.add_to(&mut x);
    x.mapv_inplace(|e| e / scale);
    Ok(x)
}
