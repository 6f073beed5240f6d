//! The `ndarray-prox` crate provides closed-form proximal operators
//! for scalars, vectors, and matrices built on `ndarray`.
//!
//! The proximal operator of a convex function $`f`$ at a point $`v`$
//! with step size $`t > 0`$ is the unique minimizer
//! ```math
//! \mathrm{prox}_{tf}(v) = \mathrm{arg}\!\min_x \; t f(x) + \tfrac12 \|x - v\|_2^2
//! ```
//! Operator-splitting algorithms such as ADMM call these maps millions
//! of times in their inner loop, so every operator here is an exact
//! closed form (or a safeguarded scalar root-find), never an inner
//! optimization loop.
//!
//! The catalog divides into elementwise operators, applied per entry of
//! the operand, and spectral operators, whose closed form acts on the
//! eigenvalues or singular values of a matrix via a per-call
//! factorization. Every entry additionally evaluates the proximal
//! operator of the transformed objective
//! ```math
//! g(x) = t f(\alpha x - \beta) + \langle c, x \rangle + d \|x\|_2^2
//! ```
//! through the shared composition engine in [`compose`].
//!
//! A goal of this crate is to provide functionality on par with the
//! proximal-operator catalogs available in other languages, such as
//! `ProximalOperators.jl` for Julia.

#![cfg_attr(all(rustc_nightly, test), feature(test))]
#[cfg(all(rustc_nightly, test))]
extern crate test;

#[cfg(test)]
extern crate intel_mkl_src;

pub mod compose;
pub mod errors;
pub mod projection;
pub mod prox;
