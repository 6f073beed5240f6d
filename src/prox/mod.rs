//! The proximal-operator catalog
//!
//! Concrete closed-form operators, split by how they act on the
//! operand:
//! - elementwise maps applied independently per coordinate,
//! - constraint-set projections,
//! - norms and support functions,
//! - spectral operators acting on eigenvalues or singular values,
//! - quadratic operators reducing to a linear solve.
//!
//! Every entry accepts the composition parameters of
//! [`crate::compose::Compose`] and routes through the shared engine,
//! so the affine-plus-quadratic reduction behaves identically across
//! the whole catalog. The scalar closed forms live in [`scalar`] and
//! are reused by the elementwise adapters and by the spectral
//! operators' eigenvalue maps.

mod constraint;
pub use constraint::*;

mod elementwise;
pub use elementwise::*;

mod matrix;
pub use matrix::*;

mod norm;
pub use norm::*;

mod quadratic;
pub use quadratic::*;

pub mod scalar;
