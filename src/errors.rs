//! Error taxonomy for the proximal-operator catalog.
//!
//! Every failure is either a precondition violation or a backend
//! factorization failure. Operators never retry and never return a
//! partial result; an `Err` always means the caller handed over an
//! invalid problem, so nothing is ever silently corrected.

use ndarray_linalg::error::LinalgError;

/// Crate-wide result alias for proximal-operator evaluations.
pub type ProxResult<T> = Result<T, ProxError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ProxError {
    /// Step size `t` must be positive and finite.
    BadStepSize,

    /// `scale == 0` leaves the affine substitution undefined.
    ZeroScale,

    /// `quad_term < 0` makes the transformed objective non-convex.
    NegativeQuadTerm,

    /// A non-scalar `offset`/`lin_term`/coefficient must match the
    /// operand shape exactly; only scalars broadcast.
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// The operator is only defined for square matrices.
    NotSquare { rows: usize, cols: usize },

    /// The operator is only defined for symmetric matrices.
    NotSymmetric,

    /// A quadratic-form coefficient matrix must be positive semidefinite.
    NotPositiveSemidefinite,

    /// Box bounds with `lo > hi` describe an empty set.
    EmptyInterval,

    /// An eigendecomposition, SVD, or linear solve failed in the backend.
    Lapack { text: String },
}

impl std::error::Error for ProxError {}

impl std::fmt::Display for ProxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxError::BadStepSize => {
                write!(f, "Step size must be positive and finite")
            }
            ProxError::ZeroScale => {
                write!(f, "Composition scale must be nonzero and finite")
            }
            ProxError::NegativeQuadTerm => {
                write!(f, "Composition quad_term must be nonnegative")
            }
            ProxError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {:?}, found {:?}", expected, found)
            }
            ProxError::NotSquare { rows, cols } => {
                write!(f, "Operator requires a square matrix, got {}x{}", rows, cols)
            }
            ProxError::NotSymmetric => {
                write!(f, "Operator requires a symmetric matrix")
            }
            ProxError::NotPositiveSemidefinite => {
                write!(f, "Coefficient matrix must be positive semidefinite")
            }
            ProxError::EmptyInterval => {
                write!(f, "Box bounds are inverted (lo > hi)")
            }
            ProxError::Lapack { text } => {
                write!(f, "Linear-algebra backend error: {}", text)
            }
        }
    }
}

impl From<LinalgError> for ProxError {
    fn from(err: LinalgError) -> Self {
        ProxError::Lapack {
            text: err.to_string(),
        }
    }
}
