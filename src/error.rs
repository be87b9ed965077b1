//! Input-domain errors for the formula evaluator.
//!
//! Only invalid inputs are errors. Large displacements are handled by the
//! asymptotic branch of the Exigence Coefficient and never surface here.

/// Domain violations raised when constructing or evaluating SIF quantities.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SifError {
    #[error("risk-free rate must be positive and finite, got {0}")]
    InvalidRate(f64),

    #[error("volatility must be positive and finite, got {0}")]
    InvalidVolatility(f64),

    #[error("displacement must be finite, got {0}")]
    NonFiniteDisplacement(f64),

    #[error("finite-difference step must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("exact/asymptotic threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),
}

pub type SifResult<T> = std::result::Result<T, SifError>;
