//! Validated market parameters for a single SIF evaluation.

use crate::error::{SifError, SifResult};

/// Risk-free rate and volatility shared by every point of an evaluation.
///
/// Both values must be strictly positive and finite; [`SifParams::new`] is the
/// only way the library builds one from raw numbers, so downstream code can
/// divide by `r` and `sigma` without re-checking.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SifParams {
    /// Risk-free rate (as decimal, e.g. 0.05 for 5%)
    pub r: f64,
    /// Volatility (as decimal, e.g. 0.20 for 20%)
    pub sigma: f64,
}

impl SifParams {
    pub fn new(r: f64, sigma: f64) -> SifResult<Self> {
        let params = Self { r, sigma };
        params.validate()?;
        Ok(params)
    }

    /// Re-check the invariants, useful after deserialising or mutating fields.
    pub fn validate(&self) -> SifResult<()> {
        validate_rate(self.r)?;
        validate_volatility(self.sigma)?;
        Ok(())
    }

    pub fn with_rate(self, r: f64) -> SifResult<Self> {
        Self::new(r, self.sigma)
    }

    pub fn with_sigma(self, sigma: f64) -> SifResult<Self> {
        Self::new(self.r, sigma)
    }
}

pub(crate) fn validate_rate(r: f64) -> SifResult<f64> {
    if r.is_finite() && r > 0.0 {
        Ok(r)
    } else {
        Err(SifError::InvalidRate(r))
    }
}

pub(crate) fn validate_volatility(sigma: f64) -> SifResult<f64> {
    if sigma.is_finite() && sigma > 0.0 {
        Ok(sigma)
    } else {
        Err(SifError::InvalidVolatility(sigma))
    }
}
