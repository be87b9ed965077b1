//! Strategic Shielding Time and its sensitivities.
//!
//! ```text
//! Di     = 1 / r
//! C(δ)   = 1 / (σ·EC(δ))²
//! SST(δ) = Di·δ - C(δ)·δ²
//! ρ_sif  = ∂SST/∂r = -δ / r²
//! ν_sif  = ∂SST/∂σ = 2·δ² / (σ³·EC(δ)²)
//! ```
//!
//! The penalty `C(δ)·δ²` is evaluated as `(δ/EC(δ))² / σ²` so that the removable
//! singularity at `δ = 0` (where `EC = 0`) resolves to its finite limit.

use crate::error::{SifError, SifResult};
use crate::models::ec::{ExigenceModel, HybridEc};
use crate::params::{validate_rate, validate_volatility, SifParams};

/// Default relative bump for centred finite differences.
pub const DEFAULT_FD_STEP: f64 = 1e-5;

/// How the Greeks are computed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GreekMethod {
    /// Closed-form derivatives of `Di` and `C`
    #[default]
    Analytic,
    /// Centred differences with step `rel_step · x` on the bumped input
    CentralDifference { rel_step: f64 },
}

impl GreekMethod {
    pub fn central_difference() -> Self {
        GreekMethod::CentralDifference {
            rel_step: DEFAULT_FD_STEP,
        }
    }

    pub fn validate(&self) -> SifResult<()> {
        match *self {
            GreekMethod::Analytic => Ok(()),
            GreekMethod::CentralDifference { rel_step } => {
                // rel_step < 1 keeps the down-bump of a positive input positive
                if rel_step.is_finite() && rel_step > 0.0 && rel_step < 1.0 {
                    Ok(())
                } else {
                    Err(SifError::InvalidStep(rel_step))
                }
            }
        }
    }
}

/// Intrinsic Duration `Di = 1/r`.
pub fn intrinsic_duration(r: f64) -> SifResult<f64> {
    Ok(1.0 / validate_rate(r)?)
}

/// Convexity from an already computed Exigence Coefficient.
///
/// `ec == 0` yields `+∞`; only the volatility is a domain error.
pub fn convexity_from_ec(ec: f64, sigma: f64) -> SifResult<f64> {
    let sigma = validate_volatility(sigma)?;
    let scaled = sigma * ec;
    Ok(1.0 / (scaled * scaled))
}

/// One fully evaluated displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SifPoint {
    pub delta: f64,
    pub ec: f64,
    pub convexity: f64,
    pub sst: f64,
    /// ∂SST/∂r
    pub rho: f64,
    /// ∂SST/∂σ
    pub vega: f64,
}

/// Evaluates SIF quantities for fixed `(r, σ)` and a chosen EC model.
#[derive(Debug)]
pub struct SifEvaluator {
    params: SifParams,
    greek_method: GreekMethod,
    model: Box<dyn ExigenceModel>,
}

impl SifEvaluator {
    pub fn new(
        params: SifParams,
        model: Box<dyn ExigenceModel>,
        greek_method: GreekMethod,
    ) -> SifResult<Self> {
        params.validate()?;
        greek_method.validate()?;
        Ok(Self {
            params,
            greek_method,
            model,
        })
    }

    /// Default hybrid EC with analytic Greeks.
    pub fn hybrid(params: SifParams) -> SifResult<Self> {
        Self::new(params, Box::new(HybridEc::default()), GreekMethod::Analytic)
    }

    pub fn params(&self) -> SifParams {
        self.params
    }

    pub fn greek_method(&self) -> GreekMethod {
        self.greek_method
    }

    pub fn model(&self) -> &dyn ExigenceModel {
        self.model.as_ref()
    }

    pub fn intrinsic_duration(&self) -> f64 {
        1.0 / self.params.r
    }

    pub fn ec(&self, delta: f64) -> f64 {
        self.model.ec(delta)
    }

    pub fn convexity(&self, delta: f64) -> f64 {
        let scaled = self.params.sigma * self.model.ec(delta);
        1.0 / (scaled * scaled)
    }

    /// Quadratic volatility penalty `C(δ)·δ²`.
    pub fn penalty(&self, delta: f64) -> f64 {
        penalty_at(self.model.displacement_ratio(delta), self.params.sigma)
    }

    pub fn sst(&self, delta: f64) -> f64 {
        delta / self.params.r - self.penalty(delta)
    }

    pub fn rho(&self, delta: f64) -> f64 {
        let r = self.params.r;
        match self.greek_method {
            GreekMethod::Analytic => -delta / (r * r),
            GreekMethod::CentralDifference { rel_step } => {
                // the penalty does not depend on r and cancels out
                let h = rel_step * r;
                (delta / (r + h) - delta / (r - h)) / (2.0 * h)
            }
        }
    }

    pub fn vega(&self, delta: f64) -> f64 {
        let sigma = self.params.sigma;
        let ratio = self.model.displacement_ratio(delta);
        match self.greek_method {
            GreekMethod::Analytic => 2.0 * ratio * ratio / (sigma * sigma * sigma),
            GreekMethod::CentralDifference { rel_step } => {
                let h = rel_step * sigma;
                let up = -penalty_at(ratio, sigma + h);
                let down = -penalty_at(ratio, sigma - h);
                (up - down) / (2.0 * h)
            }
        }
    }

    /// Evaluate every quantity at `delta`.
    pub fn point(&self, delta: f64) -> SifResult<SifPoint> {
        if !delta.is_finite() {
            return Err(SifError::NonFiniteDisplacement(delta));
        }
        Ok(SifPoint {
            delta,
            ec: self.ec(delta),
            convexity: self.convexity(delta),
            sst: self.sst(delta),
            rho: self.rho(delta),
            vega: self.vega(delta),
        })
    }

    pub fn sst_many(&self, deltas: &[f64]) -> Vec<f64> {
        deltas.iter().map(|&d| self.sst(d)).collect()
    }
}

#[inline]
fn penalty_at(ratio: f64, sigma: f64) -> f64 {
    let scaled = ratio / sigma;
    scaled * scaled
}

/// Convexity `1/(σ·EC(δ))²` with the hybrid EC.
pub fn convexity(delta: f64, sigma: f64) -> SifResult<f64> {
    convexity_from_ec(HybridEc::default().ec(delta), sigma)
}

/// Strategic Shielding Time with the hybrid EC.
pub fn strategic_shielding_time(delta: f64, r: f64, sigma: f64) -> SifResult<f64> {
    Ok(SifEvaluator::hybrid(SifParams::new(r, sigma)?)?.sst(delta))
}

/// Element-wise [`strategic_shielding_time`].
pub fn strategic_shielding_times(deltas: &[f64], r: f64, sigma: f64) -> SifResult<Vec<f64>> {
    Ok(SifEvaluator::hybrid(SifParams::new(r, sigma)?)?.sst_many(deltas))
}

/// Analytic `∂SST/∂r`.
pub fn rho_sif(delta: f64, r: f64, sigma: f64) -> SifResult<f64> {
    Ok(SifEvaluator::hybrid(SifParams::new(r, sigma)?)?.rho(delta))
}

/// Analytic `∂SST/∂σ`.
pub fn vega_sif(delta: f64, r: f64, sigma: f64) -> SifResult<f64> {
    Ok(SifEvaluator::hybrid(SifParams::new(r, sigma)?)?.vega(delta))
}
