//! Exigence Coefficient `EC(δ) = |Φ⁻¹(p)|` with `p = 1/(2·e^δ)`.
//!
//! The exact branch works from `ln p = -(δ + ln 2)` and never exponentiates the
//! tail probability. Past [`EXACT_THRESHOLD`] the probability is within a few
//! orders of magnitude of the smallest normal `f64`, so the hybrid model
//! switches to the tail expansion of the normal quantile instead.
//!
//! For `δ > 0` the coefficient is non-decreasing up to rounding: neighbouring
//! displacements a few ulps apart can come back a few ulps lower, and the step at
//! the switch-over is upward.

use std::f64::consts::{FRAC_2_PI, LN_2, PI};

use super::normal::{inverse_normal_cdf_log, normal_cdf};

/// Displacement at which the hybrid model switches to the asymptotic branch.
pub const EXACT_THRESHOLD: f64 = 700.0;

/// Fixed-point refinements applied on top of the leading asymptotic term.
pub const ASYMPTOTIC_REFINEMENTS: usize = 3;

/// Thresholds below this leave the tail expansion outside its useful range.
pub const MIN_EXACT_THRESHOLD: f64 = 10.0;

// Below this |δ| the ratio δ/EC(δ) comes from its series instead of a 0/0 division.
const SMALL_DISPLACEMENT: f64 = 1e-6;

/// Which branch of the hybrid model produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EcBranch {
    Exact,
    Asymptotic,
}

/// `ln p` for the barrier-hit probability `p = 1/(2·e^δ)`.
///
/// Clamped to `ln(1 - 2⁻⁵³)` so that displacements at or below `-ln 2`
/// (where `p` would reach 1) keep a finite quantile.
pub fn log_hit_probability(delta: f64) -> f64 {
    let max_log_p = (-0.5 * f64::EPSILON).ln_1p();
    (-(delta + LN_2)).min(max_log_p)
}

/// Probability `Φ(-ec)` of reaching the barrier, the inverse map of the exact branch.
pub fn hit_probability(ec: f64) -> f64 {
    normal_cdf(-ec)
}

/// Exact branch: `|Φ⁻¹(p)|` evaluated from the log-probability.
pub fn ec_exact(delta: f64) -> f64 {
    inverse_normal_cdf_log(log_hit_probability(delta)).abs()
}

/// Leading asymptotic term `√(2·(δ + ln 2))`.
pub fn ec_asymptotic_leading(delta: f64) -> f64 {
    (2.0 * (delta + LN_2)).sqrt()
}

/// Tail expansion of `|Φ⁻¹(p)|` for large `δ`.
///
/// Starts from the leading term `x² = 2L`, `L = δ + ln 2`, and applies
/// `refinements` steps of the Mills-ratio relation
/// `x² = 2L - ln(2π·x²) + 2·ln(1 - 1/x² + 3/x⁴)`. Each step shrinks the
/// error by roughly a factor `x²`.
pub fn ec_asymptotic(delta: f64, refinements: usize) -> f64 {
    let two_l = 2.0 * (delta + LN_2);
    let mut x2 = two_l;
    for _ in 0..refinements {
        if x2 <= 1.0 {
            break;
        }
        let series = -1.0 / x2 + 3.0 / (x2 * x2);
        let next = two_l - (2.0 * PI * x2).ln() + 2.0 * series.ln_1p();
        if next.is_nan() || next <= 1.0 {
            break;
        }
        x2 = next;
    }
    x2.sqrt()
}

/// Whitepaper polynomial approximation `0.9·δ - 0.07·δ²`.
///
/// Only meaningful on the small-displacement window the paper plots; it turns
/// negative beyond `δ ≈ 12.86`.
pub fn ec_polynomial(delta: f64) -> f64 {
    0.9 * delta - 0.07 * delta * delta
}

/// A way of computing the Exigence Coefficient.
pub trait ExigenceModel: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    fn ec(&self, delta: f64) -> f64;

    /// `δ / EC(δ)`, the quantity the convexity penalty actually squares.
    ///
    /// Implementations must return the finite limit at `δ = 0`.
    fn displacement_ratio(&self, delta: f64) -> f64 {
        delta / self.ec(delta)
    }

    fn ec_many(&self, deltas: &[f64]) -> Vec<f64> {
        deltas.iter().map(|&d| self.ec(d)).collect()
    }
}

/// Exact inverse-probit below a threshold, tail expansion above it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HybridEc {
    pub threshold: f64,
    pub refinements: usize,
}

impl Default for HybridEc {
    fn default() -> Self {
        Self {
            threshold: EXACT_THRESHOLD,
            refinements: ASYMPTOTIC_REFINEMENTS,
        }
    }
}

impl HybridEc {
    pub fn new(threshold: f64, refinements: usize) -> Self {
        Self {
            threshold,
            refinements,
        }
    }

    pub fn branch(&self, delta: f64) -> EcBranch {
        if delta < self.threshold {
            EcBranch::Exact
        } else {
            EcBranch::Asymptotic
        }
    }
}

impl ExigenceModel for HybridEc {
    fn name(&self) -> &str {
        "hybrid"
    }

    fn ec(&self, delta: f64) -> f64 {
        match self.branch(delta) {
            EcBranch::Exact => ec_exact(delta),
            EcBranch::Asymptotic => ec_asymptotic(delta, self.refinements),
        }
    }

    fn displacement_ratio(&self, delta: f64) -> f64 {
        if delta.abs() < SMALL_DISPLACEMENT {
            // EC(δ) = √(2π)·|δ|/2·(1 - δ/2 + O(δ²))
            let magnitude = FRAC_2_PI.sqrt() * (1.0 + 0.5 * delta);
            return if delta < 0.0 { -magnitude } else { magnitude };
        }
        delta / self.ec(delta)
    }
}

/// The whitepaper's polynomial stand-in for the exact coefficient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolynomialEc;

impl ExigenceModel for PolynomialEc {
    fn name(&self) -> &str {
        "polynomial"
    }

    fn ec(&self, delta: f64) -> f64 {
        ec_polynomial(delta)
    }

    fn displacement_ratio(&self, delta: f64) -> f64 {
        1.0 / (0.9 - 0.07 * delta)
    }
}

/// Selects the Exigence Coefficient feeding SST.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EcMethod {
    #[default]
    Hybrid,
    Polynomial,
}

impl EcMethod {
    pub fn model(&self, threshold: f64, refinements: usize) -> Box<dyn ExigenceModel> {
        match self {
            EcMethod::Hybrid => Box::new(HybridEc::new(threshold, refinements)),
            EcMethod::Polynomial => Box::new(PolynomialEc),
        }
    }
}

/// Hybrid EC with the default threshold.
pub fn exigence_coefficient(delta: f64) -> f64 {
    HybridEc::default().ec(delta)
}

/// Element-wise [`exigence_coefficient`].
pub fn exigence_coefficients(deltas: &[f64]) -> Vec<f64> {
    HybridEc::default().ec_many(deltas)
}
