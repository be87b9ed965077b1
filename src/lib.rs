//! # SIF-Lib: Subsidy Immunity Formula Evaluator
//!
//! `sif-lib` evaluates the Subsidy Immunity Formula and the quantities derived
//! from it. Everything is a pure function of its inputs: no state, no I/O apart
//! from optional CSV export.
//!
//! ## Core Quantities
//!
//! - **Intrinsic Duration**: `Di = 1/r`
//! - **Exigence Coefficient**: `EC(δ) = |Φ⁻¹(1/(2·e^δ))|`, exact below a
//!   threshold and asymptotic above it so that large displacements never
//!   underflow
//! - **Convexity**: `C(δ) = 1/(σ·EC(δ))²`
//! - **Strategic Shielding Time**: `SST(δ) = Di·δ - C(δ)·δ²`
//! - **Greeks**: `ρ_sif = ∂SST/∂r` and `ν_sif = ∂SST/∂σ`
//!
//! ## Quick Start
//!
//! ```rust
//! use sif_lib::{evaluate, default_configs, evaluate_sweep, linspace, SifParams};
//!
//! // Single point
//! let point = evaluate(2.0, 0.05, 0.20)?;
//! println!("SST = {:.3} years, ρ = {:.1}, ν = {:.1}", point.sst, point.rho, point.vega);
//!
//! // A whole displacement grid, including the asymptotic tail
//! let deltas = linspace(0.001, 2000.0, 500);
//! let params = SifParams::new(0.05, 0.10)?;
//! let sweep = evaluate_sweep(&deltas, params, &default_configs::paper())?;
//! assert!(sweep.sst.iter().all(|v| v.is_finite()));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Analysis Helpers
//!
//! - Zero crossings of SST ([`find_sst_zero_crossings`])
//! - Fitting the whitepaper's affine EC stand-in ([`fit_paper_form`])
//! - The three whitepaper figure sweeps ([`analysis::figures`]) and CSV export

// ================================================================================================
// MODULES
// ================================================================================================

pub mod analysis;
pub mod error;
pub mod models;
pub mod params;

// ================================================================================================
// IMPORTS
// ================================================================================================

use anyhow::Result;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Inputs and errors
pub use error::{SifError, SifResult};
pub use params::SifParams;

// Exigence Coefficient
pub use models::ec::{
    ec_asymptotic, ec_asymptotic_leading, ec_exact, ec_polynomial, exigence_coefficient,
    exigence_coefficients, hit_probability, log_hit_probability, EcBranch, EcMethod,
    ExigenceModel, HybridEc, PolynomialEc, EXACT_THRESHOLD,
};
pub use models::normal::{inverse_normal_cdf, inverse_normal_cdf_log, normal_cdf};

// SST and Greeks
pub use models::paper_form::{sst_paper_form, PaperFormCoefficients};
pub use models::sst::{
    convexity, intrinsic_duration, rho_sif, strategic_shielding_time,
    strategic_shielding_times, vega_sif, GreekMethod, SifEvaluator, SifPoint,
};
pub use models::utils::linspace;

// Analysis
pub use analysis::config::{CrossingConfig, FitConfig, SifConfig};
pub use analysis::crossing::{find_sst_zero_crossings, first_sst_zero_crossing};
pub use analysis::fit::{curve_stats, fit_paper_form, CurveStats, PaperFormFit, SigmaFitStats};
pub use analysis::sweep::{
    evaluate_sweep, save_series_csv, write_series_csv, Series, SweepResult,
};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured settings for common use cases.
///
/// - [`paper()`]: Defaults used to regenerate the whitepaper figures
/// - [`precise()`]: Tighter fit tolerances and denser crossing scans
/// - [`fast()`]: Coarse settings for quick checks
pub mod default_configs {
    use crate::analysis::config::SifConfig;

    /// Whitepaper settings.
    ///
    /// **Characteristics:**
    /// - Exact/asymptotic threshold at δ = 700
    /// - Hybrid EC with analytic Greeks
    /// - 2,000-sample crossing scans
    ///
    /// # Example
    ///
    /// ```rust
    /// use sif_lib::default_configs;
    ///
    /// let config = default_configs::paper();
    /// assert_eq!(config.exact_threshold, 700.0);
    /// ```
    pub fn paper() -> SifConfig {
        SifConfig::paper()
    }

    /// Research settings: 1,000 L-BFGS-B iterations, 20,000-sample crossing scans.
    pub fn precise() -> SifConfig {
        SifConfig::precise()
    }

    /// Quick validation settings: 50 L-BFGS-B iterations, 200-sample crossing scans.
    pub fn fast() -> SifConfig {
        SifConfig::fast()
    }
}

/// Evaluate every SIF quantity at a single displacement with default settings.
///
/// # Arguments
///
/// * `delta` - Displacement (log-moneyness distance from the barrier), any finite value
/// * `r` - Risk-free rate, must be positive
/// * `sigma` - Volatility, must be positive
///
/// # Errors
///
/// * [`SifError::InvalidRate`] / [`SifError::InvalidVolatility`] for non-positive inputs
/// * [`SifError::NonFiniteDisplacement`] for `NaN` or infinite `delta`
///
/// # Example
///
/// ```rust
/// use sif_lib::evaluate;
///
/// let p = evaluate(712.0, 0.02, 0.10)?;
/// assert!(p.sst.is_finite() && p.ec.is_finite());
/// assert!(evaluate(1.0, 0.0, 0.2).is_err());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn evaluate(delta: f64, r: f64, sigma: f64) -> Result<SifPoint> {
    evaluate_with(delta, SifParams::new(r, sigma)?, &SifConfig::default())
}

/// [`evaluate`] with explicit parameters and configuration.
pub fn evaluate_with(delta: f64, params: SifParams, config: &SifConfig) -> Result<SifPoint> {
    Ok(config.evaluator(params)?.point(delta)?)
}
