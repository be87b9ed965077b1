//! Least-squares fit of the whitepaper's affine EC stand-in to the exact SST.
//!
//! The paper plots `δ/r - (δ/(σ(aδ + b)))²` with `(a, b) = (0.8, 1.2)`. Given a
//! displacement window and one or more volatilities, we pick the `(a, b)`
//! minimising the summed mean squared error against SST with the hybrid EC.

use anyhow::{anyhow, Result};
use cmaes_lbfgsb::lbfgsb_optimize::lbfgsb_optimize;

use crate::analysis::config::SifConfig;
use crate::models::ec::HybridEc;
use crate::models::paper_form::{sst_paper_form, PaperFormCoefficients};
use crate::models::sst::{GreekMethod, SifEvaluator};
use crate::params::SifParams;

/// Absolute deviation statistics between two curves.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveStats {
    pub max_abs: f64,
    pub mean_abs: f64,
    pub rmse: f64,
}

/// Deviation of `approx` from `reference`; slices must have equal, non-zero length.
pub fn curve_stats(reference: &[f64], approx: &[f64]) -> Result<CurveStats> {
    if reference.len() != approx.len() || reference.is_empty() {
        return Err(anyhow!(
            "Curve lengths must match and be non-empty: {} vs {}",
            reference.len(),
            approx.len()
        ));
    }
    let n = reference.len() as f64;
    let (mut max_abs, mut sum_abs, mut sum_sq) = (0.0_f64, 0.0, 0.0);
    for (x, y) in reference.iter().zip(approx) {
        let d = (x - y).abs();
        max_abs = max_abs.max(d);
        sum_abs += d;
        sum_sq += d * d;
    }
    Ok(CurveStats {
        max_abs,
        mean_abs: sum_abs / n,
        rmse: (sum_sq / n).sqrt(),
    })
}

/// Per-volatility comparison of the fitted and the published coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SigmaFitStats {
    pub sigma: f64,
    pub fitted: CurveStats,
    pub paper: CurveStats,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaperFormFit {
    pub coefficients: PaperFormCoefficients,
    /// Objective at the returned coefficients
    pub loss: f64,
    /// Objective at the configured initial guess
    pub initial_loss: f64,
    pub stats: Vec<SigmaFitStats>,
}

/// Fit `(a, b)` of the paper form against exact SST for every `sigma` in `sigmas`.
///
/// # Errors
///
/// * empty displacement grid or volatility list
/// * invalid `r`, any invalid `sigma`, or an invalid `config`
pub fn fit_paper_form(
    deltas: &[f64],
    r: f64,
    sigmas: &[f64],
    config: &SifConfig,
) -> Result<PaperFormFit> {
    if deltas.is_empty() {
        return Err(anyhow!("Cannot fit on an empty displacement grid"));
    }
    if sigmas.is_empty() {
        return Err(anyhow!("At least one volatility is required"));
    }
    if deltas.iter().any(|d| !d.is_finite()) {
        return Err(anyhow!("Displacement grid contains non-finite values"));
    }
    config.validate()?;

    let hybrid = HybridEc::new(config.exact_threshold, config.asymptotic_refinements);
    let mut curves: Vec<(SifParams, Vec<f64>)> = Vec::with_capacity(sigmas.len());
    for &sigma in sigmas {
        let params = SifParams::new(r, sigma)?;
        let exact = SifEvaluator::new(params, Box::new(hybrid), GreekMethod::Analytic)?;
        curves.push((params, exact.sst_many(deltas)));
    }

    let n = deltas.len() as f64;
    let obj_fn = |x: &[f64]| -> f64 {
        let (a, b) = (x[0], x[1]);
        let mut total = 0.0;
        for (params, exact) in &curves {
            let mse: f64 = deltas
                .iter()
                .zip(exact)
                .map(|(&d, &e)| {
                    let diff = sst_paper_form(d, params, a, b) - e;
                    diff * diff
                })
                .sum::<f64>()
                / n;
            total += mse;
        }
        if total.is_finite() {
            total
        } else {
            f64::MAX
        }
    };

    let fit_cfg = &config.fit;
    let bounds = [fit_cfg.bounds, fit_cfg.bounds];
    let guess = vec![fit_cfg.initial_guess.0, fit_cfg.initial_guess.1];
    let initial_loss = obj_fn(&guess);

    let mut solution = guess.clone();
    let refine_res = lbfgsb_optimize(
        &mut solution,
        &bounds,
        &obj_fn,
        fit_cfg.max_iterations,
        fit_cfg.tolerance,
        if tracing::enabled!(tracing::Level::DEBUG) {
            Some(|_current_x: &[f64], current_obj: f64| {
                tracing::debug!(objective = current_obj, "L-BFGS-B iteration");
            })
        } else {
            None
        },
        None,
    );

    let (loss, best) = match refine_res {
        Ok((loc_obj, loc_sol)) if loc_obj <= initial_loss => (loc_obj, loc_sol),
        Ok((loc_obj, _)) => {
            tracing::warn!(
                initial = initial_loss,
                refined = loc_obj,
                "L-BFGS-B did not improve on the initial guess"
            );
            (initial_loss, guess)
        }
        Err(e) => {
            tracing::warn!(error = ?e, "L-BFGS-B failed, keeping the initial guess");
            (initial_loss, guess)
        }
    };

    let coefficients = PaperFormCoefficients {
        a: best[0],
        b: best[1],
    };
    let published = PaperFormCoefficients::default();

    let mut stats = Vec::with_capacity(curves.len());
    for (params, exact) in &curves {
        stats.push(SigmaFitStats {
            sigma: params.sigma,
            fitted: curve_stats(exact, &coefficients.sst_many(deltas, params))?,
            paper: curve_stats(exact, &published.sst_many(deltas, params))?,
        });
    }

    Ok(PaperFormFit {
        coefficients,
        loss,
        initial_loss,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_stats_basic() {
        let s = curve_stats(&[0.0, 1.0, 2.0], &[0.0, 2.0, 0.0]).unwrap();
        assert_eq!(s.max_abs, 2.0);
        assert!((s.mean_abs - 1.0).abs() < 1e-15);
        assert!((s.rmse - (5.0_f64 / 3.0).sqrt()).abs() < 1e-15);
        assert!(curve_stats(&[1.0], &[1.0, 2.0]).is_err());
        assert!(curve_stats(&[], &[]).is_err());
    }

    #[test]
    fn rejects_empty_inputs() {
        let cfg = SifConfig::fast();
        assert!(fit_paper_form(&[], 0.05, &[0.2], &cfg).is_err());
        assert!(fit_paper_form(&[0.5], 0.05, &[], &cfg).is_err());
        assert!(fit_paper_form(&[0.5], 0.0, &[0.2], &cfg).is_err());
    }
}
