//! Closed-form SST approximation used for the whitepaper figures.
//!
//! The paper replaces `EC(δ)` with the affine stand-in `a·δ + b`:
//!
//! ```text
//! SST_paper(δ) = δ/r - (δ / (σ·(a·δ + b)))²
//! ```

use crate::params::SifParams;

pub const PAPER_A: f64 = 0.8;
pub const PAPER_B: f64 = 1.2;

/// Affine coefficients `(a, b)` of the paper form.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaperFormCoefficients {
    pub a: f64,
    pub b: f64,
}

impl Default for PaperFormCoefficients {
    fn default() -> Self {
        Self {
            a: PAPER_A,
            b: PAPER_B,
        }
    }
}

impl PaperFormCoefficients {
    pub fn sst(&self, delta: f64, params: &SifParams) -> f64 {
        sst_paper_form(delta, params, self.a, self.b)
    }

    pub fn sst_many(&self, deltas: &[f64], params: &SifParams) -> Vec<f64> {
        deltas.iter().map(|&d| self.sst(d, params)).collect()
    }
}

pub fn sst_paper_form(delta: f64, params: &SifParams, a: f64, b: f64) -> f64 {
    let ratio = delta / (params.sigma * (a * delta + b));
    delta / params.r - ratio * ratio
}
