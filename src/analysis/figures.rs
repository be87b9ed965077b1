//! Parameter sweeps behind the three whitepaper figures.
//!
//! | Figure | δ window | fixed | varied |
//! |---|---|---|---|
//! | 1 | [0.001, 3.5] | r = 5% | σ ∈ {20%, 50%} |
//! | 2 | [0.001, 10] | σ = 20% | r ∈ {2%, 5%, 10%} |
//! | 3 | [0.001, 25] | r = 4% | σ ∈ {20%, 15%, 10%} |
//!
//! Only the data is produced here; rendering is left to the caller.

use anyhow::Result;
use std::path::Path;

use crate::analysis::config::SifConfig;
use crate::analysis::crossing::first_sst_zero_crossing;
use crate::analysis::sweep::{save_series_csv, Series};
use crate::models::utils::linspace;
use crate::params::SifParams;

pub const FIGURE_POINTS: usize = 400;
const DELTA_START: f64 = 0.001;

/// One labelled SST curve and the parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FigureCurve {
    pub label: String,
    pub params: SifParams,
    pub sst: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FigureData {
    /// Stable identifier used for output file names, e.g. `figure1_paper`
    pub id: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub deltas: Vec<f64>,
    pub curves: Vec<FigureCurve>,
}

impl FigureData {
    fn build(
        id: &str,
        title: &str,
        delta_end: f64,
        specs: &[(&str, f64, f64)],
        config: &SifConfig,
    ) -> Result<Self> {
        let deltas = linspace(DELTA_START, delta_end, FIGURE_POINTS);
        let mut curves = Vec::with_capacity(specs.len());
        for &(label, r, sigma) in specs {
            let params = SifParams::new(r, sigma)?;
            let sst = config.evaluator(params)?.sst_many(&deltas);
            curves.push(FigureCurve {
                label: label.to_string(),
                params,
                sst,
            });
        }
        Ok(Self {
            id: id.to_string(),
            title: title.to_string(),
            x_label: "Displacement δ (Log-Moneyness)".to_string(),
            y_label: "SST (Years)".to_string(),
            deltas,
            curves,
        })
    }

    pub fn series(&self) -> Vec<Series> {
        self.curves
            .iter()
            .map(|c| Series::new(c.label.clone(), c.sst.clone()))
            .collect()
    }

    /// Y-axis range covering every curve plus `margin` (fraction of the span) on each side.
    pub fn y_range(&self, margin: f64) -> (f64, f64) {
        let (lo, hi) = self
            .series()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.min()), hi.max(s.max()))
            });
        let pad = (hi - lo) * margin;
        (lo - pad, hi + pad)
    }

    /// First zero crossing of each curve inside the figure's window.
    pub fn zero_crossings(&self, config: &SifConfig) -> Result<Vec<(String, Option<f64>)>> {
        let (lo, hi) = match (self.deltas.first(), self.deltas.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => return Ok(Vec::new()),
        };
        self.curves
            .iter()
            .map(|c| {
                first_sst_zero_crossing(c.params, lo, hi, config).map(|x| (c.label.clone(), x))
            })
            .collect()
    }

    /// Write `<dir>/data_<id>.csv`.
    pub fn save_csv(&self, dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
        let path = dir.as_ref().join(format!("data_{}.csv", self.id));
        save_series_csv(&path, &self.deltas, &self.series())?;
        Ok(path)
    }
}

/// Standard vs high volatility at r = 5%.
pub fn figure1(config: &SifConfig) -> Result<FigureData> {
    FigureData::build(
        "figure1_paper",
        "Figure 1: SST Comparison (Volatility Buys Time)",
        3.5,
        &[("standard", 0.05, 0.20), ("highvol", 0.05, 0.50)],
        config,
    )
}

/// Sensitivity to rates at σ = 20%.
pub fn figure2(config: &SifConfig) -> Result<FigureData> {
    FigureData::build(
        "figure2_paper",
        "Figure 2: Sensitivity to Rates (Duration)",
        10.0,
        &[
            ("r=2% (Patient)", 0.02, 0.20),
            ("r=5% (Base)", 0.05, 0.20),
            ("r=10% (Strict)", 0.10, 0.20),
        ],
        config,
    )
}

/// Sensitivity to volatility at r = 4%.
pub fn figure3(config: &SifConfig) -> Result<FigureData> {
    FigureData::build(
        "figure3_paper",
        "Figure 3: Sensitivity to Volatility (Convexity)",
        25.0,
        &[
            ("σ=20%", 0.04, 0.20),
            ("σ=15%", 0.04, 0.15),
            ("σ=10%", 0.04, 0.10),
        ],
        config,
    )
}

pub fn all_figures(config: &SifConfig) -> Result<Vec<FigureData>> {
    Ok(vec![figure1(config)?, figure2(config)?, figure3(config)?])
}
