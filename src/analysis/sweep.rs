//! Vectorised evaluation over displacement grids and CSV export of the results.

use anyhow::{anyhow, Result};
use std::io::Write;
use std::path::Path;

use crate::analysis::config::SifConfig;
use crate::models::ec::{EcBranch, EcMethod, HybridEc};
use crate::models::sst::SifPoint;
use crate::params::SifParams;

/// Column-oriented results of a sweep; every column has the input's length.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepResult {
    pub deltas: Vec<f64>,
    pub ec: Vec<f64>,
    pub convexity: Vec<f64>,
    pub sst: Vec<f64>,
    pub rho: Vec<f64>,
    pub vega: Vec<f64>,
    /// How many displacements were served by the asymptotic EC branch
    pub asymptotic_points: usize,
}

impl SweepResult {
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = SifPoint> + '_ {
        (0..self.len()).map(move |i| SifPoint {
            delta: self.deltas[i],
            ec: self.ec[i],
            convexity: self.convexity[i],
            sst: self.sst[i],
            rho: self.rho[i],
            vega: self.vega[i],
        })
    }

    /// All derived columns as named series, ready for [`write_series_csv`].
    pub fn to_series(&self) -> Vec<Series> {
        vec![
            Series::new("ec", self.ec.clone()),
            Series::new("convexity", self.convexity.clone()),
            Series::new("sst", self.sst.clone()),
            Series::new("rho", self.rho.clone()),
            Series::new("vega", self.vega.clone()),
        ]
    }
}

/// Evaluate every SIF quantity at each displacement in `deltas`.
///
/// # Errors
///
/// * invalid `params` or `config`
/// * any non-finite displacement (the offending index is reported)
pub fn evaluate_sweep(
    deltas: &[f64],
    params: SifParams,
    config: &SifConfig,
) -> Result<SweepResult> {
    let evaluator = config.evaluator(params)?;

    let n = deltas.len();
    let mut out = SweepResult {
        deltas: Vec::with_capacity(n),
        ec: Vec::with_capacity(n),
        convexity: Vec::with_capacity(n),
        sst: Vec::with_capacity(n),
        rho: Vec::with_capacity(n),
        vega: Vec::with_capacity(n),
        asymptotic_points: 0,
    };

    let hybrid = HybridEc::new(config.exact_threshold, config.asymptotic_refinements);
    for (i, &delta) in deltas.iter().enumerate() {
        let point = evaluator
            .point(delta)
            .map_err(|e| anyhow!("Sweep point {} rejected: {}", i, e))?;
        if config.ec_method == EcMethod::Hybrid && hybrid.branch(delta) == EcBranch::Asymptotic {
            out.asymptotic_points += 1;
        }
        out.deltas.push(point.delta);
        out.ec.push(point.ec);
        out.convexity.push(point.convexity);
        out.sst.push(point.sst);
        out.rho.push(point.rho);
        out.vega.push(point.vega);
    }

    if out.asymptotic_points > 0 {
        tracing::debug!(
            points = out.asymptotic_points,
            threshold = config.exact_threshold,
            "asymptotic EC branch used for sweep tail"
        );
    }

    Ok(out)
}

/// A named column of values aligned with a displacement grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Smallest finite value, `+∞` if there is none.
    pub fn min(&self) -> f64 {
        self.finite_values().fold(f64::INFINITY, f64::min)
    }

    /// Largest finite value, `-∞` if there is none.
    pub fn max(&self) -> f64 {
        self.finite_values().fold(f64::NEG_INFINITY, f64::max)
    }

    fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| v.is_finite())
    }
}

/// Write `delta,<series...>` CSV with a header row.
pub fn write_series_csv<W: Write>(writer: W, deltas: &[f64], series: &[Series]) -> Result<()> {
    for s in series {
        if s.values.len() != deltas.len() {
            return Err(anyhow!(
                "Series '{}' has {} values for {} displacements",
                s.name,
                s.values.len(),
                deltas.len()
            ));
        }
    }

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(series.len() + 1);
    header.push("delta");
    header.extend(series.iter().map(|s| s.name.as_str()));
    wtr.write_record(&header)?;

    for (i, delta) in deltas.iter().enumerate() {
        let mut record = Vec::with_capacity(series.len() + 1);
        record.push(delta.to_string());
        record.extend(series.iter().map(|s| s.values[i].to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// [`write_series_csv`] into a file, creating or truncating it.
pub fn save_series_csv(path: impl AsRef<Path>, deltas: &[f64], series: &[Series]) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .map_err(|e| anyhow!("Failed to create {}: {}", path.display(), e))?;
    write_series_csv(file, deltas, series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_extremes_skip_non_finite() {
        let s = Series::new("sst", vec![2.0, f64::NAN, -3.5, f64::INFINITY, 1.0]);
        assert_eq!(s.min(), -3.5);
        assert_eq!(s.max(), 2.0);

        let empty = Series::new("empty", vec![f64::NAN]);
        assert_eq!(empty.min(), f64::INFINITY);
        assert_eq!(empty.max(), f64::NEG_INFINITY);
    }
}
