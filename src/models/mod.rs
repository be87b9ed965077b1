pub mod ec;
pub mod normal;
pub mod paper_form;
pub mod sst;

pub use ec::{EcBranch, EcMethod, ExigenceModel, HybridEc, PolynomialEc};
pub use sst::{GreekMethod, SifEvaluator, SifPoint};

/// Grid helpers shared by sweeps, fits and crossing scans
pub mod utils {
    /// `n` evenly spaced points from `start` to `end` inclusive.
    pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (n - 1) as f64;
                let mut grid: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
                // pin the last point to avoid accumulated rounding
                grid[n - 1] = end;
                grid
            }
        }
    }

}
