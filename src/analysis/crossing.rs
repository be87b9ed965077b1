//! Zero crossings of SST in displacement.
//!
//! A uniform scan brackets every sign change, then Brent's method polishes each
//! bracket. The scan resolution bounds which crossings can be told apart: two
//! roots closer than one grid step cancel out.

use anyhow::{anyhow, Result};
use roots::{find_root_brent, SimpleConvergency};

use crate::analysis::config::SifConfig;
use crate::params::SifParams;

const BRENT_MAX_ITER: usize = 200;
const BISECTION_STEPS: usize = 200;

/// All sign changes of `f` on `[lo, hi]`, in ascending order.
pub fn find_zero_crossings<F>(
    f: F,
    lo: f64,
    hi: f64,
    samples: usize,
    tolerance: f64,
) -> Result<Vec<f64>>
where
    F: Fn(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
        return Err(anyhow!("Invalid search interval [{}, {}]", lo, hi));
    }
    if samples < 2 {
        return Err(anyhow!("Need at least 2 samples, got {}", samples));
    }
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(anyhow!("Tolerance must be positive, got {}", tolerance));
    }

    let step = (hi - lo) / (samples - 1) as f64;
    let eps = tolerance * lo.abs().max(hi.abs()).max(1.0);
    let mut roots = Vec::new();

    let mut x_prev = lo;
    let mut f_prev = f(lo);
    if f_prev == 0.0 {
        roots.push(lo);
    }

    for i in 1..samples {
        let x = if i == samples - 1 {
            hi
        } else {
            lo + step * i as f64
        };
        let fx = f(x);

        if fx == 0.0 {
            roots.push(x);
        } else if f_prev != 0.0 && f_prev.is_finite() && fx.is_finite() && f_prev.signum() != fx.signum()
        {
            let mut convergency = SimpleConvergency {
                eps,
                max_iter: BRENT_MAX_ITER,
            };
            let root = match find_root_brent(x_prev, x, &f, &mut convergency) {
                Ok(root) => root,
                Err(e) => {
                    tracing::warn!(
                        lo = x_prev,
                        hi = x,
                        error = ?e,
                        "Brent failed on bracket, falling back to bisection"
                    );
                    bisect(&f, x_prev, x, f_prev)
                }
            };
            roots.push(root);
        }

        x_prev = x;
        f_prev = fx;
    }

    Ok(roots)
}

fn bisect<F: Fn(f64) -> f64>(f: &F, mut a: f64, mut b: f64, mut fa: f64) -> f64 {
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (a + b);
        if mid <= a || mid >= b {
            break;
        }
        let fm = f(mid);
        if fm == 0.0 {
            return mid;
        }
        if fm.signum() == fa.signum() {
            a = mid;
            fa = fm;
        } else {
            b = mid;
        }
    }
    0.5 * (a + b)
}

/// Every SST zero crossing for `params` on `[lo, hi]`.
pub fn find_sst_zero_crossings(
    params: SifParams,
    lo: f64,
    hi: f64,
    config: &SifConfig,
) -> Result<Vec<f64>> {
    let evaluator = config.evaluator(params)?;
    find_zero_crossings(
        |d| evaluator.sst(d),
        lo,
        hi,
        config.crossing.samples,
        config.crossing.tolerance,
    )
}

/// Smallest SST zero crossing on `[lo, hi]`, if any.
pub fn first_sst_zero_crossing(
    params: SifParams,
    lo: f64,
    hi: f64,
    config: &SifConfig,
) -> Result<Option<f64>> {
    Ok(find_sst_zero_crossings(params, lo, hi, config)?
        .into_iter()
        .next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_roots() {
        let roots = find_zero_crossings(|x| (x - 1.0) * (x - 2.5), 0.0, 4.0, 50, 1e-12).unwrap();
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - 1.0).abs() < 1e-9);
        assert!((roots[1] - 2.5).abs() < 1e-9);
    }

    #[test]
    fn no_sign_change_no_roots() {
        let roots = find_zero_crossings(|x| x * x + 1.0, -3.0, 3.0, 100, 1e-12).unwrap();
        assert!(roots.is_empty());
    }

    #[test]
    fn rejects_bad_intervals() {
        assert!(find_zero_crossings(|x| x, 1.0, 0.0, 10, 1e-12).is_err());
        assert!(find_zero_crossings(|x| x, 0.0, 1.0, 1, 1e-12).is_err());
        assert!(find_zero_crossings(|x| x, 0.0, f64::INFINITY, 10, 1e-12).is_err());
    }

    #[test]
    fn bisection_fallback_converges() {
        let f = |x: f64| x * x - 2.0;
        let root = bisect(&f, 0.0, 2.0, f(0.0));
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
