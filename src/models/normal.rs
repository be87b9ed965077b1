//! Standard normal CDF and a log-space quantile function.
//!
//! The quantile uses Wichura's AS241 (PPND16) rational approximations. In the
//! tails the working variable is `sqrt(-ln p)`, which we take straight from the
//! log-probability so that probabilities far below `f64::MIN_POSITIVE` never have
//! to be materialised.

use std::f64::consts::{LN_2, SQRT_2};

// |q| <= 0.425, r = 0.180625 - q^2
const A: [f64; 8] = [
    3.387_132_872_796_366_6,
    133.141_667_891_784_37,
    1_971.590_950_306_551_4,
    13_731.693_765_509_461,
    45_921.953_931_549_87,
    67_265.770_927_008_7,
    33_430.575_583_588_13,
    2_509.080_928_730_122_7,
];
const B: [f64; 8] = [
    1.0,
    42.313_330_701_600_91,
    687.187_007_492_057_9,
    5_394.196_021_424_751,
    21_213.794_301_586_597,
    39_307.895_800_092_71,
    28_729.085_735_721_943,
    5_226.495_278_852_546,
];

// 1.6 <= sqrt(-ln p) <= 5
const C: [f64; 8] = [
    1.423_437_110_749_683_6,
    4.630_337_846_156_545,
    5.769_497_221_460_691,
    3.647_848_324_763_204_5,
    1.270_458_252_452_368_4,
    0.241_780_725_177_450_6,
    0.022_723_844_989_269_184,
    7.745_450_142_783_414e-4,
];
const D: [f64; 8] = [
    1.0,
    2.053_191_626_637_759,
    1.676_384_830_183_803_8,
    0.689_767_334_985_1,
    0.148_103_976_427_480_07,
    0.015_198_666_563_616_457,
    5.475_938_084_995_345e-4,
    1.050_750_071_644_416_8e-9,
];

// sqrt(-ln p) > 5
const E: [f64; 8] = [
    6.657_904_643_501_104,
    5.463_784_911_164_114,
    1.784_826_539_917_291_3,
    0.296_560_571_828_504_9,
    0.026_532_189_526_576_124,
    0.001_242_660_947_388_078_4,
    2.711_555_568_743_487_6e-5,
    2.010_334_399_292_288_1e-7,
];
const F: [f64; 8] = [
    1.0,
    0.599_832_206_555_887_9,
    0.136_929_880_922_735_8,
    0.014_875_361_290_850_615,
    7.868_691_311_456_133e-4,
    1.846_318_317_510_054_8e-5,
    1.421_511_758_316_446e-7,
    2.044_263_103_389_939_8e-15,
];

#[inline]
fn horner(coeffs: &[f64; 8], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc.mul_add(x, c))
}

/// Standard normal cumulative distribution function.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * libm::erfc(-x / SQRT_2)
}

/// Standard normal quantile `Φ⁻¹(p)` for `p` in `[0, 1]`.
///
/// Returns `-∞`/`+∞` at the endpoints and `NaN` outside the unit interval.
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    inverse_normal_cdf_log(p.ln())
}

/// Standard normal quantile evaluated from `ln p`.
///
/// Accepts any `log_p <= 0`, including values whose exponential underflows
/// (e.g. `-1e4`). Positive `log_p` is not a probability and yields `NaN`.
pub fn inverse_normal_cdf_log(log_p: f64) -> f64 {
    if log_p.is_nan() || log_p > 0.0 {
        return f64::NAN;
    }
    if log_p == 0.0 {
        return f64::INFINITY;
    }
    if log_p == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }

    // q = p - 1/2 without cancellation near the median
    let q = 0.5 * (log_p + LN_2).exp_m1();

    if q.abs() <= 0.425 {
        let r = 0.180_625 - q * q;
        return q * horner(&A, r) / horner(&B, r);
    }

    // ln of the smaller tail mass
    let log_tail = if q < 0.0 {
        log_p
    } else {
        (-log_p.exp_m1()).ln()
    };
    let mut r = (-log_tail).sqrt();

    let value = if r <= 5.0 {
        r -= 1.6;
        horner(&C, r) / horner(&D, r)
    } else {
        r -= 5.0;
        horner(&E, r) / horner(&F, r)
    };

    if q < 0.0 {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::{ContinuousCDF, Normal};

    fn assert_close(actual: f64, expected: f64, rtol: f64) {
        let err = (actual - expected).abs();
        assert!(
            err <= rtol * expected.abs().max(1e-300) || err < 1e-14,
            "expected {expected}, got {actual} (err {err})"
        );
    }

    #[test]
    fn known_quantiles() {
        assert_eq!(inverse_normal_cdf(0.5), 0.0);
        assert_close(inverse_normal_cdf(0.975), 1.959_963_984_540_054, 1e-14);
        assert_close(inverse_normal_cdf(0.025), -1.959_963_984_540_054, 1e-14);
        assert_close(inverse_normal_cdf(0.841_344_746_068_542_9), 1.0, 1e-12);
        assert_close(inverse_normal_cdf(1e-10), -6.361_340_902_404_056, 1e-13);
    }

    #[test]
    fn endpoints_and_invalid_inputs() {
        assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
        assert!(inverse_normal_cdf(1.5).is_nan());
        assert!(inverse_normal_cdf(-0.1).is_nan());
        assert!(inverse_normal_cdf_log(0.1).is_nan());
        assert!(inverse_normal_cdf_log(f64::NAN).is_nan());
    }

    #[test]
    fn matches_statrs_across_regions() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        for &p in &[
            1e-300, 1e-200, 1e-100, 1e-20, 1e-8, 0.001, 0.02, 0.075, 0.2, 0.4, 0.6, 0.8,
            0.925, 0.98, 0.999, 0.999_999,
        ] {
            assert_close(inverse_normal_cdf(p), normal.inverse_cdf(p), 1e-12);
        }
    }

    #[test]
    fn deep_tail_from_log_probability() {
        // Mills-ratio tail relation ln p ≈ -x²/2 - ln(-x) - ln(2π)/2 + ln(1 - 1/x² + 3/x⁴)
        let log_p = -700.0;
        let x = inverse_normal_cdf_log(log_p);
        assert!(x.is_finite() && x < -37.0);
        let x2 = x * x;
        let implied = -0.5 * x2 - (-x).ln() - 0.5 * (2.0 * std::f64::consts::PI).ln()
            + (-1.0 / x2 + 3.0 / (x2 * x2)).ln_1p();
        assert!((implied - log_p).abs() < 1e-6, "implied {implied}");

        // e^-1000 underflows to zero, the log-space input does not
        let deeper = inverse_normal_cdf_log(-1000.0);
        assert!(deeper.is_finite() && deeper < x);
    }

    #[test]
    fn cdf_round_trip() {
        for &p in &[1e-12, 0.01, 0.3, 0.5, 0.7, 0.99] {
            let x = inverse_normal_cdf(p);
            assert_close(normal_cdf(x), p, 1e-12);
        }
    }

    #[test]
    fn upper_tail_symmetry() {
        for &p in &[1e-15, 1e-6, 0.01, 0.1] {
            let lo = inverse_normal_cdf(p);
            let hi = inverse_normal_cdf_log((-p).ln_1p());
            assert_close(hi, -lo, 1e-10);
        }
    }
}
