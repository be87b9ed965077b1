
use rand::{rngs::StdRng, Rng, SeedableRng};
use sif_lib::{
    evaluate, evaluate_with, exigence_coefficient, first_sst_zero_crossing,
    find_sst_zero_crossings, strategic_shielding_time, strategic_shielding_times, EcBranch,
    EcMethod, GreekMethod, HybridEc, SifConfig, SifError, SifEvaluator, SifParams,
};
use test_utils::{assert_close, create_test_config};

fn assert_finite_point(delta: f64, r: f64, sigma: f64, config: &SifConfig) {
    let params = SifParams::new(r, sigma).unwrap();
    let p = evaluate_with(delta, params, config).unwrap();
    for (name, v) in [
        ("ec", p.ec),
        ("sst", p.sst),
        ("rho", p.rho),
        ("vega", p.vega),
    ] {
        assert!(v.is_finite(), "{name} not finite at δ={delta}, r={r}, σ={sigma}: {v}");
    }
}

/// SST and both Greeks stay finite over δ ∈ [-50, 2000], σ, r ∈ (0, 1].
#[test]
fn test_sst_and_greeks_finite_over_domain() {
    let analytic = create_test_config();
    let numeric = SifConfig {
        greek_method: GreekMethod::central_difference(),
        ..create_test_config()
    };

    let mut rng = StdRng::seed_from_u64(20_260_101);
    for _ in 0..5_000 {
        let delta = rng.gen_range(-50.0..=2000.0);
        let r = rng.gen_range(1e-4..=1.0);
        let sigma = rng.gen_range(1e-4..=1.0);
        assert_finite_point(delta, r, sigma, &analytic);
        assert_finite_point(delta, r, sigma, &numeric);
    }

    // corners and the special displacements
    for &delta in &[-50.0, -0.6931, 0.0, 1e-9, 699.999, 700.0, 2000.0] {
        for &r in &[1e-4, 0.05, 1.0] {
            for &sigma in &[1e-4, 0.2, 1.0] {
                assert_finite_point(delta, r, sigma, &analytic);
            }
        }
    }
}

#[test]
fn test_domain_violations() {
    assert!(matches!(
        evaluate(1.0, 0.0, 0.2).unwrap_err().downcast::<SifError>(),
        Ok(SifError::InvalidRate(_))
    ));
    assert!(matches!(
        evaluate(1.0, 0.05, 0.0).unwrap_err().downcast::<SifError>(),
        Ok(SifError::InvalidVolatility(_))
    ));
    assert!(evaluate(f64::INFINITY, 0.05, 0.2).is_err());
    assert!(strategic_shielding_times(&[1.0, 2.0], -0.05, 0.2).is_err());
}

/// Exact-EC zero crossing for the σ = 20%, r = 5% curve.
#[test]
fn test_zero_crossing_standard_volatility() {
    let config = create_test_config();
    let params = SifParams::new(0.05, 0.20).unwrap();
    let root = first_sst_zero_crossing(params, 0.001, 10.0, &config)
        .unwrap()
        .expect("σ=20% curve should cross zero");
    assert!((root - 2.76).abs() < 0.02, "exact-EC crossing at {root}");
    assert!(strategic_shielding_time(root, 0.05, 0.20).unwrap().abs() < 1e-6);
    assert!(strategic_shielding_time(2.3, 0.05, 0.20).unwrap() < 0.0);
    assert!(strategic_shielding_time(3.0, 0.05, 0.20).unwrap() > 0.0);
}

/// The whitepaper's polynomial EC puts the same crossing near δ = 2.3.
#[test]
fn test_zero_crossing_polynomial_ec() {
    let config = SifConfig {
        ec_method: EcMethod::Polynomial,
        ..create_test_config()
    };
    let params = SifParams::new(0.05, 0.20).unwrap();
    let root = first_sst_zero_crossing(params, 0.001, 5.0, &config)
        .unwrap()
        .expect("polynomial curve should cross zero");
    assert!((root - 2.3).abs() < 0.05, "polynomial-EC crossing at {root}");
}

/// σ = 10%: the crossing at δ = 712 sits on the asymptotic branch and the
/// bracketing scan straddles the switch-over without spurious roots.
#[test]
fn test_zero_crossing_past_threshold() {
    let config = create_test_config();
    let sigma: f64 = 0.10;
    let target = 712.0;
    assert_eq!(HybridEc::default().branch(target), EcBranch::Asymptotic);

    // rate that makes SST vanish exactly at the target displacement
    let ec = exigence_coefficient(target);
    let r = sigma.powi(2) * ec * ec / target;

    let params = SifParams::new(r, sigma).unwrap();
    let roots = find_sst_zero_crossings(params, 650.0, 800.0, &config).unwrap();
    assert_eq!(roots.len(), 1, "roots: {roots:?}");
    assert!((roots[0] - target).abs() < 1e-6, "root at {}", roots[0]);
}

/// With r = 2%, σ = 10% the leading-order term √(2δ) would make SST jump at the
/// switch-over; the refined branch does not.
#[test]
fn test_sst_continuous_across_threshold() {
    let params = SifParams::new(0.02, 0.10).unwrap();
    let refined = create_test_config().evaluator(params).unwrap();
    let gap = (refined.sst(700.0) - refined.sst(700.0 - 1e-6)).abs();
    assert!(gap < 1e-3, "refined SST gap {gap}");

    let leading_only = SifConfig {
        asymptotic_refinements: 0,
        ..create_test_config()
    }
    .evaluator(params)
    .unwrap();
    let jump = (leading_only.sst(700.0) - leading_only.sst(700.0 - 1e-6)).abs();
    assert!(jump > 100.0, "leading-term jump {jump}");
}

#[test]
fn test_sst_matches_reference_script_formula() {
    for &(delta, r, sigma) in &[(1.234, 0.05, 0.20), (0.5, 0.02, 0.5), (10.0, 0.04, 0.15)] {
        let ec = exigence_coefficient(delta);
        let expected = delta / r - (delta / (sigma * ec)).powi(2);
        let actual = strategic_shielding_time(delta, r, sigma).unwrap();
        assert_close(actual, expected, 1e-10, 1e-12, &format!("δ={delta}"));
    }
}

/// The polynomial approximation differs from exact SST by more than a year
/// somewhere on the paper's window.
#[test]
fn test_polynomial_deviates_from_exact() {
    let params = SifParams::new(0.05, 0.20).unwrap();
    let exact = create_test_config().evaluator(params).unwrap();
    let poly = SifConfig {
        ec_method: EcMethod::Polynomial,
        ..create_test_config()
    }
    .evaluator(params)
    .unwrap();

    let deltas = sif_lib::linspace(0.01, 5.0, 200);
    let max_diff = deltas
        .iter()
        .map(|&d| (exact.sst(d) - poly.sst(d)).abs())
        .fold(0.0, f64::max);
    assert!(max_diff > 1.0, "max diff {max_diff}");
}

#[test]
fn test_greek_signs() {
    let eval = SifEvaluator::hybrid(SifParams::new(0.05, 0.2).unwrap()).unwrap();
    for &d in &[0.5, 5.0, 900.0] {
        // higher rates shorten duration, higher volatility eases the penalty
        assert!(eval.rho(d) < 0.0);
        assert!(eval.vega(d) > 0.0);
    }
    assert_eq!(eval.rho(0.0), 0.0);
}

#[test]
fn test_repeated_evaluation_is_bit_identical() {
    for &d in &[0.0, 2.3, 712.0] {
        let a = evaluate(d, 0.05, 0.1).unwrap();
        let b = evaluate(d, 0.05, 0.1).unwrap();
        assert_eq!(a.sst.to_bits(), b.sst.to_bits());
        assert_eq!(a.vega.to_bits(), b.vega.to_bits());
    }
}
