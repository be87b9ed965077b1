
use sif_lib::{
    ec_asymptotic, ec_asymptotic_leading, ec_exact, exigence_coefficient, exigence_coefficients,
    EcBranch, ExigenceModel, HybridEc, EXACT_THRESHOLD,
};
use test_utils::{assert_close, reference_ec, relative_gap};

/// Exact branch against statrs' inverse CDF over δ ∈ [-50, 699], to a few hundred ulps.
#[test]
fn test_exact_branch_matches_reference_inverse_cdf() {
    let mut delta = -50.0;
    while delta <= 699.0 {
        let expected = reference_ec(delta);
        assert_close(ec_exact(delta), expected, 1e-13, 1e-15, &format!("δ={delta}"));
        assert_eq!(exigence_coefficient(delta), ec_exact(delta));
        delta += 0.37;
    }

    for &d in &[0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 699.0] {
        assert_close(ec_exact(d), reference_ec(d), 1e-13, 1e-15, &format!("δ={d}"));
    }
}

/// No jump when the hybrid model switches branches.
#[test]
fn test_threshold_continuity() {
    let model = HybridEc::default();
    assert_eq!(model.branch(EXACT_THRESHOLD), EcBranch::Asymptotic);

    let exact_at = ec_exact(EXACT_THRESHOLD);
    let hybrid_at = model.ec(EXACT_THRESHOLD);
    assert!(relative_gap(hybrid_at, exact_at) < 3e-3);
    // the refined expansion is far inside the bound
    assert!(relative_gap(hybrid_at, exact_at) < 1e-8);

    // neighbouring grid points either side of the switch
    let below = model.ec(699.0);
    assert!(relative_gap(hybrid_at, below) < 3e-3);
    assert!(hybrid_at > below);

    let just_below = model.ec(EXACT_THRESHOLD - 1e-9);
    assert!(relative_gap(hybrid_at, just_below) < 1e-8);
}

/// The leading term alone overshoots slightly; refinement closes the gap.
#[test]
fn test_leading_term_accuracy_at_threshold() {
    let exact = ec_exact(EXACT_THRESHOLD);
    let lead = ec_asymptotic_leading(EXACT_THRESHOLD);
    let gap = relative_gap(lead, exact);
    assert!(gap > 1e-3 && gap < 5e-3, "leading-term gap {gap}");
    assert!(relative_gap(ec_asymptotic(EXACT_THRESHOLD, 1), exact) < gap);
}

#[test]
fn test_custom_threshold_continuity() {
    for &threshold in &[50.0, 300.0, 690.0] {
        let model = HybridEc::new(threshold, 3);
        let gap = relative_gap(model.ec(threshold), ec_exact(threshold));
        assert!(gap < 1e-6, "threshold {threshold}: gap {gap}");
    }
}

/// EC(δ) is non-decreasing for δ > 0, across both branches.
#[test]
fn test_monotonic_for_positive_displacement() {
    let mut prev = exigence_coefficient(1e-3);
    let mut delta = 1e-3;
    while delta < 2000.0 {
        delta += 0.05;
        let ec = exigence_coefficient(delta);
        assert!(ec >= prev, "EC decreased at δ={delta}: {prev} -> {ec}");
        prev = ec;
    }
}

/// Dense scans across the AS241 region boundaries (p = 0.075 and √(-ln p) = 5)
/// and the exact/asymptotic switch: any decrease stays within a few ulps.
#[test]
fn test_monotonic_to_rounding_across_seams() {
    let central_seam = -(0.15_f64).ln();
    let tail_seam = 25.0 - std::f64::consts::LN_2;
    for &(centre, half_width) in &[
        (central_seam, 1e-6),
        (tail_seam, 1e-6),
        (EXACT_THRESHOLD, 1e-9),
    ] {
        let n = 20_000;
        let lo = centre - half_width;
        let step = 2.0 * half_width / n as f64;
        let mut prev = exigence_coefficient(lo);
        for i in 1..=n {
            let delta = lo + step * i as f64;
            let ec = exigence_coefficient(delta);
            let allowed = 4.0 * f64::EPSILON * prev;
            assert!(
                ec >= prev - allowed,
                "EC dropped by {:e} at δ={delta}",
                (prev - ec) / prev
            );
            prev = ec;
        }
    }

    let below = exigence_coefficient(EXACT_THRESHOLD - 1e-12);
    assert!(exigence_coefficient(EXACT_THRESHOLD) > below);
}

#[test]
fn test_finite_over_extended_domain() {
    for &d in &[-1e9, -50.0, -0.5, 0.0, 1e-300, 1.0, 699.9, 700.0, 2000.0, 1e6, 1e12] {
        let ec = exigence_coefficient(d);
        assert!(ec.is_finite() && ec >= 0.0, "δ={d}: EC={ec}");
    }
    assert!(exigence_coefficient(f64::NAN).is_nan());
}

/// Recomputing with identical inputs is bit-identical.
#[test]
fn test_idempotent_evaluation() {
    for &d in &[-3.0, 0.25, 2.3, 699.5, 712.0, 1e5] {
        assert_eq!(
            exigence_coefficient(d).to_bits(),
            exigence_coefficient(d).to_bits()
        );
    }
    let grid = [0.5, 5.0, 50.0, 750.0];
    assert_eq!(exigence_coefficients(&grid), exigence_coefficients(&grid));
}

#[test]
fn test_slice_matches_scalar() {
    let grid = [-2.0, 0.0, 1.0, 700.0, 1500.0];
    let many = exigence_coefficients(&grid);
    assert_eq!(many.len(), grid.len());
    for (d, ec) in grid.iter().zip(&many) {
        assert_eq!(*ec, exigence_coefficient(*d));
    }
}
