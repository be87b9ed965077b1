// Example: sif_demo.rs
// Walks through the library: single-point evaluation, the hybrid EC across the
// exact/asymptotic threshold, a sweep with CSV export and the paper-form fit.
//
// Usage:
//     RUST_LOG=sif_lib=debug cargo run --example sif_demo

use sif_lib::{
    default_configs, ec_asymptotic_leading, ec_exact, evaluate, evaluate_sweep,
    exigence_coefficient, first_sst_zero_crossing, fit_paper_form, linspace, save_series_csv,
    EcMethod, SifConfig, SifParams,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Subsidy Immunity Formula Demo\n");

    // 1. Single points
    println!("1. Point evaluation (r = 5%, σ = 20%):");
    println!("   {:>8} {:>10} {:>12} {:>12} {:>12}", "δ", "EC", "SST", "ρ_sif", "ν_sif");
    for &delta in &[0.0, 0.5, 1.0, 2.0, 2.76, 5.0] {
        let p = evaluate(delta, 0.05, 0.20)?;
        println!(
            "   {:>8.3} {:>10.5} {:>12.4} {:>12.2} {:>12.2}",
            p.delta, p.ec, p.sst, p.rho, p.vega
        );
    }

    // 2. EC around the switch-over
    println!("\n2. Exigence Coefficient near the asymptotic threshold:");
    for &delta in &[650.0, 699.0, 700.0, 712.0, 1500.0] {
        println!(
            "   δ = {:>7.1}  hybrid = {:.10}  exact = {:.10}  leading term = {:.10}",
            delta,
            exigence_coefficient(delta),
            ec_exact(delta),
            ec_asymptotic_leading(delta)
        );
    }

    // 3. Zero crossings, exact vs polynomial EC
    let params = SifParams::new(0.05, 0.20)?;
    let config = default_configs::paper();
    let polynomial = SifConfig {
        ec_method: EcMethod::Polynomial,
        ..default_configs::paper()
    };
    println!("\n3. First SST zero crossing (r = 5%, σ = 20%):");
    for (name, cfg) in [("hybrid", &config), ("polynomial", &polynomial)] {
        match first_sst_zero_crossing(params, 0.001, 10.0, cfg)? {
            Some(delta) => println!("   {:<10} δ* = {:.4}", name, delta),
            None => println!("   {:<10} no crossing", name),
        }
    }

    // 4. Sweep across both branches
    let deltas = linspace(0.001, 2000.0, 1000);
    let sweep = evaluate_sweep(&deltas, SifParams::new(0.02, 0.10)?, &config)?;
    println!(
        "\n4. Sweep of {} points (r = 2%, σ = 10%), {} on the asymptotic branch",
        sweep.len(),
        sweep.asymptotic_points
    );
    let out = std::env::temp_dir().join("sif_sweep.csv");
    save_series_csv(&out, &sweep.deltas, &sweep.to_series())?;
    println!("   written to {}", out.display());

    // 5. Refit the paper's affine EC stand-in
    let window = linspace(0.01, 3.5, 200);
    let fit = fit_paper_form(&window, 0.05, &[0.20, 0.50], &default_configs::precise())?;
    println!("\n5. Paper form fit on δ ∈ [0.01, 3.5]:");
    println!(
        "   a = {:.4}, b = {:.4} (published 0.8, 1.2)",
        fit.coefficients.a, fit.coefficients.b
    );
    println!("   loss {:.6} -> {:.6}", fit.initial_loss, fit.loss);
    for s in &fit.stats {
        println!(
            "   σ = {:.2}: RMSE fitted {:.4} vs published {:.4}, max |Δ| {:.4}",
            s.sigma, s.fitted.rmse, s.paper.rmse, s.fitted.max_abs
        );
    }

    Ok(())
}
