// Example: render_figures.rs
// Regenerates the three whitepaper figures: one CSV of the underlying data and
// one SVG chart per figure, plus the zero crossing of every curve.
//
// Usage:
//     cargo run --example render_figures -- [output_dir] [config.toml]
//
// Output defaults to ./figures. Set RUST_LOG=sif_lib=debug to see which
// sweeps reach the asymptotic EC branch.

use std::env;
use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use sif_lib::analysis::figures::{all_figures, FigureData};
use sif_lib::{default_configs, SifConfig};
use tracing_subscriber::EnvFilter;

const PALETTE: [RGBColor; 3] = [RED, BLUE, GREEN];

fn render_svg(fig: &FigureData, path: &Path) -> Result<(), Box<dyn Error>> {
    let x_min = fig.deltas.first().copied().unwrap_or(0.0);
    let x_max = fig.deltas.last().copied().unwrap_or(1.0);
    let (y_min, y_max) = fig.y_range(0.05);

    let root = SVGBackend::new(path, (1280, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(&fig.title, ("sans-serif", 30))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(fig.x_label.as_str())
        .y_desc(fig.y_label.as_str())
        .draw()?;

    // Zero line: left of a crossing the subsidy defends, right of it it is shielded
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x_min, 0.0), (x_max, 0.0)],
        BLACK.stroke_width(1),
    )))?;

    for (i, curve) in fig.curves.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let points: Vec<(f64, f64)> = fig
            .deltas
            .iter()
            .copied()
            .zip(curve.sst.iter().copied())
            .collect();
        chart
            .draw_series(std::iter::once(PathElement::new(
                points,
                color.stroke_width(2),
            )))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let out_dir = args.get(1).map(String::as_str).unwrap_or("figures");
    let config: SifConfig = match args.get(2) {
        Some(path) => SifConfig::from_toml_file(path)?,
        None => default_configs::paper(),
    };

    std::fs::create_dir_all(out_dir)?;
    println!("Rendering whitepaper figures into {}/", out_dir);

    for fig in all_figures(&config)? {
        let csv_path = fig.save_csv(out_dir)?;
        let svg_path = Path::new(out_dir).join(format!("{}.svg", fig.id));
        render_svg(&fig, &svg_path)?;

        println!("\n{}", fig.title);
        println!("  data:  {}", csv_path.display());
        println!("  chart: {}", svg_path.display());
        for (label, crossing) in fig.zero_crossings(&config)? {
            match crossing {
                Some(delta) => println!("  {:<16} SST = 0 at δ = {:.4}", label, delta),
                None => println!("  {:<16} no zero crossing in window", label),
            }
        }
    }

    Ok(())
}
