use serde::Serialize;
use std::env;
use std::path::Path;

use stereonet::config::{load_config, ContourDemoConfig};
use stereonet::contour::compute_contours_detailed;
use stereonet::diagnostics::ContourDiagnostics;
use stereonet::io::{load_attitudes, write_json_file};
use stereonet::orient::rotation_from_center;
use stereonet::stats::{fisher_stats, principal_axes, FisherStats, PrincipalAxes};
use stereonet::LevelContours;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config: ContourDemoConfig = load_config(Path::new(&config_path))?;

    let dataset = load_attitudes(&config.input)?;
    let set = dataset.to_dcos();

    let mut options = config.contour.clone();
    if let Some([trend, plunge]) = config.center {
        options.rotation = Some(rotation_from_center(trend, plunge));
    }

    let fisher = fisher_stats(&set);
    let axes = principal_axes(&set);
    let detailed = compute_contours_detailed(&set, &options);

    let result = ContourDemoOutput {
        plane_count: dataset.planes.len(),
        line_count: dataset.lines.len(),
        fisher,
        principal_axes: axes,
        contours: detailed.contours,
        diagnostics: detailed.diagnostics,
    };
    write_json_file(&config.output.result_json, &result)?;

    println!(
        "Saved statistics and {} contour levels for {} attitudes to {}",
        result.contours.len(),
        result.plane_count + result.line_count,
        config.output.result_json.display()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: contour_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContourDemoOutput {
    plane_count: usize,
    line_count: usize,
    fisher: FisherStats,
    principal_axes: PrincipalAxes,
    contours: Vec<LevelContours>,
    diagnostics: ContourDiagnostics,
}
