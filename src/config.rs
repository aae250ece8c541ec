//! Runtime configuration for the demo binaries.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::contour::ContourOptions;

#[derive(Clone, Debug, Deserialize)]
pub struct ContourDemoConfig {
    /// Attitude dataset (JSON, see `io::AttitudeSet`).
    pub input: PathBuf,
    /// Contouring knobs; every field falls back to its default.
    #[serde(default)]
    pub contour: ContourOptions,
    /// Optional view re-centering as a `[trend, plunge]` pair in degrees;
    /// overrides `contour.rotation` when present.
    #[serde(default)]
    pub center: Option<[f64; 2]>,
    pub output: OutputConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    pub result_json: PathBuf,
}

pub fn load_config(path: &Path) -> Result<ContourDemoConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
