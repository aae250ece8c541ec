//! I/O helpers for attitude datasets and JSON results.
//!
//! - `load_attitudes`: read a JSON dataset of plane and line attitudes.
//! - `write_json_file`: pretty-print a serializable value to disk.
//!
//! Parsing free-text attitude notations (quadrant strings, strike
//! conventions) is out of scope here; datasets carry numeric degree pairs.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use nalgebra::Vector3;

use crate::orient::{line_to_dcos, plane_to_dcos};

/// Numeric attitude dataset: planes as `[dip_direction, dip]` pairs and
/// lines as `[trend, plunge]` pairs, both in degrees.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AttitudeSet {
    #[serde(default)]
    pub planes: Vec<[f64; 2]>,
    #[serde(default)]
    pub lines: Vec<[f64; 2]>,
}

impl AttitudeSet {
    /// Direction cosines of the whole dataset: plane poles followed by line
    /// directions.
    pub fn to_dcos(&self) -> Vec<Vector3<f64>> {
        self.planes
            .iter()
            .map(|&[dd, dip]| plane_to_dcos(dd, dip))
            .chain(self.lines.iter().map(|&[t, p]| line_to_dcos(t, p)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.planes.len() + self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty() && self.lines.is_empty()
    }
}

/// Load an attitude dataset from a JSON file.
pub fn load_attitudes(path: &Path) -> Result<AttitudeSet, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read dataset {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse dataset {}: {e}", path.display()))
}

/// Pretty-print a serializable value to a JSON file, creating parent
/// directories as needed.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize result for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
