use serde::Serialize;

use crate::contour::LevelContours;

/// Density-grid stage summary.
#[derive(Clone, Debug, Serialize)]
pub struct DensityGridDiagnostics {
    pub grid_size: usize,
    pub defined_nodes: usize,
    pub undefined_nodes: usize,
    pub sigma_deg: f64,
    pub kappa: f64,
    pub max_density: f64,
    pub elapsed_ms: f64,
}

/// Marching-squares / assembly summary for one density level.
#[derive(Clone, Debug, Serialize)]
pub struct LevelDiagnostics {
    pub level: f64,
    pub segments: usize,
    pub paths: usize,
    pub closed_paths: usize,
    pub elapsed_ms: f64,
}

/// Per-stage diagnostics of one contouring run.
#[derive(Clone, Debug, Serialize)]
pub struct ContourDiagnostics {
    pub input_count: usize,
    pub rotated: bool,
    /// `None` when the input set was empty and the grid stage was skipped.
    pub grid: Option<DensityGridDiagnostics>,
    pub levels: Vec<LevelDiagnostics>,
    pub total_latency_ms: f64,
}

/// Contour set together with the diagnostics of the run that produced it.
#[derive(Clone, Debug, Serialize)]
pub struct DetailedContours {
    pub contours: Vec<LevelContours>,
    pub diagnostics: ContourDiagnostics,
}
