#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod contour;
pub mod diagnostics;
pub mod eigen;
pub mod orient;
pub mod projection;
pub mod stats;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
pub mod angle;
pub mod config;
pub mod density;
pub mod io;
pub mod math;

// --- High-level re-exports -------------------------------------------------

// Main entry points: contouring + statistics.
pub use crate::contour::{
    compute_contours, compute_contours_detailed, ContourOptions, LevelContours,
};
pub use crate::stats::{fisher_stats, principal_axes, FisherStats, PrincipalAxes};

// Eigendecomposition underlying the tensor statistics.
pub use crate::eigen::{symmetric_eigen, EigenDecomposition};

// Projection strategies consumed by the contour engine.
pub use crate::projection::{ProjectionKind, SphericalProjection};

// Attitude records shared across the conversion layer.
pub use crate::types::{LineAttitude, PlaneAttitude};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use stereonet::prelude::*;
///
/// let set: Vec<_> = (0..6).map(|i| line_to_dcos(60.0 * i as f64, 75.0)).collect();
/// let stats = fisher_stats(&set);
/// println!("n={} kappa={:.1} alpha95={:.2}", stats.n, stats.kappa, stats.alpha95);
/// ```
pub mod prelude {
    pub use crate::contour::{compute_contours, ContourOptions, LevelContours};
    pub use crate::orient::{line_to_dcos, plane_to_dcos};
    pub use crate::projection::ProjectionKind;
    pub use crate::stats::{fisher_stats, principal_axes};
    pub use crate::types::{LineAttitude, PlaneAttitude};
}
