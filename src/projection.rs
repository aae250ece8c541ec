//! Lower-hemisphere-to-disk projections.
//!
//! Contouring and rendering work in projected 2D coordinates; the two
//! standard stereonet mappings are provided and further projections only need
//! to implement [`SphericalProjection`] with the correct disk radius.
//!
//! Both directions of each mapping are exact inverses on the closed disk.
//! `inverse` returns `None` outside the disk: a normal "no answer" for grid
//! nodes that fall off the projection, not an error.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Two-function contract of a hemisphere-to-disk projection.
///
/// Implementations are stateless value types; the `Sync` bound lets the
/// density grid share one across worker threads.
pub trait SphericalProjection: Sync {
    /// Radius of the projected disk (the image of the horizontal circle).
    fn disk_radius(&self) -> f64;

    /// Maps a lower-hemisphere unit vector to projected coordinates.
    fn project(&self, d: &Vector3<f64>) -> [f64; 2];

    /// Maps projected coordinates back to a lower-hemisphere unit vector, or
    /// `None` when (x, y) lies outside the projection disk.
    fn inverse(&self, x: f64, y: f64) -> Option<Vector3<f64>>;
}

/// Lambert azimuthal equal-area (Schmidt) projection; disk radius √2.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqualArea;

impl SphericalProjection for EqualArea {
    fn disk_radius(&self) -> f64 {
        std::f64::consts::SQRT_2
    }

    fn project(&self, d: &Vector3<f64>) -> [f64; 2] {
        let f = (2.0 / (1.0 - d.z)).sqrt();
        [d.x * f, d.y * f]
    }

    fn inverse(&self, x: f64, y: f64) -> Option<Vector3<f64>> {
        let rho_sq = x * x + y * y;
        if rho_sq > 2.0 {
            return None;
        }
        let f = (1.0 - rho_sq / 4.0).sqrt();
        Some(Vector3::new(x * f, y * f, rho_sq / 2.0 - 1.0))
    }
}

/// Stereographic equal-angle (Wulff) projection; disk radius 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqualAngle;

impl SphericalProjection for EqualAngle {
    fn disk_radius(&self) -> f64 {
        1.0
    }

    fn project(&self, d: &Vector3<f64>) -> [f64; 2] {
        let f = 1.0 / (1.0 - d.z);
        [d.x * f, d.y * f]
    }

    fn inverse(&self, x: f64, y: f64) -> Option<Vector3<f64>> {
        let rho_sq = x * x + y * y;
        if rho_sq > 1.0 {
            return None;
        }
        let f = 2.0 / (1.0 + rho_sq);
        Some(Vector3::new(x * f, y * f, (rho_sq - 1.0) / (1.0 + rho_sq)))
    }
}

/// Named selection of the built-in projections, usable in serde configs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionKind {
    #[default]
    EqualArea,
    EqualAngle,
}

impl ProjectionKind {
    /// The projection strategy behind this name.
    pub fn as_projection(&self) -> &'static dyn SphericalProjection {
        match self {
            ProjectionKind::EqualArea => &EqualArea,
            ProjectionKind::EqualAngle => &EqualAngle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orient::line_to_dcos;

    fn round_trip(proj: &dyn SphericalProjection, d: Vector3<f64>) {
        let [x, y] = proj.project(&d);
        let back = proj
            .inverse(x, y)
            .unwrap_or_else(|| panic!("projected point ({x}, {y}) should invert"));
        assert!(
            (back - d).norm() < 1e-12,
            "round trip drifted: {d:?} -> ({x}, {y}) -> {back:?}"
        );
        assert!(x * x + y * y <= proj.disk_radius().powi(2) + 1e-12);
    }

    #[test]
    fn equal_area_round_trips_lower_hemisphere() {
        for &(t, p) in &[(0.0, 0.0), (45.0, 10.0), (200.0, 55.0), (10.0, 89.9)] {
            round_trip(&EqualArea, line_to_dcos(t, p));
        }
    }

    #[test]
    fn equal_angle_round_trips_lower_hemisphere() {
        for &(t, p) in &[(0.0, 0.0), (120.0, 30.0), (330.0, 75.0), (10.0, 89.9)] {
            round_trip(&EqualAngle, line_to_dcos(t, p));
        }
    }

    #[test]
    fn nadir_projects_to_origin() {
        let down = Vector3::new(0.0, 0.0, -1.0);
        assert_eq!(EqualArea.project(&down), [0.0, 0.0]);
        assert_eq!(EqualAngle.project(&down), [0.0, 0.0]);
    }

    #[test]
    fn inverse_rejects_points_outside_disk() {
        assert!(EqualArea.inverse(1.5, 0.5).is_none()); // rho^2 = 2.5 > 2
        assert!(EqualArea.inverse(1.0, 1.0).is_some()); // rho^2 = 2 on the rim
        assert!(EqualAngle.inverse(0.8, 0.7).is_none()); // rho^2 = 1.13 > 1
        assert!(EqualAngle.inverse(1.0, 0.0).is_some());
    }

    #[test]
    fn inverse_results_are_unit_lower_hemisphere() {
        for (x, y) in [(0.0, 0.0), (0.3, -0.4), (0.9, 0.1), (-0.5, 0.5)] {
            for proj in [&EqualArea as &dyn SphericalProjection, &EqualAngle] {
                let d = proj.inverse(x, y).expect("inside the unit disk");
                assert!((d.norm() - 1.0).abs() < 1e-12);
                assert!(d.z <= 0.0);
            }
        }
    }

    #[test]
    fn projection_kind_deserializes_kebab_case() {
        let kind: ProjectionKind = serde_json::from_str("\"equal-angle\"").unwrap();
        assert_eq!(kind, ProjectionKind::EqualAngle);
        assert_eq!(
            serde_json::to_string(&ProjectionKind::EqualArea).unwrap(),
            "\"equal-area\""
        );
    }
}
