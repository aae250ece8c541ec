use nalgebra::Vector3;
use stereonet::orient::{line_to_dcos, plane_to_dcos};

/// Eight tightly clustered near-vertical lineations (plunge 80–87°).
pub fn tight_cluster() -> Vec<Vector3<f64>> {
    (0..8)
        .map(|i| line_to_dcos(45.0 * i as f64, 80.0 + i as f64))
        .collect()
}

/// Eight plane poles forming a great-circle girdle: dips 10–80° every 10°
/// under two opposite azimuths.
pub fn great_circle_girdle() -> Vec<Vector3<f64>> {
    (1..=8)
        .map(|i| {
            let azimuth = if i % 2 == 0 { 90.0 } else { 270.0 };
            plane_to_dcos(azimuth, 10.0 * i as f64)
        })
        .collect()
}
