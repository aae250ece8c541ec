//! Conversions between geological attitudes and direction cosines.
//!
//! Frame convention
//! - x points to geographic north, y to east, z up.
//! - Orientations are undirected; every vector is represented by its
//!   lower-hemisphere (z ≤ 0) member. Conversions out of vector form fold the
//!   input to the lower hemisphere first by negating an upward vector.
//!
//! All angle arguments and results are degrees; azimuths are wrapped into
//! [0, 360). Degenerate geometry (parallel planes, aligned/antipodal rotation
//! targets) yields `None` or a documented fallback rather than an error,
//! since "no unique answer" is a normal outcome here.

use nalgebra::{Matrix3, Vector3};

use crate::angle::{clamped_acos, clamped_asin, wrap_azimuth};
use crate::math::{angle_between, normalize_or_zero, rotation_about_axis};
use crate::types::{LineAttitude, PlaneAttitude};

const DEGENERATE_CROSS: f64 = 1e-10;

/// Lower-hemisphere unit direction of a line given trend and plunge (degrees).
pub fn line_to_dcos(trend: f64, plunge: f64) -> Vector3<f64> {
    let t = trend.to_radians();
    let p = plunge.to_radians();
    Vector3::new(p.cos() * t.cos(), p.cos() * t.sin(), -p.sin())
}

/// Lower-hemisphere pole (unit normal) of a plane given dip direction and dip
/// (degrees).
pub fn plane_to_dcos(dip_direction: f64, dip: f64) -> Vector3<f64> {
    let dd = dip_direction.to_radians();
    let d = dip.to_radians();
    Vector3::new(-d.sin() * dd.cos(), -d.sin() * dd.sin(), -d.cos())
}

/// Folds a vector to its lower-hemisphere representative.
#[inline]
pub fn fold_lower(v: &Vector3<f64>) -> Vector3<f64> {
    if v.z > 0.0 {
        -v
    } else {
        *v
    }
}

/// Recovers trend/plunge from a unit vector (folded to the lower hemisphere).
pub fn dcos_to_line(v: &Vector3<f64>) -> LineAttitude {
    let d = fold_lower(v);
    let plunge = clamped_asin(-d.z).to_degrees();
    let trend = wrap_azimuth(d.y.atan2(d.x).to_degrees());
    LineAttitude::new(trend, plunge)
}

/// Recovers dip direction/dip of the plane whose pole is `v` (folded to the
/// lower hemisphere).
pub fn dcos_to_plane(v: &Vector3<f64>) -> PlaneAttitude {
    let d = fold_lower(v);
    let dip = clamped_acos(-d.z).to_degrees();
    let dip_direction = wrap_azimuth(d.y.atan2(d.x).to_degrees() + 180.0);
    PlaneAttitude::new(dip_direction, dip)
}

/// Unit vector of the line lying in the given plane at `rake` degrees from
/// strike (measured down-dip positive).
///
/// The result may fall in the upper hemisphere for rakes in (180, 360); use
/// [`rake_to_line`] for the folded attitude.
pub fn rake_to_dcos(dip_direction: f64, dip: f64, rake: f64) -> Vector3<f64> {
    let strike = line_to_dcos(dip_direction - 90.0, 0.0);
    let down_dip = line_to_dcos(dip_direction, dip);
    let r = rake.to_radians();
    strike * r.cos() + down_dip * r.sin()
}

/// Trend/plunge of the line lying in the given plane at `rake` degrees from
/// strike.
pub fn rake_to_line(dip_direction: f64, dip: f64, rake: f64) -> LineAttitude {
    dcos_to_line(&rake_to_dcos(dip_direction, dip, rake))
}

/// Rake (degrees in [0, 360)) of a line within a plane.
///
/// Inverse of [`rake_to_line`] up to the hemisphere-folding ambiguity: a rake
/// and its 180°-rotated counterpart describe the same undirected line, so
/// callers comparing rakes should compare modulo 180°.
pub fn line_on_plane(dip_direction: f64, dip: f64, trend: f64, plunge: f64) -> f64 {
    let strike = line_to_dcos(dip_direction - 90.0, 0.0);
    let down_dip = line_to_dcos(dip_direction, dip);
    let l = line_to_dcos(trend, plunge);
    wrap_azimuth(l.dot(&down_dip).atan2(l.dot(&strike)).to_degrees())
}

/// Intersection line of two planes, or `None` when the planes are parallel
/// (cross product of the poles shorter than 1e-10).
pub fn plane_intersection_line(
    dd1: f64,
    dip1: f64,
    dd2: f64,
    dip2: f64,
) -> Option<LineAttitude> {
    let cross = plane_to_dcos(dd1, dip1).cross(&plane_to_dcos(dd2, dip2));
    let norm = cross.norm();
    if norm < DEGENERATE_CROSS {
        return None;
    }
    Some(dcos_to_line(&(cross / norm)))
}

/// Minimal-angle rotation mapping the given direction to straight down
/// [0, 0, -1]. Used to re-center the projection on an arbitrary attitude.
pub fn rotation_from_center(trend: f64, plunge: f64) -> Matrix3<f64> {
    minimal_rotation(&line_to_dcos(trend, plunge), &Vector3::new(0.0, 0.0, -1.0))
}

/// View rotation that first spins about geographic north by `spin` degrees,
/// then tilts north onto the given direction (tilt ∘ spin).
pub fn rotation_from_north_pole(trend: f64, plunge: f64, spin: f64) -> Matrix3<f64> {
    let north = Vector3::x();
    let spin_m = rotation_about_axis(&north, spin.to_radians());
    let tilt = minimal_rotation(&north, &line_to_dcos(trend, plunge));
    tilt * spin_m
}

/// Shortest-arc rotation taking unit vector `from` onto unit vector `to`.
///
/// Degenerate cross product (< 1e-10): identical directions give the
/// identity, antipodal ones a 180° turn about an arbitrary perpendicular
/// axis.
fn minimal_rotation(from: &Vector3<f64>, to: &Vector3<f64>) -> Matrix3<f64> {
    let axis = from.cross(to);
    let norm = axis.norm();
    if norm < DEGENERATE_CROSS {
        if from.dot(to) > 0.0 {
            Matrix3::identity()
        } else {
            rotation_about_axis(&perpendicular_axis(from), std::f64::consts::PI)
        }
    } else {
        rotation_about_axis(&(axis / norm), angle_between(from, to))
    }
}

/// Any unit vector perpendicular to `v`; prefers the x axis ([1, 0, 0] when
/// `v` is vertical), falling back to z when `v` is x itself.
fn perpendicular_axis(v: &Vector3<f64>) -> Vector3<f64> {
    let candidate = Vector3::x() - v * v.x;
    let axis = normalize_or_zero(&candidate);
    if axis.norm() == 0.0 {
        Vector3::z()
    } else {
        axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::azimuth_difference;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn line_round_trip_recovers_attitude() {
        for &(trend, plunge) in &[(0.0, 0.0), (37.5, 12.0), (123.0, 45.0), (359.0, 88.0)] {
            let l = dcos_to_line(&line_to_dcos(trend, plunge));
            assert!(
                approx(l.plunge, plunge, 1e-6),
                "plunge mismatch for ({trend}, {plunge}): got {}",
                l.plunge
            );
            assert!(
                azimuth_difference(l.trend, trend) < 1e-6,
                "trend mismatch for ({trend}, {plunge}): got {}",
                l.trend
            );
        }
    }

    #[test]
    fn plane_round_trip_recovers_attitude() {
        for &(dd, dip) in &[(0.0, 30.0), (90.0, 45.0), (210.0, 89.0), (305.0, 0.5)] {
            let p = dcos_to_plane(&plane_to_dcos(dd, dip));
            assert!(
                approx(p.dip, dip, 1e-6),
                "dip mismatch for ({dd}, {dip}): got {}",
                p.dip
            );
            assert!(
                azimuth_difference(p.dip_direction, dd) < 1e-6,
                "dip direction mismatch for ({dd}, {dip}): got {}",
                p.dip_direction
            );
        }
    }

    #[test]
    fn upper_hemisphere_vector_is_folded() {
        let v = line_to_dcos(40.0, 20.0);
        let folded = dcos_to_line(&(-v));
        assert!(approx(folded.plunge, 20.0, 1e-9));
        assert!(azimuth_difference(folded.trend, 40.0) < 1e-9);
    }

    #[test]
    fn rake_line_lies_in_plane() {
        let (dd, dip) = (70.0, 35.0);
        let pole = plane_to_dcos(dd, dip);
        for rake in [0.0, 30.0, 90.0, 145.0, 270.0] {
            let d = rake_to_dcos(dd, dip, rake);
            assert!(
                d.dot(&pole).abs() < 1e-12,
                "rake {rake} left the plane: dot={}",
                d.dot(&pole)
            );
            assert!(approx(d.norm(), 1.0, 1e-12));
        }
    }

    #[test]
    fn line_on_plane_inverts_rake_modulo_half_turn() {
        let (dd, dip) = (110.0, 50.0);
        for rake in [10.0, 60.0, 90.0, 170.0, 250.0] {
            let line = rake_to_line(dd, dip, rake);
            let recovered = line_on_plane(dd, dip, line.trend, line.plunge);
            let diff = azimuth_difference(recovered, rake);
            assert!(
                diff < 1e-6 || approx(diff, 180.0, 1e-6),
                "rake {rake} recovered as {recovered}"
            );
        }
    }

    #[test]
    fn identical_planes_have_no_intersection() {
        assert!(plane_intersection_line(90.0, 45.0, 90.0, 45.0).is_none());
    }

    #[test]
    fn intersection_of_crossing_planes_lies_on_both() {
        let line = plane_intersection_line(90.0, 45.0, 180.0, 60.0)
            .expect("crossing planes intersect");
        let d = line.to_dcos();
        assert!(d.dot(&plane_to_dcos(90.0, 45.0)).abs() < 1e-12);
        assert!(d.dot(&plane_to_dcos(180.0, 60.0)).abs() < 1e-12);
    }

    #[test]
    fn rotation_from_center_maps_direction_down() {
        let r = rotation_from_center(42.0, 17.0);
        let moved = r * line_to_dcos(42.0, 17.0);
        assert!((moved - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
        assert!((r * r.transpose() - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn rotation_from_center_handles_already_centered() {
        let r = rotation_from_center(0.0, 90.0);
        assert!((r - Matrix3::identity()).norm() < 1e-9);
    }

    #[test]
    fn rotation_from_north_pole_moves_north_to_target() {
        let r = rotation_from_north_pole(250.0, 40.0, 75.0);
        let moved = r * Vector3::x();
        assert!((moved - line_to_dcos(250.0, 40.0)).norm() < 1e-12);
        assert!((r * r.transpose() - Matrix3::identity()).norm() < 1e-12);
    }
}
