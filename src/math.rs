//! Small vector/matrix primitives on top of nalgebra.
//!
//! Everything here is pure and allocates its result per call; inputs are never
//! mutated. Dot, cross, transpose and matrix products come straight from
//! nalgebra; this module only adds the operations with domain-specific
//! degenerate-case contracts.

use nalgebra::{Matrix3, Vector3};

/// Normalizes a vector, returning the zero vector unchanged instead of NaN.
///
/// Callers that care about the degenerate case check the result themselves.
#[inline]
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
}

/// Unsigned angle between two vectors in radians, in [0, π].
///
/// The normalized dot product is clamped to [-1, 1] so near-parallel inputs
/// cannot push `acos` out of its domain.
#[inline]
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (na * nb)).clamp(-1.0, 1.0).acos()
}

/// Rotates `v` about `axis` by `theta` radians using Rodrigues' formula.
///
/// `axis` must already be a unit vector; callers normalize first.
#[inline]
pub fn rotate_about(v: &Vector3<f64>, axis: &Vector3<f64>, theta: f64) -> Vector3<f64> {
    let (sin, cos) = theta.sin_cos();
    v * cos + axis.cross(v) * sin + axis * (axis.dot(v) * (1.0 - cos))
}

/// Builds the rotation matrix for a rotation about `axis` by `theta` radians
/// (Rodrigues form). `axis` must already be a unit vector.
pub fn rotation_about_axis(axis: &Vector3<f64>, theta: f64) -> Matrix3<f64> {
    let (sin, cos) = theta.sin_cos();
    let k = Matrix3::new(
        0.0, -axis.z, axis.y, //
        axis.z, 0.0, -axis.x, //
        -axis.y, axis.x, 0.0,
    );
    Matrix3::identity() + k * sin + k * k * (1.0 - cos)
}

/// Re-orthonormalizes a drifted rotation matrix.
///
/// Gram-Schmidt on the first two rows; the third row is their cross product,
/// so the result is exactly orthonormal regardless of input drift magnitude.
/// Returns a new matrix; used to correct compounding rotation error, not to
/// validate input.
pub fn orthonormalize(m: &Matrix3<f64>) -> Matrix3<f64> {
    let r0 = normalize_or_zero(&Vector3::new(m[(0, 0)], m[(0, 1)], m[(0, 2)]));
    let r1 = Vector3::new(m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let r1 = normalize_or_zero(&(r1 - r0 * r0.dot(&r1)));
    let r2 = r0.cross(&r1);
    Matrix3::from_rows(&[r0.transpose(), r1.transpose(), r2.transpose()])
}
