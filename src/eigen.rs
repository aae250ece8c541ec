//! Closed-form eigendecomposition of symmetric 3×3 matrices.
//!
//! Pipeline
//! - Fast path: a numerically diagonal matrix (sum of squared off-diagonal
//!   entries below 1e-30) returns its sorted diagonal with axis-aligned
//!   eigenvectors, skipping the general algorithm.
//! - General path: the trigonometric (Cardano) solution of the characteristic
//!   cubic. No iteration is involved; the three roots come from a single
//!   `acos` evaluation, with the middle eigenvalue recovered from trace
//!   conservation instead of a third cosine, which avoids asymmetric rounding
//!   between the roots.
//! - Eigenvectors for the extreme eigenvalues are taken from the
//!   largest-magnitude pairwise cross product of the rows of (A − λI), the
//!   most robust null-space direction. The middle eigenvector is v1 × v3;
//!   a near-triple-degenerate spectrum (‖v1 × v3‖ < 1e-10) substitutes an
//!   arbitrary perpendicular and recomputes v3.
//!
//! Postconditions, verified by the tests: A·vᵢ ≈ λᵢ·vᵢ, Σλᵢ = trace(A),
//! and the eigenvector triple is mutually orthonormal.

use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

use crate::math::normalize_or_zero;

const DIAGONAL_THRESH: f64 = 1e-30;
const DEGENERATE_CROSS: f64 = 1e-10;

/// Eigenvalues in descending order with the corresponding orthonormal
/// eigenvectors. Derived from a symmetric matrix; recomputed whenever the
/// input changes, never mutated in place.
#[derive(Clone, Debug, Serialize)]
pub struct EigenDecomposition {
    pub values: [f64; 3],
    pub vectors: [Vector3<f64>; 3],
}

/// Decomposes a symmetric 3×3 matrix. Only the upper triangle is read; the
/// matrix is assumed symmetric.
pub fn symmetric_eigen(a: &Matrix3<f64>) -> EigenDecomposition {
    let (a00, a01, a02) = (a[(0, 0)], a[(0, 1)], a[(0, 2)]);
    let (a11, a12, a22) = (a[(1, 1)], a[(1, 2)], a[(2, 2)]);

    let off_sq = 2.0 * (a01 * a01 + a02 * a02 + a12 * a12);
    if off_sq < DIAGONAL_THRESH {
        return diagonal_decomposition(a00, a11, a22);
    }

    // Trigonometric solution of the characteristic cubic.
    let q = (a00 + a11 + a22) / 3.0;
    let p2 = (a00 - q).powi(2) + (a11 - q).powi(2) + (a22 - q).powi(2) + off_sq;
    let p = (p2 / 6.0).sqrt();
    let b = (a - Matrix3::from_diagonal_element(q)) / p;
    let r = (symmetric_determinant(&b) / 2.0).clamp(-1.0, 1.0);
    let phi = r.acos() / 3.0;

    let l1 = q + 2.0 * p * phi.cos();
    let l3 = q + 2.0 * p * (phi + 2.0 * std::f64::consts::PI / 3.0).cos();
    let l2 = 3.0 * q - l1 - l3;

    let v1 = extreme_eigenvector(a, l1);
    let v3 = extreme_eigenvector(a, l3);
    let cross = v1.cross(&v3);
    let (v2, v3) = if cross.norm() < DEGENERATE_CROSS {
        // Near-triple-degenerate spectrum: the extremes no longer pin down a
        // plane, so any orthonormal completion is as good as another.
        let v2 = perpendicular_to(&v1);
        (v2, v1.cross(&v2))
    } else {
        (normalize_or_zero(&cross), v3)
    };

    EigenDecomposition {
        values: [l1, l2, l3],
        vectors: [v1, v2, v3],
    }
}

fn diagonal_decomposition(a00: f64, a11: f64, a22: f64) -> EigenDecomposition {
    let mut pairs = [
        (a00, Vector3::x()),
        (a11, Vector3::y()),
        (a22, Vector3::z()),
    ];
    pairs.sort_by(|lhs, rhs| rhs.0.total_cmp(&lhs.0));
    EigenDecomposition {
        values: [pairs[0].0, pairs[1].0, pairs[2].0],
        vectors: [pairs[0].1, pairs[1].1, pairs[2].1],
    }
}

/// Determinant via the symmetric 3×3 formula (reads the upper triangle only).
fn symmetric_determinant(m: &Matrix3<f64>) -> f64 {
    let (m00, m01, m02) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let (m11, m12, m22) = (m[(1, 1)], m[(1, 2)], m[(2, 2)]);
    m00 * (m11 * m22 - m12 * m12) - m01 * (m01 * m22 - m12 * m02)
        + m02 * (m01 * m12 - m11 * m02)
}

/// Null-space direction of (A − λI) for an extreme eigenvalue: the pairwise
/// row cross product with the greatest magnitude, normalized.
fn extreme_eigenvector(a: &Matrix3<f64>, lambda: f64) -> Vector3<f64> {
    let r0 = Vector3::new(a[(0, 0)] - lambda, a[(0, 1)], a[(0, 2)]);
    let r1 = Vector3::new(a[(0, 1)], a[(1, 1)] - lambda, a[(1, 2)]);
    let r2 = Vector3::new(a[(0, 2)], a[(1, 2)], a[(2, 2)] - lambda);

    let mut best = r0.cross(&r1);
    for candidate in [r0.cross(&r2), r1.cross(&r2)] {
        if candidate.norm_squared() > best.norm_squared() {
            best = candidate;
        }
    }
    normalize_or_zero(&best)
}

/// Arbitrary unit vector perpendicular to `v`.
fn perpendicular_to(v: &Vector3<f64>) -> Vector3<f64> {
    let seed = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    normalize_or_zero(&(seed - v * v.dot(&seed)))
}
