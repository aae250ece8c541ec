//! Orientation statistics over sets of direction cosines.
//!
//! The inputs are lower-hemisphere unit vectors (see `orient`); every function
//! returns newly allocated results and leaves its input untouched.
//!
//! Notes
//! - Degenerate sets degrade deterministically instead of erroring: a null
//!   resultant falls back to the straight-down mean [0, 0, -1], a single
//!   observation (or a perfectly concentrated set) reports infinite
//!   concentration, and the Woodcock ratios follow IEEE semantics so 0, ±∞
//!   and NaN propagate to the caller unmasked. Downstream consumers rely on
//!   distinguishing a uniform fabric (K ≈ 1, small C) from an undefined one
//!   (NaN).

use log::warn;
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

use crate::angle::clamped_acos;
use crate::eigen::{symmetric_eigen, EigenDecomposition};
use crate::orient::fold_lower;

const NULL_RESULTANT: f64 = 1e-10;

/// Unnormalized vector sum of the set.
pub fn resultant(set: &[Vector3<f64>]) -> Vector3<f64> {
    set.iter().fold(Vector3::zeros(), |acc, v| acc + v)
}

/// Normalized resultant, or the straight-down fallback [0, 0, -1] when the
/// resultant length is below 1e-10.
pub fn mean_vector(set: &[Vector3<f64>]) -> Vector3<f64> {
    let r = resultant(set);
    let norm = r.norm();
    if norm < NULL_RESULTANT {
        Vector3::new(0.0, 0.0, -1.0)
    } else {
        r / norm
    }
}

/// Fisher concentration statistics of a directional data set.
#[derive(Clone, Debug, Serialize)]
pub struct FisherStats {
    /// Number of observations
    pub n: usize,
    /// Resultant length R
    pub resultant_length: f64,
    /// R / n, in [0, 1] for a nonempty set
    pub r_bar: f64,
    /// Mean direction (unit), or [0, 0, -1] for a null resultant
    pub mean: Vector3<f64>,
    /// Concentration parameter; +∞ for a perfectly concentrated set
    pub kappa: f64,
    /// 95% confidence cone half-angle in degrees; 0 when undefined
    pub alpha95: f64,
}

/// Computes resultant length, mean direction, concentration and the 95%
/// confidence cone of a set of unit vectors.
pub fn fisher_stats(set: &[Vector3<f64>]) -> FisherStats {
    let n = set.len();
    let nf = n as f64;
    let r_vec = resultant(set);
    let r = r_vec.norm();
    let r_bar = r / nf;

    let mean = if r < NULL_RESULTANT {
        warn!("fisher_stats: null resultant for n={n}, falling back to [0, 0, -1] mean");
        Vector3::new(0.0, 0.0, -1.0)
    } else {
        r_vec / r
    };

    // Small-sample bias correction: (n-2)/(n-R) from three observations up,
    // (n-1)/(n-R) below.
    let kappa = if nf - r <= NULL_RESULTANT {
        f64::INFINITY
    } else if n >= 3 {
        (nf - 2.0) / (nf - r)
    } else {
        (nf - 1.0) / (nf - r)
    };

    let alpha95 = if n >= 2 && r > NULL_RESULTANT && nf - r > NULL_RESULTANT {
        let cos_a = 1.0 - ((nf - r) / r) * (20f64.powf(1.0 / (nf - 1.0)) - 1.0);
        clamped_acos(cos_a).to_degrees()
    } else {
        0.0
    };

    FisherStats {
        n,
        resultant_length: r,
        r_bar,
        mean,
        kappa,
        alpha95,
    }
}

/// Orientation tensor T = (1/n)·Σ dᵢ⊗dᵢ; symmetric with trace 1 for a
/// nonempty set of unit vectors.
pub fn orientation_tensor(set: &[Vector3<f64>]) -> Matrix3<f64> {
    let sum = set
        .iter()
        .fold(Matrix3::zeros(), |acc, d| acc + d * d.transpose());
    sum / set.len() as f64
}

/// Woodcock fabric shape (K) and strength (C) parameters.
///
/// K > 1 indicates a clustered fabric, K < 1 a girdle. Both are plain IEEE
/// expressions over the eigenvalue ratios; zero or equal eigenvalues yield
/// 0, ±∞ or NaN exactly as `f64` division and `ln` define them.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Woodcock {
    pub k: f64,
    pub c: f64,
}

/// Vollmer point/girdle/random partition; p + g + r = 1 by construction.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Vollmer {
    pub p: f64,
    pub g: f64,
    pub r: f64,
}

/// Bingham concentration parameters; both non-positive, kappa2 ≤ kappa1,
/// more negative meaning more concentrated along the associated axis.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Bingham {
    pub kappa1: f64,
    pub kappa2: f64,
}

/// Principal-axis summary of a data set: the eigendecomposition of its
/// orientation tensor (axes folded to the lower hemisphere) plus the derived
/// fabric descriptors.
#[derive(Clone, Debug, Serialize)]
pub struct PrincipalAxes {
    pub eigen: EigenDecomposition,
    pub woodcock: Woodcock,
    pub vollmer: Vollmer,
    pub bingham: Bingham,
}

/// Eigendecomposes the orientation tensor and derives the Woodcock, Vollmer
/// and Bingham fabric parameters.
pub fn principal_axes(set: &[Vector3<f64>]) -> PrincipalAxes {
    let tensor = orientation_tensor(set);
    let mut eigen = symmetric_eigen(&tensor);
    // Tensor eigenvectors are sign-ambiguous; impose the lower-hemisphere
    // convention after the fact.
    for v in eigen.vectors.iter_mut() {
        *v = fold_lower(v);
    }

    let [s1, s2, s3] = eigen.values;
    let nf = set.len() as f64;

    PrincipalAxes {
        woodcock: Woodcock {
            k: (s1 / s2).ln() / (s2 / s3).ln(),
            c: (s1 / s3).ln(),
        },
        vollmer: Vollmer {
            p: s1 - s2,
            g: 2.0 * (s2 - s3),
            r: 3.0 * s3,
        },
        bingham: Bingham {
            kappa1: nf * (s2 - s1),
            kappa2: nf * (s3 - s1),
        },
        eigen,
    }
}
