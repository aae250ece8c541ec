//! Fisher-kernel density estimation on a projected grid.
//!
//! Design
//! - The grid is a `size × size` lattice of nodes spanning
//!   [-R, R]² in projected coordinates, R being the projection's disk radius.
//!   Marching squares later treats the nodes as cell corners.
//! - A node outside the disk (with a small tolerance) or whose inverse
//!   projection fails is marked undefined with NaN. Zero stays a valid
//!   low-density value and is never used as the sentinel.
//! - Each defined node inverse-projects to a lower-hemisphere unit vector `d`
//!   and accumulates `κ/n · Σ exp(κ·(d·dᵢ − 1))` over the data set, an
//!   exponential kernel on the sphere evaluated directly in grid space.
//!   Densities are in multiples of uniform density (MUD).
//!
//! Complexity
//! - O(size² · n); every node is independent of all others, so row-level
//!   parallelism (the `parallel` feature) splits the work without changing
//!   any result.

use nalgebra::{Matrix3, Vector3};

use crate::projection::SphericalProjection;

/// Nodes whose squared radius exceeds the disk by this factor are undefined.
const DISK_TOLERANCE: f64 = 1.02;

/// Scalar density field over the projection disk; row-major nodes, NaN marks
/// an undefined node.
#[derive(Clone, Debug)]
pub struct DensityGrid {
    /// Nodes per side
    pub size: usize,
    /// Half-extent of the grid: nodes span [-extent, extent] on each axis
    pub extent: f64,
    /// Row-major node values, `size * size` entries
    pub values: Vec<f64>,
}

impl DensityGrid {
    fn new(size: usize, extent: f64) -> Self {
        Self {
            size,
            extent,
            values: vec![f64::NAN; size * size],
        }
    }

    #[inline]
    /// Convert (ix, iy) to a linear index into `values`.
    pub fn idx(&self, ix: usize, iy: usize) -> usize {
        iy * self.size + ix
    }

    #[inline]
    /// Node value at (ix, iy); NaN when the node is undefined.
    pub fn get(&self, ix: usize, iy: usize) -> f64 {
        self.values[self.idx(ix, iy)]
    }

    #[inline]
    /// Projected coordinate of node index `i` along either axis.
    pub fn node_coord(&self, i: usize) -> f64 {
        let span = 2.0 * self.extent;
        -self.extent + span * i as f64 / (self.size - 1) as f64
    }

    /// Number of defined (non-NaN) nodes.
    pub fn defined_nodes(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Greatest defined node density, or 0 when every node is undefined.
    pub fn max_density(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(0.0, f64::max)
    }
}

/// Default kernel half-width in radians: 90° / √n.
#[inline]
pub fn default_sigma(n: usize) -> f64 {
    std::f64::consts::FRAC_PI_2 / (n as f64).sqrt()
}

/// Kernel concentration for a half-width `sigma` in radians.
#[inline]
pub fn kernel_concentration(sigma: f64) -> f64 {
    1.0 / (1.0 - sigma.cos())
}

/// Evaluates the density grid for a data set.
///
/// `rotation` optionally maps every input vector into the view frame first.
/// `sigma` falls back to [`default_sigma`] of the set size. The input set is
/// never mutated; an empty set yields an all-undefined grid (the contour
/// engine short-circuits before reaching this point).
pub fn evaluate_grid(
    set: &[Vector3<f64>],
    projection: &dyn SphericalProjection,
    rotation: Option<&Matrix3<f64>>,
    grid_size: usize,
    sigma: Option<f64>,
) -> DensityGrid {
    let size = grid_size.max(2);
    let data: Vec<Vector3<f64>> = match rotation {
        Some(r) => set.iter().map(|d| r * d).collect(),
        None => set.to_vec(),
    };
    let sigma = sigma.unwrap_or_else(|| default_sigma(data.len()));
    let kappa = kernel_concentration(sigma);

    let mut grid = DensityGrid::new(size, projection.disk_radius());
    let limit_sq = DISK_TOLERANCE * grid.extent * grid.extent;
    let coords: Vec<f64> = (0..size).map(|i| grid.node_coord(i)).collect();

    fill_rows(&mut grid.values, size, &coords, limit_sq, projection, &data, kappa);
    grid
}

fn density_at(d: &Vector3<f64>, data: &[Vector3<f64>], kappa: f64) -> f64 {
    let sum: f64 = data.iter().map(|di| (kappa * (d.dot(di) - 1.0)).exp()).sum();
    kappa / data.len() as f64 * sum
}

fn fill_row(
    row: &mut [f64],
    y: f64,
    coords: &[f64],
    limit_sq: f64,
    projection: &dyn SphericalProjection,
    data: &[Vector3<f64>],
    kappa: f64,
) {
    for (value, &x) in row.iter_mut().zip(coords.iter()) {
        if x * x + y * y > limit_sq {
            continue; // stays NaN
        }
        if let Some(d) = projection.inverse(x, y) {
            *value = density_at(&d, data, kappa);
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn fill_rows(
    values: &mut [f64],
    size: usize,
    coords: &[f64],
    limit_sq: f64,
    projection: &dyn SphericalProjection,
    data: &[Vector3<f64>],
    kappa: f64,
) {
    for (iy, row) in values.chunks_mut(size).enumerate() {
        fill_row(row, coords[iy], coords, limit_sq, projection, data, kappa);
    }
}

#[cfg(feature = "parallel")]
fn fill_rows(
    values: &mut [f64],
    size: usize,
    coords: &[f64],
    limit_sq: f64,
    projection: &dyn SphericalProjection,
    data: &[Vector3<f64>],
    kappa: f64,
) {
    use rayon::prelude::*;

    values
        .par_chunks_mut(size)
        .enumerate()
        .for_each(|(iy, row)| {
            fill_row(row, coords[iy], coords, limit_sq, projection, data, kappa);
        });
}
