//! Density contour extraction via marching squares.
//!
//! Pipeline
//! - `density::evaluate_grid` supplies the node lattice (§`density`); cells
//!   with an undefined corner are skipped entirely, so contours stop at the
//!   disk boundary and come out as open polylines there.
//! - Each cell is classified by a 4-bit corner code (top-left, top-right,
//!   bottom-right, bottom-left; a corner's bit is set when its density is at
//!   or above the level). Twelve codes map to one linearly interpolated
//!   segment; the two saddle codes (5 and 10, diagonal corners on the same
//!   side) are disambiguated by comparing the mean of the four corners
//!   against the level, an exact tie counting as above-level.
//! - Raw segments are chained into polylines by repeatedly extending a path
//!   from whichever remaining segment touches its head or tail within 1e-8.
//!   Closed interior contours and open boundary-crossing ones come out of the
//!   same assembly; closure is implicit in endpoint coincidence.
//!
//! Everything is produced fresh per invocation; no caching, no input
//! mutation.

use std::collections::VecDeque;
use std::time::Instant;

use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::density::{self, DensityGrid};
use crate::diagnostics::{
    ContourDiagnostics, DensityGridDiagnostics, DetailedContours, LevelDiagnostics,
};
use crate::projection::{ProjectionKind, SphericalProjection};

/// Endpoint coincidence tolerance used by path assembly and [`is_closed`].
const ENDPOINT_TOL: f64 = 1e-8;

/// Knobs for the contouring pipeline.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ContourOptions {
    /// Projection the grid is laid out in.
    pub projection: ProjectionKind,
    /// Nodes per grid side.
    pub grid_size: usize,
    /// Density levels to contour, in multiples of uniform density.
    pub levels: Vec<f64>,
    /// Kernel half-width in radians; defaults to 90°/√n when absent.
    pub sigma: Option<f64>,
    /// Optional view rotation applied to every input vector.
    pub rotation: Option<Matrix3<f64>>,
}

impl Default for ContourOptions {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::EqualArea,
            grid_size: 50,
            levels: vec![2.0, 4.0, 6.0, 8.0, 10.0],
            sigma: None,
            rotation: None,
        }
    }
}

/// Contour polylines for one density level, in projected coordinates.
#[derive(Clone, Debug, Serialize)]
pub struct LevelContours {
    pub level: f64,
    pub paths: Vec<Vec<[f64; 2]>>,
}

/// Whether an assembled path closes on itself (endpoints coincide within the
/// assembly tolerance).
pub fn is_closed(path: &[[f64; 2]]) -> bool {
    match (path.first(), path.last()) {
        (Some(a), Some(b)) if path.len() > 2 => points_close(*a, *b),
        _ => false,
    }
}

/// Contours a data set with the projection named in the options.
pub fn compute_contours(set: &[Vector3<f64>], options: &ContourOptions) -> Vec<LevelContours> {
    compute_contours_with(set, options.projection.as_projection(), options)
}

/// Contours a data set with an explicit projection strategy (the seam for
/// projections beyond the two built-ins).
pub fn compute_contours_with(
    set: &[Vector3<f64>],
    projection: &dyn SphericalProjection,
    options: &ContourOptions,
) -> Vec<LevelContours> {
    compute_contours_detailed_with(set, projection, options).contours
}

/// Contours a data set and reports per-stage diagnostics alongside the
/// result.
pub fn compute_contours_detailed(set: &[Vector3<f64>], options: &ContourOptions) -> DetailedContours {
    compute_contours_detailed_with(set, options.projection.as_projection(), options)
}

/// Full pipeline with diagnostics: density grid, per-level marching squares
/// and assembly, with stage timings.
pub fn compute_contours_detailed_with(
    set: &[Vector3<f64>],
    projection: &dyn SphericalProjection,
    options: &ContourOptions,
) -> DetailedContours {
    let t0 = Instant::now();
    if set.is_empty() {
        let contours = options
            .levels
            .iter()
            .map(|&level| LevelContours {
                level,
                paths: Vec::new(),
            })
            .collect();
        return DetailedContours {
            contours,
            diagnostics: ContourDiagnostics {
                input_count: 0,
                rotated: options.rotation.is_some(),
                grid: None,
                levels: Vec::new(),
                total_latency_ms: t0.elapsed().as_secs_f64() * 1000.0,
            },
        };
    }

    let sigma = options.sigma.unwrap_or_else(|| density::default_sigma(set.len()));
    let grid = density::evaluate_grid(
        set,
        projection,
        options.rotation.as_ref(),
        options.grid_size,
        Some(sigma),
    );
    let grid_ms = t0.elapsed().as_secs_f64() * 1000.0;
    debug!(
        "contour: grid {}x{} defined={} max_density={:.3} sigma_deg={:.2} elapsed_ms={:.3}",
        grid.size,
        grid.size,
        grid.defined_nodes(),
        grid.max_density(),
        sigma.to_degrees(),
        grid_ms
    );
    let grid_diag = DensityGridDiagnostics {
        grid_size: grid.size,
        defined_nodes: grid.defined_nodes(),
        undefined_nodes: grid.values.len() - grid.defined_nodes(),
        sigma_deg: sigma.to_degrees(),
        kappa: density::kernel_concentration(sigma),
        max_density: grid.max_density(),
        elapsed_ms: grid_ms,
    };

    let mut level_diags = Vec::with_capacity(options.levels.len());
    let contours = options
        .levels
        .iter()
        .map(|&level| {
            let t_level = Instant::now();
            let segments = extract_level_segments(&grid, level);
            let segment_count = segments.len();
            let paths = assemble_paths(segments);
            let closed = paths.iter().filter(|p| is_closed(p)).count();
            debug!(
                "contour: level {:.3} -> {} segments, {} paths ({} closed)",
                level,
                segment_count,
                paths.len(),
                closed
            );
            level_diags.push(LevelDiagnostics {
                level,
                segments: segment_count,
                paths: paths.len(),
                closed_paths: closed,
                elapsed_ms: t_level.elapsed().as_secs_f64() * 1000.0,
            });
            LevelContours { level, paths }
        })
        .collect();

    DetailedContours {
        contours,
        diagnostics: ContourDiagnostics {
            input_count: set.len(),
            rotated: options.rotation.is_some(),
            grid: Some(grid_diag),
            levels: level_diags,
            total_latency_ms: t0.elapsed().as_secs_f64() * 1000.0,
        },
    }
}

/// Cell edges carrying an interpolated crossing point.
#[derive(Clone, Copy)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

use Edge::{Bottom, Left, Right, Top};

/// Runs marching squares over the grid for one level, producing raw
/// unordered segments in projected coordinates.
fn extract_level_segments(grid: &DensityGrid, level: f64) -> Vec<([f64; 2], [f64; 2])> {
    let mut segments = Vec::new();
    for iy in 0..grid.size - 1 {
        let y0 = grid.node_coord(iy);
        let y1 = grid.node_coord(iy + 1);
        for ix in 0..grid.size - 1 {
            let bl = grid.get(ix, iy);
            let br = grid.get(ix + 1, iy);
            let tl = grid.get(ix, iy + 1);
            let tr = grid.get(ix + 1, iy + 1);
            if bl.is_nan() || br.is_nan() || tl.is_nan() || tr.is_nan() {
                continue;
            }

            let code = (u8::from(tl >= level) << 3)
                | (u8::from(tr >= level) << 2)
                | (u8::from(br >= level) << 1)
                | u8::from(bl >= level);
            if code == 0 || code == 15 {
                continue;
            }

            let x0 = grid.node_coord(ix);
            let x1 = grid.node_coord(ix + 1);
            let edge_point = |edge: Edge| -> [f64; 2] {
                match edge {
                    Top => [interp(x0, x1, tl, tr, level), y1],
                    Bottom => [interp(x0, x1, bl, br, level), y0],
                    Left => [x0, interp(y0, y1, bl, tl, level)],
                    Right => [x1, interp(y0, y1, br, tr, level)],
                }
            };

            // Saddles: the four-corner mean decides which diagonal pair is
            // inside; an exact tie counts as above-level.
            let center_above = (tl + tr + br + bl) / 4.0 >= level;
            let pairs: &[(Edge, Edge)] = match code {
                1 => &[(Left, Bottom)],
                2 => &[(Bottom, Right)],
                3 => &[(Left, Right)],
                4 => &[(Top, Right)],
                5 if center_above => &[(Left, Top), (Bottom, Right)],
                5 => &[(Left, Bottom), (Top, Right)],
                6 => &[(Top, Bottom)],
                7 => &[(Left, Top)],
                8 => &[(Left, Top)],
                9 => &[(Top, Bottom)],
                10 if center_above => &[(Top, Right), (Left, Bottom)],
                10 => &[(Left, Top), (Bottom, Right)],
                11 => &[(Top, Right)],
                12 => &[(Left, Right)],
                13 => &[(Bottom, Right)],
                14 => &[(Left, Bottom)],
                _ => unreachable!("0 and 15 handled above"),
            };
            for &(a, b) in pairs {
                segments.push((edge_point(a), edge_point(b)));
            }
        }
    }
    segments
}

/// Linear interpolation of the level crossing between two corner samples.
#[inline]
fn interp(a: f64, b: f64, va: f64, vb: f64, level: f64) -> f64 {
    a + (level - va) / (vb - va) * (b - a)
}

#[inline]
fn points_close(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < ENDPOINT_TOL && (a[1] - b[1]).abs() < ENDPOINT_TOL
}

/// Chains raw segments into polylines: grow the current path from any
/// remaining segment touching its head or tail, consuming each segment at
/// most once, until nothing fits any more.
fn assemble_paths(mut segments: Vec<([f64; 2], [f64; 2])>) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::new();
    while let Some((a, b)) = segments.pop() {
        let mut path: VecDeque<[f64; 2]> = VecDeque::new();
        path.push_back(a);
        path.push_back(b);
        loop {
            let head = *path.front().unwrap();
            let tail = *path.back().unwrap();
            let mut extended = false;
            for i in 0..segments.len() {
                let (p, q) = segments[i];
                if points_close(p, tail) {
                    path.push_back(q);
                } else if points_close(q, tail) {
                    path.push_back(p);
                } else if points_close(p, head) {
                    path.push_front(q);
                } else if points_close(q, head) {
                    path.push_front(p);
                } else {
                    continue;
                }
                segments.swap_remove(i);
                extended = true;
                break;
            }
            if !extended {
                break;
            }
        }
        paths.push(path.into_iter().collect());
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orient::line_to_dcos;

    #[test]
    fn empty_set_yields_one_empty_entry_per_level() {
        let options = ContourOptions {
            levels: vec![2.0, 4.0],
            ..Default::default()
        };
        let contours = compute_contours(&[], &options);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].level, 2.0);
        assert_eq!(contours[1].level, 4.0);
        assert!(contours.iter().all(|c| c.paths.is_empty()));
    }

    #[test]
    fn tight_cluster_produces_a_closed_contour() {
        let set: Vec<_> = (0..8)
            .map(|i| line_to_dcos(45.0 * i as f64, 85.0))
            .collect();
        let options = ContourOptions {
            grid_size: 40,
            levels: vec![2.0],
            ..Default::default()
        };
        let contours = compute_contours(&set, &options);
        assert_eq!(contours.len(), 1);
        assert!(
            !contours[0].paths.is_empty(),
            "a tight near-vertical cluster should contour at 2 MUD"
        );
        assert!(
            contours[0].paths.iter().any(|p| is_closed(p)),
            "interior contour around the cluster should close"
        );
    }

    #[test]
    fn contour_points_stay_inside_the_disk() {
        let set: Vec<_> = (0..10)
            .map(|i| line_to_dcos(36.0 * i as f64, 30.0))
            .collect();
        for kind in [ProjectionKind::EqualArea, ProjectionKind::EqualAngle] {
            let options = ContourOptions {
                projection: kind,
                grid_size: 30,
                levels: vec![1.0, 2.0],
                ..Default::default()
            };
            let limit = kind.as_projection().disk_radius().powi(2) * 1.1;
            for lc in compute_contours(&set, &options) {
                for p in lc.paths.iter().flatten() {
                    let r_sq = p[0] * p[0] + p[1] * p[1];
                    assert!(
                        r_sq <= limit,
                        "point {p:?} outside disk (r^2={r_sq}, limit={limit})"
                    );
                }
            }
        }
    }

    #[test]
    fn level_above_peak_has_no_paths() {
        let set: Vec<_> = (0..5)
            .map(|i| line_to_dcos(72.0 * i as f64, 45.0))
            .collect();
        let options = ContourOptions {
            grid_size: 25,
            levels: vec![1e9],
            ..Default::default()
        };
        let contours = compute_contours(&set, &options);
        assert!(contours[0].paths.is_empty());
    }

    #[test]
    fn assembly_chains_shared_endpoints() {
        let segments = vec![
            ([0.0, 0.0], [1.0, 0.0]),
            ([2.0, 0.0], [1.0, 0.0]),
            ([2.0, 0.0], [2.0, 1.0]),
        ];
        let paths = assemble_paths(segments);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 4);
    }

    #[test]
    fn assembly_keeps_disjoint_segments_apart() {
        let segments = vec![([0.0, 0.0], [1.0, 0.0]), ([5.0, 5.0], [6.0, 5.0])];
        let paths = assemble_paths(segments);
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn assembly_closes_a_loop() {
        let square = vec![
            ([0.0, 0.0], [1.0, 0.0]),
            ([1.0, 0.0], [1.0, 1.0]),
            ([1.0, 1.0], [0.0, 1.0]),
            ([0.0, 1.0], [0.0, 0.0]),
        ];
        let paths = assemble_paths(square);
        assert_eq!(paths.len(), 1);
        assert!(is_closed(&paths[0]));
    }

    #[test]
    fn saddle_cells_honor_the_center_average() {
        // 2x2 grid = a single cell with diagonal corners above the level
        // (code 5: TR and BL). Mean 1.0 < level 1.5 keeps the two blobs
        // separate: two segments, neither touching the other.
        let mut grid = DensityGrid {
            size: 2,
            extent: 1.0,
            values: vec![2.0, 0.0, 0.0, 2.0], // bl, br, tl, tr (row-major, iy=0 first)
        };
        let separated = extract_level_segments(&grid, 1.5);
        assert_eq!(separated.len(), 2);

        // Raise the corners so the mean (2.5) clears the level: the blobs
        // connect through the center; still two segments but paired across
        // the other diagonal.
        grid.values = vec![5.0, 0.0, 0.0, 5.0];
        let connected = extract_level_segments(&grid, 1.5);
        assert_eq!(connected.len(), 2);
        assert_eq!(
            pairings(&separated),
            vec![("bottom", "left"), ("right", "top")]
        );
        assert_eq!(
            pairings(&connected),
            vec![("bottom", "right"), ("left", "top")]
        );
    }

    /// Which cell edges each segment connects, for a unit cell spanning
    /// [-1, 1]²; fingerprint of the pairing the saddle chose.
    fn pairings(segments: &[([f64; 2], [f64; 2])]) -> Vec<(&'static str, &'static str)> {
        fn edge_of(p: [f64; 2]) -> &'static str {
            if p[0] == -1.0 {
                "left"
            } else if p[0] == 1.0 {
                "right"
            } else if p[1] == -1.0 {
                "bottom"
            } else {
                "top"
            }
        }
        let mut out: Vec<_> = segments
            .iter()
            .map(|&(a, b)| {
                let (ea, eb) = (edge_of(a), edge_of(b));
                if ea <= eb {
                    (ea, eb)
                } else {
                    (eb, ea)
                }
            })
            .collect();
        out.sort();
        out
    }
}
