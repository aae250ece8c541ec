use stereonet::contour::{compute_contours, ContourOptions};
use stereonet::orient::line_to_dcos;
use stereonet::stats::{fisher_stats, principal_axes};

fn main() {
    // Demo stub: a synthetic near-vertical cluster of lineations
    let set: Vec<_> = (0..12)
        .map(|i| line_to_dcos(30.0 * i as f64, 78.0 + (i % 5) as f64))
        .collect();

    let stats = fisher_stats(&set);
    println!(
        "n={} R={:.3} kappa={:.1} alpha95={:.2}",
        stats.n, stats.resultant_length, stats.kappa, stats.alpha95
    );

    let axes = principal_axes(&set);
    println!(
        "eigenvalues=[{:.3}, {:.3}, {:.3}] woodcock_k={:.2} vollmer=(P {:.2}, G {:.2}, R {:.2})",
        axes.eigen.values[0],
        axes.eigen.values[1],
        axes.eigen.values[2],
        axes.woodcock.k,
        axes.vollmer.p,
        axes.vollmer.g,
        axes.vollmer.r
    );

    let contours = compute_contours(&set, &ContourOptions::default());
    for lc in &contours {
        println!("level={:.1} paths={}", lc.level, lc.paths.len());
    }
}
