use log::debug;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

use crate::config::*;

/// The center of the normalized layout space.
pub const CENTER: (f64, f64) = (0.5, 0.5);

/// Linear interpolation of a vote count between two marker sizes.
///
/// The divisor is the largest vote count of the set, and at least 1, so that a
/// set of zeroes does not divide by zero.
fn interpolate_size(votes: u64, max_votes: u64, min_size: f64, max_size: f64) -> f64 {
    let ratio = votes as f64 / max_votes.max(1) as f64;
    min_size + ratio * (max_size - min_size)
}

/// Seeded random scatter.
///
/// Every bubble gets a position drawn uniformly in [0,1)x[0,1): first all the x
/// coordinates, then all the y coordinates. The same seed and the same number
/// of bubbles always give the same positions. This is not stable under
/// insertion: adding a bubble replays the seed against a new count and moves
/// all of them. `StdRng` does not promise the same stream across `rand`
/// releases, so positions are only reproducible within one build.
///
/// Sizes are proportional to the votes, the largest count reaching
/// `settings.max_size`.
pub fn scatter(votes: &[u64], settings: &ScatterSettings) -> Vec<Geometry> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let xs: Vec<f64> = (0..votes.len()).map(|_| rng.gen::<f64>()).collect();
    let ys: Vec<f64> = (0..votes.len()).map(|_| rng.gen::<f64>()).collect();
    let max_votes = votes.iter().cloned().max().unwrap_or(0);
    debug!(
        "scatter: {} bubbles, seed {} max votes {}",
        votes.len(),
        settings.seed,
        max_votes
    );

    votes
        .iter()
        .zip(xs.iter().zip(ys.iter()))
        .map(|(v, (x, y))| Geometry {
            x: *x,
            y: *y,
            size: interpolate_size(*v, max_votes, 0.0, settings.max_size),
        })
        .collect()
}

/// The distance from the center for a ring of `n` bubbles, before the size
/// offset. It grows with the count to reduce overlaps.
pub fn base_radius(n: usize) -> f64 {
    0.1 + 0.3 * (n as f64 / 10.0)
}

/// Radial packing of the bubbles of one category around the center.
///
/// The circle is split in `n` equal sectors, one per bubble in the input
/// order: bubble `i` is placed at angle `2*pi*i/n`. Bigger bubbles are pushed
/// further out by `size / 300`.
pub fn radial(votes: &[u64], settings: &RadialSettings) -> Vec<Geometry> {
    let n = votes.len();
    if n == 0 {
        return Vec::new();
    }
    let max_votes = votes.iter().cloned().max().unwrap_or(0);
    let base = base_radius(n);
    debug!(
        "radial: {} bubbles, base radius {:.3} max votes {}",
        n, base, max_votes
    );

    votes
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let size = interpolate_size(*v, max_votes, settings.min_size, settings.max_size);
            let angle = 2.0 * PI * i as f64 / n as f64;
            let radius = base + size / 300.0;
            Geometry {
                x: CENTER.0 + radius * angle.cos(),
                y: CENTER.1 + radius * angle.sin(),
                size,
            }
        })
        .collect()
}
