// diagnostics.rs
// Summary statistics over a world snapshot, logged periodically by the
// coordinator while the workers run.

use rayon::prelude::*;
use ultraviolet::DVec3;

use crate::electric;
use crate::world::SnapshotEntry;

/// Aggregate view of one snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotStats {
    pub count: usize,
    /// Closest pair distance, `None` with fewer than two particles.
    pub min_separation: Option<f64>,
    /// Electrostatic potential energy summed over every unordered pair.
    pub potential_energy: f64,
    pub centroid: DVec3,
}

impl SnapshotStats {
    pub fn from_snapshot(entries: &[SnapshotEntry]) -> Self {
        let count = entries.len();
        if count == 0 {
            return Self {
                count,
                min_separation: None,
                potential_energy: 0.0,
                centroid: DVec3::zero(),
            };
        }

        let centroid = entries
            .iter()
            .fold(DVec3::zero(), |acc, e| acc + e.location.coords())
            / count as f64;

        // Each row i covers the pairs (i, j) with j > i.
        let (min_separation, potential_energy) = (0..count)
            .into_par_iter()
            .map(|i| {
                let a = &entries[i];
                entries[i + 1..].iter().fold((None, 0.0), |(min, energy), b| {
                    let r = electric::distance(&a.location, &b.location);
                    (
                        closer(min, Some(r)),
                        energy + a.charge * electric::potential(b.charge, r),
                    )
                })
            })
            .reduce(
                || (None, 0.0),
                |(m1, e1), (m2, e2)| (closer(m1, m2), e1 + e2),
            );

        Self {
            count,
            min_separation,
            potential_energy,
            centroid,
        }
    }
}

fn closer(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
