//! Brute-force radius query.
//!
//! Every call scans the whole snapshot, so a frame costs O(N²). There is no
//! spatial index; the parallel scheduler is what keeps large flocks usable.

use crate::core::Agent;

#[inline]
fn is_neighbor(target: &Agent, candidate: &Agent, radius_sq: f64) -> bool {
    candidate.id != target.id && target.squared_distance(candidate) < radius_sq
}

#[inline]
fn radius_squared(radius: f64) -> Option<f64> {
    // A non-positive radius can never satisfy the strict comparison
    (radius > 0.0).then(|| radius * radius)
}

/// Every agent of `population` strictly closer than `radius` to `target`,
/// excluding `target` itself (matched by identity), in scan order.
pub fn neighbors<'a>(target: &Agent, population: &'a [Agent], radius: f64) -> Vec<&'a Agent> {
    let Some(radius_sq) = radius_squared(radius) else {
        return Vec::new();
    };
    population
        .iter()
        .filter(|candidate| is_neighbor(target, candidate, radius_sq))
        .collect()
}

/// Same selection as [`neighbors`], written as indices into a reusable buffer.
///
/// `out` is cleared first. Workers keep one buffer each so the per-agent
/// query never allocates once the buffer has grown to the flock size.
pub fn neighbors_into(target: &Agent, population: &[Agent], radius: f64, out: &mut Vec<usize>) {
    out.clear();
    let Some(radius_sq) = radius_squared(radius) else {
        return;
    };
    out.extend(
        population
            .iter()
            .enumerate()
            .filter(|(_, candidate)| is_neighbor(target, candidate, radius_sq))
            .map(|(i, _)| i),
    );
}
