//! One tick of one agent: neighbour query, steering, integration.
//!
//! Reads only from the frame's read snapshot and writes only into the slot
//! it was handed, so any number of disjoint index ranges can run at once.

use super::neighbors::neighbors_into;
use super::steering::{steer, SteeringParams};
use crate::core::Agent;
use std::ops::Range;

/// Advance `read` by one tick into `write`.
///
/// Every field of `write` is refreshed, including the ones the tick never
/// changes, so the write buffer never keeps values from an older frame.
/// Positions are not clamped; boundary avoidance only biases the heading.
pub fn step(
    read: &Agent,
    population: &[Agent],
    write: &mut Agent,
    params: &SteeringParams,
    scratch: &mut Vec<usize>,
) {
    neighbors_into(read, population, params.perception_radius, scratch);

    let direction = if scratch.is_empty() {
        read.direction
    } else {
        steer(read, scratch.iter().map(|&i| &population[i]), params)
    };

    let (sin, cos) = direction.sin_cos();
    *write = Agent {
        direction,
        x: read.x + read.speed * cos,
        y: read.y + read.speed * sin,
        ..*read
    };
}

/// Step every index of `range`. `write` is the sub-slice of the write buffer
/// starting at `range.start`.
pub fn step_range(
    population: &[Agent],
    range: Range<usize>,
    write: &mut [Agent],
    params: &SteeringParams,
    scratch: &mut Vec<usize>,
) {
    debug_assert_eq!(range.len(), write.len());
    for (slot, i) in write.iter_mut().zip(range) {
        step(&population[i], population, slot, params, scratch);
    }
}
