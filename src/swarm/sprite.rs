//! Sprite Rotation Tracking
//!
//! The renderer draws every agent with one of a fixed set of pre-rotated
//! sprite images. This maps headings to image indices and remembers the last
//! two indices per agent, so only agents whose image changed need a fresh
//! upload.

use crate::core::Agent;
use rayon::prelude::*;

/// Index of the pre-rotated sprite matching `direction`.
///
/// Headings are truncated to whole degrees; each sprite covers
/// `360 / frames` degrees.
pub fn rotation_frame(direction: f64, frames: u32) -> u32 {
    let frames = frames.max(1);
    let degrees = (direction.to_degrees() as i64).rem_euclid(360) as u32;
    let span = (360 / frames).max(1);
    (degrees / span).min(frames - 1)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteTrack {
    pub previous: u32,
    pub current: u32,
}

impl SpriteTrack {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

pub struct SpriteTable {
    frames: u32,
    tracks: Vec<SpriteTrack>,
}

impl SpriteTable {
    pub fn new(agents: &[Agent], frames: u32) -> Self {
        let tracks = agents
            .iter()
            .map(|a| {
                let id = rotation_frame(a.direction, frames);
                SpriteTrack {
                    previous: id,
                    current: id,
                }
            })
            .collect();
        SpriteTable { frames, tracks }
    }

    /// Shift current into previous and recompute current from `agents`.
    /// Runs on whichever rayon pool the caller is installed in.
    pub fn update(&mut self, agents: &[Agent]) {
        let frames = self.frames;
        self.tracks
            .par_iter_mut()
            .zip(agents.par_iter())
            .for_each(|(track, agent)| {
                track.previous = track.current;
                track.current = rotation_frame(agent.direction, frames);
            });
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn tracks(&self) -> &[SpriteTrack] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<SpriteTrack> {
        self.tracks.get(index).copied()
    }

    /// Indices of agents whose sprite changed in the last update
    pub fn changed(&self) -> impl Iterator<Item = usize> + '_ {
        self.tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.changed())
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn one_sprite_per_degree() {
        assert_eq!(rotation_frame(0.0, 360), 0);
        assert_eq!(rotation_frame(PI, 360), 180);
        assert_eq!(rotation_frame(PI / 2.0, 360), 90);
        assert_eq!(rotation_frame(TAU - 1e-9, 360), 359);
    }

    #[test]
    fn coarse_sprite_sets() {
        // 90 images, 4 degrees each
        assert_eq!(rotation_frame(PI, 90), 45);
        assert_eq!(rotation_frame(3f64.to_radians() + 1e-9, 90), 0);
        assert_eq!(rotation_frame(TAU - 1e-9, 90), 89);
        // Uneven split never runs past the last image
        assert_eq!(rotation_frame(TAU - 1e-9, 7), 6);
        assert_eq!(rotation_frame(1.0, 1), 0);
    }

    #[test]
    fn negative_headings_wrap() {
        assert_eq!(rotation_frame(-PI / 2.0, 360), 270);
    }

    #[test]
    fn table_tracks_changes() {
        let mut agents = vec![
            Agent::new(0, 0.0, 0.0, 0.0, 1.0),
            Agent::new(1, 0.0, 0.0, PI, 1.0),
        ];
        let mut table = SpriteTable::new(&agents, 360);
        assert_eq!(table.changed().count(), 0);

        agents[1].direction = PI / 2.0;
        table.update(&agents);
        assert_eq!(table.changed().collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            table.get(1),
            Some(SpriteTrack {
                previous: 180,
                current: 90
            })
        );

        table.update(&agents);
        assert_eq!(table.changed().count(), 0);
    }
}
