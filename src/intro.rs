//! Title screen: coloured blocks rain down for a few seconds before the game shows.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

pub const INTRO_DURATION: Duration = Duration::from_secs(5);
const BLOCK_COUNT: usize = 20;
/// Palette indices used by the rain (first four piece colours).
const RAIN_COLORS: u8 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct FallingBlock {
    /// Horizontal position as a fraction of the screen width.
    pub x: f32,
    /// Palette index (1-based).
    pub color: u8,
    starts_at: Instant,
    fall_secs: f32,
}

impl FallingBlock {
    /// Fraction of the fall completed, or None before the block's delay has passed.
    pub fn progress(&self, now: Instant) -> Option<f32> {
        let elapsed = now.checked_duration_since(self.starts_at)?;
        Some(elapsed.as_secs_f32() / self.fall_secs)
    }
}

#[derive(Debug)]
pub struct Intro {
    blocks: Vec<FallingBlock>,
    started: Instant,
    rng: StdRng,
}

impl Intro {
    pub fn new(seed: Option<u64>, now: Instant) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut intro = Self {
            blocks: Vec::with_capacity(BLOCK_COUNT),
            started: now,
            rng,
        };
        for _ in 0..BLOCK_COUNT {
            let block = intro.spawn_block(now);
            intro.blocks.push(block);
        }
        intro
    }

    /// Fall takes 2-5 s and starts after up to 2 s.
    fn spawn_block(&mut self, now: Instant) -> FallingBlock {
        let delay = Duration::from_secs_f32(self.rng.gen_range(0.0..2.0));
        FallingBlock {
            x: self.rng.gen_range(0.0..1.0),
            color: self.rng.gen_range(1..=RAIN_COLORS),
            starts_at: now + delay,
            fall_secs: self.rng.gen_range(2.0..5.0),
        }
    }

    /// Replace blocks that have left the screen.
    pub fn update(&mut self, now: Instant) {
        for i in 0..self.blocks.len() {
            if self.blocks[i].progress(now).is_some_and(|p| p >= 1.0) {
                self.blocks[i] = self.spawn_block(now);
            }
        }
    }

    pub fn blocks(&self) -> &[FallingBlock] {
        &self.blocks
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= INTRO_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finishes_after_five_seconds() {
        let t0 = Instant::now();
        let intro = Intro::new(Some(3), t0);
        assert!(!intro.is_finished(t0 + Duration::from_millis(4_999)));
        assert!(intro.is_finished(t0 + INTRO_DURATION));
    }

    #[test]
    fn test_blocks_respawn_and_stay_in_range() {
        let t0 = Instant::now();
        let mut intro = Intro::new(Some(9), t0);
        for step in 1..=40 {
            intro.update(t0 + Duration::from_millis(step * 250));
        }
        assert_eq!(intro.blocks().len(), BLOCK_COUNT);
        let last = t0 + Duration::from_secs(10);
        for b in intro.blocks() {
            assert!((0.0..1.0).contains(&b.x));
            assert!((1..=RAIN_COLORS).contains(&b.color));
            assert!(b.progress(last).is_none_or(|p| p < 1.0));
        }
    }
}
