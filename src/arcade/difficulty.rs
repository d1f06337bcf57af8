//! Time-driven difficulty for the scavenger game.
//!
//! Each knob keeps the timestamp of its last bump and is bumped again once
//! more than its interval has passed.

pub const START_CRYSTAL_SPEED: f32 = 4.0;
pub const START_METEOR_SPEED: f32 = 7.0;
pub const START_METEOR_SIZE_MAX: f32 = 0.3;
pub const START_METEOR_SPAWN_MIN_MS: u64 = 1000;
pub const START_METEOR_SPAWN_MAX_MS: u64 = 4000;

pub const CRYSTAL_SPEED_RATE: f32 = 1.1;
pub const METEOR_SPEED_RATE: f32 = 1.1;
pub const METEOR_SIZE_STEP: f32 = 0.1;
pub const METEOR_SPAWN_STEP_MS: u64 = 100;
pub const MIN_METEOR_SPAWN_MS: u64 = 200;

pub const CRYSTAL_SPEED_INTERVAL_MS: u64 = 7000;
pub const METEOR_SPEED_INTERVAL_MS: u64 = 4000;
pub const METEOR_SIZE_INTERVAL_MS: u64 = 10_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Difficulty
{
    pub crystal_speed: f32,
    pub meteor_speed: f32,
    pub meteor_size_max: f32,
    pub meteor_spawn_min_ms: u64,
    pub meteor_spawn_max_ms: u64,
    crystal_speed_at: u64,
    meteor_speed_at: u64,
    meteor_size_at: u64,
}

impl Difficulty
{
    pub fn new(now_ms: u64) -> Self
    {
        Self {
            crystal_speed: START_CRYSTAL_SPEED,
            meteor_speed: START_METEOR_SPEED,
            meteor_size_max: START_METEOR_SIZE_MAX,
            meteor_spawn_min_ms: START_METEOR_SPAWN_MIN_MS,
            meteor_spawn_max_ms: START_METEOR_SPAWN_MAX_MS,
            crystal_speed_at: now_ms,
            meteor_speed_at: now_ms,
            meteor_size_at: now_ms,
        }
    }

    pub fn ramp(&mut self, now_ms: u64)
    {
        if now_ms.saturating_sub(self.crystal_speed_at) > CRYSTAL_SPEED_INTERVAL_MS {
            self.crystal_speed *= CRYSTAL_SPEED_RATE;
            self.crystal_speed_at = now_ms;
            log::debug!("crystal speed now {:.2}", self.crystal_speed);
        }
        if now_ms.saturating_sub(self.meteor_speed_at) > METEOR_SPEED_INTERVAL_MS {
            self.meteor_speed *= METEOR_SPEED_RATE;
            self.meteor_speed_at = now_ms;
            log::debug!("meteor speed now {:.2}", self.meteor_speed);
        }
        if now_ms.saturating_sub(self.meteor_size_at) > METEOR_SIZE_INTERVAL_MS {
            self.meteor_size_max += METEOR_SIZE_STEP;
            self.meteor_spawn_min_ms = self
                .meteor_spawn_min_ms
                .saturating_sub(METEOR_SPAWN_STEP_MS)
                .max(MIN_METEOR_SPAWN_MS);
            self.meteor_spawn_max_ms = self
                .meteor_spawn_max_ms
                .saturating_sub(METEOR_SPAWN_STEP_MS)
                .max(MIN_METEOR_SPAWN_MS);
            self.meteor_size_at = now_ms;
            log::debug!(
                "meteor size max {:.2}, spawn window {}..{} ms",
                self.meteor_size_max,
                self.meteor_spawn_min_ms,
                self.meteor_spawn_max_ms
            );
        }
    }
}
