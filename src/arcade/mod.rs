//! Simulation for the scavenger game: a ship collecting crystals and
//! dodging meteors in an 800×600 world. Time comes in as milliseconds since
//! the session started; nothing here reads a clock.

pub mod difficulty;
pub mod rect;

use difficulty::Difficulty;
use rand::Rng;
pub use rect::Rect;

pub const WORLD_WIDTH: i32 = 800;
pub const WORLD_HEIGHT: i32 = 600;

pub const PLAYER_SPEED: i32 = 5;
pub const PLAYER_SIZE: (i32, i32) = (64, 48);
const PLAYER_HITBOX_SHRINK: i32 = 20;

pub const CRYSTAL_SIZE: (i32, i32) = (24, 24);
pub const CRYSTAL_SPAWN_MS: u64 = 2000;

pub const METEOR_BASE_SIZE: i32 = 240;
const METEOR_SIZE_MIN: f32 = 0.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls
{
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldState
{
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport
{
    pub collected: u32,
    pub hit: bool,
}

#[derive(Clone, Debug)]
pub struct Player
{
    pub rect: Rect,
}

impl Player
{
    fn spawn() -> Self
    {
        let mut rect = Rect::new(0, 0, PLAYER_SIZE.0, PLAYER_SIZE.1);
        rect.set_center(WORLD_WIDTH / 2, WORLD_HEIGHT / 2);
        Self { rect }
    }

    pub fn hitbox(&self) -> Rect
    {
        self.rect.inflate(-PLAYER_HITBOX_SHRINK, -PLAYER_HITBOX_SHRINK)
    }

    fn steer(&mut self, controls: Controls)
    {
        let mut dx = 0;
        let mut dy = 0;
        if controls.left {
            dx -= PLAYER_SPEED;
        }
        if controls.right {
            dx += PLAYER_SPEED;
        }
        if controls.up {
            dy -= PLAYER_SPEED;
        }
        if controls.down {
            dy += PLAYER_SPEED;
        }
        self.rect.x += dx;
        self.rect.y += dy;
        self.rect.clamp_within(&world_bounds());
    }
}

/// Something drifting right to left at a fixed speed.
#[derive(Clone, Debug)]
pub struct Drifter
{
    x: f32,
    pub rect: Rect,
    speed: f32,
}

impl Drifter
{
    fn new(y: i32, w: i32, h: i32, speed: f32) -> Self
    {
        Self {
            x: WORLD_WIDTH as f32,
            rect: Rect::new(WORLD_WIDTH, y, w, h),
            speed,
        }
    }

    fn advance(&mut self)
    {
        self.x -= self.speed;
        self.rect.x = self.x as i32;
    }

    fn gone(&self) -> bool
    {
        self.rect.right() < 0
    }
}

pub struct World
{
    pub player: Player,
    pub crystals: Vec<Drifter>,
    pub meteors: Vec<Drifter>,
    pub score: u32,
    pub state: WorldState,
    pub difficulty: Difficulty,
    last_crystal_at: u64,
    last_meteor_at: u64,
}

impl World
{
    pub fn new(now_ms: u64) -> Self
    {
        Self {
            player: Player::spawn(),
            crystals: Vec::new(),
            meteors: Vec::new(),
            score: 0,
            state: WorldState::Playing,
            difficulty: Difficulty::new(now_ms),
            last_crystal_at: now_ms,
            last_meteor_at: now_ms,
        }
    }

    /// Back to the opening state: centered ship, empty sky, zero score and
    /// the starting difficulty.
    pub fn restart(&mut self, now_ms: u64)
    {
        *self = Self::new(now_ms);
        log::info!("scavenger restarted");
    }

    pub fn update(&mut self, now_ms: u64, controls: Controls, rng: &mut impl Rng) -> TickReport
    {
        let mut report = TickReport::default();
        if self.state == WorldState::GameOver {
            return report;
        }

        self.player.steer(controls);
        for crystal in &mut self.crystals {
            crystal.advance();
        }
        for meteor in &mut self.meteors {
            meteor.advance();
        }
        self.crystals.retain(|crystal| !crystal.gone());
        self.meteors.retain(|meteor| !meteor.gone());

        if now_ms.saturating_sub(self.last_crystal_at) > CRYSTAL_SPAWN_MS {
            self.crystals.push(spawn_crystal(self.difficulty.crystal_speed, rng));
            self.last_crystal_at = now_ms;
        }

        let hitbox = self.player.hitbox();
        let before = self.crystals.len();
        self.crystals.retain(|crystal| !hitbox.intersects(&crystal.rect));
        report.collected = (before - self.crystals.len()) as u32;
        self.score += report.collected;

        // The threshold is redrawn every tick, which favors gaps near the
        // low end of the window.
        if now_ms.saturating_sub(self.last_meteor_at) > draw_meteor_gap(&self.difficulty, rng) {
            self.meteors.push(spawn_meteor(&self.difficulty, rng));
            self.last_meteor_at = now_ms;
        }

        if self.meteors.iter().any(|meteor| hitbox.intersects(&meteor.rect)) {
            report.hit = true;
            self.state = WorldState::GameOver;
            log::info!("scavenger over with score {}", self.score);
            return report;
        }

        self.difficulty.ramp(now_ms);
        report
    }
}

pub fn world_bounds() -> Rect
{
    Rect::new(0, 0, WORLD_WIDTH, WORLD_HEIGHT)
}

fn spawn_crystal(speed: f32, rng: &mut impl Rng) -> Drifter
{
    let (w, h) = CRYSTAL_SIZE;
    let y = rng.gen_range(0..=(WORLD_HEIGHT - h).max(0));
    Drifter::new(y, w, h, speed)
}

fn spawn_meteor(difficulty: &Difficulty, rng: &mut impl Rng) -> Drifter
{
    let scale = if difficulty.meteor_size_max > METEOR_SIZE_MIN {
        rng.gen_range(METEOR_SIZE_MIN..=difficulty.meteor_size_max)
    } else {
        METEOR_SIZE_MIN
    };
    let side = ((METEOR_BASE_SIZE as f32) * scale) as i32;
    let y = rng.gen_range(0..=(WORLD_HEIGHT - side).max(0));
    Drifter::new(y, side, side, difficulty.meteor_speed)
}

fn draw_meteor_gap(difficulty: &Difficulty, rng: &mut impl Rng) -> u64
{
    rng.gen_range(difficulty.meteor_spawn_min_ms..=difficulty.meteor_spawn_max_ms)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_world() -> World
    {
        let mut world = World::new(0);
        // Last meteor "in the future" keeps the elapsed gap at zero.
        world.last_meteor_at = u64::MAX;
        world
    }

    #[test]
    fn player_starts_centered_and_stays_in_bounds()
    {
        let mut rng = StdRng::seed_from_u64(1);
        let mut world = quiet_world();
        assert_eq!(world.player.rect, Rect::new(368, 276, PLAYER_SIZE.0, PLAYER_SIZE.1));

        let controls = Controls {
            left: true,
            up: true,
            ..Controls::default()
        };
        for tick in 0..200 {
            world.update(tick, controls, &mut rng);
        }
        assert_eq!((world.player.rect.x, world.player.rect.y), (0, 0));
    }

    #[test]
    fn crystals_spawn_every_two_seconds_and_drift_left()
    {
        let mut rng = StdRng::seed_from_u64(2);
        let mut world = quiet_world();
        world.player.rect = Rect::new(0, 0, PLAYER_SIZE.0, PLAYER_SIZE.1);

        world.update(CRYSTAL_SPAWN_MS, Controls::default(), &mut rng);
        assert!(world.crystals.is_empty());
        world.update(CRYSTAL_SPAWN_MS + 1, Controls::default(), &mut rng);
        assert_eq!(world.crystals.len(), 1);

        let start_x = world.crystals[0].rect.x;
        world.update(CRYSTAL_SPAWN_MS + 2, Controls::default(), &mut rng);
        assert_eq!(world.crystals[0].rect.x, start_x - 4);
    }

    #[test]
    fn touching_a_crystal_scores()
    {
        let mut rng = StdRng::seed_from_u64(3);
        let mut world = quiet_world();
        let center = world.player.rect;
        world.crystals.push(Drifter {
            x: center.x as f32 + 24.0,
            rect: Rect::new(center.x + 24, center.y + 12, CRYSTAL_SIZE.0, CRYSTAL_SIZE.1),
            speed: 0.0,
        });

        let report = world.update(10, Controls::default(), &mut rng);
        assert_eq!(report.collected, 1);
        assert_eq!(world.score, 1);
        assert!(world.crystals.is_empty());
        assert_eq!(world.state, WorldState::Playing);
    }

    #[test]
    fn meteor_hit_ends_game_and_freezes_world()
    {
        let mut rng = StdRng::seed_from_u64(4);
        let mut world = quiet_world();
        let player = world.player.rect;
        world.meteors.push(Drifter {
            x: player.x as f32 - 10.0,
            rect: Rect::new(player.x - 10, player.y - 10, 80, 80),
            speed: 0.0,
        });

        let report = world.update(10, Controls::default(), &mut rng);
        assert!(report.hit);
        assert_eq!(world.state, WorldState::GameOver);

        let frozen = world.player.rect;
        let controls = Controls {
            right: true,
            ..Controls::default()
        };
        assert_eq!(world.update(20, controls, &mut rng), TickReport::default());
        assert_eq!(world.player.rect, frozen);
    }

    #[test]
    fn meteor_sprite_edge_overlap_ends_game()
    {
        let mut rng = StdRng::seed_from_u64(5);
        let mut world = quiet_world();
        let player = world.player.hitbox();
        // Only the outer 15 units of the meteor reach the ship's hitbox.
        world.meteors.push(Drifter {
            x: (player.right() - 15) as f32,
            rect: Rect::new(player.right() - 15, player.y, 80, 80),
            speed: 0.0,
        });

        let report = world.update(10, Controls::default(), &mut rng);
        assert!(report.hit);
        assert_eq!(world.state, WorldState::GameOver);
    }

    #[test]
    fn meteor_touching_hitbox_edge_is_a_miss()
    {
        let mut rng = StdRng::seed_from_u64(9);
        let mut world = quiet_world();
        let player = world.player.hitbox();
        world.meteors.push(Drifter {
            x: player.right() as f32,
            rect: Rect::new(player.right(), player.y, 80, 80),
            speed: 0.0,
        });

        let report = world.update(10, Controls::default(), &mut rng);
        assert!(!report.hit);
        assert_eq!(world.state, WorldState::Playing);
    }

    #[test]
    fn meteor_always_spawns_once_window_max_has_passed()
    {
        let mut rng = StdRng::seed_from_u64(10);
        for start in [0u64, 500, 12_345] {
            let mut world = World::new(start);
            world.update(start + 900, Controls::default(), &mut rng);
            assert!(world.meteors.is_empty());
            world.update(start + 4001, Controls::default(), &mut rng);
            assert_eq!(world.meteors.len(), 1);
        }
    }

    #[test]
    fn offscreen_drifters_are_dropped()
    {
        let mut rng = StdRng::seed_from_u64(6);
        let mut world = quiet_world();
        world.meteors.push(Drifter {
            x: -70.0,
            rect: Rect::new(-70, 0, 60, 60),
            speed: 7.0,
        });
        world.update(10, Controls::default(), &mut rng);
        assert!(world.meteors.is_empty());
    }

    #[test]
    fn meteors_respect_spawn_window_and_size_range()
    {
        let mut rng = StdRng::seed_from_u64(7);
        let difficulty = Difficulty::new(0);
        for _ in 0..100 {
            assert!((1000..=4000).contains(&draw_meteor_gap(&difficulty, &mut rng)));
        }

        for _ in 0..100 {
            let meteor = spawn_meteor(&difficulty, &mut rng);
            assert!((60..=72).contains(&meteor.rect.w));
            assert!(meteor.rect.bottom() <= WORLD_HEIGHT);
            assert_eq!(meteor.rect.x, WORLD_WIDTH);
        }
    }

    #[test]
    fn restart_resets_score_and_difficulty()
    {
        let mut rng = StdRng::seed_from_u64(8);
        let mut world = quiet_world();
        world.score = 12;
        world.state = WorldState::GameOver;
        world.difficulty.meteor_speed = 30.0;
        world.crystals.push(spawn_crystal(4.0, &mut rng));

        world.restart(50_000);
        assert_eq!(world.score, 0);
        assert_eq!(world.state, WorldState::Playing);
        assert_eq!(world.difficulty, Difficulty::new(50_000));
        assert!(world.crystals.is_empty());
        assert!(world.meteors.is_empty());
    }
}
