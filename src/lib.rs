//! Astro Strike - a gesture-controlled space shooter
//!
//! Core modules:
//! - `sim`: the per-frame simulation (spawning, physics, collisions, progression)
//! - `gesture`: hand-tracker boundary (polled state + edge-triggered gestures)
//! - `audio`: fire-and-forget sound cue boundary
//! - `render`: terminal presentation surface
//! - `highscores`: persistent best-score store
//! - `settings`: user preferences

pub mod audio;
pub mod gesture;
pub mod highscores;
pub mod render;
pub mod settings;
pub mod sim;

pub use highscores::HighScoreStore;
pub use settings::Settings;

/// Game tuning constants
pub mod consts {
    /// Reference frame duration: all dt-scaled motion uses `dt_ms / FRAME_REF_MS`,
    /// so speeds are calibrated against a 60 fps frame
    pub const FRAME_REF_MS: f32 = 16.0;
    /// Upper bound on a single frame delta (tab-switch / debugger pauses)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 8.0;
    /// Ship center is clamped this far inside every viewport edge
    pub const PLAYER_MARGIN: f32 = 30.0;
    pub const START_LIVES: u32 = 3;
    pub const START_BOMBS: u32 = 3;
    pub const MAX_LIVES: u32 = 5;
    pub const MAX_BOMBS: u32 = 5;
    pub const INVINCIBILITY_MS: f32 = 2000.0;
    /// Per-tick exponential smoothing toward the tracked hand position.
    /// Not dt-scaled; the tuned feel depends on it running once per tick.
    pub const HAND_SMOOTHING: f32 = 0.12;

    /// Player bullets
    pub const BULLET_WIDTH: f32 = 6.0;
    pub const BULLET_HEIGHT: f32 = 18.0;
    pub const BULLET_SPEED: f32 = 14.0;
    pub const BULLET_DAMAGE: i32 = 1;
    pub const SHOOT_COOLDOWN_MS: f32 = 250.0;
    pub const AUTO_FIRE_COOLDOWN_MS: f32 = 180.0;
    pub const RAPID_SHOOT_COOLDOWN_MS: f32 = 100.0;
    pub const RAPID_AUTO_FIRE_COOLDOWN_MS: f32 = 80.0;
    pub const RAPID_DURATION_MS: f32 = 5000.0;

    /// Enemies
    pub const ENEMY_SPAWN_INTERVAL_MS: f32 = 2000.0;
    pub const ENEMY_SPAWN_INTERVAL_FLOOR_MS: f32 = 800.0;
    /// Horizontal band enemies spawn in (and zigzag bounces within)
    pub const ENEMY_EDGE_MARGIN: f32 = 50.0;
    /// Enemies despawn this far past the bottom edge
    pub const ENEMY_DESPAWN_SLACK: f32 = 50.0;
    /// Per-level speed multiplier step
    pub const LEVEL_SPEED_STEP: f32 = 0.15;
    pub const POWER_UP_DROP_CHANCE: f64 = 0.12;

    /// Boss
    pub const BOSS_WIDTH: f32 = 120.0;
    pub const BOSS_HEIGHT: f32 = 100.0;
    /// Boss descends to this height before patrolling
    pub const BOSS_DOCK_Y: f32 = 100.0;
    /// Horizontal patrol margin from either viewport edge
    pub const BOSS_PATROL_MARGIN: f32 = 100.0;
    /// Shoot interval never drops below this at high levels
    pub const BOSS_SHOOT_FLOOR_MS: f32 = 300.0;
    pub const BOSS_BOMB_DAMAGE: i32 = 5;
    pub const ENEMY_BULLET_RADIUS: f32 = 8.0;
    pub const ENEMY_BULLET_SPEED: f32 = 5.0;
    /// Angular step between spread-shot bullets (radians)
    pub const SPREAD_STEP: f32 = 0.2;

    /// Power-ups
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_FALL_SPEED: f32 = 2.0;
    /// Rotation per tick (not dt-scaled)
    pub const POWER_UP_SPIN: f32 = 0.05;

    /// Progression
    pub const BASE_KILL_TARGET: u32 = 15;

    /// Effects
    pub const SCREEN_SHAKE_MS: f32 = 500.0;
    /// One star per this many square pixels of viewport
    pub const STAR_DENSITY: f32 = 8000.0;
    /// Hard cap on live particles; oldest evicted first
    pub const MAX_PARTICLES: usize = 512;

    /// Gesture boundary
    pub const GESTURE_EDGE_COOLDOWN_MS: f64 = 300.0;
}
