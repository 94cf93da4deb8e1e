//! Game state and core simulation types
//!
//! Everything a running session owns lives in [`SessionState`]: the entity
//! collections, the session counters, and the seeded RNG. The frame driver is
//! the sole owner; stage functions receive it by `&mut`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::schedule::ScheduledTask;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen; the frame callback keeps running as a no-op
    Paused,
    /// Run ended
    GameOver,
}

/// Logical play-field size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub invincible: bool,
    /// Remaining invincibility (ms); flips `invincible` off when it hits 0
    pub invincible_timer: f32,
}

impl Player {
    pub fn new(view: Viewport) -> Self {
        Self {
            pos: Vec2::new(view.width / 2.0, view.height - 100.0),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            invincible: false,
            invincible_timer: 0.0,
        }
    }
}

/// A player bullet, travelling straight up
#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub damage: i32,
}

/// A circular boss bullet with a free velocity vector
#[derive(Debug, Clone, Copy)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    pub color: u32,
}

/// Enemy archetypes; stats and movement pattern follow from the kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Fast,
    Tank,
    Sine,
    Zigzag,
}

/// Fixed base stats for an enemy kind (before level scaling)
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: i32,
    pub points: u32,
    pub color: u32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Tank,
        EnemyKind::Sine,
        EnemyKind::Zigzag,
    ];

    /// Spawn weights, sampled over a uniform [0, 100) draw
    pub fn weight(self) -> f32 {
        match self {
            EnemyKind::Basic => 40.0,
            EnemyKind::Fast => 25.0,
            EnemyKind::Tank => 15.0,
            EnemyKind::Sine => 10.0,
            EnemyKind::Zigzag => 10.0,
        }
    }

    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                width: 40.0,
                height: 40.0,
                speed: 2.0,
                health: 1,
                points: 100,
                color: 0xff4444,
            },
            EnemyKind::Fast => EnemyStats {
                width: 30.0,
                height: 30.0,
                speed: 4.0,
                health: 1,
                points: 150,
                color: 0xffaa00,
            },
            EnemyKind::Tank => EnemyStats {
                width: 55.0,
                height: 55.0,
                speed: 1.2,
                health: 3,
                points: 300,
                color: 0xaa44ff,
            },
            EnemyKind::Sine => EnemyStats {
                width: 40.0,
                height: 40.0,
                speed: 2.0,
                health: 1,
                points: 200,
                color: 0x44ff44,
            },
            EnemyKind::Zigzag => EnemyStats {
                width: 35.0,
                height: 35.0,
                speed: 2.5,
                health: 1,
                points: 175,
                color: 0xff44aa,
            },
        }
    }

    pub fn pattern(self) -> MovePattern {
        match self {
            EnemyKind::Sine => MovePattern::Sine,
            EnemyKind::Zigzag => MovePattern::Zigzag,
            _ => MovePattern::Straight,
        }
    }
}

/// Horizontal movement pattern layered on the linear descent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePattern {
    Straight,
    Sine,
    Zigzag,
}

/// A regular enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Effective descent speed (base speed already level-scaled)
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub points: u32,
    pub kind: EnemyKind,
    pub pattern: MovePattern,
    /// Horizontal direction sign for the zigzag pattern
    pub direction: f32,
}

impl Enemy {
    pub fn color(&self) -> u32 {
        self.kind.stats().color
    }
}

/// The boss. At most one exists; boss-active is `SessionState::boss.is_some()`.
#[derive(Debug, Clone)]
pub struct Boss {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    pub direction: f32,
    /// Accumulates dt; fires a spread shot when it reaches `shoot_interval`
    pub shoot_timer: f32,
    pub shoot_interval: f32,
    pub points: u32,
}

pub const BOSS_COLOR: u32 = 0xff0066;

/// Power-up kinds with their HUD marker color and symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Health,
    Bomb,
    Rapid,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Health, PowerUpKind::Bomb, PowerUpKind::Rapid];

    pub fn color(self) -> u32 {
        match self {
            PowerUpKind::Health => 0xff4444,
            PowerUpKind::Bomb => 0xffaa00,
            PowerUpKind::Rapid => 0x44aaff,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            PowerUpKind::Health => '♥',
            PowerUpKind::Bomb => '●',
            PowerUpKind::Rapid => '⚡',
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub rotation: f32,
    pub kind: PowerUpKind,
}

/// A cosmetic particle; never affects gameplay
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: u32,
    /// Remaining life (ms)
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Fade-out factor in [0, 1]
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).max(0.0)
    }
}

/// Background star; wraps to the top edge instead of despawning
#[derive(Debug, Clone, Copy)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub brightness: f32,
}

/// Something that happened this tick that the outer loop cares about
/// (audio cues, HUD refresh). Drained by the frame driver after each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    ShotFired,
    EnemyDestroyed,
    /// An enemy escaped past the bottom edge (combo reset)
    EnemyLeaked,
    BossSpawned,
    BossDefeated,
    PlayerHit,
    PowerUpCollected(PowerUpKind),
    BombDetonated,
    LevelUp(u32),
    GameOver,
}

/// Complete session state: entity collections plus session counters.
///
/// Collections own their elements outright; removal is immediate. Any loop
/// that removes while iterating must walk from highest to lowest index, and
/// further access to a just-inspected element must re-check liveness.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub view: Viewport,
    pub phase: GamePhase,

    // Session counters
    pub score: f64,
    pub lives: u32,
    pub bombs: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub enemies_killed: u32,
    pub bosses_killed: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub level: u32,
    pub level_kill_count: u32,
    pub level_kill_target: u32,

    // Timers (ms)
    pub enemy_spawn_timer: f32,
    pub enemy_spawn_interval: f32,
    pub shoot_cooldown: f32,
    /// Remaining rapid-fire window; both fire cooldowns tighten while > 0
    pub rapid_fire_timer: f32,
    pub screen_shake: f32,
    pub auto_fire: bool,

    // Entities
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,

    /// Delayed loot spawns, pumped once per tick
    pub scheduled: Vec<ScheduledTask>,
    /// Per-tick event queue, drained by the frame driver
    pub events: Vec<FrameEvent>,
}

impl SessionState {
    /// Fresh session with the given seed and play-field size
    pub fn new(seed: u64, view: Viewport) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            view,
            phase: GamePhase::Playing,
            score: 0.0,
            lives: START_LIVES,
            bombs: START_BOMBS,
            combo: 0,
            max_combo: 0,
            enemies_killed: 0,
            bosses_killed: 0,
            shots_fired: 0,
            shots_hit: 0,
            level: 1,
            level_kill_count: 0,
            level_kill_target: BASE_KILL_TARGET,
            enemy_spawn_timer: 0.0,
            enemy_spawn_interval: ENEMY_SPAWN_INTERVAL_MS,
            shoot_cooldown: 0.0,
            rapid_fire_timer: 0.0,
            screen_shake: 0.0,
            auto_fire: false,
            player: Player::new(view),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            power_ups: Vec::new(),
            particles: Vec::new(),
            stars: Vec::new(),
            scheduled: Vec::new(),
            events: Vec::new(),
        };
        super::effects::generate_stars(&mut state);
        state
    }

    /// The enemy spawn timer only runs while no boss is active
    pub fn is_boss_active(&self) -> bool {
        self.boss.is_some()
    }

    /// Score as displayed (fractional combo bonuses accumulate internally)
    pub fn display_score(&self) -> u64 {
        self.score.floor().max(0.0) as u64
    }

    /// Hit rate for the end-of-run stats screen
    pub fn accuracy(&self) -> u32 {
        if self.shots_fired == 0 {
            0
        } else {
            ((self.shots_hit as f64 / self.shots_fired as f64) * 100.0).round() as u32
        }
    }

    pub fn push_event(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    /// Drain this tick's events for the outer loop
    pub fn take_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.events)
    }
}
