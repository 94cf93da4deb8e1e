//! The per-frame simulation
//!
//! All gameplay logic lives here, platform-free:
//! - Fixed stage order per tick: input → update → collision
//! - Seeded RNG only (a seed reproduces a spawn sequence exactly)
//! - Collection removal always walks indices high to low

pub mod collision;
pub mod effects;
pub mod progression;
pub mod schedule;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{boxes_overlap, circles_overlap};
pub use state::{
    Boss, Bullet, Enemy, EnemyBullet, EnemyKind, FrameEvent, GamePhase, MovePattern, Particle,
    Player, PowerUp, PowerUpKind, SessionState, Star, Viewport,
};
pub use tick::{TickInput, shoot, tick, use_bomb};
