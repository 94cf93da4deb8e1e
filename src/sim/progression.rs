//! Progression controller: the NORMAL <-> BOSS level state machine
//!
//! NORMAL: enemies spawn on the session timer, no boss. BOSS: spawning is
//! suppressed and the boss is live. The transition into BOSS fires the moment
//! the level kill target is reached; the transition back runs through
//! `level_up` when the boss dies.

use super::spawn;
use super::state::{FrameEvent, SessionState};
use crate::consts::{BASE_KILL_TARGET, ENEMY_SPAWN_INTERVAL_FLOOR_MS};

/// Enter the BOSS state once enough kills have accumulated this level.
/// Called after every qualifying kill and after each bomb.
pub fn check_level_up(state: &mut SessionState) {
    if !state.is_boss_active() && state.level_kill_count >= state.level_kill_target {
        spawn::spawn_boss(state);
    }
}

/// Advance to the next level after a boss defeat: reset the kill counter,
/// raise the target, and tighten the spawn interval toward its floor.
pub fn level_up(state: &mut SessionState) {
    state.level += 1;
    state.level_kill_count = 0;
    state.level_kill_target = BASE_KILL_TARGET + state.level * 5;
    state.enemy_spawn_interval =
        (2000.0 - state.level as f32 * 150.0).max(ENEMY_SPAWN_INTERVAL_FLOOR_MS);

    log::info!(
        "level up: level {}, kill target {}, spawn interval {}ms",
        state.level,
        state.level_kill_target,
        state.enemy_spawn_interval
    );
    state.push_event(FrameEvent::LevelUp(state.level));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    #[test]
    fn test_boss_spawns_exactly_at_target() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        state.level_kill_count = state.level_kill_target - 1;
        check_level_up(&mut state);
        assert!(!state.is_boss_active());

        state.level_kill_count += 1;
        check_level_up(&mut state);
        assert!(state.is_boss_active());
    }

    #[test]
    fn test_no_second_boss_while_one_is_active() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        state.level_kill_count = state.level_kill_target;
        check_level_up(&mut state);
        let first_health = state.boss.as_ref().unwrap().health;

        state.level_kill_count += 5;
        check_level_up(&mut state);
        assert_eq!(state.boss.as_ref().unwrap().health, first_health);
    }

    #[test]
    fn test_level_up_bookkeeping() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        state.level_kill_count = 15;
        level_up(&mut state);
        assert_eq!(state.level, 2);
        assert_eq!(state.level_kill_count, 0);
        assert_eq!(state.level_kill_target, 25);
        assert_eq!(state.enemy_spawn_interval, 1700.0);
        assert!(state.events.contains(&FrameEvent::LevelUp(2)));
    }

    #[test]
    fn test_spawn_interval_floors_at_high_level() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        state.level = 20;
        level_up(&mut state);
        assert_eq!(state.enemy_spawn_interval, ENEMY_SPAWN_INTERVAL_FLOOR_MS);
    }
}
