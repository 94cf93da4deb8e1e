//! Spawner: decides what enemy/boss/power-up to create and with what stats
//!
//! All randomness flows through the session RNG so a seeded run reproduces
//! its spawn sequence exactly.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Boss, BOSS_COLOR, Enemy, EnemyBullet, EnemyKind, FrameEvent, PowerUp, PowerUpKind,
    SessionState,
};
use crate::consts::*;

/// Resolve a uniform [0, 100) draw against the cumulative kind weights.
/// The first bucket whose cumulative sum exceeds the draw wins; ties break in
/// declaration order (basic, fast, tank, sine, zigzag).
pub fn pick_enemy_kind(draw: f32) -> EnemyKind {
    let mut cumulative = 0.0;
    for kind in EnemyKind::ALL {
        cumulative += kind.weight();
        if draw < cumulative {
            return kind;
        }
    }
    EnemyKind::Basic
}

/// Spawn one enemy just above the visible field
pub fn spawn_enemy(state: &mut SessionState) {
    let draw = state.rng.random_range(0.0..100.0);
    let kind = pick_enemy_kind(draw);
    let stats = kind.stats();
    let level_multiplier = 1.0 + (state.level - 1) as f32 * LEVEL_SPEED_STEP;

    let x = state
        .rng
        .random_range(ENEMY_EDGE_MARGIN..state.view.width - ENEMY_EDGE_MARGIN);
    let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };

    state.enemies.push(Enemy {
        pos: Vec2::new(x, -50.0),
        width: stats.width,
        height: stats.height,
        speed: stats.speed * level_multiplier,
        health: stats.health,
        max_health: stats.health,
        points: stats.points,
        kind,
        pattern: kind.pattern(),
        direction,
    });
}

/// Spawn the boss for the current level. Clears all regular enemies; enemy
/// bullets are left alone (only a bomb clears those).
pub fn spawn_boss(state: &mut SessionState) {
    state.enemies.clear();

    let level = state.level;
    let health = (20 + level * 10) as i32;
    state.boss = Some(Boss {
        pos: Vec2::new(state.view.width / 2.0, -100.0),
        width: BOSS_WIDTH,
        height: BOSS_HEIGHT,
        speed: 2.0 + level as f32 * 0.3,
        health,
        max_health: health,
        direction: 1.0,
        shoot_timer: 0.0,
        shoot_interval: (1500.0 - level as f32 * 100.0).max(BOSS_SHOOT_FLOOR_MS),
        points: 1000 + level * 500,
    });

    log::info!("boss spawned: level {level}, health {health}");
    state.push_event(FrameEvent::BossSpawned);
}

/// Fire the boss spread shot, aimed at the player's current position
pub fn boss_shoot(state: &mut SessionState) {
    let Some(boss) = &state.boss else { return };
    let origin = Vec2::new(boss.pos.x, boss.pos.y + boss.height / 2.0);

    let aim = state.player.pos - boss.pos;
    let angle = aim.y.atan2(aim.x);

    let spread_count = 3 + state.level / 2;
    for i in 0..spread_count {
        let bullet_angle = angle + (i as f32 - (spread_count - 1) as f32 / 2.0) * SPREAD_STEP;
        state.enemy_bullets.push(EnemyBullet {
            pos: origin,
            radius: ENEMY_BULLET_RADIUS,
            vel: Vec2::new(bullet_angle.cos(), bullet_angle.sin()) * ENEMY_BULLET_SPEED,
            color: BOSS_COLOR,
        });
    }
}

/// Spawn a power-up of a uniformly random kind at the given position
pub fn spawn_power_up(state: &mut SessionState, pos: Vec2) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    state.power_ups.push(PowerUp {
        pos,
        width: POWER_UP_SIZE,
        height: POWER_UP_SIZE,
        speed: POWER_UP_FALL_SPEED,
        rotation: 0.0,
        kind,
    });
}

/// Independent drop roll on a bullet kill (bombs and boss contact never drop)
pub fn roll_power_up_drop(state: &mut SessionState, pos: Vec2) {
    if state.rng.random::<f64>() < POWER_UP_DROP_CHANCE {
        spawn_power_up(state, pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    #[test]
    fn test_kind_weight_buckets() {
        // Cumulative bounds: basic 40, fast 65, tank 80, sine 90, zigzag 100
        assert_eq!(pick_enemy_kind(0.0), EnemyKind::Basic);
        assert_eq!(pick_enemy_kind(39.9), EnemyKind::Basic);
        assert_eq!(pick_enemy_kind(40.0), EnemyKind::Fast);
        assert_eq!(pick_enemy_kind(64.9), EnemyKind::Fast);
        assert_eq!(pick_enemy_kind(65.0), EnemyKind::Tank);
        assert_eq!(pick_enemy_kind(79.9), EnemyKind::Tank);
        assert_eq!(pick_enemy_kind(80.0), EnemyKind::Sine);
        assert_eq!(pick_enemy_kind(90.0), EnemyKind::Zigzag);
        assert_eq!(pick_enemy_kind(99.9), EnemyKind::Zigzag);
    }

    #[test]
    fn test_spawn_enemy_position_and_scaling() {
        let mut state = SessionState::new(42, Viewport::new(800.0, 600.0));
        state.level = 3;
        for _ in 0..100 {
            spawn_enemy(&mut state);
        }
        for enemy in &state.enemies {
            assert!(enemy.pos.x >= ENEMY_EDGE_MARGIN);
            assert!(enemy.pos.x <= 800.0 - ENEMY_EDGE_MARGIN);
            assert_eq!(enemy.pos.y, -50.0);
            let base = enemy.kind.stats().speed;
            let expected = base * (1.0 + 2.0 * LEVEL_SPEED_STEP);
            assert!((enemy.speed - expected).abs() < 1e-5);
            assert_eq!(enemy.pattern, enemy.kind.pattern());
            assert!(enemy.direction == 1.0 || enemy.direction == -1.0);
        }
    }

    #[test]
    fn test_boss_stats_scale_with_level() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        state.level = 4;
        spawn_boss(&mut state);
        let boss = state.boss.as_ref().unwrap();
        assert_eq!(boss.health, 60);
        assert_eq!(boss.max_health, 60);
        assert!((boss.speed - 3.2).abs() < 1e-5);
        assert_eq!(boss.shoot_interval, 1100.0);
        assert_eq!(boss.points, 3000);
        assert_eq!(boss.pos, Vec2::new(400.0, -100.0));
    }

    #[test]
    fn test_boss_shoot_interval_clamps_at_high_level() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        state.level = 20; // 1500 - 2000 would go negative
        spawn_boss(&mut state);
        assert_eq!(state.boss.as_ref().unwrap().shoot_interval, BOSS_SHOOT_FLOOR_MS);
    }

    #[test]
    fn test_spawn_boss_clears_enemies_but_not_bullets() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        spawn_enemy(&mut state);
        spawn_enemy(&mut state);
        state.enemy_bullets.push(EnemyBullet {
            pos: Vec2::new(100.0, 100.0),
            radius: ENEMY_BULLET_RADIUS,
            vel: Vec2::new(0.0, 5.0),
            color: BOSS_COLOR,
        });

        spawn_boss(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.enemy_bullets.len(), 1);
        assert!(state.is_boss_active());
    }

    #[test]
    fn test_boss_spread_grows_with_level() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        state.level = 1;
        spawn_boss(&mut state);
        boss_shoot(&mut state);
        assert_eq!(state.enemy_bullets.len(), 3);

        state.enemy_bullets.clear();
        state.level = 6;
        boss_shoot(&mut state);
        assert_eq!(state.enemy_bullets.len(), 6);

        // Every bullet leaves the boss's lower edge at the spread speed
        let boss = state.boss.as_ref().unwrap();
        for bullet in &state.enemy_bullets {
            assert_eq!(bullet.pos.x, boss.pos.x);
            assert_eq!(bullet.pos.y, boss.pos.y + boss.height / 2.0);
            assert!((bullet.vel.length() - ENEMY_BULLET_SPEED).abs() < 1e-4);
        }
    }
}
