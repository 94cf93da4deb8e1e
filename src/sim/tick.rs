//! Frame driver and physics/update stage
//!
//! One `tick` advances the whole simulation by the elapsed wall-clock delta:
//! input sampling, per-collection updates, spawning, timers, then the
//! collision stage. All dt-scaled motion uses `dt / 16` so speeds stay
//! calibrated against a 60 fps reference frame.

use glam::Vec2;

use super::state::{Bullet, FrameEvent, GamePhase, MovePattern, SessionState};
use super::{collision, effects, progression, schedule, spawn};
use crate::consts::*;
use crate::gesture::{Gesture, HandState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    // Held directional keys (keyboard mode)
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Discrete fire press
    pub fire: bool,
    /// One-shot bomb trigger (key press or peace-gesture edge)
    pub bomb: bool,
    /// One-shot pause toggle
    pub pause: bool,
    /// Latest tracker sample; `None` means keyboard-only mode
    pub hand: Option<HandState>,
}

/// Advance the session by one frame of `dt` milliseconds.
///
/// Pausing short-circuits the whole body; the caller keeps invoking `tick`
/// every frame so resuming is instantaneous.
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
    }
    if state.phase != GamePhase::Playing {
        return;
    }

    update_player(state, input, dt);

    // Auto-fire samples the gesture once per tick, before bullet aging, and
    // independently of the edge-triggered gesture path used for bombs
    update_gesture_actions(state, input);
    if input.fire {
        shoot(state);
    }
    if input.bomb {
        use_bomb(state);
    }

    update_bullets(state, dt);
    update_enemies(state, dt);
    update_boss(state, dt);
    update_enemy_bullets(state, dt);
    update_particles(state, dt);
    update_power_ups(state, dt);
    effects::update_stars(state, dt);

    // Enemy spawning is suppressed for the whole boss encounter
    if !state.is_boss_active() {
        state.enemy_spawn_timer += dt;
        if state.enemy_spawn_timer >= state.enemy_spawn_interval {
            spawn::spawn_enemy(state);
            state.enemy_spawn_timer = 0.0;
        }
    }

    // Pump deferred loot spawns (boss drops). Loot only - never counters.
    let mut tasks = std::mem::take(&mut state.scheduled);
    let due = schedule::advance(&mut tasks, dt);
    state.scheduled = tasks;
    for action in due {
        match action {
            schedule::ScheduledAction::SpawnPowerUp { pos } => spawn::spawn_power_up(state, pos),
        }
    }

    // Timers
    if state.shoot_cooldown > 0.0 {
        state.shoot_cooldown -= dt;
    }
    if state.rapid_fire_timer > 0.0 {
        state.rapid_fire_timer = (state.rapid_fire_timer - dt).max(0.0);
    }
    if state.screen_shake > 0.0 {
        state.screen_shake = (state.screen_shake - dt).max(0.0);
    }
    if state.player.invincible {
        state.player.invincible_timer -= dt;
        if state.player.invincible_timer <= 0.0 {
            state.player.invincible = false;
            state.player.invincible_timer = 0.0;
        }
    }

    collision::run(state);
}

/// Keyboard: held-key sum. Tracker: exponential smoothing toward the reported
/// position with a fixed per-tick factor (deliberately not dt-scaled - the
/// tuned responsiveness depends on it). Always clamped to the field margin.
fn update_player(state: &mut SessionState, input: &TickInput, dt: f32) {
    let speed = state.player.speed * (dt / FRAME_REF_MS);

    match &input.hand {
        None => {
            if input.left {
                state.player.pos.x -= speed;
            }
            if input.right {
                state.player.pos.x += speed;
            }
            if input.up {
                state.player.pos.y -= speed;
            }
            if input.down {
                state.player.pos.y += speed;
            }
        }
        Some(hand) if hand.is_detected => {
            let target = Vec2::new(
                hand.position.x * state.view.width,
                hand.position.y * state.view.height,
            );
            state.player.pos += (target - state.player.pos) * HAND_SMOOTHING;
        }
        // Tracker running but no hand this frame: hold position
        Some(_) => {}
    }

    state.player.pos.x = state
        .player
        .pos
        .x
        .clamp(PLAYER_MARGIN, state.view.width - PLAYER_MARGIN);
    state.player.pos.y = state
        .player
        .pos
        .y
        .clamp(PLAYER_MARGIN, state.view.height - PLAYER_MARGIN);
}

/// A held fist keeps the trigger down on the shared cooldown; anything else
/// (or a lost hand) releases it for this tick
fn update_gesture_actions(state: &mut SessionState, input: &TickInput) {
    let Some(hand) = &input.hand else { return };

    if hand.is_detected && hand.gesture == Gesture::Fist {
        state.auto_fire = true;
        if state.shoot_cooldown <= 0.0 {
            shoot(state);
        }
    } else {
        state.auto_fire = false;
    }
}

/// Fire one bullet from the ship's nose, gated on the shared cooldown.
/// Auto-fire and the rapid-fire window each select a faster cooldown.
pub fn shoot(state: &mut SessionState) {
    if state.shoot_cooldown > 0.0 {
        return;
    }

    state.bullets.push(Bullet {
        pos: Vec2::new(
            state.player.pos.x,
            state.player.pos.y - state.player.height / 2.0,
        ),
        width: BULLET_WIDTH,
        height: BULLET_HEIGHT,
        speed: BULLET_SPEED,
        damage: BULLET_DAMAGE,
    });
    state.shots_fired += 1;

    let rapid = state.rapid_fire_timer > 0.0;
    state.shoot_cooldown = match (state.auto_fire, rapid) {
        (true, true) => RAPID_AUTO_FIRE_COOLDOWN_MS,
        (true, false) => AUTO_FIRE_COOLDOWN_MS,
        (false, true) => RAPID_SHOOT_COOLDOWN_MS,
        (false, false) => SHOOT_COOLDOWN_MS,
    };

    let muzzle = Vec2::new(state.player.pos.x, state.player.pos.y - 25.0);
    effects::burst(state, muzzle, 0x00ffff, 3);
    state.push_event(FrameEvent::ShotFired);
}

/// Bomb: wipe every regular enemy (flat points - no combo multiplier and no
/// combo increment), hit the boss for a flat 5, and clear all enemy bullets
pub fn use_bomb(state: &mut SessionState) {
    if state.bombs == 0 {
        return;
    }
    state.bombs -= 1;
    state.push_event(FrameEvent::BombDetonated);

    let victims = std::mem::take(&mut state.enemies);
    for enemy in &victims {
        effects::explosion(state, enemy.pos, enemy.color());
        state.score += enemy.points as f64;
        state.enemies_killed += 1;
        state.shots_hit += 1;
        state.level_kill_count += 1;
    }

    let boss_pos = state.boss.as_ref().map(|b| b.pos);
    if let Some(pos) = boss_pos {
        let defeated = {
            let boss = state.boss.as_mut().expect("boss position was just read");
            boss.health -= BOSS_BOMB_DAMAGE;
            boss.health <= 0
        };
        effects::explosion(state, pos, super::state::BOSS_COLOR);
        if defeated {
            collision::defeat_boss(state);
        }
    }

    state.enemy_bullets.clear();
    progression::check_level_up(state);
}

fn update_bullets(state: &mut SessionState, dt: f32) {
    let scale = dt / FRAME_REF_MS;
    let mut i = state.bullets.len();
    while i > 0 {
        i -= 1;
        state.bullets[i].pos.y -= state.bullets[i].speed * scale;
        if state.bullets[i].pos.y < -20.0 {
            state.bullets.remove(i);
        }
    }
}

fn update_enemies(state: &mut SessionState, dt: f32) {
    let scale = dt / FRAME_REF_MS;
    let width = state.view.width;
    let height = state.view.height;

    let mut i = state.enemies.len();
    while i > 0 {
        i -= 1;
        {
            let enemy = &mut state.enemies[i];
            enemy.pos.y += enemy.speed * scale;

            // Horizontal pattern offsets run once per tick; the sine phase is
            // driven by the current y, not elapsed time
            match enemy.pattern {
                MovePattern::Straight => {}
                MovePattern::Sine => {
                    enemy.pos.x += (enemy.pos.y * 0.02).sin() * 2.0;
                }
                MovePattern::Zigzag => {
                    enemy.pos.x += enemy.direction * 1.5;
                    if enemy.pos.x < ENEMY_EDGE_MARGIN || enemy.pos.x > width - ENEMY_EDGE_MARGIN {
                        enemy.direction = -enemy.direction;
                    }
                }
            }
        }

        // An escaped enemy is a miss: it takes the combo with it
        if state.enemies[i].pos.y > height + ENEMY_DESPAWN_SLACK {
            state.enemies.remove(i);
            state.combo = 0;
            state.push_event(FrameEvent::EnemyLeaked);
        }
    }
}

fn update_boss(state: &mut SessionState, dt: f32) {
    let width = state.view.width;
    let mut fire = false;

    if let Some(boss) = state.boss.as_mut() {
        if boss.pos.y < BOSS_DOCK_Y {
            // Fixed per-tick descent until docked
            boss.pos.y += 1.0;
        } else {
            boss.pos.x += boss.direction * boss.speed * (dt / FRAME_REF_MS);
            if boss.pos.x < BOSS_PATROL_MARGIN || boss.pos.x > width - BOSS_PATROL_MARGIN {
                boss.direction = -boss.direction;
            }

            boss.shoot_timer += dt;
            if boss.shoot_timer >= boss.shoot_interval {
                fire = true;
                boss.shoot_timer = 0.0;
            }
        }
    }

    if fire {
        spawn::boss_shoot(state);
    }
}

fn update_enemy_bullets(state: &mut SessionState, dt: f32) {
    let scale = dt / FRAME_REF_MS;
    let width = state.view.width;
    let height = state.view.height;

    let mut i = state.enemy_bullets.len();
    while i > 0 {
        i -= 1;
        let bullet = &mut state.enemy_bullets[i];
        bullet.pos += bullet.vel * scale;

        // Pruned past the bottom and sides only; a bullet that flies off the
        // top keeps going (aimed shots never do for long)
        if bullet.pos.y > height + 20.0 || bullet.pos.x < -20.0 || bullet.pos.x > width + 20.0 {
            state.enemy_bullets.remove(i);
        }
    }
}

fn update_particles(state: &mut SessionState, dt: f32) {
    let scale = dt / FRAME_REF_MS;
    let mut i = state.particles.len();
    while i > 0 {
        i -= 1;
        let p = &mut state.particles[i];
        p.pos += p.vel * scale;
        p.life -= dt;
        if p.life <= 0.0 {
            state.particles.remove(i);
        }
    }
}

fn update_power_ups(state: &mut SessionState, dt: f32) {
    let scale = dt / FRAME_REF_MS;
    let height = state.view.height;

    let mut i = state.power_ups.len();
    while i > 0 {
        i -= 1;
        let pu = &mut state.power_ups[i];
        pu.pos.y += pu.speed * scale;
        pu.rotation += POWER_UP_SPIN;
        if pu.pos.y > height + 30.0 {
            state.power_ups.remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyKind, Viewport};

    const DT: f32 = 16.0;

    fn test_state() -> SessionState {
        SessionState::new(123, Viewport::new(800.0, 600.0))
    }

    fn basic_enemy(x: f32, y: f32) -> Enemy {
        let stats = EnemyKind::Basic.stats();
        Enemy {
            pos: Vec2::new(x, y),
            width: stats.width,
            height: stats.height,
            speed: 0.0,
            health: stats.health,
            max_health: stats.health,
            points: stats.points,
            kind: EnemyKind::Basic,
            pattern: MovePattern::Straight,
            direction: 1.0,
        }
    }

    fn fist_input() -> TickInput {
        TickInput {
            hand: Some(HandState {
                position: Vec2::new(0.5, 0.8),
                gesture: Gesture::Fist,
                is_detected: true,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_pause_freezes_and_resumes() {
        let mut state = test_state();
        state.enemies.push(basic_enemy(100.0, 100.0));

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        // Paused ticks are no-ops
        let before = state.enemies[0].pos;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.enemies[0].pos, before);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_enemy_bottom_boundary_and_combo_reset() {
        let mut state = test_state();
        state.combo = 6;

        // Exactly at height + 50: kept
        state.enemies.push(basic_enemy(200.0, 650.0));
        update_enemies(&mut state, DT);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.combo, 6);

        // One pixel past: removed, combo gone
        state.enemies[0].pos.y = 651.0;
        update_enemies(&mut state, DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.combo, 0);
        assert!(state.events.contains(&FrameEvent::EnemyLeaked));
    }

    #[test]
    fn test_zigzag_flips_direction_at_margin() {
        let mut state = test_state();
        let mut enemy = basic_enemy(49.0, 100.0);
        enemy.pattern = MovePattern::Zigzag;
        enemy.direction = -1.0;
        state.enemies.push(enemy);

        update_enemies(&mut state, DT);
        assert_eq!(state.enemies[0].direction, 1.0);
    }

    #[test]
    fn test_fist_auto_fires_on_faster_cooldown() {
        let mut state = test_state();
        tick(&mut state, &fist_input(), DT);

        assert!(state.auto_fire);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.shots_fired, 1);
        // Auto cooldown minus this tick's decrement
        assert_eq!(state.shoot_cooldown, AUTO_FIRE_COOLDOWN_MS - DT);

        // Open palm releases the trigger
        let mut open = fist_input();
        open.hand.as_mut().unwrap().gesture = Gesture::Open;
        tick(&mut state, &open, DT);
        assert!(!state.auto_fire);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_manual_fire_uses_standard_cooldown() {
        let mut state = test_state();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.shoot_cooldown, SHOOT_COOLDOWN_MS - DT);

        // Still cooling down: press is ignored
        tick(&mut state, &input, DT);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.shots_fired, 1);
    }

    #[test]
    fn test_rapid_window_tightens_cooldowns() {
        let mut state = test_state();
        state.rapid_fire_timer = RAPID_DURATION_MS;
        shoot(&mut state);
        assert_eq!(state.shoot_cooldown, RAPID_SHOOT_COOLDOWN_MS);

        state.shoot_cooldown = 0.0;
        state.auto_fire = true;
        shoot(&mut state);
        assert_eq!(state.shoot_cooldown, RAPID_AUTO_FIRE_COOLDOWN_MS);
    }

    #[test]
    fn test_hand_smoothing_moves_toward_target() {
        let mut state = test_state();
        let start = state.player.pos;
        let input = TickInput {
            hand: Some(HandState {
                position: Vec2::new(0.25, 0.25),
                gesture: Gesture::Open,
                is_detected: true,
            }),
            ..Default::default()
        };

        update_player(&mut state, &input, DT);
        let target = Vec2::new(200.0, 150.0);
        let expected = start + (target - start) * HAND_SMOOTHING;
        assert!((state.player.pos - expected).length() < 1e-4);

        // Undetected hand holds position
        let hold = TickInput {
            hand: Some(HandState {
                position: Vec2::new(0.9, 0.9),
                gesture: Gesture::None,
                is_detected: false,
            }),
            ..Default::default()
        };
        let held = state.player.pos;
        update_player(&mut state, &hold, DT);
        assert_eq!(state.player.pos, held);
    }

    #[test]
    fn test_player_clamped_to_margin() {
        let mut state = test_state();
        state.player.pos = Vec2::new(5.0, 5.0);
        update_player(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.pos, Vec2::new(PLAYER_MARGIN, PLAYER_MARGIN));

        state.player.pos = Vec2::new(10_000.0, 10_000.0);
        update_player(&mut state, &TickInput::default(), DT);
        assert_eq!(
            state.player.pos,
            Vec2::new(800.0 - PLAYER_MARGIN, 600.0 - PLAYER_MARGIN)
        );
    }

    #[test]
    fn test_invincibility_expires() {
        let mut state = test_state();
        state.player.invincible = true;
        state.player.invincible_timer = 30.0;

        tick(&mut state, &TickInput::default(), DT);
        assert!(state.player.invincible);

        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.player.invincible);
        assert_eq!(state.player.invincible_timer, 0.0);
    }

    #[test]
    fn test_spawn_timer_fires_and_resets() {
        let mut state = test_state();
        tick(&mut state, &TickInput::default(), 1999.0);
        assert!(state.enemies.is_empty());

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemy_spawn_timer, 0.0);
    }

    #[test]
    fn test_no_spawns_during_boss_fight() {
        let mut state = test_state();
        spawn::spawn_boss(&mut state);
        tick(&mut state, &TickInput::default(), 5000.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.enemy_spawn_timer, 0.0);
    }

    #[test]
    fn test_boss_descends_then_patrols_and_fires() {
        let mut state = test_state();
        spawn::spawn_boss(&mut state);

        // Descends a fixed pixel per tick regardless of dt
        update_boss(&mut state, 100.0);
        assert_eq!(state.boss.as_ref().unwrap().pos.y, -99.0);

        // Once docked, the shoot timer accumulates until the spread fires
        state.boss.as_mut().unwrap().pos.y = BOSS_DOCK_Y;
        let interval = state.boss.as_ref().unwrap().shoot_interval;
        update_boss(&mut state, interval);
        assert!(!state.enemy_bullets.is_empty());
        assert_eq!(state.boss.as_ref().unwrap().shoot_timer, 0.0);
    }

    #[test]
    fn test_bomb_wipes_field_without_combo() {
        let mut state = test_state();
        state.combo = 4;
        for i in 0..5 {
            state.enemies.push(basic_enemy(100.0 + i as f32 * 60.0, 100.0));
        }
        state.enemy_bullets.push(crate::sim::state::EnemyBullet {
            pos: Vec2::new(400.0, 300.0),
            radius: ENEMY_BULLET_RADIUS,
            vel: Vec2::ZERO,
            color: 0xff0066,
        });
        spawn::spawn_boss(&mut state);
        // Boss spawn clears enemies; re-add them to exercise the wipe
        for i in 0..5 {
            state.enemies.push(basic_enemy(100.0 + i as f32 * 60.0, 100.0));
        }
        let boss_health = state.boss.as_ref().unwrap().health;

        use_bomb(&mut state);

        assert!(state.enemies.is_empty());
        assert!(state.enemy_bullets.is_empty());
        assert_eq!(state.bombs, START_BOMBS - 1);
        assert_eq!(state.combo, 4);
        assert_eq!(state.enemies_killed, 5);
        assert!((state.score - 500.0).abs() < 1e-9);
        assert_eq!(
            state.boss.as_ref().unwrap().health,
            boss_health - BOSS_BOMB_DAMAGE
        );
    }

    #[test]
    fn test_bomb_with_none_left_is_a_no_op() {
        let mut state = test_state();
        state.bombs = 0;
        state.enemies.push(basic_enemy(100.0, 100.0));
        use_bomb(&mut state);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_boss_loot_arrives_through_the_schedule() {
        let mut state = test_state();
        spawn::spawn_boss(&mut state);
        collision::defeat_boss(&mut state);
        assert_eq!(state.scheduled.len(), 3);
        assert!(state.power_ups.is_empty());

        // First pump fires the 0ms drop
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.power_ups.len(), 1);

        // The rest land once their delays elapse
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.power_ups.len(), 3);
        assert!(state.scheduled.is_empty());
    }
}
