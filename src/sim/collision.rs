//! Collision stage: all pairwise tests, damage, scoring, and loot
//!
//! Runs once per unpaused tick, after the update stage. The processing order
//! below is a contract - combo and score results depend on it:
//!
//! 1. player bullets vs enemies, then (if unconsumed) vs the boss
//! 2. player vs enemies
//! 3. player vs enemy bullets
//! 4. player vs boss
//! 5. player vs power-ups
//!
//! Every loop that removes mid-iteration walks from highest to lowest index,
//! and a bullet is consumed by at most one collision per frame.

use glam::Vec2;
use rand::Rng;

use super::schedule::{ScheduledAction, ScheduledTask};
use super::state::{
    BOSS_COLOR, FrameEvent, GamePhase, PowerUp, PowerUpKind, SessionState,
};
use super::{effects, progression, spawn};
use crate::consts::*;

/// Axis-aligned box overlap on centers and full extents
#[inline]
pub fn boxes_overlap(a: Vec2, aw: f32, ah: f32, b: Vec2, bw: f32, bh: f32) -> bool {
    (a.x - b.x).abs() < (aw + bw) / 2.0 && (a.y - b.y).abs() < (ah + bh) / 2.0
}

/// Center-distance test for circular bullets against the circularized player
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Run the full collision stage in contract order
pub fn run(state: &mut SessionState) {
    player_bullets_stage(state);
    player_vs_enemies(state);
    player_vs_enemy_bullets(state);
    player_vs_boss(state);
    player_vs_power_ups(state);
}

/// Stage 1: each bullet tests every enemy, newest first; a bullet that
/// survives the enemy pass tests the boss with the same damage logic
fn player_bullets_stage(state: &mut SessionState) {
    let mut bi = state.bullets.len();
    while bi > 0 {
        bi -= 1;
        let bullet = state.bullets[bi];
        let mut consumed = false;

        let mut ei = state.enemies.len();
        while ei > 0 {
            ei -= 1;
            let (e_pos, e_w, e_h) = {
                let e = &state.enemies[ei];
                (e.pos, e.width, e.height)
            };
            if boxes_overlap(bullet.pos, bullet.width, bullet.height, e_pos, e_w, e_h) {
                state.bullets.remove(bi);
                consumed = true;
                state.shots_hit += 1;

                let color = state.enemies[ei].color();
                state.enemies[ei].health -= bullet.damage;
                effects::burst(state, bullet.pos, color, 5);

                if state.enemies[ei].health <= 0 {
                    kill_enemy(state, ei);
                }
                break;
            }
        }
        if consumed {
            continue;
        }

        let boss_rect = state.boss.as_ref().map(|b| (b.pos, b.width, b.height));
        if let Some((b_pos, b_w, b_h)) = boss_rect {
            if boxes_overlap(bullet.pos, bullet.width, bullet.height, b_pos, b_w, b_h) {
                state.bullets.remove(bi);
                state.shots_hit += 1;
                effects::burst(state, bullet.pos, BOSS_COLOR, 5);

                let mut defeated = false;
                if let Some(boss) = state.boss.as_mut() {
                    boss.health -= bullet.damage;
                    defeated = boss.health <= 0;
                }
                if defeated {
                    defeat_boss(state);
                }
            }
        }
    }
}

/// An enemy died to bullet damage: explosion, combo-multiplied score, drop
/// roll, and a progression check
fn kill_enemy(state: &mut SessionState, index: usize) {
    let enemy = state.enemies.remove(index);
    effects::explosion(state, enemy.pos, enemy.color());

    state.score += enemy.points as f64 * (1.0 + state.combo as f64 * 0.1);
    state.combo += 1;
    state.max_combo = state.max_combo.max(state.combo);
    state.enemies_killed += 1;
    state.level_kill_count += 1;

    spawn::roll_power_up_drop(state, enemy.pos);

    state.push_event(FrameEvent::EnemyDestroyed);
    progression::check_level_up(state);
}

/// Stage 2: ship contact with enemies (at most one hit per tick)
fn player_vs_enemies(state: &mut SessionState) {
    if state.player.invincible {
        return;
    }
    let (p_pos, p_w, p_h) = (state.player.pos, state.player.width, state.player.height);

    let mut i = state.enemies.len();
    while i > 0 {
        i -= 1;
        let (e_pos, e_w, e_h) = {
            let e = &state.enemies[i];
            (e.pos, e.width, e.height)
        };
        if boxes_overlap(p_pos, p_w, p_h, e_pos, e_w, e_h) {
            player_hit(state);
            effects::explosion(state, e_pos, 0xff4444);
            state.enemies.remove(i);
            break;
        }
    }
}

/// Stage 3: boss bullets against the ship (at most one hit per tick)
fn player_vs_enemy_bullets(state: &mut SessionState) {
    if state.player.invincible {
        return;
    }
    let p_pos = state.player.pos;
    let p_radius = state.player.width / 2.0;

    let mut i = state.enemy_bullets.len();
    while i > 0 {
        i -= 1;
        let bullet = state.enemy_bullets[i];
        if circles_overlap(p_pos, p_radius, bullet.pos, bullet.radius) {
            player_hit(state);
            state.enemy_bullets.remove(i);
            break;
        }
    }
}

/// Stage 4: ramming the boss hurts the player; the boss shrugs it off
fn player_vs_boss(state: &mut SessionState) {
    if state.player.invincible {
        return;
    }
    let Some(boss) = &state.boss else { return };
    let hit = boxes_overlap(
        state.player.pos,
        state.player.width,
        state.player.height,
        boss.pos,
        boss.width,
        boss.height,
    );
    if hit {
        player_hit(state);
    }
}

/// Stage 5: power-ups are collected regardless of invincibility
fn player_vs_power_ups(state: &mut SessionState) {
    let (p_pos, p_w, p_h) = (state.player.pos, state.player.width, state.player.height);

    let mut i = state.power_ups.len();
    while i > 0 {
        i -= 1;
        let (pu_pos, pu_w, pu_h) = {
            let pu = &state.power_ups[i];
            (pu.pos, pu.width, pu.height)
        };
        if boxes_overlap(p_pos, p_w, p_h, pu_pos, pu_w, pu_h) {
            let power_up = state.power_ups.remove(i);
            collect_power_up(state, power_up);
        }
    }
}

fn collect_power_up(state: &mut SessionState, power_up: PowerUp) {
    match power_up.kind {
        PowerUpKind::Health => state.lives = (state.lives + 1).min(MAX_LIVES),
        PowerUpKind::Bomb => state.bombs = (state.bombs + 1).min(MAX_BOMBS),
        // Countdown window; a second pickup refreshes it
        PowerUpKind::Rapid => state.rapid_fire_timer = RAPID_DURATION_MS,
    }
    effects::burst(state, power_up.pos, power_up.kind.color(), 15);
    state.push_event(FrameEvent::PowerUpCollected(power_up.kind));
}

/// Any hit-the-player event: lose a life, drop the combo, shake the screen,
/// and either end the run or open the invincibility window
pub fn player_hit(state: &mut SessionState) {
    state.lives = state.lives.saturating_sub(1);
    state.combo = 0;
    state.screen_shake = SCREEN_SHAKE_MS;

    let pos = state.player.pos;
    effects::explosion(state, pos, 0xff4444);
    state.push_event(FrameEvent::PlayerHit);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.push_event(FrameEvent::GameOver);
        log::info!(
            "game over: score {}, level {}, max combo {}",
            state.display_score(),
            state.level,
            state.max_combo
        );
    } else {
        state.player.invincible = true;
        state.player.invincible_timer = INVINCIBILITY_MS;
    }
}

/// Boss down: flat points (no combo multiplier), +5 combo, staggered loot
/// drops near its last position, then the level rolls over
pub fn defeat_boss(state: &mut SessionState) {
    let Some(boss) = state.boss.take() else { return };

    effects::explosion(state, boss.pos, BOSS_COLOR);
    effects::explosion(state, boss.pos + Vec2::new(-40.0, -20.0), 0xffaa00);
    effects::explosion(state, boss.pos + Vec2::new(40.0, 20.0), 0xff4444);

    state.score += boss.points as f64;
    state.bosses_killed += 1;
    state.combo += 5;
    state.max_combo = state.max_combo.max(state.combo);

    for i in 0..3u32 {
        let offset = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 100.0,
            (state.rng.random::<f32>() - 0.5) * 50.0,
        );
        state.scheduled.push(ScheduledTask {
            delay_ms: i as f32 * 200.0,
            action: ScheduledAction::SpawnPowerUp {
                pos: boss.pos + offset,
            },
        });
    }

    state.push_event(FrameEvent::BossDefeated);
    progression::level_up(state);
}
