//! Effects stage: particle emission and the background star field
//!
//! Everything here is cosmetic; nothing in this module may touch score,
//! combo, or any other gameplay counter.

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, SessionState, Star};
use crate::consts::{MAX_PARTICLES, STAR_DENSITY};

/// Push a particle, evicting the oldest once the cap is reached
fn push_particle(state: &mut SessionState, particle: Particle) {
    if state.particles.len() >= MAX_PARTICLES {
        state.particles.remove(0);
    }
    state.particles.push(particle);
}

/// Small scatter burst (bullet impacts, muzzle flash, pickup sparkle)
pub fn burst(state: &mut SessionState, pos: Vec2, color: u32, count: usize) {
    for _ in 0..count {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 8.0,
            (state.rng.random::<f32>() - 0.5) * 8.0,
        );
        let size = state.rng.random::<f32>() * 4.0 + 2.0;
        push_particle(
            state,
            Particle {
                pos,
                vel,
                size,
                color,
                life: 400.0,
                max_life: 400.0,
            },
        );
    }
}

/// Ring explosion: 25 particles spread evenly around a circle with random
/// outward speed
pub fn explosion(state: &mut SessionState, pos: Vec2, color: u32) {
    const COUNT: usize = 25;
    for i in 0..COUNT {
        let angle = std::f32::consts::TAU / COUNT as f32 * i as f32;
        let speed = state.rng.random::<f32>() * 4.0 + 2.0;
        let size = state.rng.random::<f32>() * 6.0 + 3.0;
        push_particle(
            state,
            Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                size,
                color,
                life: 600.0,
                max_life: 600.0,
            },
        );
    }
}

/// (Re)build the star field for the current viewport size
pub fn generate_stars(state: &mut SessionState) {
    let count = (state.view.width * state.view.height / STAR_DENSITY) as usize;
    state.stars = (0..count)
        .map(|_| Star {
            pos: Vec2::new(
                state.rng.random::<f32>() * state.view.width,
                state.rng.random::<f32>() * state.view.height,
            ),
            size: state.rng.random::<f32>() * 2.0 + 0.5,
            speed: state.rng.random::<f32>() * 2.0 + 0.5,
            brightness: state.rng.random::<f32>(),
        })
        .collect();
}

/// Scroll stars downward, wrapping to a fresh x at the top edge
pub fn update_stars(state: &mut SessionState, dt: f32) {
    let scale = dt / crate::consts::FRAME_REF_MS;
    let (width, height) = (state.view.width, state.view.height);
    for star in &mut state.stars {
        star.pos.y += star.speed * scale;
        if star.pos.y > height {
            star.pos.y = 0.0;
            star.pos.x = state.rng.random::<f32>() * width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    #[test]
    fn test_explosion_emits_ring() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        explosion(&mut state, Vec2::new(100.0, 100.0), 0xff4444);
        assert_eq!(state.particles.len(), 25);
        // All particles share the spawn point and move outward
        for p in &state.particles {
            assert_eq!(p.pos, Vec2::new(100.0, 100.0));
            assert!(p.vel.length() >= 2.0);
            assert_eq!(p.life, p.max_life);
        }
    }

    #[test]
    fn test_particle_cap_evicts_oldest() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        for i in 0..(MAX_PARTICLES + 10) {
            burst(&mut state, Vec2::new(i as f32, 0.0), 0xffffff, 1);
        }
        assert_eq!(state.particles.len(), MAX_PARTICLES);
        // The first 10 emissions were evicted
        assert_eq!(state.particles[0].pos.x, 10.0);
    }

    #[test]
    fn test_stars_wrap_vertically() {
        let mut state = SessionState::new(1, Viewport::new(800.0, 600.0));
        state.stars[0].pos.y = 600.5;
        state.stars[0].speed = 1.0;
        update_stars(&mut state, 16.0);
        assert_eq!(state.stars[0].pos.y, 0.0);
        assert!(state.stars[0].pos.x >= 0.0 && state.stars[0].pos.x <= 800.0);
    }
}
