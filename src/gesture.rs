//! Hand-tracker boundary
//!
//! The detector itself (camera + pose model) is an external collaborator; the
//! game consumes it through two narrow paths:
//! - a polled [`HandState`] sample per frame (position + gesture + detected)
//! - an edge-triggered notification for action gestures, rate-limited by a
//!   cooldown, used for one-shot actions like the bomb
//!
//! Per-sample detection failures are swallowed at the source; the previous
//! state persists until the next good sample.

use glam::Vec2;

use crate::consts::GESTURE_EDGE_COOLDOWN_MS;

/// Discrete hand poses the detector reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    None,
    Open,
    Fist,
    Peace,
}

impl Gesture {
    /// Only fist and peace trigger edge notifications
    pub fn is_action(self) -> bool {
        matches!(self, Gesture::Fist | Gesture::Peace)
    }
}

/// One tracker sample. `position` is normalized to the unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandState {
    pub position: Vec2,
    pub gesture: Gesture,
    pub is_detected: bool,
}

impl Default for HandState {
    fn default() -> Self {
        Self {
            position: Vec2::new(0.5, 0.5),
            gesture: Gesture::None,
            is_detected: false,
        }
    }
}

/// A pollable hand-state provider. Implementations must never block: return
/// the last known state when no fresh sample is available.
pub trait GestureSource {
    fn poll(&mut self) -> HandState;
}

/// A gesture transition that passed the edge filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureChange {
    pub gesture: Gesture,
    pub previous: Gesture,
}

/// Edge detector over the polled gesture stream.
///
/// Fires once per transition into an action gesture (fist/peace), and only if
/// the cooldown since the previous trigger has elapsed. Non-action
/// transitions update the tracked state without firing.
#[derive(Debug, Clone)]
pub struct GestureEdge {
    current: Gesture,
    last_trigger_ms: f64,
    cooldown_ms: f64,
}

impl Default for GestureEdge {
    fn default() -> Self {
        Self::new(GESTURE_EDGE_COOLDOWN_MS)
    }
}

impl GestureEdge {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            current: Gesture::None,
            last_trigger_ms: f64::NEG_INFINITY,
            cooldown_ms,
        }
    }

    /// Feed the latest sample; `now_ms` is any monotonic clock
    pub fn update(&mut self, gesture: Gesture, now_ms: f64) -> Option<GestureChange> {
        if gesture == self.current {
            return None;
        }
        let previous = self.current;
        self.current = gesture;

        if gesture.is_action() && now_ms - self.last_trigger_ms > self.cooldown_ms {
            self.last_trigger_ms = now_ms;
            Some(GestureChange { gesture, previous })
        } else {
            None
        }
    }
}

/// Self-playing gesture source for demo mode and tests: sweeps the hand
/// across the field, holds a fist most of the time, and throws a periodic
/// peace sign. Deterministic in the tick counter.
#[derive(Debug, Default)]
pub struct ScriptedHand {
    ticks: u64,
}

impl GestureSource for ScriptedHand {
    fn poll(&mut self) -> HandState {
        self.ticks += 1;
        let t = self.ticks as f32 * 0.02;

        let gesture = match self.ticks % 600 {
            0..=20 => Gesture::Peace,
            21..=80 => Gesture::Open,
            _ => Gesture::Fist,
        };

        HandState {
            position: Vec2::new(0.5 + t.sin() * 0.35, 0.75 + (t * 0.7).cos() * 0.1),
            gesture,
            is_detected: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_fires_on_action_transition() {
        let mut edge = GestureEdge::new(300.0);
        assert_eq!(edge.update(Gesture::Open, 0.0), None);
        let change = edge.update(Gesture::Peace, 100.0).unwrap();
        assert_eq!(change.gesture, Gesture::Peace);
        assert_eq!(change.previous, Gesture::Open);
    }

    #[test]
    fn test_edge_needs_a_transition() {
        let mut edge = GestureEdge::new(300.0);
        assert!(edge.update(Gesture::Fist, 0.0).is_some());
        // Held fist does not re-fire
        assert!(edge.update(Gesture::Fist, 1000.0).is_none());
        assert!(edge.update(Gesture::Fist, 2000.0).is_none());
    }

    #[test]
    fn test_edge_cooldown_suppresses_rapid_triggers() {
        let mut edge = GestureEdge::new(300.0);
        assert!(edge.update(Gesture::Fist, 0.0).is_some());
        assert!(edge.update(Gesture::Open, 50.0).is_none());
        // Within the cooldown window: swallowed even though it is an edge
        assert!(edge.update(Gesture::Peace, 200.0).is_none());
        assert!(edge.update(Gesture::Open, 350.0).is_none());
        // Past the cooldown: fires again
        assert!(edge.update(Gesture::Peace, 400.0).is_some());
    }

    #[test]
    fn test_scripted_hand_stays_in_unit_square() {
        let mut hand = ScriptedHand::default();
        for _ in 0..2000 {
            let state = hand.poll();
            assert!(state.is_detected);
            assert!(state.position.x >= 0.0 && state.position.x <= 1.0);
            assert!(state.position.y >= 0.0 && state.position.y <= 1.0);
        }
    }
}
