//! Lightweight scheduled-task queue
//!
//! Replaces free-floating timers for deferred spawns (the staggered loot
//! drops after a boss kill). Tasks are pumped once per tick and may only
//! spawn cosmetic/loot entities - they never mutate score or combo, so their
//! firing tick cannot affect scoring order.

use glam::Vec2;

/// What a task does when its delay elapses
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledAction {
    SpawnPowerUp { pos: Vec2 },
}

/// A one-shot action that fires once `delay_ms` has elapsed
#[derive(Debug, Clone, Copy)]
pub struct ScheduledTask {
    pub delay_ms: f32,
    pub action: ScheduledAction,
}

/// Advance all pending tasks by `dt` and return the actions that came due,
/// in queue order. A task scheduled with zero delay fires on the next pump,
/// not synchronously.
pub fn advance(tasks: &mut Vec<ScheduledTask>, dt: f32) -> Vec<ScheduledAction> {
    for task in tasks.iter_mut() {
        task.delay_ms -= dt;
    }
    let mut due = Vec::new();
    let mut i = 0;
    while i < tasks.len() {
        if tasks[i].delay_ms <= 0.0 {
            due.push(tasks.remove(i).action);
        } else {
            i += 1;
        }
    }
    due
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_at(x: f32) -> ScheduledAction {
        ScheduledAction::SpawnPowerUp {
            pos: Vec2::new(x, 0.0),
        }
    }

    #[test]
    fn test_tasks_fire_after_delay() {
        let mut tasks = vec![
            ScheduledTask {
                delay_ms: 0.0,
                action: spawn_at(1.0),
            },
            ScheduledTask {
                delay_ms: 200.0,
                action: spawn_at(2.0),
            },
            ScheduledTask {
                delay_ms: 400.0,
                action: spawn_at(3.0),
            },
        ];

        let due = advance(&mut tasks, 16.0);
        assert_eq!(due, vec![spawn_at(1.0)]);
        assert_eq!(tasks.len(), 2);

        // 200ms task fires once enough ticks have accumulated
        let due = advance(&mut tasks, 200.0);
        assert_eq!(due, vec![spawn_at(2.0)]);

        // A huge delta flushes the rest in queue order
        let due = advance(&mut tasks, 1000.0);
        assert_eq!(due, vec![spawn_at(3.0)]);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_simultaneous_tasks_keep_queue_order() {
        let mut tasks = vec![
            ScheduledTask {
                delay_ms: 50.0,
                action: spawn_at(1.0),
            },
            ScheduledTask {
                delay_ms: 50.0,
                action: spawn_at(2.0),
            },
        ];
        let due = advance(&mut tasks, 100.0);
        assert_eq!(due, vec![spawn_at(1.0), spawn_at(2.0)]);
    }
}
