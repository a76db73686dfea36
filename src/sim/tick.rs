//! Fixed timestep simulation tick
//!
//! One call advances every ball in play by one unit of time. The passes run
//! in a fixed order: integrate, cushions, ball pairs, pockets.

use super::collision::{integrate, resolve_ball_pair, resolve_wall};
use super::geometry::TableGeometry;
use super::state::{GameEvent, SimState};
use crate::settings::Settings;

/// Advance the simulation by one tick and report captures.
///
/// Sunk balls are skipped by every pass. A table with no cue ball (or no
/// balls at all) is valid and simply steps what is there.
pub fn step(state: &mut SimState, table: &TableGeometry, settings: &Settings) -> Vec<GameEvent> {
    state.time_ticks += 1;

    // Integration + friction
    for ball in state.balls.iter_mut().filter(|b| b.in_play()) {
        integrate(ball, settings.friction, settings.min_speed);
    }

    // Cushions
    for ball in state.balls.iter_mut().filter(|b| b.in_play()) {
        resolve_wall(ball, table, settings.wall_restitution);
    }

    // Ball pairs, every unordered pair once
    for i in 0..state.balls.len() {
        let (head, tail) = state.balls.split_at_mut(i + 1);
        let a = &mut head[i];
        if a.sunk {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.in_play()) {
            resolve_ball_pair(a, b);
        }
    }

    // Pockets
    let mut events = Vec::new();
    for ball in state.balls.iter_mut().filter(|b| b.in_play()) {
        if let Some(pocket) = table.pocket_at(ball.pos) {
            ball.sunk = true;
            log::debug!(
                "Ball {} pocketed in {} at tick {}",
                ball.id,
                pocket,
                state.time_ticks
            );
            events.push(GameEvent::Pocketed {
                id: ball.id,
                is_cue: ball.is_cue,
                pocket,
            });
        }
    }

    events
}
