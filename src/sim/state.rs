//! Ball registry and simulation state
//!
//! Everything the per-tick physics reads or writes lives in [`SimState`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::TableGeometry;
use crate::consts::RACK_LANE_SPACING;
use crate::settings::Settings;

/// Stable ball identity
pub type BallId = u32;

/// Cue ball colour
pub const CUE_COLOR: u32 = 0xFFFFFF;

/// Object ball colours, cycled through the rack
pub const PALETTE: [u32; 6] = [0xFFA4B6, 0xF8C471, 0xA2E8C1, 0xA0C3FF, 0xE5A3FF, 0xFFCE94];

/// Something that happened during a tick that the match needs to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball's center entered a pocket's capture radius
    Pocketed { id: BallId, is_cue: bool, pocket: usize },
}

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Exactly one ball per rack is the cue ball
    pub is_cue: bool,
    /// Captured by a pocket; excluded from all physics until respawned
    pub sunk: bool,
    /// 0xRRGGBB, for rendering only
    pub color: u32,
}

impl Ball {
    pub fn cue(id: BallId, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            is_cue: true,
            sunk: false,
            color: CUE_COLOR,
        }
    }

    pub fn object(id: BallId, pos: Vec2, radius: f32, color: u32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            is_cue: false,
            sunk: false,
            color,
        }
    }

    /// Still on the table
    #[inline]
    pub fn in_play(&self) -> bool {
        !self.sunk
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Kinetic energy with unit mass
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.vel.length_squared()
    }

    /// Put the ball back at `pos`, at rest
    pub fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.sunk = false;
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Seed the rack was built from
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// All balls of the current rack (sorted by id for determinism)
    pub balls: Vec<Ball>,
    /// Next entity ID
    next_id: BallId,
}

impl SimState {
    /// An empty table
    pub fn empty(seed: u64) -> Self {
        Self {
            seed,
            time_ticks: 0,
            balls: Vec::new(),
            next_id: 0,
        }
    }

    /// Build a fresh rack: the cue ball at its spawn point and the object
    /// balls in a triangle opening away from it.
    pub fn rack(seed: u64, table: &TableGeometry, settings: &Settings) -> Self {
        let mut state = Self::empty(seed);
        let radius = table.ball_radius;

        let cue_id = state.next_entity_id();
        state.balls.push(Ball::cue(cue_id, table.cue_start(), radius));

        let mut rng = Pcg32::seed_from_u64(seed);
        for (index, pos) in rack_positions(table.rack_apex(), radius, settings.object_balls)
            .into_iter()
            .enumerate()
        {
            let pos = if settings.rack_jitter > 0.0 {
                let j = settings.rack_jitter;
                pos + Vec2::new(rng.random_range(-j..=j), rng.random_range(-j..=j))
            } else {
                pos
            };
            let id = state.next_entity_id();
            state
                .balls
                .push(Ball::object(id, pos, radius, PALETTE[index % PALETTE.len()]));
        }

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> BallId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a ball built by the caller, assigning it a fresh id
    pub fn spawn(&mut self, mut ball: Ball) -> BallId {
        ball.id = self.next_entity_id();
        let id = ball.id;
        self.balls.push(ball);
        id
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn ball_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// The cue ball, sunk or not
    pub fn cue(&self) -> Option<&Ball> {
        self.balls.iter().find(|b| b.is_cue)
    }

    pub fn cue_mut(&mut self) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.is_cue)
    }

    /// Balls still on the table
    pub fn in_play(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|b| b.in_play())
    }

    /// Total kinetic energy of balls in play
    pub fn kinetic_energy(&self) -> f32 {
        self.in_play().map(Ball::kinetic_energy).sum()
    }

    /// Every ball in play has stopped
    pub fn is_at_rest(&self) -> bool {
        self.in_play().all(|b| b.vel == Vec2::ZERO)
    }
}

/// Triangle rack positions, apex first. Row `n` holds `n + 1` balls stacked
/// vertically and sits `n` ball diameters behind the apex.
pub fn rack_positions(apex: Vec2, radius: f32, count: usize) -> Vec<Vec2> {
    let column_step = radius * 2.0;
    let lane_step = radius * RACK_LANE_SPACING;

    let mut positions = Vec::with_capacity(count);
    let mut row = 0usize;
    while positions.len() < count {
        for lane in 0..=row {
            if positions.len() >= count {
                break;
            }
            let offset = lane as f32 - row as f32 / 2.0;
            positions.push(Vec2::new(
                apex.x + row as f32 * column_step,
                apex.y + offset * lane_step,
            ));
        }
        row += 1;
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableGeometry {
        TableGeometry::new(800.0, 444.0, &Settings::default()).unwrap()
    }

    #[test]
    fn test_rack_has_one_cue_and_object_balls() {
        let state = SimState::rack(1, &table(), &Settings::default());
        assert_eq!(state.balls.len(), 7);
        assert_eq!(state.balls.iter().filter(|b| b.is_cue).count(), 1);
        assert_eq!(state.cue().map(|b| b.pos), Some(table().cue_start()));
        assert!(state.is_at_rest());
        assert_eq!(state.balls[1].color, PALETTE[0]);
    }

    #[test]
    fn test_rack_positions_triangle() {
        let apex = Vec2::new(500.0, 200.0);
        let positions = rack_positions(apex, 10.0, 6);
        assert_eq!(positions[0], apex);
        assert_eq!(positions[1], Vec2::new(520.0, 189.0));
        assert_eq!(positions[2], Vec2::new(520.0, 211.0));
        assert_eq!(positions[5], Vec2::new(540.0, 222.0));
        assert_eq!(rack_positions(apex, 10.0, 15).len(), 15);
        assert!(rack_positions(apex, 10.0, 0).is_empty());
    }

    #[test]
    fn test_rack_balls_do_not_touch() {
        let positions = rack_positions(Vec2::new(500.0, 200.0), 10.0, 15);
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a.distance(*b) > 20.0);
            }
        }
    }

    #[test]
    fn test_jitter_is_seeded() {
        let settings = Settings::default().with_rack_jitter(0.5);
        let a = SimState::rack(7, &table(), &settings);
        let b = SimState::rack(7, &table(), &settings);
        let c = SimState::rack(8, &table(), &settings);
        assert_eq!(a.balls, b.balls);
        assert_ne!(a.balls, c.balls);
        // Cue ball is never jittered
        assert_eq!(a.balls[0].pos, table().cue_start());
    }

    #[test]
    fn test_spawn_assigns_fresh_ids() {
        let mut state = SimState::empty(0);
        let a = state.spawn(Ball::cue(99, Vec2::ZERO, 10.0));
        let b = state.spawn(Ball::object(99, Vec2::X, 10.0, 0));
        assert_ne!(a, b);
        assert!(state.ball(b).is_some_and(|ball| !ball.is_cue));
    }
}
