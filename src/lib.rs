//! Tulip Pool - a small 2D pool table
//!
//! Core modules:
//! - `sim`: Deterministic simulation (table geometry, balls, collisions, pockets)
//! - `aim`: Drag-to-shoot gesture handling for the cue ball
//! - `score`: Running score and persisted best score
//! - `game`: The controller that owns all mutable match state
//! - `driver`: Binds simulation steps to the host's refresh callback
//! - `renderer`: Draw calls against an abstract 2D canvas
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key-value storage for settings and best score

pub mod aim;
pub mod driver;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod score;
pub mod settings;
pub mod sim;

pub use error::PoolError;
pub use game::{Command, PoolGame, TableView};
pub use score::MatchScore;
pub use settings::{CancelPolicy, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Inset of the playing surface from the canvas edge
    pub const TABLE_PADDING: f32 = 40.0;
    /// Pocket capture radius
    pub const POCKET_RADIUS: f32 = 18.0;
    /// Radius shared by every ball
    pub const BALL_RADIUS: f32 = 10.0;

    /// Velocity retained per tick while rolling on the felt
    pub const FRICTION: f32 = 0.992;
    /// Below this speed a ball is snapped to rest
    pub const MIN_SPEED: f32 = 0.05;
    /// Velocity retained (and inverted) on a cushion bounce
    pub const WALL_RESTITUTION: f32 = 0.9;

    /// Object balls in a fresh rack
    pub const INITIAL_BALLS: usize = 6;
    /// Largest rack that fits the five-row triangle
    pub const MAX_OBJECT_BALLS: usize = 15;

    /// Cue ball spawn, as a fraction of table width from the left cushion
    pub const CUE_START_FRACTION: f32 = 0.18;
    /// Rack apex, as a fraction of table width from the left cushion
    pub const RACK_APEX_FRACTION: f32 = 0.68;
    /// Vertical spacing of balls within a rack column, in ball radii
    pub const RACK_LANE_SPACING: f32 = 2.2;

    /// Presses closer than this to the cue ball start a drag
    pub const PICKUP_RADIUS: f32 = 30.0;
    /// Drag distance per unit of shot speed
    pub const SHOT_SENSITIVITY: f32 = 5.0;
    /// Shot speed cap
    pub const MAX_SHOT_POWER: f32 = 18.0;

    /// Wall-clock delay before a scratched cue ball returns (ms)
    pub const RESPAWN_DELAY_MS: f64 = 700.0;

    /// Length of the drawn cue stick
    pub const STICK_LENGTH: f32 = 250.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}
