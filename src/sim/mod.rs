//! Deterministic simulation module
//!
//! All table physics lives here. This module must be pure and deterministic:
//! - Fixed unit timestep only
//! - Seeded RNG only (rack jitter)
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod geometry;
pub mod state;
pub mod tick;

pub use geometry::{TableGeometry, fit_viewport};
pub use state::{Ball, GameEvent, SimState};
pub use tick::step;
