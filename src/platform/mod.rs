//! Platform abstraction layer
//!
//! The browser build gets LocalStorage, requestAnimationFrame and a 2D canvas
//! from [`web`]. Native builds run headless on [`MemoryStore`] and
//! [`ManualScheduler`] clocked at [`FRAME_MS`].
//!
//! [`MemoryStore`]: crate::persistence::MemoryStore
//! [`ManualScheduler`]: crate::driver::ManualScheduler

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{AnimationFrameScheduler, CanvasSurface, LocalStorage, now_ms};

/// Nominal display refresh period (60 Hz)
pub const FRAME_MS: f64 = 1000.0 / 60.0;
