//! Table geometry
//!
//! The playing rectangle is the viewport inset by the table padding. Pockets
//! sit on the cushion line: the four corners plus the middle of both long
//! sides. Geometry is rebuilt, never mutated, when the viewport changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CUE_START_FRACTION, RACK_APEX_FRACTION};
use crate::error::PoolError;
use crate::settings::Settings;

/// Number of pockets on the table
pub const POCKET_COUNT: usize = 6;

/// Immutable description of the playing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGeometry {
    /// Full viewport size the table was built for
    pub viewport: Vec2,
    /// Top-left corner of the playing rectangle
    pub origin: Vec2,
    /// Width and height of the playing rectangle
    pub size: Vec2,
    /// Pocket centers: top-left, top-middle, top-right, bottom-left,
    /// bottom-middle, bottom-right
    pub pockets: [Vec2; POCKET_COUNT],
    pub pocket_radius: f32,
    pub ball_radius: f32,
}

impl TableGeometry {
    /// Build the table for a viewport.
    ///
    /// Fails unless `ball_radius < pocket_radius < min(width, height) / 2`.
    pub fn new(width: f32, height: f32, settings: &Settings) -> Result<Self, PoolError> {
        let origin = Vec2::splat(settings.table_padding);
        let size = Vec2::new(width, height) - origin * 2.0;

        let short_side = size.min_element();
        if !(short_side.is_finite()
            && settings.ball_radius < settings.pocket_radius
            && settings.pocket_radius < short_side / 2.0)
        {
            return Err(PoolError::TableTooSmall { width, height });
        }

        let (left, top) = (origin.x, origin.y);
        let (right, bottom) = (origin.x + size.x, origin.y + size.y);
        let mid = origin.x + size.x / 2.0;

        Ok(Self {
            viewport: Vec2::new(width, height),
            origin,
            size,
            pockets: [
                Vec2::new(left, top),
                Vec2::new(mid, top),
                Vec2::new(right, top),
                Vec2::new(left, bottom),
                Vec2::new(mid, bottom),
                Vec2::new(right, bottom),
            ],
            pocket_radius: settings.pocket_radius,
            ball_radius: settings.ball_radius,
        })
    }

    /// Left cushion x
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Top cushion y
    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Right cushion x
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    /// Bottom cushion y
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Center of the playing surface
    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    /// Range a ball center of the given radius may occupy
    #[inline]
    pub fn center_bounds(&self, radius: f32) -> (Vec2, Vec2) {
        (
            Vec2::new(self.left() + radius, self.top() + radius),
            Vec2::new(self.right() - radius, self.bottom() - radius),
        )
    }

    /// Whether a ball center keeps the ball clear of every cushion
    pub fn contains_ball(&self, pos: Vec2, radius: f32) -> bool {
        let (min, max) = self.center_bounds(radius);
        pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
    }

    /// Index of the pocket whose capture radius holds `pos`, if any
    pub fn pocket_at(&self, pos: Vec2) -> Option<usize> {
        self.pockets
            .iter()
            .position(|pocket| pocket.distance(pos) < self.pocket_radius)
    }

    /// Where the cue ball is placed on a new rack and after a scratch
    pub fn cue_start(&self) -> Vec2 {
        Vec2::new(
            self.left() + self.size.x * CUE_START_FRACTION,
            self.top() + self.size.y / 2.0,
        )
    }

    /// Front ball of the triangle rack
    pub fn rack_apex(&self) -> Vec2 {
        Vec2::new(
            self.left() + self.size.x * RACK_APEX_FRACTION,
            self.top() + self.size.y / 2.0,
        )
    }
}

/// Fit the canvas to the host window the way the page layout expects:
/// at most 800 wide, 100 px of breathing room, 9:5 aspect.
pub fn fit_viewport(window_width: f32) -> (f32, f32) {
    let width = (window_width - 100.0).min(800.0);
    let height = (width * 500.0 / 900.0).round();
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableGeometry {
        TableGeometry::new(800.0, 444.0, &Settings::default()).unwrap()
    }

    #[test]
    fn test_table_inset_by_padding() {
        let t = table();
        assert_eq!(t.left(), 40.0);
        assert_eq!(t.top(), 40.0);
        assert_eq!(t.right(), 760.0);
        assert_eq!(t.bottom(), 404.0);
        assert_eq!(t.pockets[1], Vec2::new(400.0, 40.0));
        assert_eq!(t.pockets[5], Vec2::new(760.0, 404.0));
    }

    #[test]
    fn test_rejects_tiny_viewport() {
        let err = TableGeometry::new(100.0, 110.0, &Settings::default()).unwrap_err();
        assert!(matches!(err, PoolError::TableTooSmall { .. }));

        // Padding eats the whole viewport
        assert!(TableGeometry::new(60.0, 60.0, &Settings::default()).is_err());
    }

    #[test]
    fn test_pocket_at() {
        let t = table();
        assert_eq!(t.pocket_at(Vec2::new(52.0, 52.0)), Some(0));
        assert_eq!(t.pocket_at(Vec2::new(400.0, 395.0)), Some(4));
        assert_eq!(t.pocket_at(t.center()), None);
        // Exactly on the capture radius is outside
        assert_eq!(t.pocket_at(Vec2::new(58.0, 40.0)), None);
    }

    #[test]
    fn test_spawn_points_on_table() {
        let t = table();
        assert!(t.contains_ball(t.cue_start(), t.ball_radius));
        assert!(t.contains_ball(t.rack_apex(), t.ball_radius));
        assert!(t.cue_start().x < t.rack_apex().x);
        assert_eq!(t.cue_start().y, t.center().y);
    }

    #[test]
    fn test_fit_viewport() {
        assert_eq!(fit_viewport(1920.0), (800.0, 444.0));
        assert_eq!(fit_viewport(700.0), (600.0, 333.0));
    }
}
