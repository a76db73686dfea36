//! Drag-to-shoot aiming
//!
//! Pressing near the cue ball starts a drag. Releasing shoots the ball away
//! from the drag, like pulling back a slingshot: the shot vector runs from the
//! current pointer position back to where the press started.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::STICK_LENGTH;
use crate::settings::{CancelPolicy, Settings};
use crate::{cartesian_to_polar, polar_to_cartesian};

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    /// Where the press landed; fixed for the whole gesture
    pub start: Vec2,
    /// Latest pointer position
    pub current: Vec2,
}

impl DragState {
    /// Vector from the pointer back to the press point
    #[inline]
    pub fn pull(&self) -> Vec2 {
        self.start - self.current
    }

    /// Shot direction in radians
    pub fn angle(&self) -> f32 {
        cartesian_to_polar(self.pull()).1
    }
}

/// Shot tuning taken from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotTuning {
    pub pickup_radius: f32,
    pub sensitivity: f32,
    pub max_power: f32,
    pub cancel_policy: CancelPolicy,
}

impl From<&Settings> for ShotTuning {
    fn from(settings: &Settings) -> Self {
        Self {
            pickup_radius: settings.pickup_radius,
            sensitivity: settings.shot_sensitivity,
            max_power: settings.max_shot_power,
            cancel_policy: settings.cancel_policy,
        }
    }
}

/// Velocity a drag produces on release: the pull length divided by the
/// sensitivity, capped at `max_power`, along the pull direction.
pub fn shot_velocity(drag: &DragState, sensitivity: f32, max_power: f32) -> Vec2 {
    let (dist, angle) = cartesian_to_polar(drag.pull());
    let power = (dist / sensitivity).min(max_power);
    polar_to_cartesian(power, angle)
}

/// Turns pointer gestures into cue ball shots
#[derive(Debug, Clone)]
pub struct AimController {
    tuning: ShotTuning,
    drag: Option<DragState>,
}

impl AimController {
    pub fn new(tuning: ShotTuning) -> Self {
        Self { tuning, drag: None }
    }

    /// The active drag, if any
    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Gesture start. Begins a drag only if `point` is within the pickup
    /// radius of the cue ball; `cue` is `None` while the cue ball is off the
    /// table. Returns whether a drag started.
    pub fn press(&mut self, point: Vec2, cue: Option<Vec2>) -> bool {
        match cue {
            Some(cue) if cue.distance(point) < self.tuning.pickup_radius => {
                self.drag = Some(DragState {
                    start: point,
                    current: point,
                });
                true
            }
            _ => false,
        }
    }

    /// Pointer movement; only the current point changes
    pub fn move_to(&mut self, point: Vec2) {
        if let Some(drag) = self.drag.as_mut() {
            drag.current = point;
        }
    }

    /// Gesture end. Clears the drag and returns the shot velocity, or `None`
    /// when no drag was active.
    pub fn release(&mut self) -> Option<Vec2> {
        let drag = self.drag.take()?;
        Some(shot_velocity(
            &drag,
            self.tuning.sensitivity,
            self.tuning.max_power,
        ))
    }

    /// Gesture cancelled by the host. Follows the configured policy.
    pub fn cancel(&mut self) -> Option<Vec2> {
        match self.tuning.cancel_policy {
            CancelPolicy::Shoot => self.release(),
            CancelPolicy::Discard => {
                self.drag = None;
                None
            }
        }
    }

    /// Drop any drag without shooting (match reset)
    pub fn clear(&mut self) {
        self.drag = None;
    }
}

/// Cue stick segment for a drag: it starts at the ball's edge and extends
/// along the shot direction.
pub fn cue_stick(cue: Vec2, ball_radius: f32, drag: &DragState) -> (Vec2, Vec2) {
    let angle = drag.angle();
    (
        cue + polar_to_cartesian(ball_radius, angle),
        cue + polar_to_cartesian(ball_radius + STICK_LENGTH, angle),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(policy: CancelPolicy) -> AimController {
        AimController::new(ShotTuning::from(
            &Settings::default().with_cancel_policy(policy),
        ))
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_drag_right_shoots_left() {
        let mut aim = controller(CancelPolicy::Discard);
        assert!(aim.press(Vec2::ZERO, Some(Vec2::ZERO)));
        aim.move_to(Vec2::new(50.0, 0.0));

        let vel = aim.release().unwrap();
        assert!(approx(vel, Vec2::new(-10.0, 0.0)), "{:?}", vel);
        assert!(!aim.is_dragging());
    }

    #[test]
    fn test_power_is_capped() {
        let mut aim = controller(CancelPolicy::Discard);
        aim.press(Vec2::new(100.0, 100.0), Some(Vec2::new(100.0, 100.0)));
        aim.move_to(Vec2::new(100.0, 400.0));

        let vel = aim.release().unwrap();
        assert!(approx(vel, Vec2::new(0.0, -18.0)), "{:?}", vel);
    }

    #[test]
    fn test_press_far_from_cue_is_ignored() {
        let mut aim = controller(CancelPolicy::Discard);
        assert!(!aim.press(Vec2::new(30.0, 0.0), Some(Vec2::ZERO)));
        assert!(!aim.press(Vec2::ZERO, None));
        aim.move_to(Vec2::new(5.0, 5.0));
        assert!(aim.drag().is_none());
        assert_eq!(aim.release(), None);
    }

    #[test]
    fn test_move_keeps_start_point() {
        let mut aim = controller(CancelPolicy::Discard);
        aim.press(Vec2::new(3.0, 4.0), Some(Vec2::ZERO));
        aim.move_to(Vec2::new(10.0, 10.0));
        aim.move_to(Vec2::new(20.0, -5.0));

        let drag = aim.drag().copied().unwrap();
        assert_eq!(drag.start, Vec2::new(3.0, 4.0));
        assert_eq!(drag.current, Vec2::new(20.0, -5.0));
    }

    #[test]
    fn test_release_without_move_is_a_dead_shot() {
        let mut aim = controller(CancelPolicy::Discard);
        aim.press(Vec2::new(1.0, 1.0), Some(Vec2::ZERO));
        assert_eq!(aim.release(), Some(Vec2::ZERO));
    }

    #[test]
    fn test_cancel_discards_by_default() {
        let mut aim = controller(CancelPolicy::default());
        aim.press(Vec2::ZERO, Some(Vec2::ZERO));
        aim.move_to(Vec2::new(0.0, 25.0));
        assert_eq!(aim.cancel(), None);
        assert!(!aim.is_dragging());
    }

    #[test]
    fn test_cancel_can_shoot_like_release() {
        let mut aim = controller(CancelPolicy::Shoot);
        aim.press(Vec2::ZERO, Some(Vec2::ZERO));
        aim.move_to(Vec2::new(0.0, 25.0));
        let vel = aim.cancel().unwrap();
        assert!(approx(vel, Vec2::new(0.0, -5.0)), "{:?}", vel);
        assert!(!aim.is_dragging());
        // Nothing left to cancel
        assert_eq!(aim.cancel(), None);
    }

    #[test]
    fn test_cue_stick_points_along_shot() {
        let drag = DragState {
            start: Vec2::new(100.0, 100.0),
            current: Vec2::new(120.0, 100.0),
        };
        let (from, to) = cue_stick(Vec2::new(100.0, 100.0), 10.0, &drag);
        assert!(approx(from, Vec2::new(90.0, 100.0)));
        assert!(approx(to, Vec2::new(-160.0, 100.0)));
    }
}
