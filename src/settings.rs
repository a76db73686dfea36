//! Table tuning and control preferences
//!
//! Persisted separately from the best score.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::PoolError;
use crate::persistence::{KeyValueStore, load_json, save_json};

/// What a cancelled gesture (pointer left tracking, touch interrupted) does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CancelPolicy {
    /// Fire the shot from the last known pointer position, as a release would
    Shoot,
    /// Drop the drag without shooting
    #[default]
    Discard,
}

/// Table and control settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Table ===
    /// Inset of the playing surface from the viewport edge
    pub table_padding: f32,
    /// Radius of every ball
    pub ball_radius: f32,
    /// Pocket capture radius
    pub pocket_radius: f32,

    // === Physics ===
    /// Per-tick velocity retention, strictly between 0 and 1
    pub friction: f32,
    /// Speed floor below which a ball stops
    pub min_speed: f32,
    /// Cushion restitution, in (0, 1]
    pub wall_restitution: f32,

    // === Rack ===
    /// Object balls in a fresh rack
    pub object_balls: usize,
    /// Max seeded offset applied to each racked ball on both axes
    pub rack_jitter: f32,

    // === Controls ===
    /// Presses within this distance of the cue ball start a drag
    pub pickup_radius: f32,
    /// Drag length per unit of shot speed
    pub shot_sensitivity: f32,
    /// Shot speed cap
    pub max_shot_power: f32,
    /// Behaviour of a cancelled gesture
    pub cancel_policy: CancelPolicy,

    // === Match ===
    /// Wall-clock delay before a scratched cue ball returns (ms)
    pub respawn_delay_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_padding: TABLE_PADDING,
            ball_radius: BALL_RADIUS,
            pocket_radius: POCKET_RADIUS,

            friction: FRICTION,
            min_speed: MIN_SPEED,
            wall_restitution: WALL_RESTITUTION,

            object_balls: INITIAL_BALLS,
            rack_jitter: 0.0,

            pickup_radius: PICKUP_RADIUS,
            shot_sensitivity: SHOT_SENSITIVITY,
            max_shot_power: MAX_SHOT_POWER,
            cancel_policy: CancelPolicy::default(),

            respawn_delay_ms: RESPAWN_DELAY_MS,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "tulip_pool_settings";

    /// Set the cancel policy
    pub fn with_cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.cancel_policy = policy;
        self
    }

    /// Set the number of racked object balls
    pub fn with_object_balls(mut self, count: usize) -> Self {
        self.object_balls = count;
        self
    }

    /// Set the rack jitter amplitude
    pub fn with_rack_jitter(mut self, jitter: f32) -> Self {
        self.rack_jitter = jitter;
        self
    }

    /// Check every range the simulation relies on
    pub fn validate(&self) -> Result<(), PoolError> {
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(PoolError::InvalidSettings("friction must be in (0, 1)"));
        }
        if !(self.wall_restitution > 0.0 && self.wall_restitution <= 1.0) {
            return Err(PoolError::InvalidSettings("wall restitution must be in (0, 1]"));
        }
        if !(self.min_speed > 0.0) {
            return Err(PoolError::InvalidSettings("speed floor must be positive"));
        }
        if !(self.ball_radius > 0.0) {
            return Err(PoolError::InvalidSettings("ball radius must be positive"));
        }
        if !(self.pocket_radius > self.ball_radius) {
            return Err(PoolError::InvalidSettings(
                "pocket radius must exceed ball radius",
            ));
        }
        if !(self.table_padding >= 0.0) {
            return Err(PoolError::InvalidSettings("table padding must not be negative"));
        }
        if !(self.pickup_radius > self.ball_radius) {
            return Err(PoolError::InvalidSettings(
                "pickup radius must exceed ball radius",
            ));
        }
        if !(self.shot_sensitivity > 0.0) {
            return Err(PoolError::InvalidSettings("shot sensitivity must be positive"));
        }
        if !(self.max_shot_power > 0.0) {
            return Err(PoolError::InvalidSettings("max shot power must be positive"));
        }
        if self.object_balls > MAX_OBJECT_BALLS {
            return Err(PoolError::InvalidSettings("rack holds at most 15 object balls"));
        }
        // Larger offsets could make neighbouring racked balls overlap
        if !(self.rack_jitter >= 0.0 && self.rack_jitter <= self.ball_radius * 0.05) {
            return Err(PoolError::InvalidSettings(
                "rack jitter must be within a twentieth of the ball radius",
            ));
        }
        if !(self.respawn_delay_ms.is_finite() && self.respawn_delay_ms > 0.0) {
            return Err(PoolError::InvalidSettings("respawn delay must be positive"));
        }
        Ok(())
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json::<Settings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Stored settings rejected: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PoolError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut s = Settings::default();
        s.friction = 1.0;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.pocket_radius = s.ball_radius;
        assert!(s.validate().is_err());

        let s = Settings::default().with_object_balls(16);
        assert!(s.validate().is_err());

        let s = Settings::default().with_rack_jitter(5.0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_load_falls_back_on_bad_data() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{ nope").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());

        // Parses, but fails validation
        store
            .set(Settings::STORAGE_KEY, r#"{"friction": 1.5}"#)
            .unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load_keeps_changes() {
        let mut store = MemoryStore::new();
        let settings = Settings::default()
            .with_cancel_policy(CancelPolicy::Shoot)
            .with_object_balls(10);
        settings.save(&mut store).unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded.cancel_policy, CancelPolicy::Shoot);
        assert_eq!(loaded.object_balls, 10);
    }
}
