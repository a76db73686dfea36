//! Match controller
//!
//! [`PoolGame`] owns every piece of mutable match state. Its only mutators
//! are `tick`, `apply_shot`, `reset`, `resize` and `dispatch`; render and
//! input code get a read-only [`TableView`] and send [`Command`]s.

use glam::Vec2;

use crate::aim::{AimController, DragState, ShotTuning, cue_stick};
use crate::error::PoolError;
use crate::persistence::KeyValueStore;
use crate::score::MatchScore;
use crate::settings::Settings;
use crate::sim::{Ball, GameEvent, SimState, TableGeometry, step};

/// Input and host notifications, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
    /// The host lost track of the pointer (touchcancel, pointer left the page)
    PointerCancel,
    Resize { width: f32, height: f32 },
    NewGame,
}

/// Viewport racked on when the host starts out too small to play
const FALLBACK_VIEWPORT: (f32, f32) = (800.0, 444.0);

/// Read-only snapshot for renderers
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub table: &'a TableGeometry,
    pub balls: &'a [Ball],
    pub drag: Option<&'a DragState>,
    pub score: u32,
    pub best: u32,
    /// No usable table for the current viewport; nothing should be drawn
    pub suspended: bool,
}

impl<'a> TableView<'a> {
    /// Balls still on the table
    pub fn visible_balls(&self) -> impl Iterator<Item = &'a Ball> + 'a {
        self.balls.iter().filter(|b| b.in_play())
    }

    /// Cue stick segment while aiming with the cue ball on the table
    pub fn cue_stick(&self) -> Option<(Vec2, Vec2)> {
        let drag = self.drag?;
        let cue = self.balls.iter().find(|b| b.is_cue && b.in_play())?;
        Some(cue_stick(cue.pos, cue.radius, drag))
    }
}

/// The pool match
pub struct PoolGame {
    settings: Settings,
    table: TableGeometry,
    state: SimState,
    score: MatchScore,
    aim: AimController,
    store: Box<dyn KeyValueStore>,
    /// Wall-clock time (ms) at which a scratched cue ball returns
    respawn_at: Option<f64>,
    /// Timestamp of the latest tick
    now_ms: f64,
    /// Set when the last resize could not produce a table; no ticks run
    /// until a usable size arrives
    suspended: bool,
}

impl PoolGame {
    /// Rack a new match for a viewport. The best score is read from `store`.
    ///
    /// A viewport too small for a table starts the match suspended, racked on
    /// a fallback table, until a usable [`resize`](Self::resize) arrives.
    pub fn new(
        settings: Settings,
        width: f32,
        height: f32,
        seed: u64,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self, PoolError> {
        settings.validate()?;
        let (table, suspended) = match TableGeometry::new(width, height, &settings) {
            Ok(table) => (table, false),
            Err(e @ PoolError::TableTooSmall { .. }) => {
                log::warn!("{}; waiting for a usable size", e);
                let (w, h) = FALLBACK_VIEWPORT;
                let table = TableGeometry::new(w, h, &settings).map_err(|_| e.clone())?;
                (table, true)
            }
            Err(e) => return Err(e),
        };
        let state = SimState::rack(seed, &table, &settings);
        let score = MatchScore::load(store.as_ref());
        let aim = AimController::new(ShotTuning::from(&settings));

        log::info!(
            "New match on {}x{} table, {} balls, seed {}",
            table.size.x,
            table.size.y,
            state.balls.len(),
            seed
        );

        Ok(Self {
            settings,
            table,
            state,
            score,
            aim,
            store,
            respawn_at: None,
            now_ms: 0.0,
            suspended,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn table(&self) -> &TableGeometry {
        &self.table
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn score(&self) -> &MatchScore {
        &self.score
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.aim.drag()
    }

    /// When the scratched cue ball will return, if it is off the table
    pub fn respawn_at(&self) -> Option<f64> {
        self.respawn_at
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Read-only view for one frame
    pub fn view(&self) -> TableView<'_> {
        TableView {
            table: &self.table,
            balls: &self.state.balls,
            drag: self.aim.drag(),
            score: self.score.score(),
            best: self.score.best(),
            suspended: self.suspended,
        }
    }

    /// Run one simulation tick at wall-clock time `now_ms`.
    ///
    /// A due cue ball respawn happens first, then one physics step; captures
    /// from that step update the score and may schedule a respawn.
    pub fn tick(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if self.suspended {
            return Vec::new();
        }
        self.now_ms = now_ms;

        if self.respawn_at.is_some_and(|due| now_ms >= due) {
            self.respawn_at = None;
            let spot = self.table.cue_start();
            if let Some(cue) = self.state.cue_mut() {
                cue.respawn(spot);
                log::debug!("Cue ball back at {:?}", spot);
            }
        }

        let events = step(&mut self.state, &self.table, &self.settings);
        for event in &events {
            self.on_event(event);
        }
        events
    }

    fn on_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Pocketed { is_cue: true, .. } => {
                // A scratch mid-drag would leave the stick aiming at nothing
                self.aim.clear();
                let due = self.now_ms + self.settings.respawn_delay_ms;
                self.respawn_at = Some(due);
                log::debug!("Scratch, cue ball returns at {} ms", due);
            }
            GameEvent::Pocketed { is_cue: false, .. } => {
                if let Some(best) = self.score.record_capture(false) {
                    log::info!("New best score: {}", best);
                    if let Err(e) = self.score.save_best(self.store.as_mut()) {
                        log::warn!("Could not save best score: {}", e);
                    }
                }
            }
        }
    }

    /// Set the cue ball's velocity. Ignored while the cue ball is off the
    /// table; returns whether the shot was taken.
    pub fn apply_shot(&mut self, velocity: Vec2) -> bool {
        match self.state.cue_mut() {
            Some(cue) if cue.in_play() => {
                cue.vel = velocity;
                log::debug!("Shot {:?}", velocity);
                true
            }
            _ => {
                log::debug!("Shot dropped, cue ball not on the table");
                false
            }
        }
    }

    /// Re-rack, zero the score and forget any pending respawn
    pub fn reset(&mut self) {
        self.state = SimState::rack(self.state.seed, &self.table, &self.settings);
        self.score.reset();
        self.aim.clear();
        self.respawn_at = None;
        log::info!("Table reset");
    }

    /// Rebuild the table for a new viewport and re-rack.
    ///
    /// If the viewport is unusable the match is suspended until a later
    /// resize succeeds.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), PoolError> {
        match TableGeometry::new(width, height, &self.settings) {
            Ok(table) => {
                log::info!("Resized to {}x{}", width, height);
                self.table = table;
                self.suspended = false;
                self.reset();
                Ok(())
            }
            Err(e) => {
                log::warn!("{}; pausing the table", e);
                self.suspended = true;
                self.aim.clear();
                self.respawn_at = None;
                Err(e)
            }
        }
    }

    /// Apply one command from the input or resize layer
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::PointerDown(point) => {
                if self.suspended {
                    return;
                }
                let cue = self.state.cue().filter(|b| b.in_play()).map(|b| b.pos);
                self.aim.press(point, cue);
            }
            Command::PointerMove(point) => self.aim.move_to(point),
            Command::PointerUp => {
                if let Some(velocity) = self.aim.release() {
                    self.apply_shot(velocity);
                }
            }
            Command::PointerCancel => {
                if let Some(velocity) = self.aim.cancel() {
                    self.apply_shot(velocity);
                }
            }
            Command::Resize { width, height } => {
                // Already logged; the table stays suspended
                let _ = self.resize(width, height);
            }
            Command::NewGame => self.reset(),
        }
    }
}
