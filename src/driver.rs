//! Frame driver
//!
//! Ties one [`PoolGame::tick`] plus one render call to each display refresh.
//! The loop re-registers itself after every frame and stops for good once its
//! [`CancelToken`] is flipped; a callback that still fires afterwards does
//! nothing. Queued callbacks only hold a weak reference to the loop, so a
//! request the host never runs does not keep the game alive.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::game::{PoolGame, TableView};

/// Handle for a requested frame
pub type FrameId = u32;

/// Callback invoked with the frame timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Host per-refresh callback scheduler (requestAnimationFrame on the web)
pub trait FrameScheduler {
    /// Run `callback` once on the next refresh
    fn request_frame(&self, callback: FrameCallback) -> FrameId;

    /// Withdraw a pending request. Schedulers that cannot do this may ignore
    /// it; the driver's token still stops the loop.
    fn cancel_frame(&self, _id: FrameId) {}
}

/// Shared stop flag for a frame loop (single-threaded)
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

struct FrameLoop {
    game: Rc<RefCell<PoolGame>>,
    scheduler: Rc<dyn FrameScheduler>,
    render: RefCell<Box<dyn FnMut(&TableView<'_>)>>,
    token: CancelToken,
    pending: Cell<Option<FrameId>>,
    frames: Cell<u64>,
}

impl FrameLoop {
    fn schedule(self: &Rc<Self>) {
        let next: Weak<Self> = Rc::downgrade(self);
        let id = self.scheduler.request_frame(Box::new(move |now_ms| {
            match next.upgrade() {
                Some(frame_loop) => frame_loop.run(now_ms),
                None => log::trace!("Frame at {} ms after teardown, ignored", now_ms),
            }
        }));
        self.pending.set(Some(id));
    }

    fn run(self: Rc<Self>, now_ms: f64) {
        if self.token.is_cancelled() {
            log::trace!("Frame at {} ms after stop, ignored", now_ms);
            return;
        }
        self.pending.set(None);

        self.game.borrow_mut().tick(now_ms);
        {
            let game = self.game.borrow();
            let view = game.view();
            (self.render.borrow_mut())(&view);
        }
        self.frames.set(self.frames.get() + 1);
        log::trace!("Frame {} at {} ms", self.frames.get(), now_ms);

        self.schedule();
    }

    fn stop(&self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
        log::debug!("Frame driver stopped after {} frames", self.frames.get());
    }
}

/// Starts frame loops
pub struct FrameDriver;

impl FrameDriver {
    /// Register with `scheduler` and keep ticking `game` and calling `render`
    /// on every refresh until the returned handle is stopped or dropped.
    pub fn start(
        game: Rc<RefCell<PoolGame>>,
        scheduler: Rc<dyn FrameScheduler>,
        render: impl FnMut(&TableView<'_>) + 'static,
    ) -> FrameHandle {
        let frame_loop = Rc::new(FrameLoop {
            game,
            scheduler,
            render: RefCell::new(Box::new(render)),
            token: CancelToken::new(),
            pending: Cell::new(None),
            frames: Cell::new(0),
        });
        frame_loop.schedule();
        FrameHandle { frame_loop }
    }
}

/// Owner of a running frame loop. Dropping it tears the loop down.
pub struct FrameHandle {
    frame_loop: Rc<FrameLoop>,
}

impl FrameHandle {
    /// Deregister from the scheduler; later callbacks are no-ops
    pub fn stop(&self) {
        self.frame_loop.stop();
    }

    pub fn token(&self) -> CancelToken {
        self.frame_loop.token.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.frame_loop.token.is_cancelled()
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frame_loop.frames.get()
    }
}

impl Drop for FrameHandle {
    fn drop(&mut self) {
        self.frame_loop.stop();
    }
}

/// Scheduler that runs frames only when told to. Used by the native demo and
/// tests to drive the loop at a chosen clock.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<(FrameId, FrameCallback)>>,
    next_id: Cell<FrameId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests waiting for the next refresh
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Fire every request made before this refresh. Returns how many ran.
    pub fn refresh(&self, now_ms: f64) -> usize {
        let due: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        let count = due.len();
        for (_, callback) in due {
            callback(now_ms);
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.queue.borrow_mut().push_back((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        self.queue.borrow_mut().retain(|(queued, _)| *queued != id);
    }
}
