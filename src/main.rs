//! Tulip Pool entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

    use tulip_pool::driver::FrameDriver;
    use tulip_pool::persistence::{KeyValueStore, MemoryStore};
    use tulip_pool::platform::{AnimationFrameScheduler, CanvasSurface, LocalStorage};
    use tulip_pool::renderer::draw_frame;
    use tulip_pool::sim::fit_viewport;
    use tulip_pool::{Command, PoolError, PoolGame, Settings};

    type SharedGame = Rc<RefCell<PoolGame>>;

    fn platform_error(reason: &str) -> PoolError {
        PoolError::Platform(reason.to_string())
    }

    /// Canvas size for the current window, applied to the element
    fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (f32, f32) {
        let inner = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(900.0);
        let (width, height) = fit_viewport(inner as f32);
        canvas.set_width(width.max(0.0) as u32);
        canvas.set_height(height.max(0.0) as u32);
        (width, height)
    }

    /// Client coordinates relative to the canvas
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        Some(canvas_point(canvas, touch.client_x(), touch.client_y()))
    }

    /// Score and best score live in the page header
    fn update_hud(document: &Document, shown: &mut (u32, u32), score: u32, best: u32) {
        if *shown == (score, best) {
            return;
        }
        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("best") {
            el.set_text_content(Some(&best.to_string()));
        }
        *shown = (score, best);
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStorage::open() {
            Some(storage) => Box::new(storage),
            None => {
                log::warn!("LocalStorage unavailable, best score will not persist");
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> Result<(), PoolError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Tulip Pool starting...");

        let window = web_sys::window().ok_or_else(|| platform_error("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| platform_error("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| platform_error("no canvas"))?
            .dyn_into()
            .map_err(|_| platform_error("#canvas is not a canvas"))?;

        let (width, height) = fit_canvas(&window, &canvas);
        let store = open_store();
        let settings = Settings::load(store.as_ref());
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(PoolGame::new(
            settings, width, height, seed, store,
        )?));

        let mut surface = CanvasSurface::new(&canvas)?;
        let hud_document = document.clone();
        let mut shown = (u32::MAX, u32::MAX);
        let scheduler = Rc::new(AnimationFrameScheduler::new(window.clone()));
        let handle = FrameDriver::start(game.clone(), scheduler, move |view| {
            draw_frame(&mut surface, view);
            update_hud(&hud_document, &mut shown, view.score, view.best);
        });

        setup_input_handlers(&window, &canvas, game.clone());
        setup_resize_handler(&window, &canvas, game.clone());
        setup_new_game_button(&document, game);

        // The loop lives as long as the page
        std::mem::forget(handle);

        log::info!("Tulip Pool running!");
        Ok(())
    }

    fn setup_input_handlers(window: &Window, canvas: &HtmlCanvasElement, game: SharedGame) {
        // Mouse down - may pick up the cue ball
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().dispatch(Command::PointerDown(point));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - tracked on the window so drags can leave the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().dispatch(Command::PointerMove(point));
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up - shoot
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().dispatch(Command::PointerUp);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = touch_point(&canvas_clone, &event) {
                    game.borrow_mut().dispatch(Command::PointerDown(point));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(point) = touch_point(&canvas_clone, &event) {
                    game.borrow_mut().dispatch(Command::PointerMove(point));
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().dispatch(Command::PointerUp);
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch cancel - the host took the gesture away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().dispatch(Command::PointerCancel);
            });
            let _ = window
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(window: &Window, canvas: &HtmlCanvasElement, game: SharedGame) {
        let window_clone = window.clone();
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = fit_canvas(&window_clone, &canvas_clone);
            game.borrow_mut().dispatch(Command::Resize { width, height });
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_new_game_button(document: &Document, game: SharedGame) {
        if let Some(btn) = document.get_element_by_id("new-game") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().dispatch(Command::NewGame);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Tulip Pool failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tulip Pool (native) starting...");
    log::info!("Native mode plays one headless break - run with `trunk serve` for the table");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;

    use tulip_pool::consts::MAX_SHOT_POWER;
    use tulip_pool::driver::{FrameDriver, ManualScheduler};
    use tulip_pool::persistence::MemoryStore;
    use tulip_pool::platform::FRAME_MS;
    use tulip_pool::{PoolError, PoolGame, Settings};

    /// Give up on a shot that has not settled after a minute of frames
    const MAX_FRAMES: u32 = 60 * 60;

    /// Break at full power and let the table settle
    pub fn run() -> Result<(), PoolError> {
        let store = MemoryStore::new();
        let settings = Settings::load(&store);
        let game = Rc::new(RefCell::new(PoolGame::new(
            settings,
            800.0,
            444.0,
            0x7011,
            Box::new(store.clone()),
        )?));

        let scheduler = Rc::new(ManualScheduler::new());
        let peak_visible = Rc::new(Cell::new(0usize));
        let last_visible = Rc::new(Cell::new(0usize));
        let handle = {
            let (peak, last) = (peak_visible.clone(), last_visible.clone());
            FrameDriver::start(game.clone(), scheduler.clone(), move |view| {
                let visible = view.visible_balls().count();
                peak.set(peak.get().max(visible));
                last.set(visible);
            })
        };

        game.borrow_mut()
            .apply_shot(Vec2::new(MAX_SHOT_POWER, 0.0));

        let mut frame = 0;
        while frame < MAX_FRAMES {
            frame += 1;
            scheduler.refresh(frame as f64 * FRAME_MS);
            let g = game.borrow();
            if g.state().is_at_rest() && g.respawn_at().is_none() {
                break;
            }
        }
        handle.stop();

        let g = game.borrow();
        log::info!(
            "Table settled after {} frames: {} of {} balls still on the table",
            handle.frames(),
            last_visible.get(),
            peak_visible.get()
        );
        log::info!(
            "Score {} (best {}), {} best-score writes",
            g.score().score(),
            g.score().best(),
            store.write_count()
        );
        Ok(())
    }
}
