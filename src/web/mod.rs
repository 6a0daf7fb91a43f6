//! Browser front end (wasm32)
//!
//! Wires the canvas, DOM buttons and input events to a `GameLoop`, and runs
//! the end-of-session flow on the browser's task queue.

pub mod dom;
pub mod scheduler;

pub use dom::{DomLeaderboard, DomNamePrompt, DomScoreDisplay};
pub use scheduler::IntervalScheduler;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    AddEventListenerOptions, Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent,
    TouchEvent, Window,
};

use crate::config::{GameConfig, StorageBackend};
use crate::game_loop::{GameLoop, LoopState, ScoreKeeper, TickResult};
use crate::platform::{BrowserStorage, FetchTransport};
use crate::renderer::CanvasSurface;
use crate::score_store::{LocalScoreStore, RemoteScoreStore, ScoreStore};

/// Element ids the host page provides
mod ids {
    pub const OPEN_BUTTON: &str = "easterEggBtn";
    pub const POPUP: &str = "easterEggPopup";
    pub const CLOSE_BUTTON: &str = "eggCloseBtn";
    pub const START_BUTTON: &str = "startGameBtn";
    pub const RESTART_BUTTON: &str = "restartBtn";
    pub const START_SCREEN: &str = "startScreen";
    pub const GAME_SCREEN: &str = "gameScreen";
    pub const CANVAS: &str = "snakeCanvas";
    pub const SCORE: &str = "score";
    pub const LEADERBOARD: &str = "highScoreList";
}

type WebLoop = GameLoop<IntervalScheduler, CanvasSurface, DomScoreDisplay>;
type SharedLoop = Rc<RefCell<Option<WebLoop>>>;
type WebKeeper<St> = ScoreKeeper<St, DomNamePrompt, DomLeaderboard>;

/// Load config, pick the score backend once, and wire up the page
pub fn run() -> Result<(), JsValue> {
    let config = GameConfig::load();
    match config.storage.clone() {
        StorageBackend::Local { key } => {
            let store = LocalScoreStore::with_key(BrowserStorage, &key, &config.guest_name);
            launch(config, store)
        }
        StorageBackend::Remote { url } => {
            let store = RemoteScoreStore::with_guest(FetchTransport, &url, &config.guest_name);
            launch(config, store)
        }
    }
}

fn launch<St: ScoreStore + 'static>(config: GameConfig, store: St) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let Some(canvas) = document.get_element_by_id(ids::CANVAS) else {
        log::error!("Canvas #{} is missing", ids::CANVAS);
        return Ok(());
    };
    let canvas: HtmlCanvasElement = canvas.dyn_into()?;
    let surface = CanvasSurface::new(canvas.clone(), &config.head_sprite, &config.target_sprite)?;

    let keeper: Rc<WebKeeper<St>> = Rc::new(ScoreKeeper::new(
        store,
        DomNamePrompt::new(document.clone()),
        DomLeaderboard::new(document.clone(), ids::LEADERBOARD),
    ));

    let game: SharedLoop = Rc::new(RefCell::new(None));
    let scheduler = {
        let weak = Rc::downgrade(&game);
        let keeper = keeper.clone();
        let document = document.clone();
        IntervalScheduler::new(window.clone(), move || on_tick(&weak, &keeper, &document))
    };
    let score_display = DomScoreDisplay::new(document.clone(), ids::SCORE);
    *game.borrow_mut() = Some(GameLoop::new(config, scheduler, surface, score_display));

    setup_popup(&window, &document, &game, &keeper);
    setup_keyboard(&document, &game);
    setup_touch(&canvas, &game);

    log::info!("Grid Snake ready");
    Ok(())
}

fn on_tick<St: ScoreStore + 'static>(
    game: &Weak<RefCell<Option<WebLoop>>>,
    keeper: &Rc<WebKeeper<St>>,
    document: &Document,
) {
    let Some(game) = game.upgrade() else {
        return;
    };
    let result = match game.borrow_mut().as_mut() {
        Some(game) => game.tick(),
        None => return,
    };

    if let TickResult::GameOver { score, reason } = result {
        log::info!("Game over ({:?}) with score {}", reason, score);
        let keeper = keeper.clone();
        let document = document.clone();
        spawn_local(async move {
            keeper.record(score).await;
            set_display(&document, ids::RESTART_BUTTON, "inline-block");
        });
    }
}

fn viewport_width(window: &Window) -> Option<f64> {
    window.inner_width().ok().and_then(|w| w.as_f64())
}

fn set_display(document: &Document, id: &str, value: &str) {
    if let Some(el) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let _ = el.style().set_property("display", value);
    }
}

fn with_loop(game: &SharedLoop, f: impl FnOnce(&mut WebLoop)) {
    if let Some(game) = game.borrow_mut().as_mut() {
        f(game);
    }
}

fn on_click(document: &Document, id: &str, handler: impl FnMut(MouseEvent) + 'static) {
    let Some(el) = document.get_element_by_id(id) else {
        log::warn!("Element #{} not found", id);
        return;
    };
    let closure = Closure::<dyn FnMut(_)>::new(handler);
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn open_popup(document: &Document, game: &SharedLoop) {
    set_display(document, ids::POPUP, "flex");
    if let Some(popup) = document.get_element_by_id(ids::POPUP) {
        let _ = popup.set_attribute("aria-hidden", "false");
    }
    set_display(document, ids::START_SCREEN, "block");
    set_display(document, ids::GAME_SCREEN, "none");
    with_loop(game, |g| g.stop());
}

fn close_popup(document: &Document, game: &SharedLoop) {
    set_display(document, ids::POPUP, "none");
    if let Some(popup) = document.get_element_by_id(ids::POPUP) {
        let _ = popup.set_attribute("aria-hidden", "true");
    }
    with_loop(game, |g| g.stop());
}

fn setup_popup<St: ScoreStore + 'static>(
    window: &Window,
    document: &Document,
    game: &SharedLoop,
    keeper: &Rc<WebKeeper<St>>,
) {
    {
        let document_clone = document.clone();
        let game = game.clone();
        let keeper = keeper.clone();
        on_click(document, ids::OPEN_BUTTON, move |_event| {
            open_popup(&document_clone, &game);
            let keeper = keeper.clone();
            spawn_local(async move {
                keeper.refresh().await;
            });
        });
    }

    {
        let document_clone = document.clone();
        let game = game.clone();
        on_click(document, ids::CLOSE_BUTTON, move |_event| {
            close_popup(&document_clone, &game);
        });
    }

    // Clicking the backdrop (not the dialog) also closes
    {
        let document_clone = document.clone();
        let game = game.clone();
        on_click(document, ids::POPUP, move |event| {
            let is_backdrop = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .is_some_and(|el| el.id() == ids::POPUP);
            if is_backdrop {
                close_popup(&document_clone, &game);
            }
        });
    }

    {
        let window = window.clone();
        let document_clone = document.clone();
        let game = game.clone();
        on_click(document, ids::START_BUTTON, move |_event| {
            set_display(&document_clone, ids::START_SCREEN, "none");
            set_display(&document_clone, ids::GAME_SCREEN, "block");
            let width = viewport_width(&window);
            with_loop(&game, |g| g.start(width));
        });
    }

    {
        let window = window.clone();
        let document_clone = document.clone();
        let game = game.clone();
        on_click(document, ids::RESTART_BUTTON, move |_event| {
            let width = viewport_width(&window);
            with_loop(&game, |g| g.restart(width));
            set_display(&document_clone, ids::RESTART_BUTTON, "none");
        });
    }
}

fn setup_keyboard(document: &Document, game: &SharedLoop) {
    let game = game.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
        let mut consumed = false;
        with_loop(&game, |g| {
            // Arrow keys scroll the page unless a session is running
            if g.state() == LoopState::Running {
                consumed = g.key_down(&event.key());
            }
        });
        if consumed {
            event.prevent_default();
        }
    });
    let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn touch_point(event: &TouchEvent, changed: bool) -> Option<Vec2> {
    let list = if changed {
        event.changed_touches()
    } else {
        event.touches()
    };
    let touch = list.get(0)?;
    Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
}

fn setup_touch(canvas: &HtmlCanvasElement, game: &SharedLoop) {
    let options = AddEventListenerOptions::new();
    options.set_passive(false);

    let listen = |name: &str, handler: Box<dyn FnMut(TouchEvent)>| {
        let closure = Closure::<dyn FnMut(TouchEvent)>::wrap(handler);
        let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
            name,
            closure.as_ref().unchecked_ref(),
            &options,
        );
        closure.forget();
    };

    {
        let game = game.clone();
        listen(
            "touchstart",
            Box::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_point(&event, false) {
                    with_loop(&game, |g| g.touch_start(pos));
                }
            }),
        );
    }

    // Keep the page from scrolling under the board
    listen("touchmove", Box::new(|event: TouchEvent| event.prevent_default()));

    {
        let game = game.clone();
        listen(
            "touchend",
            Box::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_point(&event, true) {
                    with_loop(&game, |g| g.touch_end(pos));
                }
            }),
        );
    }
}
