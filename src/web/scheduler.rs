//! `setInterval` tick source

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::game_loop::Scheduler;

/// Fires a fixed callback on a browser interval timer
pub struct IntervalScheduler {
    window: Window,
    callback: Closure<dyn FnMut()>,
    handle: Option<i32>,
}

impl IntervalScheduler {
    pub fn new(window: Window, on_tick: impl FnMut() + 'static) -> Self {
        Self {
            window,
            callback: Closure::<dyn FnMut()>::new(on_tick),
            handle: None,
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn arm(&mut self, period_ms: u32) {
        // Never leave a second interval running
        self.cancel();
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                period_ms as i32,
            ) {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => log::error!("Could not start tick timer: {:?}", e),
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_interval_with_handle(handle);
        }
    }

    fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
