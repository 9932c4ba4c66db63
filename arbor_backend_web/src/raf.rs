// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame driver.
//!
//! [`RafLoop`] calls a frame callback with the browser's
//! [`DOMHighResTimeStamp`][mdn] converted to microsecond [`HostTime`] ticks.
//! The callback returns whether it needs another frame, which matches
//! [`Scene::frame`]: the loop idles once every animation has settled and is
//! restarted with [`RafLoop::start`] after the next render.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp
//! [`HostTime`]: arbor_core::time::HostTime
//! [`Scene::frame`]: arbor_core::scene::Scene::frame

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use arbor_core::time::HostTime;

// Direct global bindings instead of `web_sys::Window` methods, so no Window
// or Performance object is fetched per frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// An on-demand `requestAnimationFrame` loop.
///
/// Create with [`RafLoop::new`], then call [`start`](Self::start) whenever
/// something starts animating. The loop re-registers itself each frame while
/// the callback returns `true`, until [`stop`](Self::stop) is called, or
/// until the `RafLoop` is dropped.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

type RafClosure = Closure<dyn FnMut(f64)>;

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`. Set once and
    /// referenced from inside itself.
    closure: RefCell<Option<RafClosure>>,

    /// Receives the frame time; returns `true` to request another frame.
    callback: RefCell<Box<dyn FnMut(HostTime) -> bool>>,

    /// Frames delivered so far.
    frame_counter: Cell<u64>,

    running: Cell<bool>,

    /// The most recent `requestAnimationFrame` id, for cancelling.
    raf_id: Cell<i32>,
}

impl RafInner {
    fn request(&self) {
        if let Some(ref closure) = *self.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.raf_id.set(id);
        }
    }
}

impl RafLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(HostTime) -> bool + 'static) -> Self {
        let inner = Rc::new(RafInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            frame_counter: Cell::new(0),
            running: Cell::new(false),
            raf_id: Cell::new(0),
        });

        let weak = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.running.get() {
                return;
            }

            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "rAF timestamp is a small positive f64; µs fits in u64"
            )]
            let now = HostTime((timestamp_ms * 1000.0) as u64);
            inner.frame_counter.set(inner.frame_counter.get() + 1);

            let again = inner.callback.borrow_mut()(now);
            if !again {
                inner.running.set(false);
            } else if inner.running.get() {
                inner.request();
            }
        }) as Box<dyn FnMut(f64)>);
        *inner.closure.borrow_mut() = Some(closure);

        Self { inner }
    }

    /// Requests frames until the callback reports it is idle.
    ///
    /// If already running, this is a no-op.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);
        self.inner.request();
    }

    /// Cancels the pending frame. Can be restarted with
    /// [`start`](Self::start).
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` if a frame is pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Frames delivered since creation.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.inner.frame_counter.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish()
    }
}
