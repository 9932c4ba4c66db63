// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for arbor.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafLoop`]: `requestAnimationFrame` frame driver
//! - [`SvgPresenter`]: SVG element management
//! - [`now`] and [`timebase`]: the host clock behind `performance.now()`

#![no_std]

extern crate alloc;

mod presenter;
mod raf;

pub use arbor_core::backend::Presenter;
pub use presenter::SvgPresenter;
pub use raf::RafLoop;

use arbor_core::scene::SceneConfig;
use arbor_core::time::{HostTime, Timebase};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = raf::performance_now();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

/// Default scene configuration with durations in web ticks.
#[must_use]
pub fn scene_config() -> SceneConfig {
    SceneConfig::standard(timebase())
}
