// Copyright (c) 2026 The saa716x Developers
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Microsecond delays.
//!
//! The bus engine never blocks on hardware events. Instead it polls, and
//! backs off between polls for a duration derived from the bus clock. All of
//! those back-offs go through the [`Sleep`] trait, so they can be replaced by
//! a recording or no-op implementation when the register block is simulated.
//!
//! [`Delay`] is the implementation used on real hardware. It relies on
//! `spin_sleep` to reach microsecond accuracy, which `thread::sleep` can't
//! guarantee on most kernels.
//!
//! [`Sleep`]: trait.Sleep.html
//! [`Delay`]: struct.Delay.html

use std::sync::Arc;
use std::time::Duration;

/// Suspends the calling thread for a bounded amount of time.
pub trait Sleep {
    /// Sleeps for at least `min_us` and at most roughly `max_us` microseconds (µs).
    ///
    /// The range gives the implementation room to coalesce wake-ups. Callers
    /// must only rely on the lower bound.
    fn sleep_range_us(&self, min_us: u32, max_us: u32);
}

impl<T: Sleep + ?Sized> Sleep for &T {
    fn sleep_range_us(&self, min_us: u32, max_us: u32) {
        (**self).sleep_range_us(min_us, max_us)
    }
}

impl<T: Sleep + ?Sized> Sleep for Arc<T> {
    fn sleep_range_us(&self, min_us: u32, max_us: u32) {
        (**self).sleep_range_us(min_us, max_us)
    }
}

/// Sleeps using a hybrid of `thread::sleep` and spinning.
///
/// `Delay` also implements the `embedded-hal` `DelayNs` (v1.0.0) and
/// `DelayMs`/`DelayUs` (v0.2.7) traits when the `hal` feature is enabled.
#[derive(Debug, Default, Copy, Clone)]
pub struct Delay {}

impl Delay {
    /// Constructs a new `Delay`.
    pub fn new() -> Delay {
        Delay {}
    }
}

impl Sleep for Delay {
    fn sleep_range_us(&self, min_us: u32, _max_us: u32) {
        spin_sleep::sleep(Duration::from_micros(u64::from(min_us)));
    }
}

#[cfg(feature = "embedded-hal")]
impl embedded_hal::delay::DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        spin_sleep::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        spin_sleep::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        spin_sleep::sleep(Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(feature = "embedded-hal-0")]
impl embedded_hal_0::blocking::delay::DelayMs<u32> for Delay {
    fn delay_ms(&mut self, ms: u32) {
        spin_sleep::sleep(Duration::from_millis(u64::from(ms)));
    }
}

#[cfg(feature = "embedded-hal-0")]
impl embedded_hal_0::blocking::delay::DelayUs<u32> for Delay {
    fn delay_us(&mut self, us: u32) {
        spin_sleep::sleep(Duration::from_micros(u64::from(us)));
    }
}
