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

//! Device configuration.
//!
//! A [`Config`] is handed to [`Saa716x::probe`] or [`AdapterManager::new`]
//! when the bridge is attached, and is consumed during initialization only.
//! It replaces the module parameters the bridge would otherwise be tuned
//! with, so nothing in this crate reads global state.
//!
//! [`Config`]: struct.Config.html
//! [`Saa716x::probe`]: ../device/struct.Saa716x.html#method.probe
//! [`AdapterManager::new`]: ../i2c/struct.AdapterManager.html#method.new

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::i2c::{Error, Result};

/// Standard-mode bus frequency in hertz (Hz).
pub const RATE_100KHZ: u32 = 100_000;
/// Fast-mode bus frequency in hertz (Hz).
pub const RATE_400KHZ: u32 = 400_000;

/// Supported I2C bus clock rates.
///
/// The divisors are derived from the bridge's 27 MHz reference clock, with
/// SCL high and low periods each set to 0.5 * 27 MHz / rate.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockRate {
    /// 100 kHz (Standard-mode).
    Standard,
    /// 400 kHz (Fast-mode).
    Fast,
}

// Divisor and data hold-time register values for a clock rate.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) struct Timing {
    pub divisor_high: u32,
    pub divisor_low: u32,
    pub sda_hold: u32,
}

impl ClockRate {
    /// Selects the `ClockRate` matching `hz`.
    ///
    /// Returns `Err(`[`Error::UnsupportedClockRate`]`)` for anything other
    /// than 100 kHz or 400 kHz.
    ///
    /// [`Error::UnsupportedClockRate`]: ../i2c/enum.Error.html#variant.UnsupportedClockRate
    pub fn from_hz(hz: u32) -> Result<ClockRate> {
        match hz {
            RATE_100KHZ => Ok(ClockRate::Standard),
            RATE_400KHZ => Ok(ClockRate::Fast),
            _ => Err(Error::UnsupportedClockRate(hz)),
        }
    }

    /// Returns the nominal bus frequency in hertz (Hz).
    pub fn hz(self) -> u32 {
        match self {
            ClockRate::Standard => RATE_100KHZ,
            ClockRate::Fast => RATE_400KHZ,
        }
    }

    /// Returns the approximate time in microseconds (µs) it takes to clock a
    /// single byte (including the ACK bit) onto the bus.
    ///
    /// This is only used to size polling back-off delays, and should never
    /// be treated as a deadline.
    pub fn byte_time_us(self) -> u32 {
        match self {
            ClockRate::Standard => 90,
            ClockRate::Fast => 23,
        }
    }

    pub(crate) fn timing(self) -> Timing {
        match self {
            ClockRate::Standard => Timing {
                divisor_high: 135,
                divisor_low: 135,
                sda_hold: 7,
            },
            ClockRate::Fast => Timing {
                divisor_high: 34,
                divisor_low: 34,
                sda_hold: 2,
            },
        }
    }
}

impl fmt::Display for ClockRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}kHz", self.hz() / 1000)
    }
}

/// Static description of a board built around a SAA716x bridge.
#[derive(Debug, PartialEq, Eq)]
pub struct Board {
    /// Marketing name of the board.
    pub model_name: &'static str,
    /// Frontend chips populated on the board.
    pub chips_desc: &'static str,
    /// Supported broadcast standards.
    pub dev_type: &'static str,
}

/// Twinhan/Azurewave VP-6090.
pub static VP6090: Board = Board {
    model_name: "Twinhan/Azurewave VP-6090",
    chips_desc: "2xTDA8263 + 2xMB86A16L + 2xTDA8275A + 2xTDA10046 + SAA7162",
    dev_type: "2xDVB-S + 2xDVB-T + 2xAnalog",
};

/// NXP Semiconductors NEMO reference board.
pub static NEMO: Board = Board {
    model_name: "NXP Semiconductors NEMO reference board",
    chips_desc: "SAA7160 + TDA8275A + TDA10046 + SAA7136",
    dev_type: "DVB-T + Analog",
};

/// Configuration consumed while attaching a bridge.
///
/// By default, the I2C buses run at 100 kHz and verbose logging is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    i2c_rate: u32,
    verbose: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    board: Option<&'static Board>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            i2c_rate: RATE_100KHZ,
            verbose: false,
            board: None,
        }
    }
}

impl Config {
    /// Constructs a new `Config` with default settings.
    pub fn new() -> Config {
        Config::default()
    }

    /// Sets the I2C bus clock frequency in hertz (Hz).
    ///
    /// The value isn't validated until the buses are initialized. An
    /// unsupported rate is reported and leaves the controller running at its
    /// reset-default clock.
    pub fn i2c_rate(mut self, hz: u32) -> Config {
        self.i2c_rate = hz;
        self
    }

    /// Enables or disables byte-level transfer logging.
    pub fn verbose(mut self, verbose: bool) -> Config {
        self.verbose = verbose;
        self
    }

    /// Attaches a board description, used for diagnostics only.
    pub fn board(mut self, board: &'static Board) -> Config {
        self.board = Some(board);
        self
    }

    /// Returns the configured I2C bus clock frequency in hertz (Hz).
    pub fn rate_hz(&self) -> u32 {
        self.i2c_rate
    }

    /// Returns `true` if byte-level transfer logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the attached board description, if any.
    pub fn board_info(&self) -> Option<&'static Board> {
        self.board
    }
}
