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

//! SAA716x provides access to the two-wire serial (I2C) bus controllers of
//! the NXP SAA716x family of PCIe multimedia bridges (SAA7160, SAA7161 and
//! SAA7162). Boards built around these chips hang their tuners and
//! demodulators off the bridge's I2C buses, so every frontend driver goes
//! through the transaction engine implemented here.
//!
//! The bus controller is a FIFO-backed engine. START, address, data and STOP
//! phases are queued as 16-bit words in a transmit FIFO, and completion is
//! detected by polling the controller's status and interrupt status
//! registers. No interrupts are used.
//!
//! Register access is abstracted by the [`Registers`] trait, and all waiting
//! goes through the [`Sleep`] trait. [`PciMem`] maps the bridge's BAR0 through
//! sysfs and [`Delay`] sleeps with microsecond accuracy, which is what you'll
//! want on real hardware. Tests and simulators can substitute their own
//! implementations of either.
//!
//! The `embedded-hal` trait implementations for the I2C buses can be enabled
//! by specifying the optional `hal` feature in the dependency declaration for
//! the `saa716x` crate.
//!
//! [`Registers`]: registers/trait.Registers.html
//! [`Sleep`]: delay/trait.Sleep.html
//! [`PciMem`]: registers/struct.PciMem.html
//! [`Delay`]: delay/struct.Delay.html

// Used by rustdoc to link other crates to saa716x's docs
#![doc(html_root_url = "https://docs.rs/saa716x/0.1.0")]

pub mod config;
pub mod delay;
pub mod device;
pub mod i2c;
pub mod pci;
pub mod registers;
pub mod vip;

pub use crate::config::{Board, ClockRate, Config};
pub use crate::delay::{Delay, Sleep};
pub use crate::device::Saa716x;
pub use crate::registers::{PciMem, Registers};
