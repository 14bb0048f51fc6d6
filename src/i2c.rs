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

//! Interface for the I2C bus controllers.
//!
//! The SAA716x has two identical I2C controllers, each driving its own
//! physical bus. Frontend chips like tuners and demodulators are wired to
//! these buses, and are reached through an [`AdapterManager`].
//!
//! ## Transactions
//!
//! A transfer consists of a batch of [`Message`]s. Each message starts with
//! a (repeated) START condition followed by the 7-bit slave address and the
//! R/W bit. A single STOP condition is issued after the last message of the
//! batch, which allows combined write/read transactions where a register
//! address is written before its contents are read back.
//!
//! The controller queues everything it puts on the wire in a transmit FIFO.
//! For reads, the controller clocks in one byte for every filler byte queued
//! after the address, and stores the incoming data in an 8-byte receive
//! FIFO. Reads are therefore limited to 8 bytes per message. Writes have no
//! length limit.
//!
//! ## Transmission speed
//!
//! The controllers support 100 kHz (Standard-mode) and 400 kHz (Fast-mode)
//! bus clocks. The rate is selected through [`Config::i2c_rate`], and is
//! programmed into the clock divisor registers when the buses are
//! initialized.
//!
//! ## Errors
//!
//! A slave that doesn't acknowledge its address or data returns
//! [`Error::DeviceNotResponding`]. This is commonly used to probe for
//! optional chips, so it doesn't trigger any recovery. Bus errors and
//! timeouts reset the controller and run the bus recovery sequence before the
//! error is returned. Transfers are never retried automatically.
//!
//! [`AdapterManager`]: struct.AdapterManager.html
//! [`Message`]: enum.Message.html
//! [`Config::i2c_rate`]: ../config/struct.Config.html#method.i2c_rate
//! [`Error::DeviceNotResponding`]: enum.Error.html#variant.DeviceNotResponding

use std::error;
use std::fmt;
use std::result;

mod adapter;
mod engine;
mod functionality;
#[cfg(feature = "hal")]
mod hal;
pub(crate) mod regs;
mod sequencer;

pub use self::adapter::{AdapterInfo, AdapterManager, Bus, NoRegistry, Registry};
pub use self::engine::BusEngine;
pub use self::functionality::Functionality;
pub use self::sequencer::send_message;

/// Number of I2C controllers on the bridge.
pub const ADAPTERS: usize = 2;

/// Maximum number of bytes a single read message can return.
///
/// This matches the depth of the controller's receive FIFO.
pub const MAX_READ_LEN: usize = 8;

/// Errors that can occur when accessing the I2C controllers.
#[derive(Debug)]
pub enum Error {
    /// The controller didn't reach the expected state within its poll budget.
    ///
    /// This usually indicates a slow, absent or wedged slave device.
    Timeout,
    /// The controller reported a bus error, like a misplaced START or STOP
    /// condition.
    BusError,
    /// The slave device didn't acknowledge its address or data.
    DeviceNotResponding,
    /// Read exceeds the controller's receive FIFO.
    ///
    /// A single read message can return at most [`MAX_READ_LEN`] bytes.
    ///
    /// [`MAX_READ_LEN`]: constant.MAX_READ_LEN.html
    ReadTooLong(usize),
    /// Unsupported I2C clock rate in hertz (Hz).
    UnsupportedClockRate(u32),
    /// Invalid slave address.
    ///
    /// Only 7-bit addresses are supported.
    InvalidSlaveAddress(u16),
    /// Invalid bus index.
    InvalidBus(usize),
    /// The bus couldn't be registered with the I/O subsystem.
    Registration(String),
}

impl Error {
    /// Returns `true` if the error was caused by a NACK.
    ///
    /// When a batch is cut short by a NACK, every message before the failing
    /// one has completed. Callers that treat a NACK as a partial transfer can
    /// use [`AdapterManager::transfer_partial`] to get that count.
    ///
    /// [`AdapterManager::transfer_partial`]: struct.AdapterManager.html#method.transfer_partial
    pub fn is_nack(&self) -> bool {
        matches!(self, Error::DeviceNotResponding)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Timeout => write!(f, "I2C transfer timed out"),
            Error::BusError => write!(f, "I2C bus error"),
            Error::DeviceNotResponding => write!(f, "I2C device not responding"),
            Error::ReadTooLong(len) => write!(
                f,
                "I2C read of {} bytes exceeds the {}-byte receive FIFO",
                len, MAX_READ_LEN
            ),
            Error::UnsupportedClockRate(hz) => write!(f, "Unsupported I2C clock rate: {} Hz", hz),
            Error::InvalidSlaveAddress(address) => write!(f, "Invalid slave address: {}", address),
            Error::InvalidBus(bus) => write!(f, "Invalid I2C bus: {}", bus),
            Error::Registration(ref name) => write!(f, "Failed to register {}", name),
        }
    }
}

impl error::Error for Error {}

/// Result type returned from methods that can have `i2c::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// A single read or write, addressed to one slave device.
#[derive(Debug)]
pub enum Message<'a> {
    /// Fills `buffer` with incoming data.
    Read { address: u8, buffer: &'a mut [u8] },
    /// Sends the contents of `buffer`.
    Write { address: u8, buffer: &'a [u8] },
}

impl<'a> Message<'a> {
    /// Constructs a read message for the 7-bit `address`.
    pub fn read(address: u8, buffer: &'a mut [u8]) -> Message<'a> {
        Message::Read { address, buffer }
    }

    /// Constructs a write message for the 7-bit `address`.
    pub fn write(address: u8, buffer: &'a [u8]) -> Message<'a> {
        Message::Write { address, buffer }
    }

    /// Returns the 7-bit slave address.
    pub fn address(&self) -> u8 {
        match *self {
            Message::Read { address, .. } | Message::Write { address, .. } => address,
        }
    }

    /// Returns `true` for read messages.
    pub fn is_read(&self) -> bool {
        matches!(self, Message::Read { .. })
    }

    /// Returns the payload length.
    pub fn len(&self) -> usize {
        match self {
            Message::Read { buffer, .. } => buffer.len(),
            Message::Write { buffer, .. } => buffer.len(),
        }
    }

    /// Returns `true` if the message has no payload.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Rejects messages the controller can't represent.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.address() > 0x7f {
            return Err(Error::InvalidSlaveAddress(u16::from(self.address())));
        }

        if self.is_read() && self.len() > MAX_READ_LEN {
            return Err(Error::ReadTooLong(self.len()));
        }

        Ok(())
    }

    pub(crate) fn direction(&self) -> &'static str {
        if self.is_read() {
            "read"
        } else {
            "write"
        }
    }
}

// Messages that can be sent as one batch without collecting them first.
pub(crate) trait Batch {
    fn len(&self) -> usize;

    fn message(&mut self, index: usize) -> Message<'_>;
}

impl Batch for [Message<'_>] {
    fn len(&self) -> usize {
        <[Message<'_>]>::len(self)
    }

    fn message(&mut self, index: usize) -> Message<'_> {
        match &mut self[index] {
            Message::Read { address, buffer } => Message::read(*address, buffer),
            Message::Write { address, buffer } => Message::write(*address, buffer),
        }
    }
}
