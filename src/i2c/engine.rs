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

use log::{debug, error, info};

use crate::config::ClockRate;
use crate::delay::Sleep;
use crate::i2c::regs::*;
use crate::i2c::{Error, Result};
use crate::registers::Registers;

/// Polls of the status register before `send_byte` gives up.
pub const MAX_SEND_POLLS: usize = 20;
/// Polls of the transmit FIFO level before `wait_transfer_done` gives up.
pub const MAX_WAIT_POLLS: usize = 20;
/// Polls of the status register before `receive_byte` gives up.
pub const MAX_RECEIVE_POLLS: usize = 50;

// Settle time after each bus recovery step, long enough for clock stretching.
const RECOVERY_SETTLE_US: (u32, u32) = (100, 120);

// Manual SCL/SDA patterns written to I2C_CONTROL by `recover_bus`.
#[rustfmt::skip]
const RECOVERY_SEQUENCE: [u32; 23] = [
    // SCL/SDA high
    0xc0,
    // 9 SCL pulses without ACK (SDA high)
    0x40, 0xc0, 0x40, 0xc0, 0x40, 0xc0,
    0x40, 0xc0, 0x40, 0xc0, 0x40, 0xc0,
    0x40, 0xc0, 0x40, 0xc0, 0x40, 0xc0,
    // STOP condition
    0x40, 0x00, 0x80, 0xc0,
];

/// Drives a single I2C controller.
///
/// `BusEngine` provides the low-level primitives the controller is operated
/// with: reset, clock configuration, queueing bytes in the transmit FIFO,
/// draining the receive FIFO and recovering a stuck bus. It doesn't serialize
/// access. [`AdapterManager`] keeps each engine behind its own lock, and
/// composes the primitives into complete transfers.
///
/// Every polling primitive has a fixed poll budget, and sleeps a multiple of
/// the current byte time between polls. A wedged or absent device results in
/// [`Error::Timeout`] rather than a hang.
///
/// [`AdapterManager`]: struct.AdapterManager.html
/// [`Error::Timeout`]: enum.Error.html#variant.Timeout
#[derive(Debug)]
pub struct BusEngine<R, S> {
    bus: usize,
    base: u32,
    rate: Option<ClockRate>,
    verbose: bool,
    regs: R,
    sleep: S,
}

impl<R: Registers, S: Sleep> BusEngine<R, S> {
    /// Constructs a new `BusEngine` for the controller driving `bus`.
    ///
    /// The hardware isn't touched until [`hardware_init`] is called.
    /// Returns `Err(`[`Error::InvalidBus`]`)` if `bus` isn't `0` or `1`.
    ///
    /// [`hardware_init`]: #method.hardware_init
    /// [`Error::InvalidBus`]: enum.Error.html#variant.InvalidBus
    pub fn new(bus: usize, regs: R, sleep: S) -> Result<BusEngine<R, S>> {
        let base = bus_base(bus).ok_or(Error::InvalidBus(bus))?;

        Ok(BusEngine::with_base(bus, base, regs, sleep))
    }

    pub(crate) fn with_base(bus: usize, base: u32, regs: R, sleep: S) -> BusEngine<R, S> {
        BusEngine {
            bus,
            base,
            rate: None,
            verbose: false,
            regs,
            sleep,
        }
    }

    /// Enables or disables byte-level transfer logging.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub(crate) fn verbose(&self) -> bool {
        self.verbose
    }

    /// Returns the bus index.
    pub fn bus(&self) -> usize {
        self.bus
    }

    /// Returns the adapter name.
    pub fn name(&self) -> String {
        format!("SAA716x I2C Core {}", self.bus)
    }

    /// Returns the configured clock rate, or `None` if no supported rate has
    /// been programmed.
    pub fn rate(&self) -> Option<ClockRate> {
        self.rate
    }

    #[inline(always)]
    fn read(&self, reg: u32) -> u32 {
        self.regs.read(self.base + reg)
    }

    #[inline(always)]
    fn write(&self, reg: u32, value: u32) {
        self.regs.write(self.base + reg, value)
    }

    #[inline(always)]
    pub(crate) fn sleep_us(&self, min_us: u32, max_us: u32) {
        self.sleep.sleep_range_us(min_us, max_us)
    }

    /// Resets the controller core and flushes its FIFOs.
    pub fn hardware_reset(&self) {
        self.write(I2C_CONTROL, I2C_CONTROL_RESET);
    }

    /// Programs the clock divisor and data hold-time registers for `hz`.
    ///
    /// Only 100 kHz and 400 kHz are supported. Any other rate is logged and
    /// returns `Err(`[`Error::UnsupportedClockRate`]`)`, leaving both the
    /// registers and the previously configured rate untouched.
    ///
    /// [`Error::UnsupportedClockRate`]: enum.Error.html#variant.UnsupportedClockRate
    pub fn configure_clock(&mut self, hz: u32) -> Result<()> {
        let rate = match ClockRate::from_hz(hz) {
            Ok(rate) => rate,
            Err(e) => {
                error!("{} Unknown Rate ({} Hz)", self.name(), hz);
                return Err(e);
            }
        };

        info!("Initializing {} @ {}", self.name(), rate);

        let timing = rate.timing();
        self.write(I2C_CLOCK_DIVISOR_HIGH, timing.divisor_high);
        self.write(I2C_CLOCK_DIVISOR_LOW, timing.divisor_low);
        self.write(I2C_SDA_HOLD, timing.sda_hold);

        self.rate = Some(rate);

        Ok(())
    }

    /// Resets the controller, programs the clock rate and releases the bus.
    ///
    /// The recovery sequence runs even when `hz` is rejected, since a slave
    /// may still be holding the bus from a previous owner. The clock error is
    /// returned afterwards, and the controller keeps running at its
    /// reset-default rate.
    pub fn hardware_init(&mut self, hz: u32) -> Result<()> {
        self.hardware_reset();
        let configured = self.configure_clock(hz);
        self.recover_bus();

        configured
    }

    /// Returns the approximate time in microseconds (µs) to clock one byte.
    ///
    /// An engine without a supported rate is assumed to run at Standard-mode
    /// speed.
    pub fn byte_time_us(&self) -> u32 {
        self.rate.unwrap_or(ClockRate::Standard).byte_time_us()
    }

    /// Returns the number of words waiting in the transmit FIFO.
    pub fn tx_level(&self) -> u32 {
        self.read(I2C_TX_LEVEL) & I2C_TRANSMIT_RANGE
    }

    /// Clears all pending interrupt status bits.
    pub fn clear_interrupts(&self) {
        self.write(INT_CLR_STATUS, I2C_INT_ALL);
    }

    /// Queues `data` in the transmit FIFO.
    ///
    /// Waits for the controller to finish transmitting its current byte,
    /// sleeping 4 to 6 byte times between polls. Returns
    /// `Err(`[`Error::Timeout`]`)` if the controller is still busy after
    /// [`MAX_SEND_POLLS`] polls.
    ///
    /// [`Error::Timeout`]: enum.Error.html#variant.Timeout
    /// [`MAX_SEND_POLLS`]: constant.MAX_SEND_POLLS.html
    pub fn send_byte(&self, data: u32) -> Result<()> {
        let byte_time = self.byte_time_us();

        for _ in 0..MAX_SEND_POLLS {
            if self.read(I2C_STATUS) & I2C_TRANSMIT_PROG == 0 {
                self.write(TX_FIFO, data);
                return Ok(());
            }

            self.sleep_us(4 * byte_time, 6 * byte_time);
        }

        Err(Error::Timeout)
    }

    // Maps the interrupt status error bits to an error. The bus error takes
    // precedence over a NACK.
    fn check_errors(&self, int_status: u32) -> Result<()> {
        if int_status & I2C_ERROR_IBE != 0 {
            return Err(Error::BusError);
        }

        if int_status & I2C_ACK_INTER_MTNA != 0 {
            return Err(Error::DeviceNotResponding);
        }

        Ok(())
    }

    /// Waits until the transmit FIFO has drained and the controller reports
    /// the transfer as done.
    ///
    /// While bytes are still queued, sleeps for as many byte times as there
    /// are bytes left. Once the FIFO is empty, the interrupt status decides
    /// the outcome: a bus error returns `Err(`[`Error::BusError`]`)`, a NACK
    /// returns `Err(`[`Error::DeviceNotResponding`]`)`, and the transfer-done
    /// bit returns `Ok(())`.
    ///
    /// [`Error::BusError`]: enum.Error.html#variant.BusError
    /// [`Error::DeviceNotResponding`]: enum.Error.html#variant.DeviceNotResponding
    pub fn wait_transfer_done(&self) -> Result<()> {
        let byte_time = self.byte_time_us();

        for _ in 0..MAX_WAIT_POLLS {
            let tx_bytes = self.tx_level();
            if tx_bytes != 0 {
                self.sleep_us(tx_bytes * byte_time, (tx_bytes + 1) * byte_time);
                continue;
            }

            let int_status = self.read(INT_STATUS);
            self.check_errors(int_status)?;

            if int_status & I2C_INTERRUPT_MTD != 0 {
                return Ok(());
            }

            self.sleep_us(byte_time / 2, byte_time);
        }

        Err(Error::Timeout)
    }

    /// Returns the next byte from the receive FIFO.
    ///
    /// Aborts early on a bus error or NACK, checked the same way as
    /// [`wait_transfer_done`]. A NACK also flushes the transmit FIFO, which
    /// still holds the filler bytes of the aborted read.
    ///
    /// [`wait_transfer_done`]: #method.wait_transfer_done
    pub fn receive_byte(&self) -> Result<u8> {
        let byte_time = self.byte_time_us();

        for _ in 0..MAX_RECEIVE_POLLS {
            if self.read(I2C_STATUS) & I2C_RECEIVE_CLEAR == 0 {
                return Ok((self.read(RX_FIFO) & I2C_RX_BYTE) as u8);
            }

            match self.check_errors(self.read(INT_STATUS)) {
                Err(Error::DeviceNotResponding) => {
                    self.hardware_reset();
                    return Err(Error::DeviceNotResponding);
                }
                Err(e) => return Err(e),
                Ok(()) => {}
            }

            self.sleep_us(byte_time / 2, byte_time);
        }

        Err(Error::Timeout)
    }

    /// Releases a bus held by a slave that was interrupted mid-transfer.
    ///
    /// Bit-bangs nine SCL pulses with SDA released, so a slave stuck in a
    /// read sees a complete byte without ACK, followed by a STOP condition.
    /// Recovery is best-effort. It doesn't report errors, and doesn't
    /// guarantee the bus is usable afterwards.
    pub fn recover_bus(&self) {
        debug!("{} bus recovery", self.name());

        for &step in RECOVERY_SEQUENCE.iter() {
            self.write(I2C_CONTROL, step);
            self.sleep_us(RECOVERY_SETTLE_US.0, RECOVERY_SETTLE_US.1);
        }
    }
}
