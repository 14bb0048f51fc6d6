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

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error};

use crate::config::Config;
use crate::delay::Sleep;
use crate::i2c::engine::BusEngine;
use crate::i2c::functionality::Functionality;
use crate::i2c::regs::BUS_BASES;
use crate::i2c::sequencer::send_segment;
use crate::i2c::{Batch, Error, Message, Result, ADAPTERS};
use crate::registers::Registers;

// Time for in-flight activity to die down after a controller reset, in
// microseconds (µs).
const RESET_SETTLE_US: (u32, u32) = (300, 400);

/// Describes an I2C adapter registered with the I/O subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    bus: usize,
    name: String,
    functionality: Functionality,
}

impl AdapterInfo {
    /// Returns the bus index.
    pub fn bus(&self) -> usize {
        self.bus
    }

    /// Returns the adapter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the transfer types supported by the adapter.
    pub fn functionality(&self) -> Functionality {
        self.functionality
    }
}

/// The I/O subsystem that dispatches transfers from frontend drivers.
///
/// [`AdapterManager`] announces every bus through `add_adapter` when it's
/// initialized, and withdraws it through `del_adapter` on teardown.
///
/// [`AdapterManager`]: struct.AdapterManager.html
pub trait Registry {
    /// Makes the adapter available to callers.
    fn add_adapter(&mut self, adapter: &AdapterInfo) -> Result<()>;

    /// Withdraws a previously added adapter.
    fn del_adapter(&mut self, adapter: &AdapterInfo);
}

/// A `Registry` that accepts every adapter, for standalone use.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoRegistry;

impl Registry for NoRegistry {
    fn add_adapter(&mut self, _adapter: &AdapterInfo) -> Result<()> {
        Ok(())
    }

    fn del_adapter(&mut self, _adapter: &AdapterInfo) {}
}

/// Owns the bridge's I2C controllers and serializes access to them.
///
/// Each bus has its own [`BusEngine`] behind its own lock. The lock is held
/// for an entire batch of messages, so batches sent to the same bus never
/// interleave, while the buses themselves operate independently.
///
/// [`BusEngine`]: struct.BusEngine.html
#[derive(Debug)]
pub struct AdapterManager<R, S> {
    engines: [Mutex<BusEngine<R, S>>; ADAPTERS],
    config: Config,
}

impl<R, S> AdapterManager<R, S>
where
    R: Registers + Clone,
    S: Sleep + Clone,
{
    /// Constructs a new `AdapterManager`.
    ///
    /// The controllers aren't touched until [`initialize`] is called.
    /// [`attach`] combines both steps.
    ///
    /// [`initialize`]: #method.initialize
    /// [`attach`]: #method.attach
    pub fn new(regs: R, sleep: S, config: Config) -> AdapterManager<R, S> {
        let engines = std::array::from_fn(|bus| {
            let mut engine =
                BusEngine::with_base(bus, BUS_BASES[bus], regs.clone(), sleep.clone());
            engine.set_verbose(config.is_verbose());
            Mutex::new(engine)
        });

        AdapterManager { engines, config }
    }

    /// Constructs a new `AdapterManager`, and initializes all buses.
    pub fn attach<G: Registry>(
        regs: R,
        sleep: S,
        config: Config,
        registry: &mut G,
    ) -> Result<AdapterManager<R, S>> {
        let manager = AdapterManager::new(regs, sleep, config);
        manager.initialize(registry)?;

        Ok(manager)
    }
}

impl<R: Registers, S: Sleep> AdapterManager<R, S> {
    /// Registers every bus with `registry`, and initializes its controller.
    ///
    /// Each controller is reset, programmed with the configured clock rate,
    /// and has its bus released by the recovery sequence. An unsupported clock
    /// rate is reported, but isn't fatal.
    ///
    /// If `registry` refuses a bus, initialization stops and the error is
    /// returned. Buses that were already initialized stay registered and
    /// configured. Call [`teardown`] to withdraw them.
    ///
    /// [`teardown`]: #method.teardown
    pub fn initialize<G: Registry>(&self, registry: &mut G) -> Result<()> {
        debug!("Initializing SAA716x I2C Core");

        for bus in 0..ADAPTERS {
            let mut engine = self.lock(bus)?;
            let info = self.info(&engine);

            debug!("Initializing {}", info.name());

            if let Err(e) = registry.add_adapter(&info) {
                error!("{} init failed", info.name());
                return Err(e);
            }

            // An unsupported rate has already been reported, and leaves the
            // controller at its reset-default clock
            if let Err(e) = engine.hardware_init(self.config.rate_hz()) {
                debug!("{}: {}", info.name(), e);
            }
        }

        debug!("SAA716x I2C Core successfully initialized");

        Ok(())
    }

    /// Withdraws every bus from `registry`.
    ///
    /// The controllers themselves are left as they are.
    pub fn teardown<G: Registry>(&self, registry: &mut G) {
        debug!("Removing SAA716x I2C Core");

        for slot in self.engines.iter() {
            let engine = slot.lock().unwrap_or_else(PoisonError::into_inner);
            let info = self.info(&engine);

            debug!("Removing {}", info.name());
            registry.del_adapter(&info);
        }
    }

    /// Withdraws every bus from `registry`, and drops the manager.
    pub fn detach<G: Registry>(self, registry: &mut G) {
        self.teardown(registry);
    }

    /// Returns the configuration the manager was constructed with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the transfer types supported by every bus.
    pub fn functionality(&self) -> Functionality {
        Functionality::smbus_emul()
    }

    /// Returns the description of `bus`.
    pub fn adapter_info(&self, bus: usize) -> Result<AdapterInfo> {
        Ok(self.info(&*self.lock(bus)?))
    }

    /// Returns a handle to `bus`.
    pub fn bus(&self, bus: usize) -> Result<Bus<'_, R, S>> {
        if bus >= ADAPTERS {
            return Err(Error::InvalidBus(bus));
        }

        Ok(Bus { manager: self, bus })
    }

    fn info(&self, engine: &BusEngine<R, S>) -> AdapterInfo {
        AdapterInfo {
            bus: engine.bus(),
            name: engine.name(),
            functionality: self.functionality(),
        }
    }

    // A panic while the lock was held can't leave the controller in a state
    // the next batch doesn't clean up, so poisoning is ignored.
    fn lock(&self, bus: usize) -> Result<MutexGuard<'_, BusEngine<R, S>>> {
        let slot = self.engines.get(bus).ok_or(Error::InvalidBus(bus))?;

        Ok(slot.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Sends a batch of messages on `bus`.
    ///
    /// Messages are sent in order, separated by repeated START conditions,
    /// and the last one is followed by a STOP condition. Returns the number
    /// of messages transferred, which is always `messages.len()`.
    ///
    /// The batch stops at the first failing message. A NACK returns
    /// `Err(`[`Error::DeviceNotResponding`]`)` as-is. Any other error resets
    /// the controller and runs the bus recovery sequence before it's
    /// returned. Use [`transfer_partial`] to find out how many messages
    /// completed before the failure.
    ///
    /// The whole batch is validated before the bus is locked. An invalid
    /// address or an oversized read rejects the batch without any bus
    /// activity. An empty batch returns `Ok(0)` without touching the
    /// controller.
    ///
    /// [`Error::DeviceNotResponding`]: enum.Error.html#variant.DeviceNotResponding
    /// [`transfer_partial`]: #method.transfer_partial
    pub fn transfer(&self, bus: usize, messages: &mut [Message<'_>]) -> Result<usize> {
        let (completed, result) = self.transfer_partial(bus, messages);

        result.map(|()| completed)
    }

    /// Sends a batch of messages on `bus`, and returns how many completed.
    ///
    /// Works like [`transfer`], but also returns the number of messages
    /// that completed before an error cut the batch short. This lets callers
    /// treat a NACK as a short transfer rather than a failure.
    ///
    /// [`transfer`]: #method.transfer
    pub fn transfer_partial(
        &self,
        bus: usize,
        messages: &mut [Message<'_>],
    ) -> (usize, Result<()>) {
        self.run_batch(bus, messages, false)
    }

    // With `merge`, a message in the same direction as the one before it
    // continues that message instead of starting a new one. Empty
    // continuations put nothing on the bus and are skipped.
    pub(crate) fn run_batch<B: Batch + ?Sized>(
        &self,
        bus: usize,
        batch: &mut B,
        merge: bool,
    ) -> (usize, Result<()>) {
        if bus >= ADAPTERS {
            return (0, Err(Error::InvalidBus(bus)));
        }

        let count = batch.len();
        let mut last = 0;
        let mut previous = None;
        for i in 0..count {
            let message = batch.message(i);
            if let Err(e) = message.validate() {
                return (0, Err(e));
            }

            let continues = merge && previous == Some(message.is_read());
            if !(continues && message.is_empty()) {
                last = i;
            }
            previous = Some(message.is_read());
        }

        if count == 0 {
            return (0, Ok(()));
        }

        let engine = match self.lock(bus) {
            Ok(engine) => engine,
            Err(e) => return (0, Err(e)),
        };

        engine.clear_interrupts();

        let mut previous = None;
        for i in 0..count {
            let mut message = batch.message(i);
            let continues = merge && previous == Some(message.is_read());
            previous = Some(message.is_read());

            if continues && message.is_empty() {
                continue;
            }

            match send_segment(&*engine, &mut message, !continues, i == last) {
                Ok(()) => {}
                Err(Error::DeviceNotResponding) => {
                    debug!(
                        "I2C {} {} NACK, msg {}, addr = 0x{:02x}, len={}",
                        bus,
                        message.direction(),
                        i,
                        message.address(),
                        message.len()
                    );

                    return (i, Err(Error::DeviceNotResponding));
                }
                Err(e) => {
                    error!(
                        "I2C {} {} transfer error, msg {}, addr = 0x{:02x}, len={}, {}",
                        bus,
                        message.direction(),
                        i,
                        message.address(),
                        message.len(),
                        e
                    );

                    engine.hardware_reset();
                    engine.sleep_us(RESET_SETTLE_US.0, RESET_SETTLE_US.1);
                    engine.recover_bus();

                    return (i, Err(e));
                }
            }
        }

        (count, Ok(()))
    }
}

/// A handle to a single I2C bus of an [`AdapterManager`].
///
/// With the `hal` feature enabled, `Bus` implements the `embedded-hal`
/// `I2c` trait (v1.0.0), and the `Read`, `Write` and `WriteRead` traits
/// (v0.2.7).
///
/// [`AdapterManager`]: struct.AdapterManager.html
#[derive(Debug)]
pub struct Bus<'a, R, S> {
    manager: &'a AdapterManager<R, S>,
    bus: usize,
}

impl<'a, R: Registers, S: Sleep> Bus<'a, R, S> {
    /// Returns the bus index.
    pub fn index(&self) -> usize {
        self.bus
    }

    // Sends `batch` with adjacent messages in the same direction merged.
    pub(crate) fn transfer_merged<B: Batch + ?Sized>(&self, batch: &mut B) -> Result<()> {
        self.manager.run_batch(self.bus, batch, true).1
    }

    /// Sends a batch of messages. See [`AdapterManager::transfer`].
    ///
    /// [`AdapterManager::transfer`]: struct.AdapterManager.html#method.transfer
    pub fn transfer(&self, messages: &mut [Message<'_>]) -> Result<usize> {
        self.manager.transfer(self.bus, messages)
    }

    /// Fills `buffer` with incoming data from the slave at `address`.
    ///
    /// Sequence: START → Address + Read Bit → Incoming Bytes → STOP
    pub fn read(&self, address: u8, buffer: &mut [u8]) -> Result<()> {
        self.transfer(&mut [Message::read(address, buffer)])?;

        Ok(())
    }

    /// Sends the outgoing data contained in `buffer` to the slave at `address`.
    ///
    /// Sequence: START → Address + Write Bit → Outgoing Bytes → STOP
    pub fn write(&self, address: u8, buffer: &[u8]) -> Result<()> {
        self.transfer(&mut [Message::write(address, buffer)])?;

        Ok(())
    }

    /// Sends the outgoing data contained in `write_buffer`, and then fills
    /// `read_buffer` with incoming data, without a STOP condition in between.
    ///
    /// Sequence: START → Address + Write Bit → Outgoing Bytes → Repeated START →
    /// Address + Read Bit → Incoming Bytes → STOP
    pub fn write_read(
        &self,
        address: u8,
        write_buffer: &[u8],
        read_buffer: &mut [u8],
    ) -> Result<()> {
        self.transfer(&mut [
            Message::write(address, write_buffer),
            Message::read(address, read_buffer),
        ])?;

        Ok(())
    }
}
