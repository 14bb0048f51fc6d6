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

//! Device lifecycle.
//!
//! [`Saa716x`] ties the bridge's functional units together. Probing masks
//! the video input interrupts and brings up the I2C buses. Removing the
//! device withdraws the buses again.
//!
//! [`Saa716x`]: struct.Saa716x.html

use std::error;
use std::fmt;
use std::result;
use std::sync::Arc;

use log::info;

use crate::config::Config;
use crate::delay::{Delay, Sleep};
use crate::i2c::{self, AdapterManager, Registry};
use crate::pci::{self, PciFunction};
use crate::registers::{PciMem, Registers};
use crate::vip;

/// Errors that can occur when attaching a SAA716x bridge.
#[derive(Debug)]
pub enum Error {
    /// The PCI function couldn't be identified or mapped.
    Pci(pci::Error),
    /// The I2C buses couldn't be initialized.
    I2c(i2c::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Pci(ref err) => write!(f, "PCI error: {}", err),
            Error::I2c(ref err) => write!(f, "I2C error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Pci(ref err) => Some(err),
            Error::I2c(ref err) => Some(err),
        }
    }
}

impl From<pci::Error> for Error {
    fn from(err: pci::Error) -> Error {
        Error::Pci(err)
    }
}

impl From<i2c::Error> for Error {
    fn from(err: i2c::Error) -> Error {
        Error::I2c(err)
    }
}

/// Result type returned from methods that can have `device::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// An attached SAA716x bridge.
#[derive(Debug)]
pub struct Saa716x<R, S> {
    regs: R,
    i2c: AdapterManager<R, S>,
}

impl Saa716x<Arc<PciMem>, Delay> {
    /// Maps the bridge at PCI `address`, like `0000:03:00.0`, and probes it.
    pub fn open<G: Registry>(
        address: &str,
        config: Config,
        registry: &mut G,
    ) -> Result<Saa716x<Arc<PciMem>, Delay>> {
        let function = PciFunction::new(address)?;
        info!("Found {} at {}", function.chip(), address);

        let regs = PciMem::open(function.bar0()).map_err(pci::Error::Io)?;

        Saa716x::probe(Arc::new(regs), Delay::new(), config, registry)
    }
}

impl<R, S> Saa716x<R, S>
where
    R: Registers + Clone,
    S: Sleep + Clone,
{
    /// Masks the video input interrupts, and initializes the I2C buses.
    pub fn probe<G: Registry>(
        regs: R,
        sleep: S,
        config: Config,
        registry: &mut G,
    ) -> Result<Saa716x<R, S>> {
        if let Some(board) = config.board_info() {
            info!("{}: {} [{}]", board.model_name, board.chips_desc, board.dev_type);
        }

        vip::disable_interrupts(&regs);

        let i2c = AdapterManager::attach(regs.clone(), sleep, config, registry)?;

        Ok(Saa716x { regs, i2c })
    }
}

impl<R: Registers, S: Sleep> Saa716x<R, S> {
    /// Returns the I2C adapter manager.
    pub fn i2c(&self) -> &AdapterManager<R, S> {
        &self.i2c
    }

    /// Returns the register block.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Withdraws the I2C buses from `registry`, and releases the bridge.
    pub fn remove<G: Registry>(self, registry: &mut G) {
        self.i2c.detach(registry);
    }
}
