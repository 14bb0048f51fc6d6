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

//! Register interface for the SAA716x register block.
//!
//! Every functional unit of the bridge (video inputs, I2C controllers, MSI
//! controller, and so on) occupies its own 4 KiB window inside BAR0. The
//! [`Registers`] trait provides 32-bit reads and writes at byte offsets into
//! that BAR. Accesses have no side effects beyond the register they touch,
//! and are assumed to complete synchronously.
//!
//! [`PciMem`] implements [`Registers`] on top of a memory-mapped PCI
//! resource file. Anything else that can emulate the register block, like a
//! simulator or a recording proxy, can implement the trait as well.
//!
//! [`Registers`]: trait.Registers.html
//! [`PciMem`]: struct.PciMem.html

use std::sync::Arc;

mod mem;

pub use self::mem::PciMem;

/// Offset of the first video input port's register window.
pub const VI0: u32 = 0x0000_0000;
/// Offset of the second video input port's register window.
pub const VI1: u32 = 0x0000_1000;
/// Offset of the I2C controller driving bus 0.
pub const I2C_B: u32 = 0x0000_b000;
/// Offset of the I2C controller driving bus 1.
pub const I2C_A: u32 = 0x0000_c000;

/// Size of a single functional unit's register window.
pub const WINDOW_SIZE: u32 = 0x1000;

// Interrupt registers shared by every functional unit, relative to the
// unit's window
pub(crate) const INT_STATUS: u32 = 0xfe0;
pub(crate) const INT_ENABLE: u32 = 0xfe4;
pub(crate) const INT_CLR_STATUS: u32 = 0xfe8;

/// Provides 32-bit access to the bridge's register block.
///
/// `offset` is a byte offset relative to the start of BAR0, and is always
/// 32-bit aligned.
pub trait Registers {
    /// Reads the register at `offset`.
    fn read(&self, offset: u32) -> u32;

    /// Writes `value` to the register at `offset`.
    fn write(&self, offset: u32, value: u32);
}

impl<T: Registers + ?Sized> Registers for &T {
    fn read(&self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: u32, value: u32) {
        (**self).write(offset, value)
    }
}

impl<T: Registers + ?Sized> Registers for Arc<T> {
    fn read(&self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write(&self, offset: u32, value: u32) {
        (**self).write(offset, value)
    }
}
