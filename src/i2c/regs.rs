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

// I2C controller registers, relative to the controller's window.

use crate::i2c::ADAPTERS;
pub(crate) use crate::registers::{I2C_A, I2C_B};

pub(crate) use crate::registers::{INT_CLR_STATUS, INT_STATUS};

// Receive and transmit FIFOs share an address
pub const RX_FIFO: u32 = 0x000;
pub const TX_FIFO: u32 = 0x000;
pub const I2C_STATUS: u32 = 0x008;
pub const I2C_CONTROL: u32 = 0x00c;
pub const I2C_CLOCK_DIVISOR_HIGH: u32 = 0x010;
pub const I2C_CLOCK_DIVISOR_LOW: u32 = 0x014;
pub const I2C_TX_LEVEL: u32 = 0x020;
pub const I2C_SDA_HOLD: u32 = 0x028;

// TX_FIFO
pub const I2C_STOP_BIT: u32 = 1 << 9;
pub const I2C_START_BIT: u32 = 1 << 8;
pub const I2C_TX_BYTE: u32 = 0xff;

// RX_FIFO
pub const I2C_RX_BYTE: u32 = 0xff;

// I2C_STATUS
pub const I2C_TRANSMIT_PROG: u32 = 1 << 7;
pub const I2C_RECEIVE_CLEAR: u32 = 1 << 4;

// I2C_CONTROL. SCL and SDA drive the bus lines directly when bit-banging.
pub const I2C_SCL_CONTROL: u32 = 1 << 7;
pub const I2C_SDA_CONTROL: u32 = 1 << 6;
pub const I2C_RESET: u32 = 1 << 0;
pub const I2C_CONTROL_RESET: u32 = I2C_SCL_CONTROL | I2C_SDA_CONTROL | I2C_RESET;

// I2C_TX_LEVEL
pub const I2C_TRANSMIT_RANGE: u32 = 0xff;

// INT_STATUS
pub const I2C_ERROR_IBE: u32 = 1 << 6;
pub const I2C_ACK_INTER_MTNA: u32 = 1 << 2;
pub const I2C_INTERRUPT_MTD: u32 = 1 << 0;
pub const I2C_INT_ALL: u32 = 0x1fff;

// Register windows of the controllers, indexed by bus
pub const BUS_BASES: [u32; ADAPTERS] = [I2C_B, I2C_A];

/// Returns the register window of the controller driving `bus`, or `None` if
/// the bridge has no such bus.
pub fn bus_base(bus: usize) -> Option<u32> {
    BUS_BASES.get(bus).copied()
}
