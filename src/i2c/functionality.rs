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

// Functionality bits, as reported to the I/O subsystem. Based on i2c.h and
// http://smbus.org/specs/SMBus_3_1_20180319.pdf
const FUNC_I2C: u32 = 0x01;
const FUNC_10BIT_ADDR: u32 = 0x02;
const FUNC_SMBUS_PEC: u32 = 0x08;
const FUNC_SMBUS_QUICK: u32 = 0x01_0000;
const FUNC_SMBUS_READ_BYTE: u32 = 0x02_0000;
const FUNC_SMBUS_WRITE_BYTE: u32 = 0x04_0000;
const FUNC_SMBUS_READ_BYTE_DATA: u32 = 0x08_0000;
const FUNC_SMBUS_WRITE_BYTE_DATA: u32 = 0x10_0000;
const FUNC_SMBUS_READ_WORD_DATA: u32 = 0x20_0000;
const FUNC_SMBUS_WRITE_WORD_DATA: u32 = 0x40_0000;
const FUNC_SMBUS_PROC_CALL: u32 = 0x80_0000;
const FUNC_SMBUS_READ_BLOCK_DATA: u32 = 0x0100_0000;
const FUNC_SMBUS_WRITE_BLOCK_DATA: u32 = 0x0200_0000;
const FUNC_SMBUS_READ_I2C_BLOCK: u32 = 0x0400_0000;
const FUNC_SMBUS_WRITE_I2C_BLOCK: u32 = 0x0800_0000;

// Everything that can be emulated on top of plain I2C messages
const FUNC_SMBUS_EMUL: u32 = FUNC_SMBUS_QUICK
    | FUNC_SMBUS_READ_BYTE
    | FUNC_SMBUS_WRITE_BYTE
    | FUNC_SMBUS_READ_BYTE_DATA
    | FUNC_SMBUS_WRITE_BYTE_DATA
    | FUNC_SMBUS_READ_WORD_DATA
    | FUNC_SMBUS_WRITE_WORD_DATA
    | FUNC_SMBUS_PROC_CALL
    | FUNC_SMBUS_WRITE_BLOCK_DATA
    | FUNC_SMBUS_READ_I2C_BLOCK
    | FUNC_SMBUS_WRITE_I2C_BLOCK
    | FUNC_SMBUS_PEC;

/// Transfer types supported by an I2C adapter.
///
/// The SAA716x controllers advertise the SMBus protocols that can be emulated
/// with plain I2C messages. SMBus Block Read isn't supported, because its
/// length is only known once the transfer is underway. 10-bit addresses
/// aren't supported either.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Functionality {
    funcs: u32,
}

impl Functionality {
    pub(crate) fn smbus_emul() -> Functionality {
        Functionality {
            funcs: FUNC_SMBUS_EMUL,
        }
    }

    /// Returns the raw functionality mask.
    pub fn bits(&self) -> u32 {
        self.funcs
    }

    pub fn i2c(&self) -> bool {
        (self.funcs & FUNC_I2C) > 0
    }

    pub fn addr_10bit(&self) -> bool {
        (self.funcs & FUNC_10BIT_ADDR) > 0
    }

    pub fn i2c_block_read(&self) -> bool {
        (self.funcs & FUNC_SMBUS_READ_I2C_BLOCK) > 0
    }

    pub fn i2c_block_write(&self) -> bool {
        (self.funcs & FUNC_SMBUS_WRITE_I2C_BLOCK) > 0
    }

    pub fn smbus_quick_command(&self) -> bool {
        (self.funcs & FUNC_SMBUS_QUICK) > 0
    }

    pub fn smbus_receive_byte(&self) -> bool {
        (self.funcs & FUNC_SMBUS_READ_BYTE) > 0
    }

    pub fn smbus_send_byte(&self) -> bool {
        (self.funcs & FUNC_SMBUS_WRITE_BYTE) > 0
    }

    pub fn smbus_read_byte(&self) -> bool {
        (self.funcs & FUNC_SMBUS_READ_BYTE_DATA) > 0
    }

    pub fn smbus_write_byte(&self) -> bool {
        (self.funcs & FUNC_SMBUS_WRITE_BYTE_DATA) > 0
    }

    pub fn smbus_read_word(&self) -> bool {
        (self.funcs & FUNC_SMBUS_READ_WORD_DATA) > 0
    }

    pub fn smbus_write_word(&self) -> bool {
        (self.funcs & FUNC_SMBUS_WRITE_WORD_DATA) > 0
    }

    pub fn smbus_process_call(&self) -> bool {
        (self.funcs & FUNC_SMBUS_PROC_CALL) > 0
    }

    pub fn smbus_block_read(&self) -> bool {
        (self.funcs & FUNC_SMBUS_READ_BLOCK_DATA) > 0
    }

    pub fn smbus_block_write(&self) -> bool {
        (self.funcs & FUNC_SMBUS_WRITE_BLOCK_DATA) > 0
    }

    pub fn smbus_pec(&self) -> bool {
        (self.funcs & FUNC_SMBUS_PEC) > 0
    }
}
