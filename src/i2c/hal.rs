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

use embedded_hal::i2c::{self, ErrorType, I2c as I2cHal, NoAcknowledgeSource, Operation};

use super::{Batch, Bus, Error, Message};
use crate::delay::Sleep;
use crate::registers::Registers;

/// `Write` trait implementation for `embedded-hal` v0.2.7.
impl<R: Registers, S: Sleep> embedded_hal_0::blocking::i2c::Write for Bus<'_, R, S> {
    type Error = Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        Bus::write(self, address, bytes)
    }
}

/// `Read` trait implementation for `embedded-hal` v0.2.7.
impl<R: Registers, S: Sleep> embedded_hal_0::blocking::i2c::Read for Bus<'_, R, S> {
    type Error = Error;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        Bus::read(self, address, buffer)
    }
}

/// `WriteRead` trait implementation for `embedded-hal` v0.2.7.
impl<R: Registers, S: Sleep> embedded_hal_0::blocking::i2c::WriteRead for Bus<'_, R, S> {
    type Error = Error;

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Self::Error> {
        Bus::write_read(self, address, bytes, buffer)
    }
}

impl<R: Registers, S: Sleep> ErrorType for Bus<'_, R, S> {
    type Error = Error;
}

impl i2c::Error for Error {
    fn kind(&self) -> i2c::ErrorKind {
        match self {
            Error::DeviceNotResponding => {
                i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown)
            }
            Error::BusError => i2c::ErrorKind::Bus,
            _ => i2c::ErrorKind::Other,
        }
    }
}

// The operations of one `I2c::transaction`, all addressed to `address`.
struct Transaction<'o, 'b> {
    address: u8,
    operations: &'o mut [Operation<'b>],
}

impl Batch for Transaction<'_, '_> {
    fn len(&self) -> usize {
        self.operations.len()
    }

    fn message(&mut self, index: usize) -> Message<'_> {
        match &mut self.operations[index] {
            Operation::Read(buffer) => Message::read(self.address, buffer),
            Operation::Write(buffer) => Message::write(self.address, buffer),
        }
    }
}

/// `I2c` trait implementation for `embedded-hal` v1.0.0.
///
/// Adjacent operations of the same type are merged, so only the first one
/// is preceded by a (repeated) START and the slave address. Every read
/// operation is still limited to [`MAX_READ_LEN`] bytes.
///
/// [`MAX_READ_LEN`]: ../constant.MAX_READ_LEN.html
impl<R: Registers, S: Sleep> I2cHal for Bus<'_, R, S> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transfer_merged(&mut Transaction {
            address,
            operations,
        })
    }
}
