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

use log::{debug, error, trace};

use crate::delay::Sleep;
use crate::i2c::engine::BusEngine;
use crate::i2c::regs::{I2C_START_BIT, I2C_STOP_BIT, I2C_TX_BYTE};
use crate::i2c::{Message, Result};
use crate::registers::Registers;

// Margin added to the read settle time, in microseconds (µs).
const READ_SETTLE_MARGIN_US: (u32, u32) = (100, 120);

/// Puts a single message on the bus.
///
/// The message is framed by a (repeated) START condition combined with the
/// slave address and R/W bit. If `emit_stop` is `true`, the STOP bit is set
/// on the final word queued for this message, and the call waits until the
/// controller has finished the transfer. Otherwise it returns as soon as all
/// words are queued, so the next message continues the transaction.
///
/// Reads zero-fill `buffer` before anything else, so a failed read never
/// hands back stale data. The controller switches to receive mode after the
/// address phase, and clocks in one byte for every filler byte queued after
/// it. Reads longer than [`MAX_READ_LEN`] are rejected with
/// `Err(`[`Error::ReadTooLong`]`)` before any register is accessed.
///
/// Errors from the engine primitives are returned unchanged. `send_message`
/// doesn't reset or recover the controller itself.
///
/// [`MAX_READ_LEN`]: constant.MAX_READ_LEN.html
/// [`Error::ReadTooLong`]: enum.Error.html#variant.ReadTooLong
pub fn send_message<R: Registers, S: Sleep>(
    engine: &BusEngine<R, S>,
    message: &mut Message<'_>,
    emit_stop: bool,
) -> Result<()> {
    send_segment(engine, message, true, emit_stop)
}

// Without `start`, the message continues the previous one in the same
// direction. No START or address is queued, only its data or filler words,
// so it must have a payload.
pub(crate) fn send_segment<R: Registers, S: Sleep>(
    engine: &BusEngine<R, S>,
    message: &mut Message<'_>,
    start: bool,
    emit_stop: bool,
) -> Result<()> {
    if let Message::Read { buffer, .. } = &mut *message {
        for byte in buffer.iter_mut() {
            *byte = 0;
        }
    }

    message.validate()?;

    let address = u32::from(message.address());
    let read = message.is_read();
    let len = message.len();
    let byte_time = engine.byte_time_us();

    debug!(
        "I2C {} {} transfer, addr=0x{:02x} length={}",
        engine.bus(),
        message.direction(),
        address,
        len
    );

    if read {
        // The first data byte isn't reliably available until whatever is
        // still queued has been clocked out, plus some margin.
        let pending = (engine.tx_level() + 1) * byte_time;
        engine.sleep_us(
            pending + READ_SETTLE_MARGIN_US.0,
            pending + READ_SETTLE_MARGIN_US.1,
        );
    }

    let first = if start { 0 } else { 1 };
    for i in first..=len {
        let mut data = match (i, &*message) {
            (0, _) => I2C_START_BIT | (address << 1) | u32::from(read),
            (_, Message::Write { buffer, .. }) => u32::from(buffer[i - 1]) & I2C_TX_BYTE,
            // Filler, clocked out while the slave drives SDA
            (_, Message::Read { .. }) => 0,
        };

        if i > 0 && !read && engine.verbose() {
            trace!("    <W {:04x}> 0x{:02x}", i, data);
        }

        if emit_stop && i == len {
            data |= I2C_STOP_BIT;
        }

        if let Err(e) = engine.send_byte(data) {
            error!("I2C data {} send failed", i);
            return Err(e);
        }
    }

    let buffer = match &mut *message {
        Message::Read { buffer, .. } if !buffer.is_empty() => buffer,
        _ => {
            if emit_stop {
                return engine.wait_transfer_done();
            }

            return Ok(());
        }
    };

    for (i, byte) in buffer.iter_mut().enumerate() {
        *byte = engine.receive_byte()?;

        if engine.verbose() {
            trace!("    <R {:04x}> 0x{:02x}", i, *byte);
        }
    }

    engine.clear_interrupts();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::collections::VecDeque;

    use crate::i2c::regs::*;
    use crate::i2c::Error;

    // Controller that's always idle, reports every transfer as done, and
    // returns queued receive data.
    #[derive(Default)]
    struct Idle {
        rx: RefCell<VecDeque<u32>>,
        int_status: u32,
        accesses: RefCell<usize>,
        tx: RefCell<Vec<u32>>,
        int_reads: RefCell<usize>,
    }

    impl Registers for Idle {
        fn read(&self, offset: u32) -> u32 {
            *self.accesses.borrow_mut() += 1;
            match offset & 0xfff {
                I2C_STATUS if self.rx.borrow().is_empty() => I2C_RECEIVE_CLEAR,
                RX_FIFO => self.rx.borrow_mut().pop_front().unwrap_or(0),
                INT_STATUS => {
                    *self.int_reads.borrow_mut() += 1;
                    self.int_status
                }
                _ => 0,
            }
        }

        fn write(&self, offset: u32, value: u32) {
            *self.accesses.borrow_mut() += 1;
            if offset & 0xfff == TX_FIFO {
                self.tx.borrow_mut().push(value);
            }
        }
    }

    struct NoSleep;

    impl Sleep for NoSleep {
        fn sleep_range_us(&self, _min_us: u32, _max_us: u32) {}
    }

    #[test]
    fn write_is_framed_with_start_and_stop() {
        let regs = Idle {
            int_status: I2C_INTERRUPT_MTD,
            ..Idle::default()
        };
        let engine = BusEngine::new(0, &regs, NoSleep).unwrap();

        send_message(&engine, &mut Message::write(0x61, &[0x0a, 0xff]), true).unwrap();

        assert_eq!(
            *regs.tx.borrow(),
            vec![I2C_START_BIT | 0xc2, 0x0a, 0xff | I2C_STOP_BIT]
        );
    }

    #[test]
    fn write_without_stop_doesnt_wait() {
        let regs = Idle::default();
        let engine = BusEngine::new(0, &regs, NoSleep).unwrap();

        send_message(&engine, &mut Message::write(0x61, &[0x0a]), false).unwrap();

        assert_eq!(*regs.tx.borrow(), vec![I2C_START_BIT | 0xc2, 0x0a]);
        assert_eq!(*regs.int_reads.borrow(), 0);
    }

    #[test]
    fn continued_write_skips_start_and_address() {
        let regs = Idle {
            int_status: I2C_INTERRUPT_MTD,
            ..Idle::default()
        };
        let engine = BusEngine::new(0, &regs, NoSleep).unwrap();

        send_segment(&engine, &mut Message::write(0x61, &[0x0b, 0x0c]), false, true).unwrap();

        assert_eq!(*regs.tx.borrow(), vec![0x0b, 0x0c | I2C_STOP_BIT]);
    }

    #[test]
    fn empty_read_is_an_address_probe() {
        let regs = Idle {
            int_status: I2C_ACK_INTER_MTNA,
            ..Idle::default()
        };
        let engine = BusEngine::new(0, &regs, NoSleep).unwrap();

        let result = send_message(&engine, &mut Message::read(0x1c, &mut []), true);

        assert!(matches!(result, Err(Error::DeviceNotResponding)));
        assert_eq!(*regs.tx.borrow(), vec![I2C_START_BIT | I2C_STOP_BIT | 0x39]);
    }

    #[test]
    fn read_queues_filler_and_drains_fifo() {
        let regs = Idle::default();
        regs.rx.borrow_mut().extend([0x12, 0x34]);
        let engine = BusEngine::new(1, &regs, NoSleep).unwrap();

        let mut buffer = [0u8; 2];
        send_message(&engine, &mut Message::read(0x60, &mut buffer), true).unwrap();

        assert_eq!(buffer, [0x12, 0x34]);
        assert_eq!(
            *regs.tx.borrow(),
            vec![I2C_START_BIT | 0xc1, 0, I2C_STOP_BIT]
        );
    }

    #[test]
    fn failed_read_returns_zeroes() {
        let regs = Idle::default();
        let engine = BusEngine::new(0, &regs, NoSleep).unwrap();

        let mut buffer = [0xaa; 4];
        let result = send_message(&engine, &mut Message::read(0x60, &mut buffer), true);

        assert!(matches!(result, Err(Error::Timeout)));
        assert_eq!(buffer, [0; 4]);
    }

    #[test]
    fn oversized_read_touches_no_registers() {
        let regs = Idle::default();
        let engine = BusEngine::new(0, &regs, NoSleep).unwrap();

        let mut buffer = [0u8; 9];
        let result = send_message(&engine, &mut Message::read(0x60, &mut buffer), true);

        assert!(matches!(result, Err(Error::ReadTooLong(9))));
        assert_eq!(*regs.accesses.borrow(), 0);
    }
}
