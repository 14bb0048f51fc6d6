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

// i2c_scan.rs - Lists the devices that acknowledge their address on each of
// the bridge's I2C buses.
//
// Usage: i2c_scan <pci-address>, for example i2c_scan 0000:03:00.0
//
// Run with RUST_LOG=debug to see the individual transfers.

use std::env;
use std::error::Error;

use saa716x::i2c::{Message, NoRegistry, ADAPTERS};
use saa716x::{Config, Saa716x};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let address = env::args()
        .nth(1)
        .ok_or("usage: i2c_scan <pci-address>")?;

    let device = Saa716x::open(&address, Config::new(), &mut NoRegistry)?;

    for bus in 0..ADAPTERS {
        print!("Bus {}:", bus);

        // Skip the reserved address ranges
        for slave in 0x08..0x78u8 {
            match device.i2c().transfer(bus, &mut [Message::read(slave, &mut [])]) {
                Ok(_) => print!(" 0x{:02x}", slave),
                Err(e) if e.is_nack() => {}
                Err(e) => return Err(e.into()),
            }
        }

        println!();
    }

    device.remove(&mut NoRegistry);

    Ok(())
}
