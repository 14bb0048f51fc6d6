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

//! PCI function lookup.
//!
//! Use [`PciFunction`] to check whether a PCI function is a SAA716x bridge,
//! and to locate the resource file its registers can be mapped from.
//! Enumerating the PCI bus and binding drivers is left to the operating
//! system.
//!
//! [`PciFunction`]: struct.PciFunction.html

use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::result;

const PATH_PCI_DEVICES: &str = "/sys/bus/pci/devices";

/// PCI vendor ID of Philips/NXP Semiconductors.
pub const VENDOR_NXP: u16 = 0x1131;

/// Errors that can occur when identifying a PCI function.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(io::Error),
    /// The PCI function isn't a supported SAA716x bridge.
    ///
    /// Contains the function's vendor and device ID.
    UnknownDevice(u16, u16),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref err) => write!(f, "I/O error: {}", err),
            Error::UnknownDevice(vendor, device) => {
                write!(f, "Unknown PCI device: {:04x}:{:04x}", vendor, device)
            }
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// Result type returned from methods that can have `pci::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// Supported members of the SAA716x family.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Chip {
    Saa7160,
    Saa7161,
    Saa7162,
}

impl Chip {
    fn from_device_id(device: u16) -> Option<Chip> {
        match device {
            0x7160 => Some(Chip::Saa7160),
            0x7161 => Some(Chip::Saa7161),
            0x7162 => Some(Chip::Saa7162),
            _ => None,
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Chip::Saa7160 => write!(f, "SAA7160"),
            Chip::Saa7161 => write!(f, "SAA7161"),
            Chip::Saa7162 => write!(f, "SAA7162"),
        }
    }
}

/// A SAA716x bridge, identified through sysfs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PciFunction {
    path: PathBuf,
    chip: Chip,
}

impl PciFunction {
    /// Identifies the PCI function at `address`, like `0000:03:00.0`.
    pub fn new(address: &str) -> Result<PciFunction> {
        PciFunction::from_path(Path::new(PATH_PCI_DEVICES).join(address))
    }

    /// Identifies the PCI function whose sysfs directory is `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PciFunction> {
        let path = path.as_ref().to_path_buf();

        let vendor = read_id(&path.join("vendor"))?;
        let device = read_id(&path.join("device"))?;

        match Chip::from_device_id(device) {
            Some(chip) if vendor == VENDOR_NXP => Ok(PciFunction { path, chip }),
            _ => Err(Error::UnknownDevice(vendor, device)),
        }
    }

    /// Returns the bridge model.
    pub fn chip(&self) -> Chip {
        self.chip
    }

    /// Returns the path of the resource file for BAR0, which holds the
    /// register block.
    pub fn bar0(&self) -> PathBuf {
        self.path.join("resource0")
    }
}

// sysfs IDs are formatted as 0x-prefixed hexadecimal numbers
fn read_id(path: &Path) -> Result<u16> {
    let contents = fs::read_to_string(path)?;
    let trimmed = contents.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    u16::from_str_radix(digits, 16).map_err(|_| {
        Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid PCI ID in {}: {}", path.display(), trimmed),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::env;
    use std::process;

    fn fake_function(name: &str, vendor: &str, device: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("saa716x-{}-{}", name, process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("vendor"), vendor).unwrap();
        fs::write(dir.join("device"), device).unwrap();
        dir
    }

    #[test]
    fn identifies_saa7162() {
        let dir = fake_function("saa7162", "0x1131\n", "0x7162\n");
        let function = PciFunction::from_path(&dir).unwrap();

        assert_eq!(function.chip(), Chip::Saa7162);
        assert_eq!(function.bar0(), dir.join("resource0"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn rejects_other_devices() {
        let dir = fake_function("other", "0x8086\n", "0x7162\n");

        match PciFunction::from_path(&dir) {
            Err(Error::UnknownDevice(0x8086, 0x7162)) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        fs::remove_dir_all(dir).unwrap();
    }
}
