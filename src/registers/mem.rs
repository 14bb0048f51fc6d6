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

use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::ptr;

use libc::{self, c_void, size_t, MAP_FAILED, MAP_SHARED, O_SYNC, PROT_READ, PROT_WRITE};

use crate::registers::Registers;

/// Memory-mapped access to a PCI BAR.
///
/// `PciMem` maps a sysfs resource file, like
/// `/sys/bus/pci/devices/0000:03:00.0/resource0`, and performs volatile
/// 32-bit accesses on it. Opening the resource file typically requires root
/// privileges.
///
/// Reads beyond the end of the mapping return `0xffff_ffff`, and writes
/// beyond the end are dropped, which mirrors how the PCI bus reports
/// accesses that aren't claimed by any device.
pub struct PciMem {
    mem_ptr: *mut u32,
    size: usize,
}

impl fmt::Debug for PciMem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PciMem")
            .field("mem_ptr", &self.mem_ptr)
            .field("size", &self.size)
            .finish()
    }
}

impl PciMem {
    /// Maps the PCI resource file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<PciMem> {
        let resource = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(O_SYNC)
            .open(path.as_ref())?;

        let size = resource.metadata()?.len() as usize;
        if size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "PCI resource has zero length",
            ));
        }

        // Memory-map the whole BAR at offset 0
        let mem_ptr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                size,
                PROT_READ | PROT_WRITE,
                MAP_SHARED,
                resource.as_raw_fd(),
                0,
            )
        };

        if mem_ptr == MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        log::debug!("Mapped {} ({} bytes)", path.as_ref().display(), size);

        Ok(PciMem {
            mem_ptr: mem_ptr as *mut u32,
            size,
        })
    }

    /// Returns the size of the mapping in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn index(&self, offset: u32) -> Option<usize> {
        let offset = offset as usize;
        if offset % 4 == 0 && offset + 4 <= self.size {
            Some(offset / 4)
        } else {
            None
        }
    }
}

impl Registers for PciMem {
    #[inline(always)]
    fn read(&self, offset: u32) -> u32 {
        match self.index(offset) {
            Some(index) => unsafe { ptr::read_volatile(self.mem_ptr.add(index)) },
            None => u32::MAX,
        }
    }

    #[inline(always)]
    fn write(&self, offset: u32, value: u32) {
        if let Some(index) = self.index(offset) {
            unsafe {
                ptr::write_volatile(self.mem_ptr.add(index), value);
            }
        }
    }
}

impl Drop for PciMem {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.mem_ptr as *mut c_void, self.size as size_t);
        }
    }
}

// Required because of the raw pointer to our memory-mapped file
unsafe impl Send for PciMem {}
unsafe impl Sync for PciMem {}
