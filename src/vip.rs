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

//! Video input port (VIP) interrupt control.
//!
//! The bridge's two video input ports raise interrupts of their own, which
//! stay asserted until they're masked. Nothing in this crate handles video
//! capture, so both ports are silenced when the bridge is attached.

use crate::registers::{Registers, INT_CLR_STATUS, INT_ENABLE, VI0, VI1};

// Every interrupt source of a video input port
const VI_INT_ALL: u32 = 0x3ff;

/// Disables and clears all video input port interrupts.
pub fn disable_interrupts<R: Registers>(regs: &R) {
    regs.write(VI0 + INT_ENABLE, 0);
    regs.write(VI1 + INT_ENABLE, 0);
    regs.write(VI0 + INT_CLR_STATUS, VI_INT_ALL);
    regs.write(VI1 + INT_CLR_STATUS, VI_INT_ALL);
}
