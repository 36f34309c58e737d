// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! fbdev ABI: screen-info structs and ioctl opcodes from `linux/fb.h`.
//!
//! Declared locally because no binding crate in the dependency tree carries
//! them. Layouts must match the kernel exactly; both structs are plain data
//! filled in by the kernel on the `FBIOGET_*` ioctls.

use core::ffi::c_ulong;
use rustix::ioctl::Opcode;

pub(crate) const FBIOGET_VSCREENINFO: Opcode = 0x4600;
pub(crate) const FBIOPUT_VSCREENINFO: Opcode = 0x4601;
pub(crate) const FBIOGET_FSCREENINFO: Opcode = 0x4602;
pub(crate) const FBIOBLANK: Opcode = 0x4611;

/// `FB_BLANK_UNBLANK`: screen and sync on.
pub(crate) const FB_BLANK_UNBLANK: u32 = 0;

/// `FB_ROTATE_*` values for `fb_var_screeninfo.rotate`, clockwise.
pub(crate) const FB_ROTATE_UR: u32 = 0;
pub(crate) const FB_ROTATE_CW: u32 = 1;
pub(crate) const FB_ROTATE_UD: u32 = 2;
pub(crate) const FB_ROTATE_CCW: u32 = 3;

/// `struct fb_bitfield`: one color channel's position within a pixel.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FbBitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

/// `struct fb_fix_screeninfo`: device properties fixed at mode set.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FbFixScreeninfo {
    pub id: [u8; 16],
    pub smem_start: c_ulong,
    pub smem_len: u32,
    pub fb_type: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

/// `struct fb_var_screeninfo`: the variable, settable screen geometry.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FbVarScreeninfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

#[cfg(test)]
mod tests {
    use super::{FbFixScreeninfo, FbVarScreeninfo};

    #[test]
    fn struct_sizes_match_the_kernel_abi() {
        let expected_fix = if size_of::<core::ffi::c_ulong>() == 8 {
            80
        } else {
            68
        };
        assert_eq!(
            size_of::<FbFixScreeninfo>(),
            expected_fix,
            "fb_fix_screeninfo size"
        );
        // fb_var_screeninfo is 40 u32-sized fields: 160 bytes on every arch.
        assert_eq!(size_of::<FbVarScreeninfo>(), 160, "fb_var_screeninfo size");
    }
}
