// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The framebuffer device handle.

use core::ffi::c_void;
use core::ptr::{self, NonNull};
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use rustix::fd::OwnedFd;
use rustix::fs::{Mode, OFlags};
use rustix::io::Errno;
use rustix::ioctl::{self, Opcode};
use rustix::mm::{MapFlags, ProtFlags};
use scanout_core::backend::GraphicsBackend;
use scanout_core::format::PixelFormat;
use scanout_core::rotate::Rotation;
use scanout_core::surface::Surface;

use crate::screeninfo::{
    FB_BLANK_UNBLANK, FB_ROTATE_CCW, FB_ROTATE_CW, FB_ROTATE_UD, FB_ROTATE_UR,
    FBIOBLANK, FBIOGET_FSCREENINFO, FBIOGET_VSCREENINFO, FBIOPUT_VSCREENINFO, FbFixScreeninfo,
    FbVarScreeninfo,
};

/// Environment variable overriding the device path.
pub const DEVICE_PATH_ENV: &str = "SCANOUT_FBDEV";

/// Device path used when neither an argument nor the environment names one.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/fb0";

/// A recorded device-initialization failure.
///
/// The cause names the failed step (`"open"`, `"ioctl <name>"`, `"unblank"`,
/// `"mmap"`, or a backend name); the message carries the errno text or a
/// guard explanation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceError {
    cause: String,
    message: String,
}

impl DeviceError {
    fn errno(cause: impl Into<String>, errno: Errno) -> Self {
        Self {
            cause: cause.into(),
            message: errno.to_string(),
        }
    }

    /// Creates an error from a cause (the failed step) and a detail message.
    #[must_use]
    pub fn new(cause: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            message: message.into(),
        }
    }

    /// Returns the failed step.
    #[must_use]
    pub fn cause(&self) -> &str {
        &self.cause
    }

    /// Returns the failure detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.cause, self.message)
    }
}

impl core::error::Error for DeviceError {}

/// One live `mmap` region.
#[derive(Clone, Copy)]
struct Mapping {
    base: NonNull<u8>,
    len: usize,
}

/// Owner of one memory-mapped fbdev output device.
///
/// Created once at startup with [`FbDevice::open`], which runs the whole
/// open → query → unblank → map sequence; destroyed once at shutdown,
/// releasing resources in reverse acquisition order. The handle is never
/// cloned or reassigned.
///
/// # Invariant
///
/// Either [`FbDevice::errored`] is false and the mapping is valid for
/// `stride() × height()` bytes for the handle's whole lifetime, or the
/// handle is errored and every operation on it is refused.
pub struct FbDevice {
    path: PathBuf,
    fd: Option<OwnedFd>,
    mapping: Option<Mapping>,
    fixed: FbFixScreeninfo,
    var: FbVarScreeninfo,
    error: Option<DeviceError>,
}

impl FbDevice {
    /// Opens and fully initializes the device.
    ///
    /// The path is `path` if given, else the [`DEVICE_PATH_ENV`] override,
    /// else [`DEFAULT_DEVICE_PATH`]. Never fails loudly: on any step
    /// failure the handle comes back with [`FbDevice::errored`] set and
    /// must not be used for rendering.
    #[must_use]
    pub fn open(path: Option<&Path>) -> Self {
        let path = resolve_path(path, std::env::var_os(DEVICE_PATH_ENV));
        let mut device = Self {
            path,
            fd: None,
            mapping: None,
            fixed: FbFixScreeninfo::default(),
            var: FbVarScreeninfo::default(),
            error: None,
        };
        if let Err(error) = device.init() {
            log::warn!("framebuffer init failed: {error}");
            device.error = Some(error);
        }
        device
    }

    fn init(&mut self) -> Result<(), DeviceError> {
        self.open_device()?;
        self.query_geometry()?;
        self.unblank()?;
        self.map_memory()
    }

    fn open_device(&mut self) -> Result<(), DeviceError> {
        let fd = loop {
            match rustix::fs::open(self.path.as_path(), OFlags::RDWR, Mode::empty()) {
                Ok(fd) => break fd,
                Err(errno) if errno == Errno::INTR => continue,
                Err(errno) => return Err(DeviceError::errno("open", errno)),
            }
        };
        self.fd = Some(fd);
        log::debug!("framebuffer device {} opened", self.path.display());
        Ok(())
    }

    /// Reads fixed and variable screen information.
    ///
    /// Always returns an explicit success or failure; a partial read leaves
    /// an error, never silent garbage.
    fn query_geometry(&mut self) -> Result<(), DeviceError> {
        let fd = self.fd.as_ref().ok_or_else(not_open)?;
        self.fixed = get_info::<FBIOGET_FSCREENINFO, _>(fd, "FBIOGET_FSCREENINFO")?;
        self.var = get_info::<FBIOGET_VSCREENINFO, _>(fd, "FBIOGET_VSCREENINFO")?;
        log::debug!(
            "screen {}x{}, {}bpp, stride {} bytes",
            self.var.xres,
            self.var.yres,
            self.var.bits_per_pixel,
            self.fixed.line_length
        );
        Ok(())
    }

    /// Powers the display on. A failure here short-circuits the remaining
    /// initialization exactly like any other step failure.
    fn unblank(&mut self) -> Result<(), DeviceError> {
        let fd = self.fd.as_ref().ok_or_else(not_open)?;
        loop {
            // SAFETY: FBIOBLANK carries its argument by value; see `Blank`.
            match unsafe { ioctl::ioctl(fd, Blank(FB_BLANK_UNBLANK)) } {
                Ok(()) => return Ok(()),
                Err(errno) if errno == Errno::INTR => continue,
                Err(errno) => return Err(DeviceError::errno("unblank", errno)),
            }
        }
    }

    /// Maps the framebuffer into the process address space.
    ///
    /// The required size is `stride × height`. Refusing to map when that
    /// exceeds the device-reported memory keeps every later pixel write in
    /// bounds.
    fn map_memory(&mut self) -> Result<(), DeviceError> {
        let fd = self.fd.as_ref().ok_or_else(not_open)?;
        let needed = u64::from(self.fixed.line_length) * u64::from(self.var.yres);
        if needed > u64::from(self.fixed.smem_len) {
            return Err(DeviceError::new(
                "mmap",
                "size to mmap bigger than framebuffer size",
            ));
        }
        let len = usize::try_from(needed)
            .map_err(|_| DeviceError::new("mmap", "framebuffer size overflows usize"))?;

        // SAFETY: a fresh shared read/write mapping of the device fd; `len`
        // is bounded by the device-reported memory size above.
        let base = unsafe {
            rustix::mm::mmap(
                ptr::null_mut(),
                len,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                fd,
                0,
            )
        }
        .map_err(|errno| DeviceError::errno("mmap", errno))?;

        let base = NonNull::new(base.cast::<u8>())
            .ok_or_else(|| DeviceError::new("mmap", "kernel returned a null mapping"))?;
        self.mapping = Some(Mapping { base, len });
        log::debug!("framebuffer mapped, {len} bytes");
        Ok(())
    }

    /// Wraps the mapped framebuffer as the backend's device surface, using
    /// the fixed RGB565 device format and the queried geometry.
    ///
    /// Returns [`None`] and records an error (cause = backend name) if the
    /// handle is errored or the backend refuses the wrap.
    ///
    /// # Safety
    ///
    /// The returned surface borrows the device mapping: it must be dropped
    /// before this handle is closed or dropped.
    pub unsafe fn create_surface<B: GraphicsBackend>(&mut self, backend: &B) -> Option<B::Surface> {
        if self.errored() {
            return None;
        }
        let mapping = self.mapping?;
        if self.var.bits_per_pixel != 16 {
            log::warn!(
                "device reports {}bpp; treating as RGB565",
                self.var.bits_per_pixel
            );
        }
        // SAFETY: the mapping covers stride × height bytes (the mmap guard)
        // and stays valid until close(); the caller keeps the surface from
        // outliving it.
        let surface = unsafe {
            backend.wrap_external(
                PixelFormat::Rgb565,
                mapping.base.as_ptr(),
                i32::try_from(self.var.xres).unwrap_or(0),
                i32::try_from(self.var.yres).unwrap_or(0),
                i32::try_from(self.fixed.line_length).unwrap_or(0),
            )
        };
        if surface.is_valid() {
            Some(surface)
        } else {
            self.error = Some(DeviceError::new(backend.name(), surface.status()));
            None
        }
    }

    /// Writes a new orientation into the variable screen info and
    /// re-applies it. Returns whether the device accepted it; never
    /// records an error state.
    pub fn set_rotation(&mut self, rotation: Rotation) -> bool {
        if self.errored() {
            return false;
        }
        let Some(fd) = self.fd.as_ref() else {
            return false;
        };
        let mut var = self.var;
        var.rotate = match rotation {
            Rotation::Deg0 => FB_ROTATE_UR,
            Rotation::Deg90 => FB_ROTATE_CW,
            Rotation::Deg180 => FB_ROTATE_UD,
            Rotation::Deg270 => FB_ROTATE_CCW,
        };
        loop {
            // SAFETY: FBIOPUT_VSCREENINFO reads (and may update) one
            // fb_var_screeninfo at the passed pointer.
            match unsafe {
                ioctl::ioctl(
                    fd,
                    ioctl::Updater::<FBIOPUT_VSCREENINFO, FbVarScreeninfo>::new(&mut var),
                )
            } {
                Ok(()) => {
                    self.var = var;
                    return true;
                }
                Err(errno) if errno == Errno::INTR => continue,
                Err(errno) => {
                    log::warn!("ioctl FBIOPUT_VSCREENINFO failed: {errno}");
                    return false;
                }
            }
        }
    }

    /// Returns the visible width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.var.xres
    }

    /// Returns the visible height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.var.yres
    }

    /// Returns the depth in bits per pixel.
    #[must_use]
    pub fn bits_per_pixel(&self) -> u32 {
        self.var.bits_per_pixel
    }

    /// Returns the row stride in bytes.
    #[must_use]
    pub fn stride(&self) -> u32 {
        self.fixed.line_length
    }

    /// Returns the mapped size in bytes (`stride × height`); 0 when
    /// unmapped.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.mapping.map_or(0, |mapping| mapping.len)
    }

    /// Returns the device's current orientation.
    #[must_use]
    pub fn rotation(&self) -> Rotation {
        match self.var.rotate {
            FB_ROTATE_CW => Rotation::Deg90,
            FB_ROTATE_UD => Rotation::Deg180,
            FB_ROTATE_CCW => Rotation::Deg270,
            _ => Rotation::Deg0,
        }
    }

    /// Returns the resolved device path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the base of the mapped region, null when unmapped.
    #[must_use]
    pub fn mapped_ptr(&self) -> *const u8 {
        self.mapping
            .map_or(ptr::null(), |mapping| mapping.base.as_ptr().cast_const())
    }

    /// Mutable counterpart of [`FbDevice::mapped_ptr`].
    #[must_use]
    pub fn mapped_ptr_mut(&mut self) -> *mut u8 {
        self.mapping
            .map_or(ptr::null_mut(), |mapping| mapping.base.as_ptr())
    }

    /// Returns whether any initialization step failed.
    #[must_use]
    pub fn errored(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the recorded failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&DeviceError> {
        self.error.as_ref()
    }

    /// Releases resources in reverse acquisition order: unmap, then close.
    ///
    /// Idempotent, and safe on a handle that failed mid-initialization;
    /// [`Drop`] calls it too.
    pub fn close(&mut self) {
        if let Some(mapping) = self.mapping.take() {
            // SAFETY: `mapping` came from mmap with exactly this base and
            // length, and `take()` means it is unmapped at most once.
            if let Err(errno) = unsafe { rustix::mm::munmap(mapping.base.as_ptr().cast(), mapping.len) }
            {
                log::warn!("munmap failed: {errno}");
            }
        }
        drop(self.fd.take());
    }
}

impl Drop for FbDevice {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for FbDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FbDevice")
            .field("path", &self.path)
            .field("geometry", &(self.var.xres, self.var.yres, self.var.bits_per_pixel))
            .field("stride", &self.fixed.line_length)
            .field("mapped", &self.mapping.is_some())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

fn not_open() -> DeviceError {
    DeviceError::new("ioctl", "device not open")
}

fn resolve_path(explicit: Option<&Path>, env_override: Option<OsString>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(path) = env_override
        && !path.is_empty()
    {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_DEVICE_PATH)
}

fn get_info<const OPCODE: Opcode, T>(fd: &OwnedFd, name: &str) -> Result<T, DeviceError> {
    loop {
        // SAFETY: `OPCODE` is the FBIOGET_* read opcode matching `T`; the
        // kernel fully initializes the struct on success.
        match unsafe { ioctl::ioctl(fd, ioctl::Getter::<OPCODE, T>::new()) } {
            Ok(value) => return Ok(value),
            Err(errno) if errno == Errno::INTR => continue,
            Err(errno) => return Err(DeviceError::errno(format!("ioctl {name}"), errno)),
        }
    }
}

/// `FBIOBLANK`: the blank level travels in the argument word itself, so the
/// stock pointer-based ioctl wrappers do not fit.
struct Blank(u32);

// SAFETY: the opcode is FBIOBLANK and the "pointer" is the by-value blank
// level; the kernel never dereferences it.
unsafe impl ioctl::Ioctl for Blank {
    type Output = ();
    const IS_MUTATING: bool = false;

    fn opcode(&self) -> Opcode {
        FBIOBLANK
    }

    fn as_ptr(&mut self) -> *mut c_void {
        self.0 as usize as *mut c_void
    }

    unsafe fn output_from_ptr(
        _out: ioctl::IoctlOutput,
        _ptr: *mut c_void,
    ) -> rustix::io::Result<Self::Output> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_DEVICE_PATH, DeviceError, FbDevice, resolve_path};
    use scanout_core::rotate::Rotation;
    use std::ffi::OsString;
    use std::path::Path;

    #[test]
    fn path_resolution_prefers_argument_then_env_then_default() {
        let explicit = Path::new("/dev/fb7");
        let env = Some(OsString::from("/dev/fb1"));

        assert_eq!(resolve_path(Some(explicit), env.clone()), explicit);
        assert_eq!(resolve_path(None, env), Path::new("/dev/fb1"));
        assert_eq!(resolve_path(None, None), Path::new(DEFAULT_DEVICE_PATH));
        // An empty override falls through to the default.
        assert_eq!(
            resolve_path(None, Some(OsString::new())),
            Path::new(DEFAULT_DEVICE_PATH)
        );
    }

    #[test]
    fn open_failure_leaves_an_errored_empty_handle() {
        let mut device = FbDevice::open(Some(Path::new("/nonexistent/fb999")));
        assert!(device.errored());
        let error = device.error().expect("error recorded");
        assert_eq!(error.cause(), "open");
        assert!(!error.message().is_empty(), "errno text attached");

        // The handle is otherwise empty and refuses use.
        assert_eq!(device.width(), 0);
        assert_eq!(device.height(), 0);
        assert_eq!(device.size_bytes(), 0);
        assert!(device.mapped_ptr().is_null());
        assert!(device.mapped_ptr_mut().is_null());
        assert!(!device.set_rotation(Rotation::Deg90));
    }

    #[test]
    fn teardown_is_idempotent_on_a_partially_initialized_handle() {
        let mut device = FbDevice::open(Some(Path::new("/nonexistent/fb999")));
        device.close();
        device.close();
        // Drop runs close() a third time.
    }

    #[test]
    fn device_error_displays_cause_and_message() {
        let error = DeviceError::new("mmap", "size to mmap bigger than framebuffer size");
        assert_eq!(
            error.to_string(),
            "mmap: size to mmap bigger than framebuffer size"
        );
    }
}
