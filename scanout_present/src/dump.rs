// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame PNG dumps.
//!
//! When a dump directory is configured, every delivered frame is also
//! serialized to `<dir>/dump_<seq>.png`, sequence starting at 0 and
//! incrementing once per frame for the process lifetime. Dumping is a pure
//! diagnostic: it never alters pixel data, and failures are logged and
//! otherwise ignored so the frame still completes.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use crate::client::ClientBuffer;

pub(crate) struct DumpSink {
    dir: PathBuf,
    sequence: u32,
}

impl DumpSink {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir, sequence: 0 }
    }

    /// Writes `buffer` as the next numbered dump file.
    ///
    /// The sequence number advances even when the write fails, so file
    /// names always reflect the frame count. Only called from the frame
    /// handler, after the buffer passed surface wrapping.
    pub(crate) fn dump(&mut self, buffer: &ClientBuffer) {
        let path = self.dir.join(format!("dump_{}.png", self.sequence));
        self.sequence += 1;
        match write_png(&path, buffer) {
            Ok(()) => log::debug!("dumped frame to {}", path.display()),
            Err(error) => log::warn!("frame dump to {} failed: {error}", path.display()),
        }
    }
}

/// Serializes one ARGB32 buffer as RGBA8 PNG.
fn write_png(path: &Path, buffer: &ClientBuffer) -> io::Result<()> {
    if buffer.data.is_null() || buffer.width <= 0 || buffer.height <= 0 {
        return Err(io::Error::other("no pixel data"));
    }
    let (width, height) = (buffer.width as usize, buffer.height as usize);
    let stride = buffer.stride as usize;

    let mut rgba = vec![0u8; width * height * 4];
    for y in 0..height {
        // SAFETY: the transport keeps `data` valid for `stride × height`
        // bytes for the duration of the frame handler, and the wrap checks
        // accepted this geometry.
        let row = unsafe { std::slice::from_raw_parts(buffer.data.add(y * stride), width * 4) };
        let out = &mut rgba[y * width * 4..(y + 1) * width * 4];
        for x in 0..width {
            // Native-endian ARGB words are B,G,R,A in memory.
            out[x * 4] = row[x * 4 + 2];
            out[x * 4 + 1] = row[x * 4 + 1];
            out[x * 4 + 2] = row[x * 4];
            out[x * 4 + 3] = row[x * 4 + 3];
        }
    }

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), buffer.width as u32, buffer.height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(io::Error::other)?;
    writer.write_image_data(&rgba).map_err(io::Error::other)?;
    writer.finish().map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::DumpSink;
    use crate::client::{BufferHandle, ClientBuffer};

    fn buffer_of(pixels: &mut [u8], width: i32, height: i32) -> ClientBuffer {
        ClientBuffer {
            data: pixels.as_mut_ptr(),
            width,
            height,
            stride: width * 4,
            handle: BufferHandle::default(),
        }
    }

    #[test]
    fn dumps_are_numbered_sequentially() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = DumpSink::new(dir.path().to_path_buf());
        let mut pixels = vec![0x80u8; 2 * 2 * 4];

        for _ in 0..3 {
            sink.dump(&buffer_of(&mut pixels, 2, 2));
        }
        for seq in 0..3 {
            let path = dir.path().join(format!("dump_{seq}.png"));
            assert!(path.is_file(), "{} exists", path.display());
        }
    }

    #[test]
    fn failed_writes_still_advance_the_sequence() {
        // A directory that does not exist makes every write fail.
        let mut sink = DumpSink::new(std::path::PathBuf::from("/nonexistent/dumpdir"));
        let mut pixels = vec![0u8; 4];
        sink.dump(&buffer_of(&mut pixels, 1, 1));
        sink.dump(&buffer_of(&mut pixels, 1, 1));
        assert_eq!(sink.sequence, 2);
    }

    #[test]
    fn dumped_bytes_reorder_argb_to_rgba() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = DumpSink::new(dir.path().to_path_buf());
        // One pixel: A=0x11 R=0x22 G=0x33 B=0x44, stored B,G,R,A.
        let mut pixels = vec![0x44, 0x33, 0x22, 0x11];
        sink.dump(&buffer_of(&mut pixels, 1, 1));

        let decoder = png::Decoder::new(
            std::fs::File::open(dir.path().join("dump_0.png")).expect("dump exists"),
        );
        let mut reader = decoder.read_info().expect("png header");
        let mut out = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut out).expect("png frame");
        assert_eq!((info.width, info.height), (1, 1));
        assert_eq!(&out[..4], &[0x22, 0x33, 0x44, 0x11], "R,G,B,A order");
    }
}
