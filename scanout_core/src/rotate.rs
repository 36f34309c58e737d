// Copyright 2026 the Scanout Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quarter-turn rotations and their placement math.
//!
//! Display panels are frequently mounted rotated relative to the scanout
//! origin, so the pipeline applies a fixed clockwise orientation correction
//! between client-buffer space and device space. Only the four quarter turns
//! exist; this module covers them with a closed enum and an integer
//! coordinate mapping instead of pulling in a general transform crate.
//!
//! The mapping follows the translate-then-rotate rule: rotation happens
//! about the origin, so each turn is paired with the translation that brings
//! the rotated image back onto the target. For a reference image of size
//! `w × h`:
//!
//! - 0°: identity.
//! - 90° cw: translate by `(h, 0)`, then rotate 90°.
//! - 180°: translate by `(w, h)`, then rotate 180°.
//! - 270° cw: translate by `(0, w)`, then rotate 270°.
//!
//! Omitting the translation would place the rotated image entirely off the
//! target surface.

/// A clockwise quarter-turn orientation correction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// 90° clockwise.
    Deg90,
    /// 180°.
    Deg180,
    /// 270° clockwise (90° counter-clockwise).
    Deg270,
}

impl Rotation {
    /// Parses a clockwise angle in degrees, accepting aliases.
    ///
    /// Any multiple of 90 is accepted: angles normalize modulo 360
    /// (`360 ≡ 0`) and negative values mean counter-clockwise
    /// (`-90 ≡ 270`). Returns [`None`] for non-quarter-turn angles.
    #[must_use]
    pub const fn from_degrees(degrees: i32) -> Option<Self> {
        let normalized = degrees.rem_euclid(360);
        match normalized {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Returns the clockwise angle in degrees, in `0..360`.
    #[must_use]
    pub const fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Returns whether this rotation swaps an image's width and height.
    #[must_use]
    pub const fn transposes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// Returns the inverse rotation (the counter-clockwise counterpart).
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg0,
            Self::Deg90 => Self::Deg270,
            Self::Deg180 => Self::Deg180,
            Self::Deg270 => Self::Deg90,
        }
    }
}

/// The discrete translate-then-rotate mapping for one reference image.
///
/// A `Placement` captures the rotation together with the reference image
/// dimensions the paired translation depends on. [`Placement::map`] then
/// sends each source pixel coordinate to its device coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    rotation: Rotation,
    ref_width: u32,
    ref_height: u32,
}

impl Placement {
    /// Creates a placement for a reference image of `ref_width × ref_height`.
    #[must_use]
    pub const fn new(rotation: Rotation, ref_width: u32, ref_height: u32) -> Self {
        Self {
            rotation,
            ref_width,
            ref_height,
        }
    }

    /// The identity placement, which maps every coordinate to itself.
    #[must_use]
    pub const fn identity() -> Self {
        Self::new(Rotation::Deg0, 0, 0)
    }

    /// Returns the rotation this placement applies.
    #[must_use]
    pub const fn rotation(self) -> Rotation {
        self.rotation
    }

    /// Returns the size of the mapped image, post-rotation.
    #[must_use]
    pub const fn output_size(self) -> (u32, u32) {
        if self.rotation.transposes() {
            (self.ref_height, self.ref_width)
        } else {
            (self.ref_width, self.ref_height)
        }
    }

    /// Maps a source pixel coordinate to its device coordinate.
    ///
    /// `x` must be in `0..ref_width` and `y` in `0..ref_height`; the result
    /// is then always inside the [`Self::output_size`] bounding box, so a
    /// reference image whose post-rotation size equals the target exactly
    /// covers it.
    #[must_use]
    pub const fn map(self, x: u32, y: u32) -> (u32, u32) {
        match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (self.ref_height - 1 - y, x),
            Rotation::Deg180 => (self.ref_width - 1 - x, self.ref_height - 1 - y),
            Rotation::Deg270 => (y, self.ref_width - 1 - x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Placement, Rotation};

    #[test]
    fn degree_aliases_normalize() {
        assert_eq!(Rotation::from_degrees(0), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(360), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(720), Some(Rotation::Deg0));
        assert_eq!(Rotation::from_degrees(90), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Deg90));
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Deg270));
        assert_eq!(Rotation::from_degrees(-180), Some(Rotation::Deg180));
        assert_eq!(Rotation::from_degrees(-270), Some(Rotation::Deg90));
    }

    #[test]
    fn non_quarter_turns_are_rejected() {
        assert_eq!(Rotation::from_degrees(45), None);
        assert_eq!(Rotation::from_degrees(-1), None);
        assert_eq!(Rotation::from_degrees(359), None);
    }

    #[test]
    fn inverse_composes_to_identity() {
        for rotation in [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            let total = rotation.degrees() + rotation.inverse().degrees();
            assert_eq!(total % 360, 0, "{rotation:?} + inverse is a full turn");
        }
    }

    #[test]
    fn quarter_turn_corner_mapping() {
        // A 100×50 reference image, as in a landscape client buffer
        // presented on a portrait panel.
        let (w, h) = (100, 50);

        let p = Placement::new(Rotation::Deg90, w, h);
        assert_eq!(p.map(0, 0), (h - 1, 0));
        assert_eq!(p.map(w - 1, 0), (h - 1, w - 1));
        assert_eq!(p.map(0, h - 1), (0, 0));

        let p = Placement::new(Rotation::Deg180, w, h);
        assert_eq!(p.map(0, 0), (w - 1, h - 1));
        assert_eq!(p.map(w - 1, h - 1), (0, 0));

        let p = Placement::new(Rotation::Deg270, w, h);
        assert_eq!(p.map(0, 0), (0, w - 1));
        assert_eq!(p.map(w - 1, 0), (0, 0));
        assert_eq!(p.map(w - 1, h - 1), (h - 1, 0));
    }

    #[test]
    fn mapped_coordinates_cover_the_output_box() {
        // Exhaustive coverage check on a small image: every output cell is
        // hit exactly once, for all four rotations.
        let (w, h) = (5, 3);
        for rotation in [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            let placement = Placement::new(rotation, w, h);
            let (out_w, out_h) = placement.output_size();
            assert_eq!(out_w * out_h, w * h, "{rotation:?} preserves area");

            let mut hits = [[0u32; 5]; 5];
            for y in 0..h {
                for x in 0..w {
                    let (tx, ty) = placement.map(x, y);
                    assert!(tx < out_w && ty < out_h, "{rotation:?} maps in-bounds");
                    hits[ty as usize][tx as usize] += 1;
                }
            }
            for y in 0..out_h {
                for x in 0..out_w {
                    assert_eq!(
                        hits[y as usize][x as usize], 1,
                        "{rotation:?} hits ({x},{y}) exactly once"
                    );
                }
            }
        }
    }

    #[test]
    fn output_size_transposes_for_odd_quarter_turns() {
        let placement = Placement::new(Rotation::Deg90, 320, 240);
        assert_eq!(placement.output_size(), (240, 320));
        let placement = Placement::new(Rotation::Deg180, 320, 240);
        assert_eq!(placement.output_size(), (320, 240));
    }
}
