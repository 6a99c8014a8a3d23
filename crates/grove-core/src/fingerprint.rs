//! Perceptual image fingerprints for approximate-duplicate detection.
//!
//! A fingerprint is the classic 8×8 average hash: the photo is shrunk to an
//! 8×8 grayscale thumbnail and each cell contributes one bit — set when the
//! cell is brighter than the thumbnail mean. Two photos of the same plant
//! land within a few bits of each other even across small framing and
//! lighting changes, so duplicate detection compares fingerprints by Hamming
//! distance rather than equality.

use std::fmt;

use image::imageops::FilterType;

use crate::error::{GroveError, Result};

/// Hash grid edge length. 8×8 cells give a 64-bit fingerprint.
const HASH_SIZE: u32 = 8;

/// Default Hamming-distance threshold at or under which two fingerprints are
/// considered the same plant.
pub const DEFAULT_SIMILARITY_THRESHOLD: u32 = 5;

/// A 64-bit average-hash fingerprint of an image.
///
/// Bits are laid out row-major from the top-left cell, most significant bit
/// first. Stored in the database as a 16-character lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Computes the fingerprint of an encoded image (PNG, JPEG, ...).
    ///
    /// Decode failures are hard errors: an unreadable photo must fail the
    /// operation that submitted it rather than slip past duplicate checks.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| GroveError::Fingerprint(format!("cannot decode image: {e}")))?;

        let thumb = decoded
            .resize_exact(HASH_SIZE, HASH_SIZE, FilterType::Triangle)
            .to_luma8();

        let sum: u32 = thumb.pixels().map(|p| u32::from(p.0[0])).sum();

        let mut bits: u64 = 0;
        for pixel in thumb.pixels() {
            bits <<= 1;
            // Scaled strict comparison against the mean avoids integer
            // rounding: v > sum/64  <=>  v*64 > sum.
            if u32::from(pixel.0[0]) * (HASH_SIZE * HASH_SIZE) > sum {
                bits |= 1;
            }
        }
        Ok(Self(bits))
    }

    /// Number of differing bits between two fingerprints.
    pub fn hamming_distance(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// True when the two fingerprints differ by at most `threshold` bits.
    pub fn is_similar(self, other: Self, threshold: u32) -> bool {
        self.hamming_distance(other) <= threshold
    }

    /// Parses the hex form produced by the `Display` implementation.
    pub fn from_hex(s: &str) -> Result<Self> {
        u64::from_str_radix(s, 16).map(Self).map_err(|_| {
            GroveError::invalid_input("fingerprint", format!("not a 64-bit hex string: '{s}'"))
        })
    }

    /// Raw bit pattern, mainly for tests.
    pub fn bits(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<u64> for Fingerprint {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl serde::Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Fingerprint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex = <String as serde::Deserialize>::deserialize(deserializer)?;
        Fingerprint::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut buf),
            image::ImageFormat::Png,
        )
        .expect("png encode");
        buf
    }

    #[test]
    fn identical_images_have_identical_fingerprints() {
        let img = RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let a = Fingerprint::from_image_bytes(&png_bytes(&img)).unwrap();
        let b = Fingerprint::from_image_bytes(&png_bytes(&img)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hamming_distance(b), 0);
    }

    #[test]
    fn two_flipped_cells_cost_two_bits() {
        let base = RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let mut tweaked = base.clone();
        tweaked.put_pixel(0, 0, Rgb([255, 255, 255]));
        tweaked.put_pixel(1, 0, Rgb([255, 255, 255]));

        let a = Fingerprint::from_image_bytes(&png_bytes(&base)).unwrap();
        let b = Fingerprint::from_image_bytes(&png_bytes(&tweaked)).unwrap();

        assert_eq!(a.hamming_distance(b), 2);
        assert!(a.is_similar(b, DEFAULT_SIMILARITY_THRESHOLD));
    }

    #[test]
    fn contrasting_images_are_not_similar() {
        let left = RgbImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let top = RgbImage::from_fn(8, 8, |_, y| {
            if y < 4 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let a = Fingerprint::from_image_bytes(&png_bytes(&left)).unwrap();
        let b = Fingerprint::from_image_bytes(&png_bytes(&top)).unwrap();
        // Half of the grid flips between the two layouts.
        assert_eq!(a.hamming_distance(b), 32);
        assert!(!a.is_similar(b, DEFAULT_SIMILARITY_THRESHOLD));
    }

    #[test]
    fn corrupt_bytes_fail_instead_of_matching_nothing() {
        let err = Fingerprint::from_image_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, GroveError::Fingerprint(_)));
    }

    #[test]
    fn hex_round_trip() {
        let fp = Fingerprint::from(0xdead_beef_0123_4567);
        let hex = fp.to_string();
        assert_eq!(hex, "deadbeef01234567");
        assert_eq!(Fingerprint::from_hex(&hex).unwrap(), fp);
    }

    #[test]
    fn bad_hex_is_invalid_input() {
        let err = Fingerprint::from_hex("zz").unwrap_err();
        assert!(matches!(err, GroveError::InvalidInput { .. }));
    }
}
