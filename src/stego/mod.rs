//! LSB image steganography.
//!
//! Payload bits replace the low `bits_per_channel` bits of every active channel,
//! scanned row-major and R, G, B (then A) within each pixel. Encoding always
//! rewrites the whole addressable capacity: bits after the header and payload
//! are zero padding. Images are handled as RGBA buffers; in `rgb` mode the
//! alpha channel is carried through untouched.

pub mod decode;
pub mod encode;
pub mod quality;
pub mod sample;

use std::borrow::Cow;

use image::RgbaImage;
use thiserror::Error;

pub use decode::decode_message;
pub use encode::encode_message;
pub use quality::{compare_images, ImageComparisonResult};
pub use sample::create_sample_image;

/// Bytes per pixel in the RGBA buffers the codec operates on.
pub(crate) const PIXEL_STRIDE: usize = 4;

#[derive(Error, Debug, PartialEq)]
pub enum StegoError {
    #[error("message too long: maximum capacity {capacity} bytes, message length {len} bytes")]
    PayloadTooLarge { len: u64, capacity: u64 },
    #[error("bits per channel must be between 1 and 8, got {0}")]
    InvalidBitsPerChannel(u8),
    #[error("images must have the same dimensions: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },
    #[error("corrupt payload: header declares {declared} bytes but image holds at most {capacity}")]
    CorruptPayload { declared: u64, capacity: u64 },
}

/// Output of [`encode_message`].
#[derive(Debug, Clone)]
pub struct EncodingResult {
    /// Copy of the source image carrying the payload.
    pub image: RgbaImage,
    /// Maximum payload size for this image and options, in bytes.
    pub capacity: u64,
    /// Payload size actually embedded, in bytes.
    pub bytes_used: u64,
    /// `bytes_used / capacity`, or 0.0 when the image has no capacity.
    pub efficiency: f64,
}

/// Output of [`decode_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodingResult {
    pub message: Vec<u8>,
    /// Payload length as declared by the header, or the number of whole bytes
    /// extracted when decoding without a header.
    pub bytes_read: u64,
}

impl DecodingResult {
    /// The recovered message as text. Invalid UTF-8 is replaced, not rejected.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.message)
    }
}
