use image::RgbaImage;
use log::debug;
use rayon::prelude::*;

use super::{DecodingResult, StegoError, PIXEL_STRIDE};
use crate::bits::{self, BitWriter};
use crate::config::{self, DecodeMode, StegoOptions};

/// Extract a payload embedded by [`encode_message`](super::encode_message).
///
/// With a header, the first 32 bits give the payload length and exactly that
/// many bytes follow. In [`DecodeMode::Lenient`] a length running past the end
/// of the image yields only the bytes actually present; [`DecodeMode::Strict`]
/// rejects it. Without a header every extracted byte is returned with trailing
/// NUL bytes stripped, which loses payloads that themselves end in NUL.
pub fn decode_message(image: &RgbaImage, options: &StegoOptions) -> Result<DecodingResult, StegoError> {
    if !options.bits_per_channel_in_range() {
        return Err(StegoError::InvalidBitsPerChannel(options.bits_per_channel));
    }

    let stream = extract_stream(image, options);
    let (width, height) = image.dimensions();

    if !options.include_header {
        let bytes_read = stream.len() as u64;
        let mut message = stream;
        while message.last() == Some(&0) {
            message.pop();
        }
        return Ok(DecodingResult { message, bytes_read });
    }

    let declared = bits::read_length_header(&stream) as u64;
    let capacity = config::calculate_capacity(width, height, options);
    debug!("header declares {} bytes, image capacity {} bytes", declared, capacity);

    if declared > capacity && options.decode_mode == DecodeMode::Strict {
        return Err(StegoError::CorruptPayload { declared, capacity });
    }

    let start = config::HEADER_BYTES as usize;
    let end = (start as u64 + declared).min(stream.len() as u64) as usize;
    let message = stream.get(start..end).map(<[u8]>::to_vec).unwrap_or_default();

    Ok(DecodingResult {
        message,
        bytes_read: declared,
    })
}

/// Collect the low bits of every active channel, in scan order, into a packed stream.
fn extract_stream(image: &RgbaImage, options: &StegoOptions) -> Vec<u8> {
    let (width, height) = image.dimensions();
    let channels = options.channels.count();
    let bits_per_channel = options.bits_per_channel;
    let mask = bits::low_bits_mask(bits_per_channel);
    let row_len = width as usize * PIXEL_STRIDE;
    if row_len == 0 {
        return Vec::new();
    }

    let pixels: &[u8] = image;
    let rows: Vec<Vec<u8>> = pixels
        .par_chunks(row_len)
        .map(|row| {
            row.chunks_exact(PIXEL_STRIDE)
                .flat_map(|pixel| pixel[..channels].iter().map(move |v| v & mask))
                .collect()
        })
        .collect();

    let total_bits = config::total_bit_slots(width, height, options) as usize;
    let mut writer = BitWriter::with_capacity(total_bits);
    for value in rows.iter().flatten() {
        writer.push(*value, bits_per_channel);
    }
    debug!("extracted {} bits from {}x{} image", writer.bit_len(), width, height);
    writer.into_bytes()
}
