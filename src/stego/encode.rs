use image::RgbaImage;
use log::debug;
use rayon::prelude::*;

use super::{EncodingResult, StegoError, PIXEL_STRIDE};
use crate::bits;
use crate::config::{self, StegoOptions};

/// Embed `payload` into a copy of `image`.
///
/// The source image is never modified. Every active channel of every pixel is
/// rewritten, with bits past the header and payload set to zero.
pub fn encode_message(
    image: &RgbaImage,
    payload: &[u8],
    options: &StegoOptions,
) -> Result<EncodingResult, StegoError> {
    if !options.bits_per_channel_in_range() {
        return Err(StegoError::InvalidBitsPerChannel(options.bits_per_channel));
    }

    let (width, height) = image.dimensions();
    let capacity = config::calculate_capacity(width, height, options);
    let len = payload.len() as u64;
    if len > capacity || (options.include_header && len > u32::MAX as u64) {
        return Err(StegoError::PayloadTooLarge { len, capacity });
    }

    let stream = bits::build_stream(payload, options.include_header);
    debug!(
        "embedding {} bytes into {}x{} image ({} bit slots, capacity {} bytes)",
        len,
        width,
        height,
        config::total_bit_slots(width, height, options),
        capacity
    );

    let mut output = image.clone();
    let row_len = width as usize * PIXEL_STRIDE;
    if row_len > 0 {
        let pixels: &mut [u8] = &mut output;
        pixels
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| embed_row(row, y, width as usize, &stream, options));
    }

    let efficiency = if capacity == 0 {
        0.0
    } else {
        len as f64 / capacity as f64
    };

    Ok(EncodingResult {
        image: output,
        capacity,
        bytes_used: len,
        efficiency,
    })
}

/// Rewrite the low bits of one pixel row. Each channel slot's position in the
/// stream follows from its absolute row-major scan index.
fn embed_row(row: &mut [u8], y: usize, width: usize, stream: &[u8], options: &StegoOptions) {
    let channels = options.channels.count();
    let bits_per_channel = options.bits_per_channel;
    let mask = bits::low_bits_mask(bits_per_channel);

    for (x, pixel) in row.chunks_exact_mut(PIXEL_STRIDE).enumerate() {
        let first_slot = ((y * width + x) * channels) as u64;
        for (c, value) in pixel.iter_mut().take(channels).enumerate() {
            let bit_offset = (first_slot + c as u64) * bits_per_channel as u64;
            let data = bits::bits_at(stream, bit_offset, bits_per_channel);
            *value = (*value & !mask) | data;
        }
    }
}
