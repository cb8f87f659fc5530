use std::path::Path;

use anyhow::{Context, Result};
use image::ImageFormat;
use log::info;

use super::load_rgba;
use crate::config::StegoOptions;
use crate::signature::{construct_v1_signature, SignaturePayloadV1};
use crate::stego::{self, EncodingResult};

/// Containers that store pixels exactly. Anything lossy destroys the low bits.
const LOSSLESS_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Tiff];

/// Full seal pipeline: image file -> RGBA pixels -> embed payload -> lossless image file.
pub fn seal_file(
    input_path: &Path,
    output_path: &Path,
    payload: &[u8],
    options: &StegoOptions,
) -> Result<EncodingResult> {
    let format = ImageFormat::from_path(output_path)
        .with_context(|| format!("unrecognised output format: {}", output_path.display()))?;
    if !LOSSLESS_FORMATS.contains(&format) {
        anyhow::bail!(
            "refusing to write {:?} output {}: lossy formats destroy the embedded payload",
            format,
            output_path.display()
        );
    }

    let image = load_rgba(input_path)?;
    info!(
        "sealing {} bytes into {} ({}x{}, {} bits per channel, {})",
        payload.len(),
        input_path.display(),
        image.width(),
        image.height(),
        options.bits_per_channel,
        options.channels
    );

    let result = stego::encode_message(&image, payload, options)?;
    result
        .image
        .save_with_format(output_path, format)
        .with_context(|| format!("failed to write sealed image: {}", output_path.display()))?;

    info!(
        "sealed image written: {} (used {}/{} bytes, {:.2}%)",
        output_path.display(),
        result.bytes_used,
        result.capacity,
        result.efficiency * 100.0
    );
    Ok(result)
}

/// Seal a photo with a signature payload.
pub fn seal_photo(
    input_path: &Path,
    output_path: &Path,
    payload: &SignaturePayloadV1,
    options: &StegoOptions,
) -> Result<EncodingResult> {
    let serialized = construct_v1_signature(payload);
    seal_file(input_path, output_path, serialized.as_bytes(), options)
}
