use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::load_rgba;
use crate::config::StegoOptions;
use crate::signature::{parse_v1_signature, SignaturePayloadV1};
use crate::stego::{self, DecodingResult};

/// Full open pipeline: image file -> RGBA pixels -> extract payload bytes.
pub fn open_file(input_path: &Path, options: &StegoOptions) -> Result<DecodingResult> {
    let image = load_rgba(input_path)?;
    let decoded = stego::decode_message(&image, options)?;
    info!(
        "extracted {} bytes from {} (declared {})",
        decoded.message.len(),
        input_path.display(),
        decoded.bytes_read
    );
    Ok(decoded)
}

/// Extract and parse the signature payload sealed into a photo.
pub fn open_photo(input_path: &Path, options: &StegoOptions) -> Result<SignaturePayloadV1> {
    let decoded = open_file(input_path, options)?;
    let text = std::str::from_utf8(&decoded.message)
        .with_context(|| format!("embedded payload in {} is not text", input_path.display()))?;
    let payload = parse_v1_signature(text)
        .with_context(|| format!("no signature payload in {}", input_path.display()))?;
    Ok(payload)
}
