pub mod hook;
pub mod open;
pub mod seal;

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;
use log::info;

use crate::config::StegoOptions;
use crate::signature::{SignatureAuthority, SignaturePayloadV1, SignatureVerifier, Verdict};
use crate::stego::{self, ImageComparisonResult};
use hook::PipelineHook;

pub use open::{open_file, open_photo};
pub use seal::{seal_file, seal_photo};

/// Load any supported image file as an RGBA pixel grid.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("failed to load image: {}", path.display()))?;
    Ok(image.to_rgba8())
}

/// Result of a full seal → hook → open roundtrip.
pub struct RoundtripResult {
    /// Maximum payload size of the input image, in bytes.
    pub capacity: u64,
    /// Payload recovered from the file the hook handed back.
    pub decoded: Vec<u8>,
    /// `true` if the recovered payload equals the sealed one.
    pub matched: bool,
    /// Distortion between the input image and the file the hook handed back.
    pub quality: ImageComparisonResult,
}

/// Run a full seal → hook → open roundtrip.
///
/// Steps:
/// 1. Seals `payload` into `input`, writing `sealed_path`.
/// 2. Calls `hook.after_seal(sealed_path)`; publication happens here.
/// 3. Reopens the path returned by the hook and extracts the payload.
/// 4. Compares the payload and measures distortion against the input.
///
/// # Example
///
/// ```rust,no_run
/// use std::path::Path;
/// use snapseal::{roundtrip, NoopHook, StegoOptions};
///
/// let result = roundtrip(
///     Path::new("photo.png"),
///     Path::new("sealed.png"),
///     b"snapthentic:v1:hello",
///     &StegoOptions::default(),
///     &NoopHook,
/// ).unwrap();
///
/// assert!(result.matched);
/// ```
pub fn roundtrip<H: PipelineHook>(
    input: &Path,
    sealed_path: &Path,
    payload: &[u8],
    options: &StegoOptions,
    hook: &H,
) -> Result<RoundtripResult> {
    let original = load_rgba(input)?;
    let sealed = seal_file(input, sealed_path, payload, options)?;

    let reopen_from = hook.after_seal(sealed_path)?;
    let published = load_rgba(&reopen_from)?;

    let decoded = stego::decode_message(&published, options)?.message;
    let quality = stego::compare_images(&original, &published)?;
    let matched = decoded == payload;
    info!(
        "roundtrip {}: psnr {:.2} dB, max difference {}",
        if matched { "matched" } else { "MISMATCHED" },
        quality.psnr,
        quality.max_difference
    );

    Ok(RoundtripResult {
        capacity: sealed.capacity,
        decoded,
        matched,
        quality,
    })
}

/// A sealed photo's payload together with the verifier's verdict on it.
#[derive(Debug, Clone)]
pub struct Authentication {
    pub payload: SignaturePayloadV1,
    pub verdict: Verdict,
}

/// Open a sealed photo and check that its signer authorised the embedded hash.
pub async fn authenticate_photo<A: SignatureAuthority>(
    input_path: &Path,
    options: &StegoOptions,
    verifier: &SignatureVerifier<A>,
) -> Result<Authentication> {
    let payload = open_photo(input_path, options)?;
    let verdict = verifier.verify(&payload.verification_request()).await;
    info!(
        "{}: signer {} tx {} -> {:?}",
        input_path.display(),
        payload.signer_address(),
        payload.tx_hash(),
        verdict
    );
    Ok(Authentication { payload, verdict })
}
