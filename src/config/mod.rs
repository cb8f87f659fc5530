use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Brand and version tag that prefixes every signed message and embedded payload.
pub const VERSION_TAG: &str = "snapthentic:v1";
pub const PAYLOAD_PREFIX: &str = "snapthentic:v1:";

// Embedding parameters
pub const HEADER_BITS: usize = 32;
pub const HEADER_BYTES: u64 = 4;
pub const MIN_BITS_PER_CHANNEL: u8 = 1;
pub const MAX_BITS_PER_CHANNEL: u8 = 8;
pub const DEFAULT_BITS_PER_CHANNEL: u8 = 1;
pub const DEFAULT_INCLUDE_HEADER: bool = true;

// Signature payload field widths, in bytes
pub const ADDRESS_BYTES: usize = 20;
pub const HASH_BYTES: usize = 32;
pub const SIGNATURE_BYTES: usize = 65;
pub const TX_HASH_BYTES: usize = 32;

// Verification
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;

/// Which pixel channels carry payload bits, scanned in R, G, B, A order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    #[default]
    Rgb,
    Rgba,
}

impl ChannelMode {
    pub fn count(self) -> usize {
        match self {
            ChannelMode::Rgb => 3,
            ChannelMode::Rgba => 4,
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMode::Rgb => f.write_str("rgb"),
            ChannelMode::Rgba => f.write_str("rgba"),
        }
    }
}

impl FromStr for ChannelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(ChannelMode::Rgb),
            "rgba" => Ok(ChannelMode::Rgba),
            other => Err(format!("unknown channel mode '{other}', expected rgb or rgba")),
        }
    }
}

/// How the decoder treats a length header that does not fit the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Trust the header and return whatever bytes the image holds past it.
    #[default]
    Lenient,
    /// Reject a declared length larger than the image capacity.
    Strict,
}

/// Runtime options for an encode/decode operation.
///
/// Nothing in the embedded stream describes these options, so a decode must use
/// the same values that were used at encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StegoOptions {
    pub bits_per_channel: u8,
    pub channels: ChannelMode,
    pub include_header: bool,
    pub decode_mode: DecodeMode,
}

impl Default for StegoOptions {
    fn default() -> Self {
        Self {
            bits_per_channel: DEFAULT_BITS_PER_CHANNEL,
            channels: ChannelMode::Rgb,
            include_header: DEFAULT_INCLUDE_HEADER,
            decode_mode: DecodeMode::Lenient,
        }
    }
}

impl StegoOptions {
    pub fn bits_per_channel_in_range(&self) -> bool {
        (MIN_BITS_PER_CHANNEL..=MAX_BITS_PER_CHANNEL).contains(&self.bits_per_channel)
    }
}

/// Runtime configuration for signature verification.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Upper bound on a single call to the verification authority.
    pub timeout: Duration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_VERIFY_TIMEOUT_SECS),
        }
    }
}

/// Compute the total number of payload bits an image can carry (header included).
pub fn total_bit_slots(width: u32, height: u32, options: &StegoOptions) -> u64 {
    width as u64 * height as u64 * options.channels.count() as u64 * options.bits_per_channel as u64
}

/// Compute the maximum payload size in bytes for an image of the given geometry.
///
/// Never negative: images too small to hold the header report zero.
pub fn calculate_capacity(width: u32, height: u32, options: &StegoOptions) -> u64 {
    let total_bytes = total_bit_slots(width, height, options) / 8;
    let header_bytes = if options.include_header { HEADER_BYTES } else { 0 };
    total_bytes.saturating_sub(header_bytes)
}
