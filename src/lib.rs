pub(crate) mod bits;
pub mod config;
pub mod integrity;
pub mod pipeline;
pub mod signature;
pub mod stego;

pub use config::{calculate_capacity, ChannelMode, DecodeMode, StegoOptions, VerifierConfig};
pub use pipeline::hook::{NoopHook, PipelineHook};
pub use pipeline::{authenticate_photo, open_photo, roundtrip, seal_photo, Authentication, RoundtripResult};
pub use signature::{
    construct_v1_signature, parse_v1_signature, prefix_signature, strip_prefix, EoaAuthority,
    SignatureAuthority, SignatureError, SignaturePayloadV1, SignatureVerifier, Verdict,
    VerificationRequest,
};
pub use stego::{
    compare_images, create_sample_image, decode_message, encode_message, DecodingResult,
    EncodingResult, ImageComparisonResult, StegoError,
};
