use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use snapseal::config::{DEFAULT_BITS_PER_CHANNEL, DEFAULT_VERIFY_TIMEOUT_SECS};
use snapseal::signature::ensure_hex_prefix;
use snapseal::{
    integrity, pipeline, ChannelMode, DecodeMode, EoaAuthority, SignaturePayloadV1,
    SignatureVerifier, StegoOptions, Verdict, VerifierConfig,
};

/// snapseal: seal signed provenance payloads into photos and verify them.
#[derive(Parser)]
#[command(name = "snapseal", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Embedding parameters. Decoding must use the values used when sealing.
#[derive(Args)]
struct StegoArgs {
    /// Low bits per channel carrying payload (1-8)
    #[arg(long, default_value_t = DEFAULT_BITS_PER_CHANNEL)]
    bits_per_channel: u8,

    /// Channels carrying payload: rgb or rgba
    #[arg(long, default_value_t = ChannelMode::Rgb)]
    channels: ChannelMode,

    /// Embed without the 32-bit length header
    #[arg(long)]
    no_header: bool,

    /// Reject a length header larger than the image capacity
    #[arg(long)]
    strict: bool,
}

impl StegoArgs {
    fn options(&self) -> StegoOptions {
        StegoOptions {
            bits_per_channel: self.bits_per_channel,
            channels: self.channels,
            include_header: !self.no_header,
            decode_mode: if self.strict {
                DecodeMode::Strict
            } else {
                DecodeMode::Lenient
            },
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print how many payload bytes an image of the given size can carry
    Capacity {
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[command(flatten)]
        stego: StegoArgs,
    },

    /// Print the 0x-prefixed SHA-256 of a photo file
    Hash {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write a checkerboard test image
    Sample {
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 400)]
        width: u32,
        #[arg(long, default_value_t = 300)]
        height: u32,
    },

    /// Hide an arbitrary text message in an image
    Embed {
        #[arg(short, long)]
        input: PathBuf,
        /// Output image path (.png, .bmp or .tiff)
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        message: String,
        #[command(flatten)]
        stego: StegoArgs,
    },

    /// Print the message hidden in an image
    Extract {
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        stego: StegoArgs,
    },

    /// Report distortion metrics between two images
    Compare {
        original: PathBuf,
        modified: PathBuf,
    },

    /// Seal a photo with a signature payload
    Seal {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        signer_address: String,
        #[arg(long)]
        hash: String,
        #[arg(long)]
        signature: String,
        #[arg(long)]
        tx_hash: String,
        #[command(flatten)]
        stego: StegoArgs,
    },

    /// Print the signature payload sealed into a photo
    Open {
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        stego: StegoArgs,
    },

    /// Verify a sealed photo's signature against its signer address
    Verify {
        #[arg(short, long)]
        input: PathBuf,
        /// Seconds to wait for the verification authority
        #[arg(long, default_value_t = DEFAULT_VERIFY_TIMEOUT_SECS)]
        timeout: u64,
        #[command(flatten)]
        stego: StegoArgs,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capacity { width, height, stego } => {
            println!("{}", snapseal::calculate_capacity(width, height, &stego.options()));
        }

        Commands::Hash { input } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            println!("{}", integrity::photo_hash(&bytes));
        }

        Commands::Sample { output, width, height } => {
            snapseal::create_sample_image(width, height)
                .save(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
        }

        Commands::Embed {
            input,
            output,
            message,
            stego,
        } => {
            let result = pipeline::seal_file(&input, &output, message.as_bytes(), &stego.options())?;
            println!("capacity:   {} bytes", result.capacity);
            println!("used:       {} bytes", result.bytes_used);
            println!("efficiency: {:.2}%", result.efficiency * 100.0);
        }

        Commands::Extract { input, stego } => {
            let decoded = pipeline::open_file(&input, &stego.options())?;
            println!("{}", decoded.text());
        }

        Commands::Compare { original, modified } => {
            let a = pipeline::load_rgba(&original)?;
            let b = pipeline::load_rgba(&modified)?;
            let cmp = snapseal::compare_images(&a, &b)?;
            println!("mse:            {:.4}", cmp.mse);
            println!("psnr:           {:.2} dB", cmp.psnr);
            println!("max difference: {}", cmp.max_difference);
        }

        Commands::Seal {
            input,
            output,
            signer_address,
            hash,
            signature,
            tx_hash,
            stego,
        } => {
            let payload = SignaturePayloadV1::new(
                ensure_hex_prefix(&signer_address),
                ensure_hex_prefix(&hash),
                ensure_hex_prefix(&signature),
                ensure_hex_prefix(&tx_hash),
            )?;
            pipeline::seal_photo(&input, &output, &payload, &stego.options())?;
        }

        Commands::Open { input, stego } => {
            let payload = pipeline::open_photo(&input, &stego.options())?;
            println!("signer:    {}", payload.signer_address());
            println!("hash:      {}", payload.hash());
            println!("signature: {}", payload.signature());
            println!("tx:        {}", payload.tx_hash());
        }

        Commands::Verify {
            input,
            timeout,
            stego,
        } => {
            let verifier = SignatureVerifier::new(
                EoaAuthority,
                VerifierConfig {
                    timeout: Duration::from_secs(timeout),
                },
            );
            let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
            let auth = rt.block_on(pipeline::authenticate_photo(&input, &stego.options(), &verifier))?;
            match auth.verdict {
                Verdict::Valid => println!("valid: signed by {}", auth.payload.signer_address()),
                Verdict::Invalid => anyhow::bail!("invalid signature"),
                Verdict::Unavailable => anyhow::bail!("signature could not be verified"),
            }
        }
    }

    Ok(())
}
