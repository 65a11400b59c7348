//! Command-line front-end for `bitcodec`: round-trips raw little-endian
//! binary data through the Gorilla or Entropy codec, and converts between
//! that binary form and whitespace-separated decimal text.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use bitcodec::{CodecError, EntropyCompressor, EntropyDecompressor, GorillaCompressor, GorillaDecompressor};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Algorithm {
    Gorilla,
    Entropy,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum NumberType {
    Int,
    Float,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Width {
    #[value(name = "32")]
    W32,
    #[value(name = "64")]
    W64,
}

impl Width {
    fn bits(self) -> u32 {
        match self {
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }

    fn bytes(self) -> usize {
        (self.bits() / 8) as usize
    }
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Input file path; reads stdin if absent.
    #[arg(short = 'i')]
    input: Option<PathBuf>,

    /// Output file path; writes stdout if absent.
    #[arg(short = 'o')]
    output: Option<PathBuf>,

    /// Codec to apply.
    #[arg(short = 'a', default_value = "gorilla")]
    algorithm: Algorithm,

    /// Value width in bits.
    #[arg(short = 'w', default_value = "32")]
    width: Width,

    /// Number type used by `load`/`dump` to format values.
    #[arg(short = 't', default_value = "float")]
    number_type: NumberType,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress W-aligned raw binary input through the chosen codec.
    Compress(CommonArgs),
    /// Decompress a codec stream back into raw binary.
    Decompress(CommonArgs),
    /// Parse whitespace-separated decimal text into raw binary.
    Load(CommonArgs),
    /// Render raw binary as whitespace-separated decimal text.
    Dump(CommonArgs),
}

#[derive(Parser, Debug)]
#[command(name = "bitcodec", about = "Gorilla/entropy codec round-trip CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn read_input(path: &Option<PathBuf>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match path {
        Some(p) => {
            File::open(p)
                .with_context(|| format!("opening input file {}", p.display()))?
                .read_to_end(&mut buf)?;
        }
        None => {
            io::stdin().read_to_end(&mut buf)?;
        }
    }
    log::debug!("read {} input bytes", buf.len());
    Ok(buf)
}

fn write_output(path: &Option<PathBuf>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(p) => {
            File::create(p)
                .with_context(|| format!("creating output file {}", p.display()))?
                .write_all(bytes)?;
        }
        None => {
            io::stdout().write_all(bytes)?;
        }
    }
    log::debug!("wrote {} output bytes", bytes.len());
    Ok(())
}

/// Pads `data` to a multiple of `block_bytes` with `0x01` followed by
/// `0x00`s. Always appends at least one byte, even when already aligned, so
/// the padding marker is unambiguous on the way back.
fn pad_to_block(data: &mut Vec<u8>, block_bytes: usize) {
    let remainder = data.len() % block_bytes;
    let pad_len = if remainder == 0 {
        block_bytes
    } else {
        block_bytes - remainder
    };
    data.push(0x01);
    data.resize(data.len() + pad_len - 1, 0x00);
}

/// Reverses [`pad_to_block`]: trims trailing `0x00`s, then the `0x01` marker.
fn strip_padding(data: &mut Vec<u8>) -> Result<()> {
    while data.last() == Some(&0x00) {
        data.pop();
    }
    match data.pop() {
        Some(0x01) => Ok(()),
        _ => bail!("corrupted padding: expected a 0x01 marker byte"),
    }
}

fn compress(args: &CommonArgs) -> Result<()> {
    let block_bytes = args.width.bytes();
    let mut data = read_input(&args.input)?;
    pad_to_block(&mut data, block_bytes);
    log::trace!("padded payload to {} bytes", data.len());

    let out = match (args.algorithm, args.width) {
        (Algorithm::Gorilla, Width::W32) => {
            let mut c: GorillaCompressor<Vec<u8>, u32> = GorillaCompressor::new(Vec::new());
            for chunk in data.chunks_exact(4) {
                c.add(u32::from_le_bytes(chunk.try_into().unwrap()))?;
            }
            c.finish()?;
            c.into_inner()
        }
        (Algorithm::Gorilla, Width::W64) => {
            let mut c: GorillaCompressor<Vec<u8>, u64> = GorillaCompressor::new(Vec::new());
            for chunk in data.chunks_exact(8) {
                c.add(u64::from_le_bytes(chunk.try_into().unwrap()))?;
            }
            c.finish()?;
            c.into_inner()
        }
        (Algorithm::Entropy, Width::W32) => {
            let mut c: EntropyCompressor<Vec<u8>, u32> = EntropyCompressor::new(Vec::new());
            for chunk in data.chunks_exact(4) {
                c.add(u32::from_le_bytes(chunk.try_into().unwrap()))?;
            }
            c.finish()?;
            c.into_inner()
        }
        (Algorithm::Entropy, Width::W64) => {
            let mut c: EntropyCompressor<Vec<u8>, u64> = EntropyCompressor::new(Vec::new());
            for chunk in data.chunks_exact(8) {
                c.add(u64::from_le_bytes(chunk.try_into().unwrap()))?;
            }
            c.finish()?;
            c.into_inner()
        }
    };
    write_output(&args.output, &out)
}

fn decompress(args: &CommonArgs) -> Result<()> {
    let bytes = read_input(&args.input)?;
    let mut data = Vec::new();

    macro_rules! drain {
        ($decompressor:expr) => {{
            let mut d = $decompressor;
            loop {
                match d.get() {
                    Ok(v) => data.extend_from_slice(&v.to_le_bytes()),
                    Err(CodecError::EndOfStream) => break,
                    Err(e) => return Err(e.into()),
                }
            }
        }};
    }

    match (args.algorithm, args.width) {
        (Algorithm::Gorilla, Width::W32) => {
            drain!(GorillaDecompressor::<&[u8], u32>::new(&bytes[..]))
        }
        (Algorithm::Gorilla, Width::W64) => {
            drain!(GorillaDecompressor::<&[u8], u64>::new(&bytes[..]))
        }
        (Algorithm::Entropy, Width::W32) => {
            drain!(EntropyDecompressor::<&[u8], u32>::new(&bytes[..]))
        }
        (Algorithm::Entropy, Width::W64) => {
            drain!(EntropyDecompressor::<&[u8], u64>::new(&bytes[..]))
        }
    }
    log::debug!("decoded {} raw bytes before trimming padding", data.len());

    strip_padding(&mut data)?;
    write_output(&args.output, &data)
}

fn load(args: &CommonArgs) -> Result<()> {
    let text = String::from_utf8(read_input(&args.input)?).context("input is not valid UTF-8")?;
    let mut out = Vec::new();
    for token in text.split_whitespace() {
        match (args.number_type, args.width) {
            (NumberType::Float, Width::W32) => {
                let v: f32 = token.parse().with_context(|| format!("parsing {token:?} as f32"))?;
                out.extend_from_slice(&v.to_le_bytes());
            }
            (NumberType::Float, Width::W64) => {
                let v: f64 = token.parse().with_context(|| format!("parsing {token:?} as f64"))?;
                out.extend_from_slice(&v.to_le_bytes());
            }
            (NumberType::Int, Width::W32) => {
                let v: i32 = token.parse().with_context(|| format!("parsing {token:?} as i32"))?;
                out.extend_from_slice(&v.to_le_bytes());
            }
            (NumberType::Int, Width::W64) => {
                let v: i64 = token.parse().with_context(|| format!("parsing {token:?} as i64"))?;
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    write_output(&args.output, &out)
}

fn dump(args: &CommonArgs) -> Result<()> {
    let block_bytes = args.width.bytes();
    let data = read_input(&args.input)?;
    if data.len() % block_bytes != 0 {
        bail!(
            "corrupted input: {} bytes is not a multiple of the {}-byte value width",
            data.len(),
            block_bytes
        );
    }

    let mut lines = Vec::with_capacity(data.len() / block_bytes);
    for chunk in data.chunks_exact(block_bytes) {
        let rendered = match (args.number_type, args.width) {
            (NumberType::Float, Width::W32) => {
                f32::from_le_bytes(chunk.try_into().unwrap()).to_string()
            }
            (NumberType::Float, Width::W64) => {
                f64::from_le_bytes(chunk.try_into().unwrap()).to_string()
            }
            (NumberType::Int, Width::W32) => {
                i32::from_le_bytes(chunk.try_into().unwrap()).to_string()
            }
            (NumberType::Int, Width::W64) => {
                i64::from_le_bytes(chunk.try_into().unwrap()).to_string()
            }
        };
        lines.push(rendered);
    }
    write_output(&args.output, lines.join("\n").as_bytes())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Compress(args) => compress(args),
        Command::Decompress(args) => decompress(args),
        Command::Load(args) => load(args),
        Command::Dump(args) => dump(args),
    }
}
