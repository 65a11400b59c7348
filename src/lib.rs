//! # bitcodec
//!
//! Lossless compression of homogeneous sequences of 32- or 64-bit numeric
//! values (integers, or IEEE-754 floats reinterpreted bit-for-bit). Two
//! independent codecs are provided, sharing only the bit-level I/O workspace
//! underneath them:
//!
//! - **Gorilla**: a delta-XOR codec derived from Facebook's Gorilla
//!   time-series compressor. Each value is transmitted as an XOR delta
//!   against its predecessor; a zero delta costs a single bit, and a
//!   nonzero delta reuses the previous delta's significant-bit window
//!   whenever the new one fits inside it.
//! - **Entropy**: a batch-oriented bit-plane codec. Values are grouped into
//!   batches of 256, transposed into per-bit-position planes, and each
//!   8-wide plane slice is either sent raw or entropy-coded using a
//!   popcount-ranked enumeration of 8-bit patterns.
//!
//! ## Example
//!
//! ```rust
//! use bitcodec::{GorillaCompressor, GorillaDecompressor};
//!
//! let mut compressor: GorillaCompressor<Vec<u8>, f64> = GorillaCompressor::new(Vec::new());
//! compressor.add(15.5).unwrap();
//! compressor.add(14.0625).unwrap();
//! compressor.add(3.25).unwrap();
//! compressor.finish().unwrap();
//! let bytes = compressor.into_inner();
//!
//! let mut decompressor: GorillaDecompressor<&[u8], f64> = GorillaDecompressor::new(&bytes[..]);
//! assert_eq!(decompressor.get().unwrap(), 15.5);
//! assert_eq!(decompressor.get().unwrap(), 14.0625);
//! assert_eq!(decompressor.get().unwrap(), 3.25);
//! ```
//!
//! Neither codec is self-describing: a decoder must be constructed with the
//! same value type and algorithm as the encoder that produced its input.

pub mod bitio;
pub mod entropy;
pub mod entropy_table;
pub mod error;
pub mod gorilla;
pub mod word;

pub use entropy::{EntropyCompressor, EntropyDecompressor};
pub use error::{CodecError, Result};
pub use gorilla::{GorillaCompressor, GorillaDecompressor};
pub use word::{Numeric, Word};
