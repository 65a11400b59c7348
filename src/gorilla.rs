//! Gorilla delta-XOR codec.
//!
//! Each value is transmitted as the XOR delta against its predecessor. A
//! delta of zero costs a single bit. A nonzero delta either reuses the
//! previous delta's significant-bit window (if the new delta fits inside it)
//! or opens a new window, transmitting its leading-zero count and width
//! explicitly.

use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::Result;
use crate::word::{Numeric, Wide, Word};

/// Encodes a sequence of [`Numeric`] values against an underlying byte sink.
pub struct GorillaCompressor<Wr: Write, T: Numeric> {
    writer: BitWriter<Wr, T::Repr>,
    prev: T::Repr,
    prev_leading_zeros: u32,
    prev_trailing_zeros: u32,
}

impl<Wr: Write, T: Numeric> GorillaCompressor<Wr, T> {
    pub fn new(writer: Wr) -> Self {
        Self {
            writer: BitWriter::new(writer),
            prev: T::Repr::ZERO,
            prev_leading_zeros: 0,
            prev_trailing_zeros: 0,
        }
    }

    /// Encodes one value, XOR-delta against the previous call (or 0 on the
    /// first call), and flushes whole bytes to the sink.
    pub fn add(&mut self, value: T) -> Result<()> {
        let x = value.to_repr();
        let d = x ^ self.prev;

        if d == T::Repr::ZERO {
            self.writer.add_bit(false)?;
        } else {
            self.writer.add_bit(true)?;

            let lz = d.leading_zeros();
            let tz = d.trailing_zeros();
            let sb = T::Repr::BITS - lz - tz;

            if lz >= self.prev_leading_zeros && tz >= self.prev_trailing_zeros {
                self.writer.add_bit(false)?;
                let width = T::Repr::BITS - self.prev_leading_zeros - self.prev_trailing_zeros;
                let shifted = d >> self.prev_trailing_zeros;
                self.writer.safe_add(shifted.to_wide(), width)?;
            } else {
                self.writer.add_bit(true)?;
                let log2 = T::Repr::log2_bits();
                self.writer
                    .safe_add(<T::Repr as Word>::Wide::from_u64(lz as u64), log2)?;
                self.writer
                    .safe_add(<T::Repr as Word>::Wide::from_u64(sb as u64), log2 + 1)?;
                let shifted = d >> tz;
                self.writer.safe_add(shifted.to_wide(), sb)?;
                self.prev_leading_zeros = lz;
                self.prev_trailing_zeros = tz;
            }
        }

        self.writer.flush()?;
        self.prev = x;
        Ok(())
    }

    /// Terminates the stream. Must be called exactly once.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.finish()
    }

    pub fn into_inner(self) -> Wr {
        self.writer.into_inner()
    }
}

/// Decodes a sequence of [`Numeric`] values previously written by
/// [`GorillaCompressor`] with the same `T`.
pub struct GorillaDecompressor<Rd: Read, T: Numeric> {
    reader: BitReader<Rd, T::Repr>,
    prev: T::Repr,
    prev_leading_zeros: u32,
    prev_trailing_zeros: u32,
}

impl<Rd: Read, T: Numeric> GorillaDecompressor<Rd, T> {
    pub fn new(reader: Rd) -> Self {
        Self {
            reader: BitReader::new(reader),
            prev: T::Repr::ZERO,
            prev_leading_zeros: 0,
            prev_trailing_zeros: 0,
        }
    }

    /// Decodes the next value, or fails with `CodecError::EndOfStream` once
    /// the stream is exhausted.
    pub fn get(&mut self) -> Result<T> {
        if !self.reader.get_bit()? {
            return Ok(T::from_repr(self.prev));
        }

        let d = if !self.reader.get_bit()? {
            let width = T::Repr::BITS - self.prev_leading_zeros - self.prev_trailing_zeros;
            let s = T::Repr::from_wide(self.reader.get_bits(width)?);
            s << self.prev_trailing_zeros
        } else {
            let log2 = T::Repr::log2_bits();
            let lz = self.reader.get_bits(log2)?.to_u64_truncating() as u32;
            let sb = self.reader.get_bits(log2 + 1)?.to_u64_truncating() as u32;
            let s = T::Repr::from_wide(self.reader.get_bits(sb)?);
            s << (T::Repr::BITS - lz - sb)
        };

        let x = self.prev ^ d;
        self.prev = x;
        self.prev_leading_zeros = d.leading_zeros();
        self.prev_trailing_zeros = d.trailing_zeros();
        Ok(T::from_repr(x))
    }
}
