//! Batch entropy codec.
//!
//! Values are staged in batches of 256. On dump, each batch is transposed
//! into `W` bit-planes (one per bit position), each cut into 8-wide slices,
//! and each slice is either transmitted raw (8 bits) or entropy-coded: a sign
//! bit, a unary-coded distance from the nearest extreme popcount, and a rank
//! within that popcount class looked up in [`crate::entropy_table`]. Mode
//! selection is adaptive: a slice entropy-codes only once the previous slice
//! at that bit position showed enough structure (`counts[k] > 1`).

use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::entropy_table::table;
use crate::error::{CodecError, Result};
use crate::word::{Numeric, Wide, Word};

const BATCH: usize = 256;

/// Encodes values into fixed-size batches of 256 against an underlying sink.
pub struct EntropyCompressor<Wr: Write, T: Numeric> {
    writer: BitWriter<Wr, T::Repr>,
    batch: [T::Repr; BATCH],
    batch_size: usize,
    counts: Vec<u32>,
}

impl<Wr: Write, T: Numeric> EntropyCompressor<Wr, T> {
    pub fn new(writer: Wr) -> Self {
        Self {
            writer: BitWriter::new(writer),
            batch: [T::Repr::ZERO; BATCH],
            batch_size: 0,
            counts: vec![8; T::Repr::BITS as usize],
        }
    }

    /// Stages one value. Dumps and emits a full-batch marker once 256 values
    /// have accumulated.
    pub fn add(&mut self, value: T) -> Result<()> {
        self.batch[self.batch_size] = value.to_repr();
        self.batch_size += 1;
        if self.batch_size == BATCH {
            self.writer.add_bit(true)?;
            self.dump()?;
        }
        Ok(())
    }

    fn dump(&mut self) -> Result<()> {
        let octets = self.batch_size / 8;
        log::trace!("dumping batch of {} value(s) ({octets} slice(s))", self.batch_size);
        for octet in 0..octets {
            self.dump8(octet * 8)?;
        }
        self.batch_size = 0;
        Ok(())
    }

    fn dump8(&mut self, position: usize) -> Result<()> {
        let width = T::Repr::BITS;
        for k in 0..width {
            self.writer.flush()?;

            let mut number: u8 = 0;
            for e in 0..8usize {
                let bit = (self.batch[position + e] >> k) & T::Repr::ONE == T::Repr::ONE;
                if bit {
                    number |= 1 << e;
                }
            }

            let ones = number.count_ones();
            let zeros = 8 - ones;
            let min = ones.min(zeros);

            if self.counts[k as usize] > 1 {
                self.writer
                    .safe_add(<T::Repr as Word>::Wide::from_u64(number as u64), 8)?;
            } else {
                self.writer.add_bit(ones < zeros)?;
                self.writer.safe_add(
                    <T::Repr as Word>::Wide::from_u64(1u64 << min),
                    min + 1,
                )?;
                let table = table();
                let idx = table.index_by_value[number as usize];
                let length = table.length[ones as usize];
                self.writer
                    .safe_add(<T::Repr as Word>::Wide::from_u64(idx as u64), length)?;
            }

            self.counts[k as usize] = min;
        }
        Ok(())
    }

    /// Terminates the stream: flushes any partial trailing batch (padded by
    /// duplicating the last staged value) then terminates the bit workspace.
    /// Must be called exactly once.
    pub fn finish(&mut self) -> Result<()> {
        if self.batch_size > 0 {
            self.writer
                .safe_add(<T::Repr as Word>::Wide::from_u64((self.batch_size as u64) << 1), 9)?;

            let target = (self.batch_size + 7) / 8 * 8;
            let last = self.batch[self.batch_size - 1];
            for slot in self.batch[self.batch_size..target].iter_mut() {
                *slot = last;
            }
            self.batch_size = target;
            self.dump()?;
        }
        self.writer.finish()
    }

    pub fn into_inner(self) -> Wr {
        self.writer.into_inner()
    }
}

/// Decodes values previously written by [`EntropyCompressor`] with the same `T`.
pub struct EntropyDecompressor<Rd: Read, T: Numeric> {
    reader: BitReader<Rd, T::Repr>,
    batch: [T::Repr; BATCH],
    batch_position: usize,
    batch_capacity: usize,
    counts: Vec<u32>,
}

impl<Rd: Read, T: Numeric> EntropyDecompressor<Rd, T> {
    pub fn new(reader: Rd) -> Self {
        Self {
            reader: BitReader::new(reader),
            batch: [T::Repr::ZERO; BATCH],
            batch_position: 0,
            batch_capacity: 0,
            counts: vec![8; T::Repr::BITS as usize],
        }
    }

    /// Decodes the next value, or fails with `CodecError::EndOfStream` once
    /// the stream is exhausted.
    pub fn get(&mut self) -> Result<T> {
        if self.batch_position == self.batch_capacity {
            self.load()?;
        }
        if self.batch_position == self.batch_capacity {
            return Err(CodecError::EndOfStream);
        }
        let value = self.batch[self.batch_position];
        self.batch_position += 1;
        Ok(T::from_repr(value))
    }

    fn load(&mut self) -> Result<()> {
        self.batch_position = 0;
        for slot in self.batch.iter_mut() {
            *slot = T::Repr::ZERO;
        }

        self.batch_capacity = if self.reader.get_bit()? {
            BATCH
        } else {
            self.reader.get_bits(8)?.to_u64_truncating() as usize
        };

        log::trace!("loading batch of {} value(s)", self.batch_capacity);
        let mut position = 0;
        while position < self.batch_capacity {
            self.load8(position)?;
            position += 8;
        }
        Ok(())
    }

    fn load8(&mut self, position: usize) -> Result<()> {
        let width = T::Repr::BITS;
        for k in 0..width {
            let (number, ones) = if self.counts[k as usize] > 1 {
                let number = self.reader.get_bits(8)?.to_u64_truncating() as u8;
                (number, number.count_ones())
            } else {
                let first = self.reader.get_bit()?;
                let mut zero_run = 0u32;
                loop {
                    if self.reader.get_bit()? {
                        break;
                    }
                    zero_run += 1;
                }
                let ones = if first { zero_run } else { 8 - zero_run };
                let length = table().length[ones as usize];
                let idx = self.reader.get_bits(length)?.to_u64_truncating() as usize;
                let number = table().value_by_index[ones as usize][idx];
                (number, ones)
            };

            for e in 0..8u32 {
                if (number >> e) & 1 == 1 {
                    self.batch[position + e as usize] =
                        self.batch[position + e as usize] | (T::Repr::ONE << k);
                }
            }

            self.counts[k as usize] = ones.min(8 - ones);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Numeric + PartialEq + std::fmt::Debug>(values: &[T]) {
        let mut compressor: EntropyCompressor<Vec<u8>, T> = EntropyCompressor::new(Vec::new());
        for &v in values {
            compressor.add(v).unwrap();
        }
        compressor.finish().unwrap();
        let bytes = compressor.into_inner();

        let mut decompressor: EntropyDecompressor<&[u8], T> =
            EntropyDecompressor::new(&bytes[..]);
        for &expected in values {
            let got = decompressor.get().unwrap();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn scenario_3_f32_roundtrips() {
        let values: Vec<f32> = vec![
            0.043154765,
            0.164135829,
            -0.123626679,
            -0.167725742,
            -0.110710979,
            0.102363497,
            0.022291092,
            -0.187514856,
            -0.157604620,
            -0.065454222,
            0.034411345,
            -0.226510420,
            0.228433594,
            -0.070296884,
            -0.068169087,
            0.049356200,
            -0.042770151,
            0.151971295,
            0.402687907,
            -0.366405696,
            0.034094390,
            0.051680047,
            -0.067786627,
            0.160439745,
            -0.048753500,
            -0.196946219,
            0.045420300,
            0.189751863,
            0.018866321,
            -0.002804127,
            -0.247762606,
            0.365801245,
            1.0,
            0.405465096,
            -2.120258808,
        ];
        roundtrip(&values);
    }

    #[test]
    fn empty_stream_yields_end_of_stream_on_first_get() {
        let mut compressor: EntropyCompressor<Vec<u8>, f32> = EntropyCompressor::new(Vec::new());
        compressor.finish().unwrap();
        let bytes = compressor.into_inner();
        let mut decompressor: EntropyDecompressor<&[u8], f32> =
            EntropyDecompressor::new(&bytes[..]);
        assert!(matches!(
            decompressor.get(),
            Err(CodecError::EndOfStream)
        ));
    }

    #[test]
    fn single_values_roundtrip() {
        roundtrip(&[0.0f32]);
        roundtrip(&[1.0f32]);
        roundtrip(&[f32::from_bits(u32::MAX)]);
        roundtrip(&[3.5f32]);
    }

    #[test]
    fn exactly_256_values_is_one_full_batch() {
        let values: Vec<u32> = (0..256).collect();
        roundtrip(&values);
    }

    #[test]
    fn full_batch_plus_partial_of_one_roundtrips() {
        let mut values: Vec<u32> = (0..256).collect();
        values.push(999);
        roundtrip(&values);
    }

    #[test]
    fn partial_batch_of_255_roundtrips() {
        let values: Vec<u32> = (0..255).collect();
        roundtrip(&values);
    }

    #[test]
    fn mixed_sparsity_u64_roundtrips() {
        let mut values: Vec<u64> = Vec::new();
        for i in 0..300u64 {
            values.push(if i % 7 == 0 { i * 12345 } else { 0 });
        }
        roundtrip(&values);
    }
}
