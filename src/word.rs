//! Width specialization for the codecs.
//!
//! Both codecs operate on the unsigned bit pattern of a 32- or 64-bit value.
//! [`Word`] is sealed and implemented only for `u32` and `u64`; it carries the
//! bit width and the widened accumulator type the bit workspace needs (`u64`
//! for `u32` values, `u128` for `u64` values). [`Numeric`] bridges the
//! caller-facing integer/float types down to their `Word` bit pattern.

use std::fmt::Debug;
use std::ops::{BitAnd, BitOr, BitXor, Shl, Shr};

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// An unsigned integer width the codecs know how to compress: `u32` or `u64`.
pub trait Word:
    sealed::Sealed
    + Copy
    + Clone
    + Debug
    + Default
    + PartialEq
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + 'static
{
    /// The accumulator type the bit workspace uses for this width: twice as
    /// wide as `Self`, so that a full-width field always fits alongside up to
    /// `BITS - 1` bits already pending.
    type Wide: Wide;

    /// Number of bits in `Self` (32 or 64).
    const BITS: u32;

    const ZERO: Self;
    const ONE: Self;

    fn from_wide(wide: Self::Wide) -> Self;
    fn to_wide(self) -> Self::Wide;

    fn leading_zeros(self) -> u32;
    fn trailing_zeros(self) -> u32;

    /// `floor(log2(Self::BITS))` rounded up: the field width used to transmit
    /// a leading-zero count (`ceil(log2(W))` in the spec).
    fn log2_bits() -> u32 {
        32 - (Self::BITS - 1).leading_zeros()
    }
}

/// The widened accumulator backing a [`Word`]'s bit workspace.
pub trait Wide:
    Copy
    + Clone
    + Debug
    + Default
    + PartialEq
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + 'static
{
    const ZERO: Self;
    const ONE: Self;
    const MAX: Self;
    const BITS: u32;

    fn from_u64(value: u64) -> Self;
    fn to_u64_truncating(self) -> u64;
    fn from_u8(value: u8) -> Self;
}

impl Wide for u64 {
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const MAX: Self = u64::MAX;
    const BITS: u32 = 64;

    #[inline]
    fn from_u64(value: u64) -> Self {
        value
    }

    #[inline]
    fn to_u64_truncating(self) -> u64 {
        self
    }

    #[inline]
    fn from_u8(value: u8) -> Self {
        value as u64
    }
}

impl Wide for u128 {
    const ZERO: Self = 0;
    const ONE: Self = 1;
    const MAX: Self = u128::MAX;
    const BITS: u32 = 128;

    #[inline]
    fn from_u64(value: u64) -> Self {
        value as u128
    }

    #[inline]
    fn to_u64_truncating(self) -> u64 {
        self as u64
    }

    #[inline]
    fn from_u8(value: u8) -> Self {
        value as u128
    }
}

impl Word for u32 {
    type Wide = u64;

    const BITS: u32 = 32;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    #[inline]
    fn from_wide(wide: Self::Wide) -> Self {
        wide as u32
    }

    #[inline]
    fn to_wide(self) -> Self::Wide {
        self as u64
    }

    #[inline]
    fn leading_zeros(self) -> u32 {
        u32::leading_zeros(self)
    }

    #[inline]
    fn trailing_zeros(self) -> u32 {
        u32::trailing_zeros(self)
    }
}

impl Word for u64 {
    type Wide = u128;

    const BITS: u32 = 64;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    #[inline]
    fn from_wide(wide: Self::Wide) -> Self {
        wide as u64
    }

    #[inline]
    fn to_wide(self) -> Self::Wide {
        self as u128
    }

    #[inline]
    fn leading_zeros(self) -> u32 {
        u64::leading_zeros(self)
    }

    #[inline]
    fn trailing_zeros(self) -> u32 {
        u64::trailing_zeros(self)
    }
}

/// A caller-facing value type that reinterprets bit-for-bit to a [`Word`].
///
/// Implemented for the unsigned integer types directly and for `f32`/`f64`
/// via `to_bits`/`from_bits`, so the codecs never see a float and never round.
pub trait Numeric: Copy + Clone + Debug + PartialEq + 'static {
    type Repr: Word;

    fn to_repr(self) -> Self::Repr;
    fn from_repr(repr: Self::Repr) -> Self;
}

impl Numeric for u32 {
    type Repr = u32;

    #[inline]
    fn to_repr(self) -> u32 {
        self
    }

    #[inline]
    fn from_repr(repr: u32) -> Self {
        repr
    }
}

impl Numeric for u64 {
    type Repr = u64;

    #[inline]
    fn to_repr(self) -> u64 {
        self
    }

    #[inline]
    fn from_repr(repr: u64) -> Self {
        repr
    }
}

impl Numeric for f32 {
    type Repr = u32;

    #[inline]
    fn to_repr(self) -> u32 {
        self.to_bits()
    }

    #[inline]
    fn from_repr(repr: u32) -> Self {
        f32::from_bits(repr)
    }
}

impl Numeric for f64 {
    type Repr = u64;

    #[inline]
    fn to_repr(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn from_repr(repr: u64) -> Self {
        f64::from_bits(repr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log2_bits_matches_spec() {
        assert_eq!(u32::log2_bits(), 5);
        assert_eq!(u64::log2_bits(), 6);
    }

    #[test]
    fn float_roundtrip_is_bit_exact() {
        let v: f64 = 13.1;
        assert_eq!(f64::from_repr(v.to_repr()), v);
        let v: f32 = -2.120258808;
        assert_eq!(f32::from_repr(v.to_repr()).to_bits(), v.to_bits());
    }

    #[test]
    fn nan_bit_pattern_survives() {
        let v = f64::NAN;
        let back = f64::from_repr(v.to_repr());
        assert!(back.is_nan());
        assert_eq!(back.to_bits(), v.to_bits());
    }
}
