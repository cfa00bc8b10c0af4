use std::fmt::Debug;

use bytemuck::Pod;
use half::f16;
use num_traits::{PrimInt, Unsigned, WrappingAdd, WrappingSub};

mod private {
    pub trait Sealed {}
}

/// A fixed-width primitive element type that the codecs operate on.
///
/// Sealed: implemented for `u8..=u64`, `i8..=i64`, `f16`, `f32` and `f64`, all of them
/// [`Pod`], so buffers of them can be viewed as bytes and back.
pub trait NativeType: Pod + Default + PartialEq + Debug + Send + Sync + private::Sealed {
    /// Short type name used in diagnostics and C symbol names.
    const NAME: &'static str;

    /// Integer key whose natural order is the order used by the statistics kernels.
    ///
    /// Integers are their own key. Floats map onto a signed integer of the same width that
    /// orders as IEEE 754 `totalOrder`, so two floats have equal keys iff their bits are equal.
    type OrdKey: Ord + Copy + Debug;

    fn ord_key(self) -> Self::OrdKey;

    fn from_ord_key(key: Self::OrdKey) -> Self;

    /// Bit-exact equality (`-0.0` and `0.0` differ, identical NaNs are equal).
    #[inline]
    fn is_identical(self, other: Self) -> bool {
        self.ord_key() == other.ord_key()
    }
}

/// Signed and unsigned integer element types.
pub trait NativeInt: NativeType + PrimInt + WrappingAdd + WrappingSub {
    const BITS: usize = size_of::<Self>() * 8;

    /// Unsigned type of the same width.
    type Unsigned: NativeUnsigned;

    /// `self - reference` as an unsigned offset, or `None` if `self < reference`.
    #[inline]
    fn offset_from(self, reference: Self) -> Option<Self::Unsigned> {
        (self >= reference).then(|| bytemuck::cast(self.wrapping_sub(&reference)))
    }

    /// Inverse of [`offset_from`](Self::offset_from), wrapping on overflow.
    #[inline]
    fn add_offset(reference: Self, offset: Self::Unsigned) -> Self {
        reference.wrapping_add(&bytemuck::cast(offset))
    }
}

/// Unsigned integers: the element types the bit-packing kernels work on.
pub trait NativeUnsigned: NativeInt<Unsigned = Self> + Unsigned {
    /// Number of bits needed to represent the value; 0 for 0.
    #[inline]
    fn bit_width(self) -> usize {
        Self::BITS - self.leading_zeros() as usize
    }

    /// Mask with the low `bits` bits set, `bits` in `0..=BITS`.
    #[inline]
    fn low_mask(bits: usize) -> Self {
        if bits == 0 {
            Self::zero()
        } else {
            Self::max_value() >> (Self::BITS - bits)
        }
    }
}

macro_rules! impl_native_int {
    ($($t:ty => $u:ty),* $(,)?) => {
        $(
            impl private::Sealed for $t {}

            impl NativeType for $t {
                const NAME: &'static str = stringify!($t);
                type OrdKey = $t;

                #[inline]
                fn ord_key(self) -> Self::OrdKey {
                    self
                }

                #[inline]
                fn from_ord_key(key: Self::OrdKey) -> Self {
                    key
                }
            }

            impl NativeInt for $t {
                type Unsigned = $u;
            }

            // offsets are reinterpreted bit for bit
            const _: () = assert!(size_of::<$t>() == size_of::<$u>());
        )*
    };
}

impl_native_int! {
    u8 => u8, u16 => u16, u32 => u32, u64 => u64,
    i8 => u8, i16 => u16, i32 => u32, i64 => u64,
}

impl NativeUnsigned for u8 {}
impl NativeUnsigned for u16 {}
impl NativeUnsigned for u32 {}
impl NativeUnsigned for u64 {}

// Floats order by the sign-magnitude trick: flipping all non-sign bits of negative values turns
// the bit pattern into a two's complement integer that sorts as IEEE 754 totalOrder. The
// transform is its own inverse.
macro_rules! impl_native_float {
    ($($t:ty => $key:ty, $bits:ty),* $(,)?) => {
        $(
            impl private::Sealed for $t {}

            impl NativeType for $t {
                const NAME: &'static str = stringify!($t);
                type OrdKey = $key;

                #[inline]
                fn ord_key(self) -> Self::OrdKey {
                    let bits = self.to_bits() as $key;
                    bits ^ ((((bits >> (<$key>::BITS - 1)) as $bits) >> 1) as $key)
                }

                #[inline]
                fn from_ord_key(key: Self::OrdKey) -> Self {
                    let bits = key ^ ((((key >> (<$key>::BITS - 1)) as $bits) >> 1) as $key);
                    <$t>::from_bits(bits as $bits)
                }
            }
        )*
    };
}

impl_native_float! {
    f16 => i16, u16,
    f32 => i32, u32,
    f64 => i64, u64,
}

const _: () = assert!(size_of::<f16>() == 2);
const _: () = assert!(size_of::<f32>() == 4);
const _: () = assert!(size_of::<f64>() == 8);
const _: () = assert!(size_of::<usize>() == 8, "lwcodec requires a 64-bit target");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_keys_follow_total_order() {
        let ordered = [
            f64::NEG_INFINITY,
            -1.5,
            -0.0,
            0.0,
            f64::MIN_POSITIVE,
            2.0,
            f64::INFINITY,
            f64::NAN,
        ];
        for pair in ordered.windows(2) {
            assert!(pair[0].ord_key() < pair[1].ord_key(), "{pair:?}");
        }
        assert!((-f64::NAN).ord_key() < f64::NEG_INFINITY.ord_key());
    }

    #[test]
    fn float_keys_round_trip() {
        for v in [-3.25f32, -0.0, 0.0, 7.0, f32::NAN, f32::INFINITY] {
            assert_eq!(f32::from_ord_key(v.ord_key()).to_bits(), v.to_bits());
        }
        let h = f16::from_f32(-2.5);
        assert_eq!(f16::from_ord_key(h.ord_key()).to_bits(), h.to_bits());
    }

    #[test]
    fn identical_is_bitwise() {
        assert!(!0.0f64.is_identical(-0.0));
        assert!(f64::NAN.is_identical(f64::NAN));
        assert!(5i32.is_identical(5));
    }

    #[test]
    fn offsets() {
        assert_eq!((-5i8).offset_from(-128), Some(123u8));
        assert_eq!(i8::add_offset(-128, 255), 127);
        assert_eq!(3u16.offset_from(4), None);
        assert_eq!(i64::MAX.offset_from(i64::MIN), Some(u64::MAX));
    }

    #[test]
    fn masks_and_widths() {
        assert_eq!(u8::low_mask(0), 0);
        assert_eq!(u8::low_mask(3), 0b111);
        assert_eq!(u64::low_mask(64), u64::MAX);
        assert_eq!(0u32.bit_width(), 0);
        assert_eq!(16u32.bit_width(), 5);
    }
}
