//! Adaptive Lossless floating-Point encoding.
//!
//! A float `v` is stored as the integer `round(v * 10^e * 10^-f)` and recovered as
//! `enc * 10^f * 10^-e`. Columns of decimals with a bounded number of fractional digits become
//! small integers this way, ready to be packed with [`ffor`](crate::codecs::ffor). Values that do
//! not reproduce bit-exactly are exceptions: their position is marked in a bitset and their
//! original value has to be patched back after decoding, see [`decode_patched`].

use num_traits::Float;

use crate::codecs::{
    exceptions, Codec, CodecError, CodecFunction, CodecResult, NativeInt, NativeType,
    NativeUnsigned as _, WrittenBuffer,
};

/// Default number of values the exponent search looks at.
pub const DEFAULT_SAMPLE_SIZE: usize = 256;

/// Default largest share of exceptions the exponent search accepts.
pub const DEFAULT_MAX_EXCEPTION_RATIO: f64 = 0.25;

/// Bits charged per exception by the exponent search on top of the float itself (its position).
const EXCEPTION_POSITION_BITS: usize = 32;

/// Decimal exponent `e` and fractional digit count `f` chosen for a column.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlpExponents {
    pub e: u8,
    pub f: u8,
}

impl AlpExponents {
    /// Returns whether `f <= e <= T::MAX_EXPONENT`.
    pub fn is_valid_for<T: AlpFloat>(self) -> bool {
        self.f <= self.e && self.e <= T::MAX_EXPONENT
    }

    fn check<T: AlpFloat>(self, function: CodecFunction) -> CodecResult<()> {
        if self.is_valid_for::<T>() {
            Ok(())
        } else {
            Err(CodecError::InvalidInput(Codec::Alp, function))
        }
    }
}

/// Floating-point types ALP can encode, with the integer type they encode to.
pub trait AlpFloat: NativeType + Float {
    type AlpInt: NativeInt;

    /// Largest usable decimal exponent.
    const MAX_EXPONENT: u8;

    /// Encoded integers must stay strictly below this magnitude.
    const ENCODING_LIMIT: Self;

    /// `10^i`
    const F10: &'static [Self];

    /// `10^-i`
    const IF10: &'static [Self];

    /// Scales and rounds `self`, or `None` if the result is not finite or not below
    /// [`ENCODING_LIMIT`](Self::ENCODING_LIMIT).
    fn scale_round(self, exponents: AlpExponents) -> Option<Self::AlpInt>;

    /// Scales an encoded integer back into a float.
    fn unscale(encoded: Self::AlpInt, exponents: AlpExponents) -> Self;
}

macro_rules! impl_alp_float {
    ($t:ty => $int:ty, fraction_bits = $frac:expr, max_exponent = $max:expr, limit = $limit:expr, [$($p:expr),* $(,)?]) => {
        impl AlpFloat for $t {
            type AlpInt = $int;

            const MAX_EXPONENT: u8 = $max;
            const ENCODING_LIMIT: Self = $limit;
            const F10: &'static [Self] = &[$($p),*];
            const IF10: &'static [Self] = &[$(1.0 / $p),*];

            #[inline]
            fn scale_round(self, exponents: AlpExponents) -> Option<$int> {
                // adding and removing 1.5 * 2^mantissa_bits rounds to the nearest integer
                const SWEET: $t = (1u64 << $frac) as $t + (1u64 << ($frac - 1)) as $t;
                let scaled = self * Self::F10[exponents.e as usize] * Self::IF10[exponents.f as usize];
                let rounded = (scaled + SWEET) - SWEET;
                (rounded.abs() < Self::ENCODING_LIMIT).then_some(rounded as $int)
            }

            #[inline]
            fn unscale(encoded: $int, exponents: AlpExponents) -> Self {
                encoded as $t * Self::F10[exponents.f as usize] * Self::IF10[exponents.e as usize]
            }
        }
    };
}

impl_alp_float!(f32 => i32, fraction_bits = 23, max_exponent = 10, limit = 4_194_304.0, [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10,
]);

impl_alp_float!(f64 => i64, fraction_bits = 52, max_exponent = 18, limit = 2_251_799_813_685_248.0, [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9,
    1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16, 1e17, 1e18,
]);

const _: () = assert!(<f32 as AlpFloat>::F10.len() == <f32 as AlpFloat>::MAX_EXPONENT as usize + 1);
const _: () = assert!(<f64 as AlpFloat>::F10.len() == <f64 as AlpFloat>::MAX_EXPONENT as usize + 1);

/// Encodes one value if it round-trips bit-exactly.
#[inline]
fn encode_exact<T: AlpFloat>(value: T, exponents: AlpExponents) -> Option<T::AlpInt> {
    value
        .scale_round(exponents)
        .filter(|&enc| T::unscale(enc, exponents).is_identical(value))
}

/// Parameters of the exponent search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentSearch {
    sample_size: usize,
    max_exception_ratio: f64,
}

impl Default for ExponentSearch {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_exception_ratio: DEFAULT_MAX_EXCEPTION_RATIO,
        }
    }
}

impl ExponentSearch {
    /// `sample_size` must be positive and `max_exception_ratio` within `[0, 1]`.
    pub fn new(sample_size: usize, max_exception_ratio: f64) -> CodecResult<Self> {
        if sample_size == 0 || !(0.0..=1.0).contains(&max_exception_ratio) {
            return Err(CodecError::InvalidInput(Codec::Alp, CodecFunction::Prelude));
        }
        Ok(Self {
            sample_size,
            max_exception_ratio,
        })
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn max_exception_ratio(&self) -> f64 {
        self.max_exception_ratio
    }

    /// Picks the exponents minimizing the estimated encoded size of an evenly strided sample.
    ///
    /// Every `0 <= f <= e <= MAX_EXPONENT` is tried. The estimate is the sample length times the
    /// bit width of the encoded range, plus the float and its position for every exception; the
    /// first candidate with the smallest estimate wins. Fails with `EncodingFailed` if even the
    /// best candidate leaves more than `max_exception_ratio` of the sample as exceptions.
    pub fn find<T: AlpFloat>(&self, values: &[T]) -> CodecResult<AlpExponents> {
        if values.is_empty() {
            return Err(CodecError::InvalidInput(Codec::Alp, CodecFunction::Prelude));
        }
        let step = values.len().div_ceil(self.sample_size);
        let sample = || values.iter().step_by(step).copied();
        let sample_len = values.len().div_ceil(step);
        let exception_bits = size_of::<T>() * 8 + EXCEPTION_POSITION_BITS;

        let mut best = (usize::MAX, AlpExponents::default(), 0);
        for e in 0..=T::MAX_EXPONENT {
            for f in 0..=e {
                let exponents = AlpExponents { e, f };
                let mut misses = 0;
                let mut bounds: Option<(T::AlpInt, T::AlpInt)> = None;
                for v in sample() {
                    match encode_exact(v, exponents) {
                        Some(enc) => {
                            bounds = Some(bounds.map_or((enc, enc), |(lo, hi)| {
                                (lo.min(enc), hi.max(enc))
                            }));
                        }
                        None => misses += 1,
                    }
                }
                let width = bounds.map_or(0, |(lo, hi)| {
                    hi.offset_from(lo).map_or(0, |range| range.bit_width())
                });
                let cost = sample_len * width + misses * exception_bits;
                if cost < best.0 {
                    best = (cost, exponents, misses);
                }
            }
        }

        let (_, exponents, exceptions) = best;
        let ratio = exceptions as f64 / sample_len as f64;
        if ratio > self.max_exception_ratio {
            tracing::debug!(
                ty = T::NAME,
                sample_len,
                exceptions,
                max_ratio = self.max_exception_ratio,
                "no ALP exponents with an acceptable exception ratio"
            );
            return Err(CodecError::EncodingFailed(
                Codec::Alp,
                CodecFunction::Prelude,
            ));
        }
        tracing::debug!(
            ty = T::NAME,
            e = exponents.e,
            f = exponents.f,
            sample_len,
            exceptions,
            "chose ALP exponents"
        );
        Ok(exponents)
    }
}

/// [`ExponentSearch::find`] with the default parameters.
pub fn sample_find_exponents<T: AlpFloat>(values: &[T]) -> CodecResult<AlpExponents> {
    ExponentSearch::default().find(values)
}

/// Encodes `values` with the given exponents.
///
/// `encoded` must hold `values.len()` integers and `exception_bitset` a bitset of
/// [`exceptions::bitset_len`]`(values.len())` bytes, which is cleared before use. An exception
/// slot in `encoded` holds the rounded integer if it fits, or else the last one that did, so
/// runs of exceptions do not break runs in the integers.
///
/// Returns descriptors for `encoded` and for the bitset; the latter's `num_elements` is the
/// number of exceptions.
pub fn encode<T: AlpFloat>(
    values: &[T],
    exponents: AlpExponents,
    encoded: &mut [T::AlpInt],
    exception_bitset: &mut [u8],
) -> CodecResult<(WrittenBuffer, WrittenBuffer)> {
    exponents.check::<T>(CodecFunction::Encode)?;
    let bitset_len = exceptions::bitset_len(values.len());
    let too_small = CodecError::OutputBufferTooSmall(Codec::Alp, CodecFunction::Encode);
    let encoded = encoded.get_mut(..values.len()).ok_or(too_small)?;
    let bitset = exception_bitset.get_mut(..bitset_len).ok_or(too_small)?;
    bitset.fill(0);

    let mut num_exceptions = 0;
    let mut placeholder = T::AlpInt::default();
    for (i, (&v, out)) in values.iter().zip(encoded.iter_mut()).enumerate() {
        let rounded = v.scale_round(exponents);
        if let Some(enc) = rounded {
            placeholder = enc;
        }
        if !rounded.is_some_and(|enc| T::unscale(enc, exponents).is_identical(v)) {
            exceptions::set(bitset, i);
            num_exceptions += 1;
        }
        *out = placeholder;
    }

    tracing::trace!(
        ty = T::NAME,
        len = values.len(),
        num_exceptions,
        "ALP encoded column"
    );
    let input_bytes = size_of_val(values);
    Ok((
        WrittenBuffer::of_elements::<T::AlpInt>(values.len(), input_bytes),
        WrittenBuffer {
            bytes_written: bitset_len,
            bit_size_per_element: 1,
            num_elements: num_exceptions,
            input_bytes_used: input_bytes,
        },
    ))
}

/// Scales every encoded integer back into a float.
///
/// Exceptions are NOT restored: on its own this only reproduces the column if encoding reported
/// zero exceptions. Use [`decode_patched`] unless the exceptions are applied separately.
pub fn decode<T: AlpFloat>(
    encoded: &[T::AlpInt],
    exponents: AlpExponents,
    output: &mut [T],
) -> CodecResult<WrittenBuffer> {
    exponents.check::<T>(CodecFunction::Decode)?;
    let output = output
        .get_mut(..encoded.len())
        .ok_or(CodecError::OutputBufferTooSmall(
            Codec::Alp,
            CodecFunction::Decode,
        ))?;
    for (out, &enc) in output.iter_mut().zip(encoded) {
        *out = T::unscale(enc, exponents);
    }
    Ok(WrittenBuffer::of_elements::<T>(
        encoded.len(),
        size_of_val(encoded),
    ))
}

/// [`decode`] followed by patching the exception positions with `exception_values`, as
/// gathered by [`exceptions::gather`] from the original column.
pub fn decode_patched<T: AlpFloat>(
    encoded: &[T::AlpInt],
    exponents: AlpExponents,
    exception_bitset: &[u8],
    exception_values: &[T],
    output: &mut [T],
) -> CodecResult<WrittenBuffer> {
    let written = decode(encoded, exponents, output)?;
    exceptions::patch(
        &mut output[..encoded.len()],
        exception_bitset,
        exception_values,
    )?;
    Ok(written)
}

/// Encodes a single value, failing with `EncodingFailed` if it would be an exception.
pub fn encode_single<T: AlpFloat>(value: T, exponents: AlpExponents) -> CodecResult<T::AlpInt> {
    exponents.check::<T>(CodecFunction::EncodeSingle)?;
    encode_exact(value, exponents).ok_or(CodecError::EncodingFailed(
        Codec::Alp,
        CodecFunction::EncodeSingle,
    ))
}

/// Decodes a single value.
pub fn decode_single<T: AlpFloat>(encoded: T::AlpInt, exponents: AlpExponents) -> CodecResult<T> {
    exponents.check::<T>(CodecFunction::DecodeSingle)?;
    Ok(T::unscale(encoded, exponents))
}
