use crate::codecs::{
    Codec, CodecError, CodecFunction, CodecResult, NativeInt, NativeUnsigned, WrittenBuffer,
};

/// Signed integers that can be `ZigZag` remapped onto the unsigned type of the same width.
///
/// Non-negative `v` maps to `2v`, negative `v` to `-2v - 1`, so values of small magnitude stay
/// small whatever their sign. The mapping is a bijection over the full range: `MIN` maps to the
/// unsigned `MAX`.
pub trait ZigZag: NativeInt {
    fn zigzag_encode(self) -> Self::Unsigned;

    fn zigzag_decode(encoded: Self::Unsigned) -> Self;
}

macro_rules! impl_zigzag {
    ($($t:ty => $u:ty),* $(,)?) => {
        $(
            impl ZigZag for $t {
                #[inline]
                fn zigzag_encode(self) -> $u {
                    ((self << 1) ^ (self >> (<$t>::BITS - 1))) as $u
                }

                #[inline]
                fn zigzag_decode(encoded: $u) -> Self {
                    ((encoded >> 1) as $t) ^ -((encoded & 1) as $t)
                }
            }
        )*
    };
}

impl_zigzag!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);

/// Remaps every element of `input` into `output`.
pub fn encode<T: ZigZag>(input: &[T], output: &mut [T::Unsigned]) -> CodecResult<WrittenBuffer> {
    let output = output
        .get_mut(..input.len())
        .ok_or(CodecError::OutputBufferTooSmall(
            Codec::ZigZag,
            CodecFunction::Encode,
        ))?;
    for (out, &v) in output.iter_mut().zip(input) {
        *out = v.zigzag_encode();
    }
    Ok(WrittenBuffer::of_elements::<T::Unsigned>(
        input.len(),
        size_of_val(input),
    ))
}

/// Inverse of [`encode`].
pub fn decode<T: ZigZag>(input: &[T::Unsigned], output: &mut [T]) -> CodecResult<WrittenBuffer> {
    let output = output
        .get_mut(..input.len())
        .ok_or(CodecError::OutputBufferTooSmall(
            Codec::ZigZag,
            CodecFunction::Decode,
        ))?;
    for (out, &v) in output.iter_mut().zip(input) {
        *out = T::zigzag_decode(v);
    }
    Ok(WrittenBuffer::of_elements::<T>(
        input.len(),
        size_of_val(input),
    ))
}

/// Largest bit width of the `ZigZag` form of `input`, without materializing it; a cheap way to
/// size a following bit-packing pass.
pub fn encoded_bit_width<T: ZigZag>(input: &[T]) -> usize {
    input
        .iter()
        .map(|v| v.zigzag_encode().bit_width())
        .max()
        .unwrap_or(0)
}
