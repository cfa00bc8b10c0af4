//! Fused frame-of-reference bit-packing.
//!
//! Every value is stored as its offset from a reference `min_val` of the column's own type,
//! packed at a fixed width with the `FastLanes` layout of [`bitpacking`]. Values below the
//! reference or whose offset needs more than `num_bits` bits are exceptions: their slot holds a
//! placeholder, and a second [`collect_exceptions`] pass with the same parameters extracts their
//! positions and original values. Decoding adds the reference back, wrapping.
//!
//! [`packed_ints`](crate::codecs::packed_ints) is the special case of an unsigned column with a
//! zero reference; both share the kernels below.

use num_traits::Zero;

use crate::codecs::bitpacking::{
    self, encoded_size_in_bytes, pack_block, unpack_block, unpack_single_from_block, FL_BLOCK_LEN,
};
use crate::codecs::{
    exceptions, Codec, CodecError, CodecFunction, CodecResult, NativeInt, NativeUnsigned,
    WrittenBuffer,
};

/// What [`encode`] wrote, plus the number of exceptions a following [`collect_exceptions`] call
/// must make room for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedWritten {
    pub written: WrittenBuffer,
    pub num_exceptions: usize,
}

/// Offset of `value` from `reference` if it fits in `width` bits.
#[inline]
fn fitting_offset<T: NativeInt>(value: T, reference: T, width: usize) -> Option<T::Unsigned> {
    value
        .offset_from(reference)
        .filter(|offset| offset.bit_width() <= width)
}

fn packed_size<T: NativeInt>(
    len: usize,
    num_bits: u8,
    codec: Codec,
    function: CodecFunction,
) -> CodecResult<usize> {
    encoded_size_in_bytes::<T::Unsigned>(len, num_bits)
        .map_err(|_| CodecError::InvalidInput(codec, function))
}

pub(crate) fn encode_frame<T: NativeInt>(
    values: &[T],
    reference: T,
    num_bits: u8,
    output: &mut [u8],
    codec: Codec,
) -> CodecResult<PackedWritten> {
    let size = packed_size::<T>(values.len(), num_bits, codec, CodecFunction::Encode)?;
    let output = output
        .get_mut(..size)
        .ok_or(CodecError::OutputBufferTooSmall(codec, CodecFunction::Encode))?;
    let width = usize::from(num_bits);
    let zero = T::Unsigned::zero();

    let mut scratch = [zero; FL_BLOCK_LEN];
    let mut num_exceptions = 0;
    for (chunk, block) in values
        .chunks(FL_BLOCK_LEN)
        .zip(output.chunks_exact_mut(FL_BLOCK_LEN / 8 * width))
    {
        for (slot, &v) in scratch.iter_mut().zip(chunk) {
            let offset = v.offset_from(reference);
            if !offset.is_some_and(|o| o.bit_width() <= width) {
                num_exceptions += 1;
            }
            // the packer keeps the low bits, which is the placeholder for oversized offsets
            *slot = offset.unwrap_or(zero);
        }
        scratch[chunk.len()..].fill(zero);
        pack_block(&scratch, width, block);
    }

    tracing::trace!(
        ?codec,
        ty = T::NAME,
        len = values.len(),
        num_bits,
        num_exceptions,
        "packed column"
    );
    Ok(PackedWritten {
        written: WrittenBuffer {
            bytes_written: size,
            bit_size_per_element: num_bits,
            num_elements: values.len(),
            input_bytes_used: size_of_val(values),
        },
        num_exceptions,
    })
}

pub(crate) fn collect_frame_exceptions<T: NativeInt>(
    values: &[T],
    reference: T,
    num_bits: u8,
    num_exceptions: usize,
    exception_values: &mut [T],
    exception_bitset: &mut [u8],
    codec: Codec,
) -> CodecResult<(WrittenBuffer, WrittenBuffer)> {
    let function = CodecFunction::CollectExceptions;
    if !bitpacking::is_valid_bit_width::<T::Unsigned>(num_bits) {
        return Err(CodecError::InvalidInput(codec, function));
    }
    let too_small = CodecError::OutputBufferTooSmall(codec, function);
    let bitset_len = exceptions::bitset_len(values.len());
    let exception_values = exception_values
        .get_mut(..num_exceptions)
        .ok_or(too_small)?;
    let bitset = exception_bitset.get_mut(..bitset_len).ok_or(too_small)?;
    bitset.fill(0);

    let width = usize::from(num_bits);
    let mut found = 0;
    for (i, &v) in values.iter().enumerate() {
        if fitting_offset(v, reference, width).is_none() {
            if let Some(slot) = exception_values.get_mut(found) {
                *slot = v;
            }
            exceptions::set(bitset, i);
            found += 1;
        }
    }
    if found != num_exceptions {
        return Err(CodecError::InvalidInput(codec, function));
    }

    let input_bytes = size_of_val(values);
    Ok((
        WrittenBuffer::of_elements::<T>(found, input_bytes),
        WrittenBuffer {
            bytes_written: bitset_len,
            bit_size_per_element: 1,
            num_elements: found,
            input_bytes_used: input_bytes,
        },
    ))
}

pub(crate) fn decode_frame<T: NativeInt>(
    packed: &[u8],
    num_elements: usize,
    reference: T,
    num_bits: u8,
    output: &mut [T],
    codec: Codec,
) -> CodecResult<WrittenBuffer> {
    let size = packed_size::<T>(num_elements, num_bits, codec, CodecFunction::Decode)?;
    if packed.len() < size {
        return Err(CodecError::InvalidInput(codec, CodecFunction::Decode));
    }
    let output = output
        .get_mut(..num_elements)
        .ok_or(CodecError::OutputBufferTooSmall(codec, CodecFunction::Decode))?;
    let width = usize::from(num_bits);

    let mut scratch = [T::Unsigned::zero(); FL_BLOCK_LEN];
    for (chunk, block) in output
        .chunks_mut(FL_BLOCK_LEN)
        .zip(packed[..size].chunks_exact(FL_BLOCK_LEN / 8 * width))
    {
        unpack_block(block, width, &mut scratch);
        for (out, &offset) in chunk.iter_mut().zip(&scratch) {
            *out = T::add_offset(reference, offset);
        }
    }

    Ok(WrittenBuffer::of_elements::<T>(num_elements, size))
}

pub(crate) fn unpack_single_frame<T: NativeInt>(
    packed: &[u8],
    num_elements: usize,
    reference: T,
    num_bits: u8,
    index: usize,
    codec: Codec,
) -> CodecResult<T> {
    let invalid = CodecError::InvalidInput(codec, CodecFunction::DecodeSingle);
    if index >= num_elements {
        return Err(invalid);
    }
    let block_bytes = packed_size::<T>(1, num_bits, codec, CodecFunction::DecodeSingle)?;
    let start = (index / FL_BLOCK_LEN)
        .checked_mul(block_bytes)
        .ok_or(invalid)?;
    let end = start.checked_add(block_bytes).ok_or(invalid)?;
    let block = packed.get(start..end).ok_or(invalid)?;
    let offset = unpack_single_from_block::<T::Unsigned>(
        block,
        usize::from(num_bits),
        index % FL_BLOCK_LEN,
    );
    Ok(T::add_offset(reference, offset))
}

/// Packs the offsets of `values` from `min_val` at `num_bits` bits into `output`.
///
/// `output` must hold [`encoded_size_in_bytes`]`::<T::Unsigned>(values.len(), num_bits)` bytes.
/// Out-of-range values are counted but not recorded; see [`collect_exceptions`].
pub fn encode<T: NativeInt>(
    values: &[T],
    min_val: T,
    num_bits: u8,
    output: &mut [u8],
) -> CodecResult<PackedWritten> {
    encode_frame(values, min_val, num_bits, output, Codec::Ffor)
}

/// Records the positions and values of the exceptions [`encode`] counted.
///
/// Must be called with the same `min_val` and `num_bits`; `num_exceptions` is the count encode
/// reported, and `exception_values` must have room for that many. Fails with `InvalidInput` if
/// the actual count differs.
pub fn collect_exceptions<T: NativeInt>(
    values: &[T],
    min_val: T,
    num_bits: u8,
    num_exceptions: usize,
    exception_values: &mut [T],
    exception_bitset: &mut [u8],
) -> CodecResult<(WrittenBuffer, WrittenBuffer)> {
    collect_frame_exceptions(
        values,
        min_val,
        num_bits,
        num_exceptions,
        exception_values,
        exception_bitset,
        Codec::Ffor,
    )
}

/// Unpacks exactly `num_elements` values and adds `min_val` back.
///
/// Exception slots decode to placeholders: on its own this only reproduces the column if encoding
/// reported zero exceptions. Use [`decode_patched`] unless the exceptions are applied separately.
/// The width and reference must match the ones used to encode; this is not checked.
pub fn decode<T: NativeInt>(
    packed: &[u8],
    num_elements: usize,
    min_val: T,
    num_bits: u8,
    output: &mut [T],
) -> CodecResult<WrittenBuffer> {
    decode_frame(packed, num_elements, min_val, num_bits, output, Codec::Ffor)
}

/// [`decode`] followed by patching the exceptions recorded by [`collect_exceptions`].
pub fn decode_patched<T: NativeInt>(
    packed: &[u8],
    num_elements: usize,
    min_val: T,
    num_bits: u8,
    exception_bitset: &[u8],
    exception_values: &[T],
    output: &mut [T],
) -> CodecResult<WrittenBuffer> {
    let written = decode(packed, num_elements, min_val, num_bits, output)?;
    exceptions::patch(
        &mut output[..num_elements],
        exception_bitset,
        exception_values,
    )?;
    Ok(written)
}

/// Decodes the single element at `index` of a column of `num_elements` without unpacking its
/// block.
///
/// Fails with `InvalidInput` if `index` is past the column, including positions that only exist
/// as padding of the last block.
pub fn unpack_single<T: NativeInt>(
    packed: &[u8],
    num_elements: usize,
    min_val: T,
    num_bits: u8,
    index: usize,
) -> CodecResult<T> {
    unpack_single_frame(packed, num_elements, min_val, num_bits, index, Codec::Ffor)
}

/// Picks the packing width for a column with the given bit-width histogram and bounds.
///
/// `histogram` is the output of
/// [`stats::bit_width_histogram`](crate::codecs::stats::bit_width_histogram) taken against `min`,
/// and `min` must be the column minimum: the histogram counts elements below its reference at
/// full width, so with a larger `min` they would be costed as fitting at `T::BITS` bits.
/// Each width up to what `max - min` needs is costed as its packed size plus the size of the
/// values it turns into exceptions; the smallest cost wins, ties going to the narrower width.
/// Widths that would make every value an exception are never chosen.
pub fn find_best_bit_width<T: NativeInt>(histogram: &[u64], min: T, max: T) -> CodecResult<u8> {
    let invalid = CodecError::InvalidInput(Codec::Ffor, CodecFunction::Prelude);
    if histogram.len() != T::BITS + 1 {
        return Err(invalid);
    }
    let range_bits = max.offset_from(min).ok_or(invalid)?.bit_width().max(1);
    let total: u64 = histogram.iter().sum();

    let mut best = (usize::MAX, range_bits);
    for width in 1..=range_bits {
        let num_exceptions: u64 = histogram[width + 1..].iter().sum();
        if total > 0 && num_exceptions == total {
            continue;
        }
        let cost = packed_size::<T>(total as usize, width as u8, Codec::Ffor, CodecFunction::Prelude)?
            + num_exceptions as usize * size_of::<T>();
        if cost < best.0 {
            best = (cost, width);
        }
    }
    Ok(best.1 as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::stats;

    #[test]
    fn packs_offsets_from_reference() {
        let values = [100u32, 105, 115, 102];
        let mut packed = vec![0u8; encoded_size_in_bytes::<u32>(4, 4).unwrap()];
        let written = encode(&values, 100, 4, &mut packed).unwrap();
        assert_eq!(written.num_exceptions, 0);
        assert_eq!(written.written.bytes_written, 512);
        assert_eq!(written.written.bit_size_per_element, 4);

        // the packed offsets are what plain unpacking sees
        let mut offsets = [0u32; 4];
        crate::codecs::packed_ints::decode(&packed, 4, 4, &mut offsets).unwrap();
        assert_eq!(offsets, [0, 5, 15, 2]);

        let mut decoded = [0u32; 4];
        decode(&packed, 4, 100, 4, &mut decoded).unwrap();
        assert_eq!(decoded, values);
        assert_eq!(unpack_single(&packed, 4, 100u32, 4, 2), Ok(115));
    }

    #[test]
    fn signed_columns_with_exceptions() {
        let values: Vec<i16> = (0..3000)
            .map(|i| match i % 500 {
                0 => i16::MIN,
                1 => i16::MAX,
                _ => -300 + (i % 50) as i16,
            })
            .collect();
        let min_val = -300i16;
        let size = encoded_size_in_bytes::<u16>(values.len(), 6).unwrap();
        let mut packed = vec![0u8; size];
        let written = encode(&values, min_val, 6, &mut packed).unwrap();
        assert_eq!(written.num_exceptions, 12);

        let mut exc_values = vec![0i16; written.num_exceptions];
        let mut bitset = vec![0u8; exceptions::bitset_len(values.len())];
        let (vals, bits) = collect_exceptions(
            &values,
            min_val,
            6,
            written.num_exceptions,
            &mut exc_values,
            &mut bitset,
        )
        .unwrap();
        assert_eq!(vals.num_elements, 12);
        assert_eq!(bits.num_elements, 12);
        assert_eq!(&exc_values[..2], &[i16::MIN, i16::MAX]);
        assert_eq!(
            exceptions::set_indices(&bitset, values.len()).take(3).collect::<Vec<_>>(),
            vec![0, 1, 500]
        );

        let mut decoded = vec![0i16; values.len()];
        decode_patched(
            &packed,
            values.len(),
            min_val,
            6,
            &bitset,
            &exc_values,
            &mut decoded,
        )
        .unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn wrong_exception_count() {
        let values = [1u8, 200, 3];
        let mut exc_values = [0u8; 2];
        let mut bitset = [0u8; 1];
        assert_eq!(
            collect_exceptions(&values, 0, 4, 2, &mut exc_values, &mut bitset),
            Err(CodecError::InvalidInput(
                Codec::Ffor,
                CodecFunction::CollectExceptions
            ))
        );
        assert_eq!(
            collect_exceptions(&values, 0, 4, 2, &mut exc_values[..1], &mut bitset),
            Err(CodecError::OutputBufferTooSmall(
                Codec::Ffor,
                CodecFunction::CollectExceptions
            ))
        );
    }

    #[test]
    fn size_checks() {
        let values = [5i64; 10];
        let size = encoded_size_in_bytes::<u64>(10, 3).unwrap();
        let mut packed = vec![0u8; size];
        assert!(matches!(
            encode(&values, 0, 3, &mut packed[..size - 1]),
            Err(CodecError::OutputBufferTooSmall(..))
        ));
        assert!(matches!(
            encode(&values, 0, 65, &mut packed),
            Err(CodecError::InvalidInput(..))
        ));
        encode(&values, 0, 3, &mut packed).unwrap();

        let mut decoded = [0i64; 10];
        assert!(matches!(
            decode(&packed[..size - 1], 10, 0, 3, &mut decoded),
            Err(CodecError::InvalidInput(..))
        ));
        assert!(matches!(
            decode(&packed, 10, 0, 3, &mut decoded[..9]),
            Err(CodecError::OutputBufferTooSmall(..))
        ));
        assert!(matches!(
            unpack_single(&packed, 1025, 0i64, 3, 1024),
            Err(CodecError::InvalidInput(..))
        ));
    }

    #[test]
    fn single_values_past_the_column() {
        let values = [9u64; 10];
        let mut packed = vec![0u8; encoded_size_in_bytes::<u64>(10, 64).unwrap()];
        encode(&values, 0, 64, &mut packed).unwrap();
        assert_eq!(unpack_single(&packed, 10, 0u64, 64, 9), Ok(9));

        let invalid = Err(CodecError::InvalidInput(Codec::Ffor, CodecFunction::DecodeSingle));
        // inside the padded block, but not part of the column
        assert_eq!(unpack_single(&packed, 10, 0u64, 64, 10), invalid);
        assert_eq!(unpack_single(&packed, 10, 0u64, 64, 500), invalid);
        // a block offset that does not fit in usize
        assert_eq!(unpack_single(&packed, usize::MAX, 0u64, 64, usize::MAX - 1), invalid);
        assert_eq!(unpack_single(&packed, 10, 0u64, 64, usize::MAX), invalid);
    }

    #[test]
    fn best_bit_width() {
        // 2000 small values plus a handful of outliers: packing the outliers is not worth it
        let mut values: Vec<u32> = (0..2000).map(|i| 1000 + i % 16).collect();
        values.extend([1_000_000, 2_000_000, 3_000_000]);
        let min = stats::min(&values).unwrap();
        let max = stats::max(&values).unwrap();
        let mut histogram = [0u64; 33];
        stats::bit_width_histogram(&values, min, &mut histogram).unwrap();
        assert_eq!(find_best_bit_width(&histogram, min, max), Ok(4));

        // a constant column still needs one bit
        let mut histogram = [0u64; 9];
        stats::bit_width_histogram(&[7i8; 5], 7, &mut histogram).unwrap();
        assert_eq!(find_best_bit_width(&histogram, 7i8, 7), Ok(1));

        assert!(find_best_bit_width(&histogram, 8i8, 7).is_err());

        // a column spanning the whole type packs at full width with no exceptions
        let values: Vec<i8> = (0..1024).map(|i| i as i8).collect();
        let min = stats::min(&values).unwrap();
        let max = stats::max(&values).unwrap();
        stats::bit_width_histogram(&values, min, &mut histogram).unwrap();
        assert_eq!(histogram[8], 512);
        assert_eq!(find_best_bit_width(&histogram, min, max), Ok(8));
        assert!(find_best_bit_width(&histogram[..8], 7i8, 7).is_err());
    }
}
