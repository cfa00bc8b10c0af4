//! Exception lists shared by ALP, `PackedInts` and FFOR.
//!
//! Exception positions are a bitset of `ceil(len / 8)` bytes where element `i` is bit `i % 8`
//! (least significant first) of byte `i / 8`. Exception values live in a separate dense buffer,
//! in ascending position order. Both are owned by the caller; the codecs only fill or read them.

use arrow_buffer::bit_chunk_iterator::UnalignedBitChunk;
use arrow_buffer::bit_iterator::BitIndexIterator;
use arrow_buffer::bit_util;

use crate::codecs::{Codec, CodecError, CodecFunction, CodecResult, NativeType, WrittenBuffer};

/// Bytes needed for an exception bitset covering `len` elements.
pub const fn bitset_len(len: usize) -> usize {
    len.div_ceil(8)
}

/// Returns whether element `index` is marked in `bitset`; positions past its end are not.
#[inline]
pub fn is_set(bitset: &[u8], index: usize) -> bool {
    index / 8 < bitset.len() && bit_util::get_bit(bitset, index)
}

#[inline]
pub(crate) fn set(bitset: &mut [u8], index: usize) {
    bit_util::set_bit(bitset, index);
}

/// Number of marked positions.
pub fn count(bitset: &[u8]) -> usize {
    UnalignedBitChunk::new(bitset, 0, bitset.len() * 8).count_ones()
}

/// Iterates the marked positions below `len` in ascending order.
///
/// Positions past the end of `bitset` are never yielded.
pub fn set_indices(bitset: &[u8], len: usize) -> impl Iterator<Item = usize> + '_ {
    BitIndexIterator::new(bitset, 0, len.min(bitset.len() * 8))
}

/// Gathers the values of `column` at the positions marked in `bitset` into `out`.
///
/// This is how ALP exceptions are materialized: the encoder only marks positions, and the
/// original values are taken from the column that was encoded.
pub fn gather<T: NativeType>(
    column: &[T],
    bitset: &[u8],
    out: &mut [T],
) -> CodecResult<WrittenBuffer> {
    if bitset.len() < bitset_len(column.len()) {
        return Err(CodecError::InvalidInput(
            Codec::Exceptions,
            CodecFunction::CollectExceptions,
        ));
    }
    let mut written = 0;
    for idx in set_indices(bitset, column.len()) {
        let slot = out.get_mut(written).ok_or(CodecError::OutputBufferTooSmall(
            Codec::Exceptions,
            CodecFunction::CollectExceptions,
        ))?;
        *slot = column[idx];
        written += 1;
    }
    Ok(WrittenBuffer::of_elements::<T>(written, size_of_val(column)))
}

/// Overwrites the marked positions of `decoded` with `values`, in order.
///
/// `values` must hold exactly one value per marked position.
pub fn patch<T: NativeType>(decoded: &mut [T], bitset: &[u8], values: &[T]) -> CodecResult<()> {
    let invalid = CodecError::InvalidInput(Codec::Exceptions, CodecFunction::Patch);
    if bitset.len() < bitset_len(decoded.len()) {
        return Err(invalid);
    }
    let mut values = values.iter();
    for idx in set_indices(bitset, decoded.len()) {
        decoded[idx] = *values.next().ok_or(invalid)?;
    }
    if values.next().is_some() {
        return Err(invalid);
    }
    Ok(())
}
