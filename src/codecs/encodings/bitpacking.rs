//! `FastLanes` bit-packing kernels.
//!
//! A column is cut into blocks of [`FL_BLOCK_LEN`] elements; the final block is zero padded. For
//! an element type of `T` bits a block is viewed as `LANES = 1024 / BITS` independent lanes of `BITS`
//! rows each: element `i` lives in lane `i % LANES`, row `i / LANES`. Each lane packs its rows
//! back to back, `W` bits per row, into `W` words of type `T`, and word `k` of every lane is
//! stored next to word `k` of its neighbours (index `k * LANES + lane`). A block therefore takes
//! exactly `128 * W` bytes, and the same row of every lane can be (un)packed with one wide vector
//! operation. Words are little-endian and read unaligned, so packed buffers need no alignment.

use crate::codecs::{Codec, CodecError, CodecFunction, CodecResult, NativeUnsigned};

/// Elements per `FastLanes` block.
pub const FL_BLOCK_LEN: usize = 1024;

/// Bytes one packed block occupies per bit of width.
const BLOCK_BYTES_PER_BIT: usize = FL_BLOCK_LEN / 8;

/// Returns whether `num_bits` is a valid packing width for `T`.
pub fn is_valid_bit_width<T: NativeUnsigned>(num_bits: u8) -> bool {
    (1..=T::BITS).contains(&usize::from(num_bits))
}

/// Exact byte size of `len` elements of `T` packed at `num_bits`, including block padding.
///
/// Callers must size packed buffers with this rather than computing `len * num_bits / 8`.
pub fn encoded_size_in_bytes<T: NativeUnsigned>(len: usize, num_bits: u8) -> CodecResult<usize> {
    let invalid = CodecError::InvalidInput(Codec::PackedInts, CodecFunction::Prelude);
    if !is_valid_bit_width::<T>(num_bits) {
        return Err(invalid);
    }
    len.div_ceil(FL_BLOCK_LEN)
        .checked_mul(BLOCK_BYTES_PER_BIT * usize::from(num_bits))
        .ok_or(invalid)
}

#[inline]
const fn lanes<T: NativeUnsigned>() -> usize {
    FL_BLOCK_LEN / T::BITS
}

/// Packs one full block of 1024 values into `output` (`128 * width` bytes).
///
/// Only the low `width` bits of each value are kept.
pub fn pack_block<T: NativeUnsigned>(input: &[T; FL_BLOCK_LEN], width: usize, output: &mut [u8]) {
    let lanes = lanes::<T>();
    let mask = T::low_mask(width);
    let mut words = [T::zero(); FL_BLOCK_LEN];

    for row in 0..T::BITS {
        let start_bit = row * width;
        let word = start_bit / T::BITS;
        let shift = start_bit % T::BITS;
        let spills = shift + width > T::BITS;
        for lane in 0..lanes {
            let src = input[row * lanes + lane] & mask;
            let at = word * lanes + lane;
            words[at] = words[at] | src << shift;
            if spills {
                let next = at + lanes;
                words[next] = words[next] | src >> (T::BITS - shift);
            }
        }
    }

    for (word, out) in words[..lanes * width]
        .iter()
        .zip(output.chunks_exact_mut(size_of::<T>()))
    {
        out.copy_from_slice(bytemuck::bytes_of(&word.to_le()));
    }
}

/// Unpacks one block of `128 * width` bytes into 1024 values.
pub fn unpack_block<T: NativeUnsigned>(input: &[u8], width: usize, output: &mut [T; FL_BLOCK_LEN]) {
    let lanes = lanes::<T>();
    let mask = T::low_mask(width);
    let mut words = [T::zero(); FL_BLOCK_LEN];
    for (word, bytes) in words[..lanes * width]
        .iter_mut()
        .zip(input.chunks_exact(size_of::<T>()))
    {
        *word = T::from_le(bytemuck::pod_read_unaligned(bytes));
    }

    for row in 0..T::BITS {
        let start_bit = row * width;
        let word = start_bit / T::BITS;
        let shift = start_bit % T::BITS;
        let spills = shift + width > T::BITS;
        for lane in 0..lanes {
            let mut value = words[word * lanes + lane] >> shift;
            if spills {
                value = value | words[(word + 1) * lanes + lane] << (T::BITS - shift);
            }
            output[row * lanes + lane] = value & mask;
        }
    }
}

/// Reads the element at `index` (within its block) straight from a packed block.
pub fn unpack_single_from_block<T: NativeUnsigned>(block: &[u8], width: usize, index: usize) -> T {
    let lanes = lanes::<T>();
    let size = size_of::<T>();
    let lane = index % lanes;
    let start_bit = (index / lanes) * width;
    let word = start_bit / T::BITS;
    let shift = start_bit % T::BITS;

    let read = |w: usize| {
        let at = (w * lanes + lane) * size;
        T::from_le(bytemuck::pod_read_unaligned(&block[at..at + size]))
    };
    let mut value = read(word) >> shift;
    if shift + width > T::BITS {
        value = value | read(word + 1) << (T::BITS - shift);
    }
    value & T::low_mask(width)
}
