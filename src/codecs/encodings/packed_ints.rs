//! Dense fixed-width packing of unsigned integers.
//!
//! Values that need more than `num_bits` bits are exceptions. Their packed slot keeps only the
//! low `num_bits` bits, and their positions and values are extracted by a separate
//! [`collect_exceptions`] pass run with the same width.

use crate::codecs::ffor::{
    collect_frame_exceptions, decode_frame, encode_frame, unpack_single_frame, PackedWritten,
};
use crate::codecs::{exceptions, Codec, CodecResult, NativeUnsigned, WrittenBuffer};

/// Packs `values` at `num_bits` bits each into `output`.
///
/// `output` must hold [`encoded_size_in_bytes`](crate::codecs::bitpacking::encoded_size_in_bytes)
/// bytes.
pub fn encode<T: NativeUnsigned>(
    values: &[T],
    num_bits: u8,
    output: &mut [u8],
) -> CodecResult<PackedWritten> {
    encode_frame(values, T::zero(), num_bits, output, Codec::PackedInts)
}

/// Writes the values and the position bitset of the `num_exceptions` values that do not fit in
/// `num_bits`.
pub fn collect_exceptions<T: NativeUnsigned>(
    values: &[T],
    num_bits: u8,
    num_exceptions: usize,
    exception_values: &mut [T],
    exception_bitset: &mut [u8],
) -> CodecResult<(WrittenBuffer, WrittenBuffer)> {
    collect_frame_exceptions(
        values,
        T::zero(),
        num_bits,
        num_exceptions,
        exception_values,
        exception_bitset,
        Codec::PackedInts,
    )
}

/// Unpacks exactly `num_elements` values.
///
/// Exceptions are NOT patched; see [`decode_patched`].
pub fn decode<T: NativeUnsigned>(
    packed: &[u8],
    num_elements: usize,
    num_bits: u8,
    output: &mut [T],
) -> CodecResult<WrittenBuffer> {
    decode_frame(
        packed,
        num_elements,
        T::zero(),
        num_bits,
        output,
        Codec::PackedInts,
    )
}

/// [`decode`] followed by patching the exceptions recorded by [`collect_exceptions`].
pub fn decode_patched<T: NativeUnsigned>(
    packed: &[u8],
    num_elements: usize,
    num_bits: u8,
    exception_bitset: &[u8],
    exception_values: &[T],
    output: &mut [T],
) -> CodecResult<WrittenBuffer> {
    let written = decode(packed, num_elements, num_bits, output)?;
    exceptions::patch(
        &mut output[..num_elements],
        exception_bitset,
        exception_values,
    )?;
    Ok(written)
}

/// Reads the element at `index` from a packed column of `num_elements`.
pub fn unpack_single<T: NativeUnsigned>(
    packed: &[u8],
    num_elements: usize,
    num_bits: u8,
    index: usize,
) -> CodecResult<T> {
    unpack_single_frame(
        packed,
        num_elements,
        T::zero(),
        num_bits,
        index,
        Codec::PackedInts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::bitpacking::encoded_size_in_bytes;
    use crate::codecs::{CodecError, CodecFunction};

    #[test]
    fn sequential_block() {
        let values: Vec<u32> = (0..1024).collect();
        let size = encoded_size_in_bytes::<u32>(values.len(), 10).unwrap();
        assert_eq!(size, 1280);
        let mut packed = vec![0u8; size];
        let written = encode(&values, 10, &mut packed).unwrap();
        assert_eq!(written.num_exceptions, 0);
        assert_eq!(written.written.bytes_written, 1280);
        assert_eq!(written.written.num_elements, 1024);
        assert_eq!(written.written.input_bytes_used, 4096);

        let mut decoded = vec![0u32; values.len()];
        decode(&packed, values.len(), 10, &mut decoded).unwrap();
        assert_eq!(decoded, values);
        assert_eq!(unpack_single::<u32>(&packed, 1024, 10, 777), Ok(777));
    }

    #[test]
    fn single_value_in_block_padding() {
        let values: Vec<u32> = (0..10).collect();
        let mut packed = vec![0u8; encoded_size_in_bytes::<u32>(values.len(), 4).unwrap()];
        encode(&values, 4, &mut packed).unwrap();
        assert_eq!(unpack_single::<u32>(&packed, 10, 4, 9), Ok(9));
        assert_eq!(
            unpack_single::<u32>(&packed, 10, 4, 500),
            Err(CodecError::InvalidInput(
                Codec::PackedInts,
                CodecFunction::DecodeSingle
            ))
        );
        assert!(unpack_single::<u32>(&packed, usize::MAX, 4, usize::MAX - 1).is_err());
    }

    #[test]
    fn exceptions_keep_low_bits() {
        let values = [1u8, 2, 0b1111_0011, 3, 200];
        let mut packed = vec![0u8; encoded_size_in_bytes::<u8>(values.len(), 2).unwrap()];
        let written = encode(&values, 2, &mut packed).unwrap();
        assert_eq!(written.num_exceptions, 2);

        let mut raw = [0u8; 5];
        decode(&packed, 5, 2, &mut raw).unwrap();
        assert_eq!(raw, [1, 2, 0b11, 3, 0]);

        let mut exc_values = [0u8; 2];
        let mut bitset = [0xffu8; 1];
        collect_exceptions(&values, 2, 2, &mut exc_values, &mut bitset).unwrap();
        assert_eq!(exc_values, [0b1111_0011, 200]);
        assert_eq!(bitset, [0b0001_0100]);

        let mut decoded = [0u8; 5];
        decode_patched(&packed, 5, 2, &bitset, &exc_values, &mut decoded).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn errors_name_packed_ints() {
        let mut packed = [0u8; 128];
        assert_eq!(
            encode(&[1u16], 0, &mut packed),
            Err(CodecError::InvalidInput(
                Codec::PackedInts,
                CodecFunction::Encode
            ))
        );
        let mut decoded = [0u16; 1];
        assert_eq!(
            decode(&packed[..64], 1, 1, &mut decoded),
            Err(CodecError::InvalidInput(
                Codec::PackedInts,
                CodecFunction::Decode
            ))
        );
    }

    #[test]
    fn empty_column() {
        let mut packed = [0u8; 0];
        let written = encode::<u64>(&[], 7, &mut packed).unwrap();
        assert_eq!(written.written.bytes_written, 0);
        let mut decoded = [0u64; 0];
        decode(&packed, 0, 7, &mut decoded).unwrap();
    }
}
