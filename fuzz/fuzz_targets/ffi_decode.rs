#![no_main]

//! Feeds arbitrary packed bytes and run ends through the C entry points; they must report an
//! error or succeed, never crash.

use libfuzzer_sys::fuzz_target;
use lwcodec::codecs::AlignedBuffer;
use lwcodec::ffi::{
    lwcodec_ffor_decode_i32, lwcodec_ree_decode_u16_u32, CByteBuffer, COneBufferResult,
};

fuzz_target!(|input: (Vec<u8>, Vec<u32>, u16, u8, i32)| {
    let (bytes, run_ends, num_elems, num_bits, min_val) = input;

    let mut packed = AlignedBuffer::from_slice(&bytes).unwrap();
    let packed = CByteBuffer::from(&mut packed);
    let mut output = AlignedBuffer::zeroed(usize::from(num_elems) * 4).unwrap();
    let mut result = COneBufferResult::new((&mut output).into());
    unsafe {
        lwcodec_ffor_decode_i32(&packed, u64::from(num_elems), num_bits, min_val, &mut result);
    }

    let values = AlignedBuffer::from_slice(&vec![7u16; run_ends.len()]).unwrap();
    let ends = AlignedBuffer::from_slice(&run_ends).unwrap();
    let mut output = AlignedBuffer::zeroed(4096).unwrap();
    let mut result = COneBufferResult::new((&mut output).into());
    unsafe {
        lwcodec_ree_decode_u16_u32(
            values.typed::<u16>().as_ptr(),
            ends.typed::<u32>().as_ptr(),
            run_ends.len() as u64,
            &mut result,
        );
    }
});
