#![no_main]

use libfuzzer_sys::fuzz_target;
use lwcodec::codecs::bitpacking::encoded_size_in_bytes;
use lwcodec::codecs::{exceptions, ffor, stats};

mod common;
use common::{FuzzInput, Packing};

fuzz_target!(|input: FuzzInput<Packing>| {
    // Limit input size to avoid timeouts
    let data: Vec<u32> = input.data.into_iter().take(10_000).collect();

    let (min_val, num_bits) = match input.params {
        Packing::PackedInts { num_bits } => (0, num_bits % 33),
        Packing::Ffor { min_val, num_bits } => (min_val, num_bits % 33),
        Packing::FforBest => {
            let (Ok(min), Ok(max)) = (stats::min(&data), stats::max(&data)) else {
                return;
            };
            let mut histogram = [0u64; 33];
            stats::bit_width_histogram(&data, min, &mut histogram).unwrap();
            (min, ffor::find_best_bit_width(&histogram, min, max).unwrap())
        }
    };

    let Ok(size) = encoded_size_in_bytes::<u32>(data.len(), num_bits) else {
        assert!(num_bits == 0 || num_bits > 32);
        return;
    };
    let mut packed = vec![0u8; size];
    let num_exceptions = ffor::encode(&data, min_val, num_bits, &mut packed)
        .expect("Encoding should succeed")
        .num_exceptions;

    let mut exc_values = vec![0u32; num_exceptions];
    let mut bitset = vec![0u8; exceptions::bitset_len(data.len())];
    ffor::collect_exceptions(
        &data,
        min_val,
        num_bits,
        num_exceptions,
        &mut exc_values,
        &mut bitset,
    )
    .expect("Collecting exceptions should succeed");

    let mut decoded = vec![0u32; data.len()];
    ffor::decode_patched(
        &packed,
        data.len(),
        min_val,
        num_bits,
        &bitset,
        &exc_values,
        &mut decoded,
    )
    .expect("Decoding should succeed");

    assert_eq!(
        data, decoded,
        "Round trip failed for {:?} with {} exceptions",
        input.params, num_exceptions
    );
});
