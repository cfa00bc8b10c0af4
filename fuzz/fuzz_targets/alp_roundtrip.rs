#![no_main]

use libfuzzer_sys::fuzz_target;
use lwcodec::codecs::alp::{self, AlpExponents};
use lwcodec::codecs::exceptions;

fuzz_target!(|input: (Vec<f64>, Option<(u8, u8)>)| {
    let (data, exponents) = input;
    let data: Vec<f64> = data.into_iter().take(10_000).collect();

    let exponents = match exponents {
        Some((e, f)) => {
            let exponents = AlpExponents { e: e % 19, f: f % 19 };
            if !exponents.is_valid_for::<f64>() {
                return;
            }
            exponents
        }
        None => match alp::sample_find_exponents(&data) {
            Ok(exponents) => exponents,
            Err(_) => return,
        },
    };

    let mut encoded = vec![0i64; data.len()];
    let mut bitset = vec![0u8; exceptions::bitset_len(data.len())];
    let (_, bitset_written) = alp::encode(&data, exponents, &mut encoded, &mut bitset)
        .expect("Encoding should succeed");

    let mut exc_values = vec![0f64; bitset_written.num_elements];
    exceptions::gather(&data, &bitset, &mut exc_values).expect("Gather should succeed");

    let mut decoded = vec![0f64; data.len()];
    alp::decode_patched(&encoded, exponents, &bitset, &exc_values, &mut decoded)
        .expect("Decoding should succeed");

    for (i, (original, restored)) in data.iter().zip(&decoded).enumerate() {
        assert_eq!(
            original.to_bits(),
            restored.to_bits(),
            "Mismatch at index {i} with {exponents:?}"
        );
    }
});
