#![allow(dead_code)]

use lwcodec::codecs::{AlignedBuffer, NativeType};
use rand::distr::uniform::SampleUniform;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

pub const SEED: u64 = 456;

/// Lengths that cover empty columns, partial blocks and block boundaries.
pub const LENGTHS: &[usize] = &[0, 1, 7, 1023, 1024, 1025, 3000];

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

/// Uniformly random values over the whole type.
pub fn uniform<T>(len: usize) -> Vec<T>
where
    StandardUniform: Distribution<T>,
{
    rng().random_iter().take(len).collect()
}

/// Uniformly random values from `low..=high`.
pub fn in_range<T: SampleUniform + Copy + PartialOrd>(len: usize, low: T, high: T) -> Vec<T> {
    let mut rng = rng();
    (0..len).map(|_| rng.random_range(low..=high)).collect()
}

/// Runs of random length (1..=max_run) drawn from a small alphabet.
pub fn runs<T: Copy>(len: usize, alphabet: &[T], max_run: usize) -> Vec<T> {
    let mut rng = rng();
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        let value = alphabet[rng.random_range(0..alphabet.len())];
        let run = rng.random_range(1..=max_run).min(len - out.len());
        out.extend(std::iter::repeat_n(value, run));
    }
    out
}

/// Decimal values with `digits` fractional digits, as a price or sensor column would hold.
pub fn decimals(len: usize, digits: i32) -> Vec<f64> {
    let mut rng = rng();
    let scale = 10f64.powi(digits);
    (0..len)
        .map(|_| rng.random_range(-100_000i64..100_000) as f64 / scale)
        .collect()
}

/// Copies `values` into a buffer aligned for the C entry points.
pub fn aligned<T: NativeType>(values: &[T]) -> AlignedBuffer {
    AlignedBuffer::from_slice(values).unwrap()
}

/// A zeroed aligned buffer of exactly `len` bytes.
pub fn scratch(len: usize) -> AlignedBuffer {
    AlignedBuffer::zeroed(len).unwrap()
}
