//! Single-pass scan kernels used to choose an encoding for a column.
//!
//! The kernels work on [`NativeType::OrdKey`]s, so floating-point columns are ordered by IEEE 754
//! `totalOrder` and compared by bits: `-0.0 < 0.0`, NaNs sort to the ends according to their sign
//! and are never skipped. Inner loops run over fixed-size lanes without early exits so they
//! vectorize for each element width; early exits happen between lanes.

use crate::codecs::{
    Codec, CodecError, CodecFunction, CodecResult, NativeInt, NativeType, NativeUnsigned as _,
};

/// Number of elements processed per unrolled step.
const LANES: usize = 32;

/// Aggregate run structure of a column: `run_count` maximal runs of identical values covering
/// `run_element_count` elements.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunLengthStats {
    pub run_count: u64,
    pub run_element_count: u64,
}

impl RunLengthStats {
    /// Average run length, or 0 for an empty column.
    pub fn average_run_length(&self) -> f64 {
        if self.run_count == 0 {
            0.0
        } else {
            self.run_element_count as f64 / self.run_count as f64
        }
    }
}

/// Largest value of the column.
pub fn max<T: NativeType>(values: &[T]) -> CodecResult<T> {
    reduce(values, Ord::max)
}

/// Smallest value of the column.
pub fn min<T: NativeType>(values: &[T]) -> CodecResult<T> {
    reduce(values, Ord::min)
}

fn reduce<T: NativeType>(
    values: &[T],
    pick: fn(T::OrdKey, T::OrdKey) -> T::OrdKey,
) -> CodecResult<T> {
    let Some(first) = values.first() else {
        return Err(CodecError::InvalidInput(Codec::Stats, CodecFunction::Scan));
    };

    let mut acc = [first.ord_key(); LANES];
    let chunks = values.chunks_exact(LANES);
    let remainder = chunks.remainder();
    for chunk in chunks {
        for (a, v) in acc.iter_mut().zip(chunk) {
            *a = pick(*a, v.ord_key());
        }
    }
    let best = remainder
        .iter()
        .map(|v| v.ord_key())
        .chain(acc)
        .fold(first.ord_key(), pick);
    Ok(T::from_ord_key(best))
}

/// Returns `true` if the column is non-decreasing. Empty and single-element columns are sorted.
pub fn is_sorted<T: NativeType>(values: &[T]) -> bool {
    all_adjacent(values, |prev, next| prev.ord_key() <= next.ord_key())
}

/// Returns `true` if every element is identical to the first. Empty columns are constant.
pub fn is_constant<T: NativeType>(values: &[T]) -> bool {
    let Some(first) = values.first() else {
        return true;
    };
    let key = first.ord_key();
    values
        .chunks(LANES)
        .all(|lane| lane.iter().fold(true, |acc, v| acc & (v.ord_key() == key)))
}

/// Checks `pred` over every adjacent pair, one lane of pairs at a time.
fn all_adjacent<T: NativeType>(values: &[T], pred: impl Fn(T, T) -> bool) -> bool {
    let mut start = 1;
    while start < values.len() {
        let end = (start + LANES).min(values.len());
        let lane_ok = values[start - 1..end]
            .windows(2)
            .fold(true, |acc, w| acc & pred(w[0], w[1]));
        if !lane_ok {
            return false;
        }
        start = end;
    }
    true
}

/// Counts runs of identical values.
pub fn run_length_stats<T: NativeType>(values: &[T]) -> RunLengthStats {
    if values.is_empty() {
        return RunLengthStats::default();
    }
    let boundaries: u64 = values
        .windows(2)
        .map(|w| u64::from(!w[0].is_identical(w[1])))
        .sum();

    RunLengthStats {
        run_count: boundaries + 1,
        run_element_count: values.len() as u64,
    }
}

/// Histogram of bit widths of `value - reference` for an integer column.
///
/// `out[b]` receives the number of elements whose offset from `reference` needs exactly `b` bits;
/// `out` must hold `T::BITS + 1` counters. Elements below `reference` cannot be expressed as an
/// offset and are counted at full width, so they are indistinguishable from offsets that really
/// need `T::BITS` bits. For [`ffor::find_best_bit_width`](crate::codecs::ffor::find_best_bit_width)
/// take the histogram against the column minimum, where no such elements exist; with
/// `reference = 0` on an unsigned column it describes plain packing.
pub fn bit_width_histogram<T: NativeInt>(
    values: &[T],
    reference: T,
    out: &mut [u64],
) -> CodecResult<()> {
    if out.len() != T::BITS + 1 {
        return Err(CodecError::InvalidInput(Codec::Stats, CodecFunction::Scan));
    }
    out.fill(0);
    for v in values {
        let width = v.offset_from(reference).map_or(T::BITS, |o| o.bit_width());
        out[width] += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_on_empty_is_invalid() {
        let empty: [u32; 0] = [];
        assert_eq!(
            max(&empty),
            Err(CodecError::InvalidInput(Codec::Stats, CodecFunction::Scan))
        );
        assert!(min(&empty).is_err());
    }

    #[test]
    fn min_max_cover_remainder() {
        let mut values: Vec<i16> = (0..100).collect();
        values[99] = -7;
        values[3] = 512;
        assert_eq!(min(&values).unwrap(), -7);
        assert_eq!(max(&values).unwrap(), 512);
    }

    #[test]
    fn floats_use_total_order() {
        let values = [1.0f64, -0.0, 0.0, f64::NAN, -3.5];
        assert_eq!(max(&values).unwrap().to_bits(), f64::NAN.to_bits());
        assert_eq!(min(&values).unwrap(), -3.5);
        assert!(is_sorted(&[-0.0f32, 0.0]));
        assert!(!is_sorted(&[0.0f32, -0.0]));
        assert!(!is_constant(&[0.0f32, -0.0]));
    }

    #[test]
    fn sortedness_across_lane_boundaries() {
        let mut values: Vec<u8> = (0..=200).collect();
        assert!(is_sorted(&values));
        values[LANES] = 0;
        assert!(!is_sorted(&values));
        assert!(is_sorted::<u8>(&[]));
        assert!(is_sorted(&[9u8]));
        assert!(is_sorted(&[3u8, 3, 3]));
    }

    #[test]
    fn constant() {
        assert!(is_constant::<i64>(&[]));
        assert!(is_constant(&[4i64; 77]));
        let mut values = [4i64; 77];
        values[76] = 5;
        assert!(!is_constant(&values));
    }

    #[test]
    fn runs() {
        let stats = run_length_stats(&[1u8, 1, 1, 2, 2, 5]);
        assert_eq!(
            stats,
            RunLengthStats {
                run_count: 3,
                run_element_count: 6
            }
        );
        assert_eq!(stats.average_run_length(), 2.0);
        assert_eq!(run_length_stats::<u8>(&[]), RunLengthStats::default());
    }

    #[test]
    fn histogram() {
        let mut out = [0u64; 9];
        bit_width_histogram(&[100u8, 101, 103, 99, 255], 100, &mut out).unwrap();
        assert_eq!(out, [1, 1, 1, 0, 0, 0, 0, 0, 2]);

        let mut wrong = [0u64; 8];
        assert!(bit_width_histogram(&[1u8], 0, &mut wrong).is_err());
    }
}
