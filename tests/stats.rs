mod common;

use common::{in_range, runs, uniform, LENGTHS};
use lwcodec::codecs::{stats, NativeType, RunLengthStats};

/// Straightforward scans the vectorized kernels must agree with.
fn check_against_scan<T: NativeType>(values: &[T]) {
    let keys: Vec<_> = values.iter().map(|v| v.ord_key()).collect();

    match keys.iter().max() {
        Some(&max) => {
            assert!(stats::max(values).unwrap().is_identical(T::from_ord_key(max)));
            let min = *keys.iter().min().unwrap();
            assert!(stats::min(values).unwrap().is_identical(T::from_ord_key(min)));
        }
        None => {
            assert!(stats::max(values).is_err());
            assert!(stats::min(values).is_err());
        }
    }

    assert_eq!(stats::is_sorted(values), keys.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(stats::is_constant(values), keys.windows(2).all(|w| w[0] == w[1]));

    let run_count = if keys.is_empty() {
        0
    } else {
        1 + keys.windows(2).filter(|w| w[0] != w[1]).count() as u64
    };
    assert_eq!(
        stats::run_length_stats(values),
        RunLengthStats {
            run_count,
            run_element_count: values.len() as u64,
        }
    );
}

#[test]
fn kernels_match_plain_scans() {
    for &len in LENGTHS {
        check_against_scan(&uniform::<u8>(len));
        check_against_scan(&runs(len, &[-3i16, 4, i16::MIN], 50));
        check_against_scan(&uniform::<u32>(len));
        check_against_scan(&in_range::<i64>(len, -5, 5));
        check_against_scan(&uniform::<f32>(len));
        check_against_scan(&runs(len, &[f64::NAN, -f64::NAN, -0.0, 0.0, 2.5], 3));

        let mut sorted = uniform::<i32>(len);
        sorted.sort_unstable();
        check_against_scan(&sorted);
        check_against_scan(&vec![9u16; len]);
    }
}

#[test]
fn nan_sign_orders_to_the_ends() {
    let values = [1.0f32, -f32::NAN, f32::NAN, -1.0];
    assert!(stats::max(&values).unwrap().is_nan());
    assert!(stats::max(&values).unwrap().is_sign_positive());
    assert!(stats::min(&values).unwrap().is_sign_negative());
    assert!(stats::min(&values).unwrap().is_nan());
}

#[test]
fn histogram_counts_every_element() {
    let values = in_range::<u16>(5000, 300, 2000);
    let mut histogram = [0u64; 17];
    stats::bit_width_histogram(&values, 300, &mut histogram).unwrap();
    assert_eq!(histogram.iter().sum::<u64>(), 5000);
    assert!(histogram[12..].iter().all(|&c| c == 0));
}

#[test]
fn histogram_puts_values_below_reference_at_full_width() {
    let values = in_range::<u16>(5000, 300, 2000);
    let below = values.iter().filter(|&&v| v < 1000).count() as u64;
    let mut histogram = [0u64; 17];
    stats::bit_width_histogram(&values, 1000, &mut histogram).unwrap();
    assert_eq!(histogram[16], below);
    assert_eq!(histogram.iter().sum::<u64>(), 5000);
}
