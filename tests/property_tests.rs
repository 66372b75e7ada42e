//! Property-based tests using proptest.
//!
//! These tests verify invariants of splitting, statistics, metrics and
//! preprocessing.

use progression::metrics::classification::{binarize, BinaryConfusion};
use progression::model_selection::train_test_split;
use progression::prelude::*;
use progression::stats::DescriptiveStats;
use proptest::prelude::*;

// Strategy for generating small matrices
fn matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = Matrix<f32>> {
    proptest::collection::vec(-100.0f32..100.0, rows * cols).prop_map(move |data| {
        Matrix::from_vec(rows, cols, data).expect("Test data should be valid")
    })
}

// Strategy for generating vectors
fn vector_strategy(len: usize) -> impl Strategy<Value = Vector<f32>> {
    proptest::collection::vec(-100.0f32..100.0, len).prop_map(Vector::from_vec)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn split_partitions_every_row(
        n in 8usize..120,
        test_size in 0.05f64..0.75,
        seed in any::<u64>(),
    ) {
        let x = Matrix::from_vec(n, 1, (0..n).map(|i| i as f32).collect()).unwrap();
        let y = Vector::from_vec((0..n).map(|i| i as f32).collect());
        let split = train_test_split(&x, &y, test_size, Some(seed)).unwrap();

        let expected_test = (n as f64 * test_size).ceil() as usize;
        prop_assert_eq!(split.y_test.len(), expected_test);
        prop_assert_eq!(split.y_train.len() + split.y_test.len(), n);

        let mut seen: Vec<f32> = split.y_train.iter().chain(split.y_test.iter()).copied().collect();
        seen.sort_by(f32::total_cmp);
        let all: Vec<f32> = (0..n).map(|i| i as f32).collect();
        prop_assert_eq!(seen, all);
    }

    #[test]
    fn split_is_deterministic_for_a_seed(seed in any::<u64>()) {
        let x = Matrix::from_vec(30, 1, (0..30).map(|i| i as f32).collect()).unwrap();
        let y = Vector::from_vec((0..30).map(|i| i as f32).collect());
        let a = train_test_split(&x, &y, 0.2, Some(seed)).unwrap();
        let b = train_test_split(&x, &y, 0.2, Some(seed)).unwrap();
        prop_assert_eq!(a.y_test.as_slice(), b.y_test.as_slice());
    }

    #[test]
    fn quantile_is_bounded_by_extremes(v in vector_strategy(25), q in 0.0f64..=1.0) {
        let value = DescriptiveStats::new(&v).quantile(q).unwrap();
        let min = v.iter().copied().fold(f32::INFINITY, f32::min);
        let max = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        prop_assert!(value >= min && value <= max, "{} not in [{}, {}]", value, min, max);
    }

    #[test]
    fn quantile_is_monotone(v in vector_strategy(25), a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let stats = DescriptiveStats::new(&v);
        prop_assert!(stats.quantile(lo).unwrap() <= stats.quantile(hi).unwrap());
    }

    #[test]
    fn rmse_is_non_negative_and_zero_on_self(a in vector_strategy(20), b in vector_strategy(20)) {
        prop_assert!(rmse(&a, &b) >= 0.0);
        prop_assert!(rmse(&a, &a).abs() < 1e-6);
        prop_assert!((rmse(&a, &b) - mse(&a, &b).sqrt()).abs() < 1e-2);
    }

    #[test]
    fn precision_and_recall_stay_in_unit_interval(
        pred in vector_strategy(30),
        truth in vector_strategy(30),
        threshold in -100.0f32..100.0,
    ) {
        let confusion = BinaryConfusion::from_flags(
            &binarize(pred.as_slice(), threshold),
            &binarize(truth.as_slice(), threshold),
        );
        prop_assert!((0.0..=1.0).contains(&confusion.precision()));
        prop_assert!((0.0..=1.0).contains(&confusion.recall()));
    }

    #[test]
    fn standard_scaler_centers_columns(x in matrix_strategy(20, 3)) {
        let z = StandardScaler::new().fit_transform(&x).unwrap();
        for j in 0..3 {
            let mean = (0..20).map(|i| f64::from(z.get(i, j))).sum::<f64>() / 20.0;
            prop_assert!(mean.abs() < 1e-3, "column {} mean {}", j, mean);
        }
    }

    #[test]
    fn forest_predictions_stay_within_target_range(
        x in matrix_strategy(15, 2),
        y in vector_strategy(15),
    ) {
        let mut forest = RandomForestRegressor::new(5).with_random_state(7);
        forest.fit(&x, &y).unwrap();
        let min = y.iter().copied().fold(f32::INFINITY, f32::min);
        let max = y.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        for p in forest.predict(&x).unwrap().iter() {
            prop_assert!(*p >= min - 1e-3 && *p <= max + 1e-3);
        }
    }
}
