//! End-to-end pipeline test: synthetic market levels through log
//! returns, sliding windows, persistence, landscape norms and storage.

use chrono::NaiveDate;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use tda_market_topology::{
    read_norms_csv, write_norms_csv, DiagramStore, LandscapeNorms,
    Pipeline, PipelineConfig, Series, TdaError,
};

fn trading_days(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2017, 5, 1).unwrap();
    (0..n)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

/// Deterministic synthetic market: three geometric random walks.
fn synthetic_levels(n_days: usize) -> Series {
    let mut rng = StdRng::seed_from_u64(42);
    let shock = Normal::<f64>::new(0.0, 0.01).unwrap();

    let mut values = Array2::<f64>::zeros((n_days, 3));
    let mut levels = [100.0, 250.0, 80.0];
    for day in 0..n_days {
        for (j, level) in levels.iter_mut().enumerate() {
            *level *= shock.sample(&mut rng).exp();
            values[[day, j]] = *level;
        }
    }
    Series::new(trading_days(n_days), values).unwrap()
}

#[test]
fn full_pipeline_produces_ordered_complete_table() {
    let returns = synthetic_levels(121).log_returns().unwrap();
    assert_eq!(returns.len(), 120);

    let config = PipelineConfig {
        window_size: 20,
        step: 10,
        ..PipelineConfig::default()
    };
    let expected_windows = (120 - 20) / 10 + 1;

    let metadata = returns.windows_metadata(20, 10).unwrap();
    assert_eq!(metadata.len(), expected_windows);

    let pipeline = Pipeline::new(config).unwrap();
    let output = pipeline.run(&returns).unwrap();

    assert_eq!(output.summary.windows_total, expected_windows);
    assert_eq!(output.summary.windows_failed, 0);

    let table = output.norms_table();
    assert_eq!(table.len(), expected_windows);

    for (row, meta) in table.rows.iter().zip(&metadata) {
        assert_eq!(row.window_index, meta.window_index);
        assert_eq!(row.start_date, meta.start_date);
        assert_eq!(row.end_date, meta.end_date);
        assert!(row.l1_norm >= 0.0);
        assert!(row.l2_norm >= 0.0);
        // Norms vanish together with the diagram.
        assert_eq!(row.l1_norm == 0.0, row.l2_norm == 0.0);
    }
}

#[test]
fn rerunning_is_bit_identical() {
    let returns = synthetic_levels(90).log_returns().unwrap();
    let pipeline = Pipeline::new(PipelineConfig {
        window_size: 15,
        step: 7,
        ..PipelineConfig::default()
    })
    .unwrap();

    let first = pipeline.run(&returns).unwrap();
    let second = pipeline.run(&returns).unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(first.norms_table(), second.norms_table());
}

#[test]
fn scaling_the_series_scales_the_norms() {
    // Multiplying the point clouds by c scales every birth/death by c,
    // L1 norms by c^2 and L2 norms by c^1.5.
    let returns = synthetic_levels(70).log_returns().unwrap();
    let c = 2.5;
    let scaled = Series::new(
        returns.dates().to_vec(),
        returns.values().mapv(|v| c * v),
    )
    .unwrap();

    let pipeline = Pipeline::new(PipelineConfig {
        window_size: 25,
        step: 25,
        ..PipelineConfig::default()
    })
    .unwrap();

    let base = pipeline.run(&returns).unwrap();
    let big = pipeline.run(&scaled).unwrap();
    assert_eq!(base.records.len(), big.records.len());

    let mut saw_nonzero = false;
    for (a, b) in base.records.iter().zip(&big.records) {
        assert_eq!(a.h1.len(), b.h1.len());
        for (&(b0, d0), &(b1, d1)) in a.h1.iter().zip(&b.h1) {
            assert!((b1 - c * b0).abs() < 1e-9);
            assert!((d1 - c * d0).abs() < 1e-9);
        }
        assert!((b.norms.l1 - c.powi(2) * a.norms.l1).abs() < 1e-9);
        assert!((b.norms.l2 - c.powf(1.5) * a.norms.l2).abs() < 1e-9);
        saw_nonzero |= a.norms.l1 > 0.0;
    }
    assert!(saw_nonzero, "expected at least one window with loops");
}

#[test]
fn diagrams_and_table_survive_storage() {
    let returns = synthetic_levels(60).log_returns().unwrap();
    let pipeline = Pipeline::new(PipelineConfig {
        window_size: 12,
        step: 12,
        ..PipelineConfig::default()
    })
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let store = DiagramStore::new(dir.path().join("persistence"), 3).unwrap();
    let output = pipeline.run_with_store(&returns, &store).unwrap();
    assert_eq!(output.summary.windows_failed, 0);

    // Every window's stored diagram matches the in-memory record, and
    // its norms are reproducible from the stored pairs alone.
    for record in &output.records {
        let stored = store.load_h1(record.window_index).unwrap();
        assert_eq!(stored, record.h1);
        let norms: LandscapeNorms =
            tda_market_topology::landscape_norms(&stored);
        assert_eq!(norms, record.norms);
    }

    // Unknown windows are reported, not fabricated.
    let missing = output.summary.windows_total + 100;
    assert!(matches!(
        store.load_h1(missing),
        Err(TdaError::DiagramNotFound { .. })
    ));

    let table = output.norms_table();
    let table_path = dir.path().join("norms.csv");
    write_norms_csv(&table_path, &table).unwrap();
    assert_eq!(read_norms_csv(&table_path).unwrap(), table);
}
