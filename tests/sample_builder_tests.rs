use tick_nowcast::model::DfRow;
use tick_nowcast::regression::FitError;
use tick_nowcast::sample::SampleBuilder;
use tick_nowcast::series::TradeSeriesStore;
use tick_nowcast::NowcastError;

fn trade(inst: &str, ts: f64, px: f64) -> DfRow {
    DfRow {
        instrument: inst.to_string(),
        side: "TRADE".to_string(),
        fecha_nano: Some((ts * 1e9) as i64),
        ts_sec: Some(ts),
        vwap: Some(px),
    }
}

/// Target trades at t = 0..5 on a convex path.
fn target_rows() -> Vec<DfRow> {
    [1.0, 2.0, 4.0, 7.0, 11.0, 16.0]
        .iter()
        .enumerate()
        .map(|(i, &p)| trade("T", i as f64, p))
        .collect()
}

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn target_level_is_observed_price_and_slope_is_regression() {
    let store = TradeSeriesStore::from_rows(&target_rows());
    let builder = SampleBuilder::new(&store, &names(&["T"]), 3).unwrap();
    let s = builder.sample_at(2).unwrap();

    assert!((s.t0 - 2.0).abs() < f64::EPSILON);
    assert!((s.t1 - 3.0).abs() < f64::EPSILON);
    // Fitted value at t0 would be 23/6; the observed trade is 4.
    assert!((s.levels[0] - 4.0).abs() < 1e-12);
    assert!((s.level_now - 4.0).abs() < 1e-12);
    assert!((s.slopes[0] - 1.5).abs() < 1e-12);
    assert!((s.label_slope - 2.5).abs() < 1e-12);
    assert!((s.dt - 1.0).abs() < f64::EPSILON);
    assert_eq!(s.features(), vec![4.0, s.slopes[0]]);
}

#[test]
fn peer_level_and_slope_come_from_regression() {
    let mut rows = target_rows();
    for i in 0..7 {
        let t = -1.5 + i as f64;
        rows.push(trade("P", t, 10.0 + 2.0 * t));
    }
    let store = TradeSeriesStore::from_rows(&rows);
    let builder = SampleBuilder::new(&store, &names(&["T", "P"]), 3).unwrap();
    assert_eq!(builder.dim(), 4);

    let s = builder.sample_at(2).unwrap();
    assert_eq!(s.levels.len(), 2);
    assert!((s.levels[1] - 14.0).abs() < 1e-9);
    assert!((s.slopes[1] - 2.0).abs() < 1e-9);
    assert_eq!(s.dim(), 4);
    assert_eq!(
        s.features(),
        vec![s.levels[0], s.levels[1], s.slopes[0], s.slopes[1]]
    );
}

#[test]
fn samples_are_time_ordered_with_t1_after_t0() {
    let store = TradeSeriesStore::from_rows(&target_rows());
    let builder = SampleBuilder::new(&store, &names(&["T"]), 3).unwrap();
    assert_eq!(builder.candidates(), 3);

    let samples: Vec<_> = builder.samples().collect();
    assert_eq!(samples.len(), 3);
    assert_eq!(
        samples.iter().map(|s| s.index).collect::<Vec<_>>(),
        vec![2, 3, 4]
    );
    for s in &samples {
        assert!(s.t1 > s.t0);
    }
    for w in samples.windows(2) {
        assert!(w[1].t0 > w[0].t0);
    }
}

#[test]
fn samples_without_peer_history_are_skipped() {
    let mut rows = target_rows();
    for t in [1.2, 2.2, 3.2, 4.2] {
        rows.push(trade("P", t, 50.0 + t));
    }
    let store = TradeSeriesStore::from_rows(&rows);
    let builder = SampleBuilder::new(&store, &names(&["T", "P"]), 3).unwrap();

    assert!(matches!(
        builder.sample_at(2),
        Err(FitError::InsufficientData { .. })
    ));
    let samples: Vec<_> = builder.samples().collect();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].index, 4);
}

#[test]
fn last_target_trade_has_no_label() {
    let store = TradeSeriesStore::from_rows(&target_rows());
    let builder = SampleBuilder::new(&store, &names(&["T"]), 3).unwrap();
    assert!(builder.sample_at(5).is_err());
}

#[test]
fn short_target_is_rejected() {
    let rows = vec![trade("T", 0.0, 1.0), trade("T", 1.0, 2.0)];
    let store = TradeSeriesStore::from_rows(&rows);
    let err = SampleBuilder::new(&store, &names(&["T"]), 3).unwrap_err();
    assert!(matches!(
        err,
        NowcastError::TooFewTargetPoints { have: 2, need: 3 }
    ));

    let rows = vec![trade("T", 0.0, 1.0)];
    let store = TradeSeriesStore::from_rows(&rows);
    let err = SampleBuilder::new(&store, &names(&["T"]), 1).unwrap_err();
    assert!(matches!(
        err,
        NowcastError::TooFewTargetPoints { have: 1, need: 2 }
    ));
}

#[test]
fn unknown_instruments_are_reported_by_role() {
    let store = TradeSeriesStore::from_rows(&target_rows());

    let err = SampleBuilder::new(&store, &names(&["T", "GHOST"]), 3).unwrap_err();
    assert!(matches!(err, NowcastError::UnknownInstrument(ref n) if n == "GHOST"));

    let err = SampleBuilder::new(&store, &names(&["GHOST", "T"]), 3).unwrap_err();
    assert!(matches!(err, NowcastError::TargetNotFound(ref n) if n == "GHOST"));
}
