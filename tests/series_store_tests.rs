use tick_nowcast::model::{DfRow, TradePoint};
use tick_nowcast::series::{TradeSeries, TradeSeriesStore};

fn row(inst: &str, side: &str, ts: f64, vwap: Option<f64>) -> DfRow {
    DfRow {
        instrument: inst.to_string(),
        side: side.to_string(),
        fecha_nano: Some((ts * 1e9) as i64),
        ts_sec: Some(ts),
        vwap,
    }
}

#[test]
fn trades_are_sorted_and_filtered() {
    let rows = vec![
        row("GGAL", "TRADE", 3.0, Some(103.0)),
        row("GGAL", "BID", 1.5, Some(99.0)),
        row("GGAL", "TRADE", 1.0, Some(101.0)),
        row("GGAL", "TRADE", 2.0, None),
        row("GGAL", "TRADE", 2.5, Some(f64::NAN)),
        row("GGAL", "OFFER", 2.7, Some(104.0)),
    ];
    let store = TradeSeriesStore::from_rows(&rows);
    let s = store.get("GGAL").unwrap();
    assert_eq!(
        s.points(),
        &[TradePoint::new(1.0, 101.0), TradePoint::new(3.0, 103.0)]
    );
}

#[test]
fn duplicate_time_keeps_later_row() {
    let rows = vec![
        row("YPF", "TRADE", 5.0, Some(10.0)),
        row("YPF", "TRADE", 4.0, Some(9.0)),
        row("YPF", "TRADE", 5.0, Some(11.0)),
    ];
    let store = TradeSeriesStore::from_rows(&rows);
    let s = store.get("YPF").unwrap();
    assert_eq!(s.len(), 2);
    assert_eq!(s.points()[1], TradePoint::new(5.0, 11.0));
}

#[test]
fn times_within_tolerance_collapse() {
    let s = TradeSeries::from_points(vec![
        TradePoint::new(7.0, 1.0),
        TradePoint::new(7.0 + 1e-10, 2.0),
        TradePoint::new(7.0 + 1e-3, 3.0),
    ]);
    assert_eq!(s.len(), 2);
    assert!((s.points()[0].price - 2.0).abs() < f64::EPSILON);
}

#[test]
fn instruments_without_trades_have_empty_series() {
    let rows = vec![
        row("AL30", "BID", 1.0, Some(50.0)),
        row("GGAL", "TRADE", 1.0, Some(100.0)),
    ];
    let store = TradeSeriesStore::from_rows(&rows);
    assert!(store.get("AL30").unwrap().is_empty());
    assert_eq!(store.trade_count("AL30"), 0);
    assert_eq!(store.trade_count("MISSING"), 0);
    assert!(store.get("MISSING").is_none());
}

#[test]
fn trade_counts_follow_first_seen_order() {
    let rows = vec![
        row("B", "TRADE", 1.0, Some(1.0)),
        row("A", "TRADE", 1.0, Some(1.0)),
        row("B", "TRADE", 2.0, Some(1.0)),
        row("C", "BID", 1.0, Some(1.0)),
    ];
    let store = TradeSeriesStore::from_rows(&rows);
    assert_eq!(store.trade_counts(), vec![("B", 2), ("A", 1), ("C", 0)]);
}

#[test]
fn last_index_and_intervals() {
    let s = TradeSeries::from_points(
        [0.0, 1.0, 3.0, 6.0, 10.0]
            .iter()
            .map(|&t| TradePoint::new(t, 1.0))
            .collect(),
    );
    assert_eq!(s.last_index_at_or_before(-0.5), None);
    assert_eq!(s.last_index_at_or_before(3.0), Some(2));
    assert_eq!(s.last_index_at_or_before(5.9), Some(2));
    assert_eq!(s.last_index_at_or_before(99.0), Some(4));
    assert_eq!(s.intervals_through(4), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(s.intervals_through(2), vec![1.0, 2.0]);
}
