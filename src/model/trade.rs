/// One executed trade (or trade batch VWAP) of a single instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradePoint {
    /// Epoch seconds.
    pub time: f64,
    pub price: f64,
}

impl TradePoint {
    pub fn new(time: f64, price: f64) -> Self {
        Self { time, price }
    }
}

/// Event type that carries trade prices in the aggregated table.
pub const TRADE_SIDE: &str = "TRADE";

/// One row of the aggregated market table (`df_all.csv`).
///
/// Numeric fields are `None` when the source cell is empty or unparseable.
#[derive(Debug, Clone, PartialEq)]
pub struct DfRow {
    pub instrument: String,
    pub side: String,
    pub fecha_nano: Option<i64>,
    pub ts_sec: Option<f64>,
    pub vwap: Option<f64>,
}

impl DfRow {
    pub fn is_trade(&self) -> bool {
        self.side == TRADE_SIDE
    }

    /// Time/price pair for a usable trade row: a `TRADE` row whose time and
    /// price are both present and finite.
    pub fn trade_point(&self) -> Option<TradePoint> {
        if !self.is_trade() {
            return None;
        }
        let time = self.ts_sec.filter(|t| t.is_finite())?;
        let price = self.vwap.filter(|p| p.is_finite())?;
        Some(TradePoint::new(time, price))
    }
}
