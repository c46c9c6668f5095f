pub mod trade;

pub use trade::{DfRow, TradePoint, TRADE_SIDE};
