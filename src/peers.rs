use crate::error::{NowcastError, Result};

/// Target first, then up to `top_n` other instruments by descending trade
/// count. Ties keep the order of `trade_counts`. Instruments without trades
/// are never picked since every window over them would fail.
pub fn select_peers(trade_counts: &[(&str, usize)], target: &str, top_n: usize) -> Result<Vec<String>> {
    let has_target = trade_counts
        .iter()
        .any(|(name, count)| *name == target && *count > 0);
    if !has_target {
        return Err(NowcastError::TargetNotFound(target.to_string()));
    }

    let mut others: Vec<(&str, usize)> = trade_counts
        .iter()
        .copied()
        .filter(|(name, count)| *name != target && *count > 0)
        .collect();
    // sort_by is stable
    others.sort_by(|a, b| b.1.cmp(&a.1));

    let mut selected = Vec::with_capacity(1 + top_n.min(others.len()));
    selected.push(target.to_string());
    selected.extend(others.into_iter().take(top_n).map(|(name, _)| name.to_string()));
    Ok(selected)
}
