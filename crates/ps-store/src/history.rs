//! Play-history records and slump-graph downsampling

use ps_engine::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// One point on the slump graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Cumulative game count at capture time; records are keyed by this
    pub game_number: u64,
    pub credit: i64,
    /// Net coin balance since the last data reset
    pub coin_difference: i64,
    pub big_count: u32,
    pub reg_count: u32,
    pub setting: u8,
    /// Unix time in milliseconds at capture
    pub timestamp: u64,
}

impl HistoryRecord {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            game_number: snapshot.total_games,
            credit: snapshot.credit,
            coin_difference: snapshot.coin_difference,
            big_count: snapshot.big_count,
            reg_count: snapshot.reg_count,
            setting: snapshot.current_setting,
            timestamp: snapshot.timestamp,
        }
    }

    fn bonus_total(&self) -> u32 {
        self.big_count + self.reg_count
    }
}

/// Thin a record series down to at most `limit` points for display.
///
/// The first and last records and every record where the bonus count
/// increased over its predecessor are always kept, so the graph never
/// loses a bonus step; the remaining quota is filled at an even stride.
/// Input order (oldest first) is preserved.
pub fn downsample(records: &[HistoryRecord], limit: usize) -> Vec<HistoryRecord> {
    if limit == 0 || records.is_empty() {
        return Vec::new();
    }
    if records.len() <= limit {
        return records.to_vec();
    }

    let mut keep = vec![false; records.len()];
    keep[0] = true;
    keep[records.len() - 1] = true;
    for i in 1..records.len() {
        if records[i].bonus_total() > records[i - 1].bonus_total() {
            keep[i] = true;
        }
    }

    let kept = keep.iter().filter(|&&k| k).count();
    if kept < limit {
        // Spread the remaining quota over the records not yet kept
        let mut remaining = limit - kept;
        let free = records.len() - kept;
        let stride = free.div_ceil(remaining).max(1);
        let mut skipped = 0;
        for flag in keep.iter_mut() {
            if *flag {
                continue;
            }
            if skipped % stride == 0 && remaining > 0 {
                *flag = true;
                remaining -= 1;
            }
            skipped += 1;
        }
    }

    records
        .iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(*r))
        .collect()
}
