use crate::domain::ledger::HourCount;
use crate::domain::stats::HourlyBucket;

/// Dense series of `horizon + 1` buckets where index == hour offset.
///
/// Offsets with no row are zero-filled, duplicate offsets are summed and offsets outside
/// `0..=horizon` are dropped. The horizon always comes from configuration: inferring it
/// from the rows would produce nothing for an empty result set.
pub fn build_hourly_series(sparse: &[HourCount], horizon: i64) -> Vec<HourlyBucket> {
    let horizon = horizon.max(0);
    let mut out: Vec<HourlyBucket> = (0..=horizon)
        .map(|diff| HourlyBucket { diff, count: 0 })
        .collect();

    let mut dropped = 0usize;
    for row in sparse {
        match usize::try_from(row.diff).ok().and_then(|i| out.get_mut(i)) {
            Some(bucket) => bucket.count += row.count,
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, horizon, "hour rows outside horizon dropped");
    }

    out
}

/// Leading `hours` buckets, the most recent part of the series.
pub fn recent_hours(series: &[HourlyBucket], hours: usize) -> &[HourlyBucket] {
    &series[..hours.min(series.len())]
}

/// Indices of day-boundary ticks for a display of `len` buckets, walking back from the
/// most recent midnight in steps of 24.
pub fn day_ticks(len: usize, current_hour: u32) -> Vec<usize> {
    let mut out = Vec::new();
    let mut i = len as i64 - i64::from(current_hour);
    while i >= 0 {
        let tick = len as i64 - i - 1;
        if tick >= 0 {
            out.push(tick as usize);
        }
        i -= 24;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hc(diff: i64, count: i64) -> HourCount {
        HourCount { diff, count }
    }

    #[test]
    fn zero_fills_sparse_hours() {
        let out = build_hourly_series(&[hc(0, 3), hc(2, 1)], 5);
        let pairs: Vec<(i64, i64)> = out.iter().map(|b| (b.diff, b.count)).collect();
        assert_eq!(pairs, vec![(0, 3), (1, 0), (2, 1), (3, 0), (4, 0), (5, 0)]);
    }

    #[test]
    fn empty_input_still_fills_the_horizon() {
        let out = build_hourly_series(&[], 744);
        assert_eq!(out.len(), 745);
        assert!(out.iter().all(|b| b.count == 0));
        assert_eq!(out.last().unwrap().diff, 744);
    }

    #[test]
    fn offsets_are_unique_and_contiguous() {
        for horizon in [0, 1, 23, 120, 744] {
            let out = build_hourly_series(&[hc(horizon, 2)], horizon);
            assert_eq!(out.len() as i64, horizon + 1);
            for (i, b) in out.iter().enumerate() {
                assert_eq!(b.diff, i as i64);
            }
        }
    }

    #[test]
    fn preserves_total_count() {
        let sparse = vec![hc(0, 3), hc(7, 11), hc(7, 2), hc(100, 5), hc(743, 1)];
        let out = build_hourly_series(&sparse, 744);
        let input: i64 = sparse.iter().map(|r| r.count).sum();
        let output: i64 = out.iter().map(|b| b.count).sum();
        assert_eq!(input, output);
        assert_eq!(out[7].count, 13);
    }

    #[test]
    fn drops_rows_outside_horizon() {
        let out = build_hourly_series(&[hc(-1, 4), hc(6, 4), hc(2, 1)], 5);
        assert_eq!(out.len(), 6);
        assert_eq!(out.iter().map(|b| b.count).sum::<i64>(), 1);
    }

    #[test]
    fn recent_hours_clamps_to_length() {
        let out = build_hourly_series(&[], 5);
        assert_eq!(recent_hours(&out, 3).len(), 3);
        assert_eq!(recent_hours(&out, 120).len(), 6);
    }

    #[test]
    fn ticks_land_on_day_boundaries() {
        // 120 buckets at 14:xx: ticks every 24 buckets starting from the 14th-from-last.
        let ticks = day_ticks(120, 14);
        assert_eq!(ticks, vec![13, 37, 61, 85, 109]);
        for pair in ticks.windows(2) {
            assert_eq!(pair[1] - pair[0], 24);
        }
    }

    #[test]
    fn ticks_for_short_display() {
        assert_eq!(day_ticks(10, 14), Vec::<usize>::new());
        assert_eq!(day_ticks(24, 0), vec![23]);
    }
}
