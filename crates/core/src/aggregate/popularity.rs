use crate::domain::ledger::ItemCount;
use crate::domain::stats::PopularityEntry;
use std::collections::HashMap;

/// Top `limit` items of the current range, each annotated with its count in the preceding
/// range.
///
/// Ordered by count descending, then item id ascending. `previous_count` stays `None`
/// for items with no purchases in `previous`.
pub fn rank_popular(
    current: Vec<ItemCount>,
    previous: &[ItemCount],
    excluded_item_ids: &[i32],
    limit: usize,
) -> Vec<PopularityEntry> {
    let mut previous_by_item: HashMap<i32, i64> = HashMap::with_capacity(previous.len());
    for row in previous {
        *previous_by_item.entry(row.itemid).or_default() += row.count;
    }

    let mut ranked: Vec<ItemCount> = current
        .into_iter()
        .filter(|row| row.count > 0 && !excluded_item_ids.contains(&row.itemid))
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.itemid.cmp(&b.itemid)));
    ranked.truncate(limit);

    ranked
        .into_iter()
        .map(|row| PopularityEntry {
            previous_count: previous_by_item
                .get(&row.itemid)
                .copied()
                .filter(|&n| n > 0),
            itemid: row.itemid,
            name: row.name,
            count: row.count,
        })
        .collect()
}
