use log::debug;

use std::collections::HashMap;

use crate::config::*;
use crate::store::RecordCollection;

/// Sums the votes per category.
///
/// Categories without any person are absent from the output. The order is the
/// order of the category table, followed by the categories missing from the
/// table (for example from an older data file), sorted by name.
///
/// Sums saturate at `u64::MAX`.
pub fn sum_by_category(coll: &RecordCollection, table: &CategoryTable) -> Vec<CategoryTotal> {
    let mut sums: HashMap<&str, u64> = HashMap::new();
    for p in coll.iter() {
        let sum = sums.entry(p.category.as_str()).or_insert(0);
        *sum = sum.saturating_add(p.votes);
    }

    let mut res: Vec<CategoryTotal> = table
        .iter()
        .filter_map(|c| {
            sums.get(c.name.as_str()).map(|votes| CategoryTotal {
                category: c.name.clone(),
                votes: *votes,
            })
        })
        .collect();

    let mut unknown: Vec<(&str, u64)> = sums
        .iter()
        .filter(|(name, _)| !table.contains(name))
        .map(|(name, votes)| (*name, *votes))
        .collect();
    if !unknown.is_empty() {
        debug!(
            "sum_by_category: categories outside of the table: {:?}",
            unknown
        );
    }
    unknown.sort();
    res.extend(unknown.into_iter().map(|(name, votes)| CategoryTotal {
        category: name.to_string(),
        votes,
    }));
    res
}

/// The people of one category, in their original order.
pub fn filter_by_category<'a>(coll: &'a RecordCollection, category: &str) -> Vec<&'a Person> {
    coll.iter().filter(|p| p.category == category).collect()
}

/// The votes of the whole collection, saturating at `u64::MAX`.
pub fn total_votes(coll: &RecordCollection) -> u64 {
    coll.iter().map(|p| p.votes).fold(0, u64::saturating_add)
}
