//! Read-side queries over a dimension table.
//!
//! All three queries are pure reads, recomputed per call. Table sizes here
//! are tiny, so there is no interval index; `as_of` is a linear scan
//! returned as a lazy iterator that can be restarted by calling again.

use chrono::NaiveDate;

use crate::record::{BusinessKey, DimensionRecord, DimensionTable};

/// Records whose validity interval contains `date`, optionally restricted to
/// one business key. `valid_to = None` is treated as +infinity.
pub fn as_of(
    table: &DimensionTable,
    business_key: Option<BusinessKey>,
    date: NaiveDate,
) -> impl Iterator<Item = &DimensionRecord> {
    table
        .records()
        .iter()
        .filter(move |r| business_key.map_or(true, |k| r.business_key == k))
        .filter(move |r| r.contains(date))
}

/// The current (open-ended) rows of the table.
pub fn current(table: &DimensionTable) -> impl Iterator<Item = &DimensionRecord> {
    table.records().iter().filter(|r| r.is_current)
}

/// Full version history of one business key, oldest first.
pub fn history(table: &DimensionTable, business_key: BusinessKey) -> Vec<&DimensionRecord> {
    let mut versions: Vec<&DimensionRecord> = table.versions_of(business_key).collect();
    versions.sort_by_key(|r| r.valid_from);
    versions
}
