//! Dimension records and the in-memory dimension table.
//!
//! A [`DimensionTable`] is an owned, ordered collection of
//! [`DimensionRecord`]s keyed by surrogate key and grouped by business key.
//! The table itself is a plain value: the apply engine takes a snapshot in
//! and hands a new snapshot back, so the caller always owns "the current
//! version" and can replace it wholesale (which is also what makes the
//! engine trivially testable and undo-able).
//!
//! Versioning vocabulary:
//! - **surrogate key**: table-generated, unique, monotonic, never reused
//! - **business key**: stable identifier of the tracked entity; several
//!   records may share one (Type-2 history)
//! - **active record**: the open-ended version (`valid_to = None`) of a
//!   business key

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::digest::{fingerprint_v1, Fingerprint};

/// Stable identifier of the real-world entity a row describes.
pub type BusinessKey = u64;

/// Table-generated unique row id, distinct from the business key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SurrogateKey(u64);

impl SurrogateKey {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SurrogateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// One version row of a slowly changing dimension.
///
/// `valid_from`/`valid_to` bound a half-open interval `[valid_from, valid_to)`;
/// `valid_to = None` means open-ended. Invariant: `is_current` iff
/// `valid_to = None`, and under Type-2 maintenance exactly one record per
/// business key is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRecord {
    pub surrogate_key: SurrogateKey,
    pub business_key: BusinessKey,
    /// Attribute name → value for this version, in seed order. Includes the
    /// tracked attribute named by the owning table.
    pub attributes: Vec<(String, String)>,
    /// Most recently superseded tracked value (Type 3 only; depth exactly 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_value: Option<String>,
    pub valid_from: NaiveDate,
    pub valid_to: Option<NaiveDate>,
    pub is_current: bool,
    pub fingerprint: Fingerprint,
}

impl DimensionRecord {
    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value.to_string();
        } else {
            self.attributes.push((name.to_string(), value.to_string()));
        }
    }

    /// Whether this version's interval contains `date` (half-open;
    /// `valid_to = None` is treated as +infinity).
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.valid_from {
            return false;
        }
        match self.valid_to {
            Some(end) => date < end,
            None => true,
        }
    }
}

/// An in-memory dimension table.
///
/// `tracked_attribute` names the one attribute whose changes the SCD engine
/// versions; everything else in a row is carried along untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionTable {
    pub name: String,
    pub tracked_attribute: String,
    records: Vec<DimensionRecord>,
    next_surrogate: u64,
}

impl DimensionTable {
    pub fn new(name: impl Into<String>, tracked_attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracked_attribute: tracked_attribute.into(),
            records: Vec::new(),
            next_surrogate: 1,
        }
    }

    /// Seed one version row. The fingerprint is computed from the tracked
    /// attribute, `is_current` is derived from `valid_to`, and the surrogate
    /// key is allocated from the table's monotonic counter.
    ///
    /// # Panics
    ///
    /// Panics if `attributes` does not include the table's tracked attribute:
    /// a version row without the versioned value is a seeding bug, not a
    /// runtime condition.
    pub fn seed_version(
        &mut self,
        business_key: BusinessKey,
        attributes: Vec<(&str, &str)>,
        valid_from: NaiveDate,
        valid_to: Option<NaiveDate>,
    ) -> SurrogateKey {
        let tracked = attributes
            .iter()
            .find(|(k, _)| *k == self.tracked_attribute)
            .unwrap_or_else(|| {
                panic!(
                    "seed row for business key {business_key} is missing tracked attribute `{}`",
                    self.tracked_attribute
                )
            })
            .1;
        let fingerprint = fingerprint_v1(tracked);

        let surrogate_key = self.allocate_surrogate();
        self.records.push(DimensionRecord {
            surrogate_key,
            business_key,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            prior_value: None,
            valid_from,
            valid_to,
            is_current: valid_to.is_none(),
            fingerprint,
        });
        surrogate_key
    }

    pub(crate) fn allocate_surrogate(&mut self) -> SurrogateKey {
        let key = SurrogateKey::new(self.next_surrogate);
        self.next_surrogate += 1;
        key
    }

    pub fn records(&self) -> &[DimensionRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut Vec<DimensionRecord> {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The open-ended version of `business_key`, if any.
    pub fn active_record(&self, business_key: BusinessKey) -> Option<&DimensionRecord> {
        self.records
            .iter()
            .find(|r| r.business_key == business_key && r.is_current)
    }

    /// All versions of `business_key`, in table order.
    pub fn versions_of(
        &self,
        business_key: BusinessKey,
    ) -> impl Iterator<Item = &DimensionRecord> {
        self.records
            .iter()
            .filter(move |r| r.business_key == business_key)
    }

    pub fn record_by_surrogate(&self, key: SurrogateKey) -> Option<&DimensionRecord> {
        self.records.iter().find(|r| r.surrogate_key == key)
    }

    /// Re-sort rows for display: business key ascending, current row first,
    /// then oldest version first. Presentation order only; no storage
    /// invariant depends on it.
    pub fn sort_for_display(&mut self) {
        self.records.sort_by(|a, b| {
            a.business_key
                .cmp(&b.business_key)
                .then(b.is_current.cmp(&a.is_current))
                .then(a.valid_from.cmp(&b.valid_from))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample_table() -> DimensionTable {
        let mut table = DimensionTable::new("DIM_BRANCH", "location");
        table.seed_version(1, vec![("location", "Delhi")], date(2020, 1, 1), None);
        table.seed_version(2, vec![("location", "Pune")], date(2021, 3, 10), None);
        table
    }

    #[test]
    fn seed_assigns_monotonic_surrogates() {
        let table = sample_table();
        let keys: Vec<u64> = table.records().iter().map(|r| r.surrogate_key.raw()).collect();
        assert_eq!(keys, vec![1, 2]);
    }

    #[test]
    fn seed_computes_fingerprint_from_tracked_attribute() {
        let table = sample_table();
        let row = table.active_record(1).expect("active record for key 1");
        assert_eq!(row.fingerprint, fingerprint_v1("Delhi"));
    }

    #[test]
    fn open_ended_rows_are_current() {
        let mut table = DimensionTable::new("DIM_BRANCH", "location");
        table.seed_version(
            1,
            vec![("location", "Delhi")],
            date(2020, 1, 1),
            Some(date(2022, 1, 1)),
        );
        table.seed_version(1, vec![("location", "Agra")], date(2022, 1, 1), None);

        let versions: Vec<bool> = table.versions_of(1).map(|r| r.is_current).collect();
        assert_eq!(versions, vec![false, true]);
        assert_eq!(
            table.active_record(1).map(|r| r.attribute("location")),
            Some(Some("Agra"))
        );
    }

    #[test]
    fn contains_is_half_open() {
        let mut table = DimensionTable::new("DIM_BRANCH", "location");
        table.seed_version(
            1,
            vec![("location", "Delhi")],
            date(2020, 1, 1),
            Some(date(2022, 1, 1)),
        );
        let row = &table.records()[0];
        assert!(row.contains(date(2020, 1, 1)));
        assert!(row.contains(date(2021, 12, 31)));
        assert!(!row.contains(date(2022, 1, 1)));
        assert!(!row.contains(date(2019, 12, 31)));
    }

    #[test]
    #[should_panic(expected = "missing tracked attribute")]
    fn seed_without_tracked_attribute_panics() {
        let mut table = DimensionTable::new("DIM_BRANCH", "location");
        table.seed_version(1, vec![("name", "HQ")], date(2020, 1, 1), None);
    }
}
