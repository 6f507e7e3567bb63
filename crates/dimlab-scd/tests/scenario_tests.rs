//! End-to-end scenario: one seeded dimension, one incoming change, all three
//! strategies. Mirrors the worked example used throughout the docs: business
//! key 1 active at "Delhi", business key 2 active at "Pune", incoming value
//! "Mumbai" for key 1.

use chrono::NaiveDate;
use dimlab_scd::{apply, as_of, fingerprint_v1, DimensionTable, ScdStrategy};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn branch_dimension() -> DimensionTable {
    let mut table = DimensionTable::new("DIM_BRANCH", "location");
    table.seed_version(
        1,
        vec![("name", "North Branch"), ("location", "Agra")],
        date(2019, 4, 1),
        Some(date(2021, 4, 1)),
    );
    table.seed_version(
        1,
        vec![("name", "North Branch"), ("location", "Delhi")],
        date(2021, 4, 1),
        None,
    );
    table.seed_version(
        2,
        vec![("name", "West Branch"), ("location", "Pune")],
        date(2020, 7, 15),
        None,
    );
    table
}

#[test]
fn detect_flags_the_incoming_change() {
    let table = branch_dimension();

    let decision = table.detect_change(1, "Mumbai");
    assert!(!decision.matches);
    assert_eq!(decision.incoming_fingerprint, fingerprint_v1("Mumbai"));
    assert_eq!(decision.active_fingerprint, Some(fingerprint_v1("Delhi")));

    let unchanged = table.detect_change(1, "Delhi");
    assert!(unchanged.matches);
}

#[test]
fn type2_grows_history_and_moves_the_current_flag() {
    let table = branch_dimension();
    let effective = date(2025, 1, 1);

    let outcome = apply(&table, 1, "Mumbai", ScdStrategy::Type2NewVersion, effective)
        .expect("active record exists");

    assert_eq!(outcome.table.len(), 4);

    // Key 1: two closed versions plus the new current one.
    let versions: Vec<_> = outcome.table.versions_of(1).collect();
    assert_eq!(versions.len(), 3);
    assert_eq!(versions.iter().filter(|r| r.is_current).count(), 1);
    let current = versions.iter().find(|r| r.is_current).unwrap();
    assert_eq!(current.attribute("location"), Some("Mumbai"));
    assert_eq!(current.valid_from, effective);

    // The superseded version is closed exactly at the effective date.
    let superseded = versions
        .iter()
        .find(|r| r.valid_to == Some(effective))
        .expect("closed version");
    assert_eq!(superseded.attribute("location"), Some("Delhi"));

    // Key 2 is untouched.
    assert_eq!(
        outcome.table.active_record(2).unwrap(),
        table.active_record(2).unwrap()
    );
}

#[test]
fn type1_rewrites_without_growing_the_table() {
    let table = branch_dimension();
    let outcome = apply(&table, 1, "Mumbai", ScdStrategy::Type1Overwrite, date(2025, 1, 1))
        .expect("active record exists");

    assert_eq!(outcome.table.len(), 3);
    assert_eq!(
        outcome.table.active_record(1).unwrap().attribute("location"),
        Some("Mumbai")
    );
}

#[test]
fn type3_keeps_the_superseded_value_in_the_prior_slot() {
    let table = branch_dimension();
    let outcome = apply(&table, 1, "Mumbai", ScdStrategy::Type3PriorValue, date(2025, 1, 1))
        .expect("active record exists");

    assert_eq!(outcome.table.len(), 3);
    let row = outcome.table.active_record(1).unwrap();
    assert_eq!(row.attribute("location"), Some("Mumbai"));
    assert_eq!(row.prior_value.as_deref(), Some("Delhi"));
}

#[test]
fn time_travel_reconstructs_each_era() {
    let table = branch_dimension();
    let effective = date(2025, 1, 1);
    let outcome = apply(&table, 1, "Mumbai", ScdStrategy::Type2NewVersion, effective)
        .expect("active record exists");
    let table = outcome.table;

    // Before the first version of key 1 existed.
    assert_eq!(as_of(&table, Some(1), date(2019, 3, 31)).count(), 0);

    // During the first closed era.
    let hits: Vec<_> = as_of(&table, Some(1), date(2020, 6, 1)).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].attribute("location"), Some("Agra"));

    // After the Type-2 apply, the new current row owns the open era.
    let hits: Vec<_> = as_of(&table, Some(1), date(2026, 1, 1)).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].attribute("location"), Some("Mumbai"));
    assert!(hits[0].is_current);
}

#[test]
fn display_order_is_business_key_then_current_first() {
    let table = branch_dimension();
    let outcome = apply(&table, 1, "Mumbai", ScdStrategy::Type2NewVersion, date(2025, 1, 1))
        .expect("active record exists");

    let keys: Vec<(u64, bool)> = outcome
        .table
        .records()
        .iter()
        .map(|r| (r.business_key, r.is_current))
        .collect();
    assert_eq!(
        keys,
        vec![(1, true), (1, false), (1, false), (2, true)]
    );
}
