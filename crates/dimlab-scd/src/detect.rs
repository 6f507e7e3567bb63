//! Change detection.
//!
//! The detector is a pure read: it fingerprints the incoming value and
//! compares it against the fingerprint stored on the active record. Nothing
//! is mutated; the verdict carries both fingerprints so a caller can render
//! the diff without recomputing them.

use serde::{Deserialize, Serialize};

use crate::digest::{fingerprint_v1, Fingerprint};
use crate::record::{BusinessKey, DimensionRecord, DimensionTable};

/// Outcome of comparing an incoming value against the active record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDecision {
    /// True iff the incoming fingerprint equals the active record's.
    /// False when no active record exists (a never-seen value is a change).
    pub matches: bool,
    pub incoming_fingerprint: Fingerprint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_fingerprint: Option<Fingerprint>,
}

/// Compare `incoming_value` against `active`, if present.
pub fn detect(active: Option<&DimensionRecord>, incoming_value: &str) -> ChangeDecision {
    let incoming_fingerprint = fingerprint_v1(incoming_value);
    let active_fingerprint = active.map(|r| r.fingerprint.clone());
    let matches = active_fingerprint
        .as_ref()
        .is_some_and(|fp| *fp == incoming_fingerprint);

    ChangeDecision {
        matches,
        incoming_fingerprint,
        active_fingerprint,
    }
}

impl DimensionTable {
    /// [`detect`] against the active record of `business_key`.
    pub fn detect_change(
        &self,
        business_key: BusinessKey,
        incoming_value: &str,
    ) -> ChangeDecision {
        detect(self.active_record(business_key), incoming_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn seeded() -> DimensionTable {
        let mut table = DimensionTable::new("DIM_BRANCH", "location");
        table.seed_version(
            1,
            vec![("location", "Delhi")],
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            None,
        );
        table
    }

    #[test]
    fn unchanged_value_matches() {
        let table = seeded();
        let decision = table.detect_change(1, "Delhi");
        assert!(decision.matches);
        assert_eq!(
            decision.active_fingerprint,
            Some(decision.incoming_fingerprint.clone())
        );
    }

    #[test]
    fn changed_value_does_not_match() {
        let table = seeded();
        let decision = table.detect_change(1, "Mumbai");
        assert!(!decision.matches);
        assert_eq!(decision.incoming_fingerprint, fingerprint_v1("Mumbai"));
        assert_eq!(decision.active_fingerprint, Some(fingerprint_v1("Delhi")));
    }

    #[test]
    fn absent_active_record_is_a_change() {
        let table = seeded();
        let decision = table.detect_change(99, "Delhi");
        assert!(!decision.matches);
        assert_eq!(decision.active_fingerprint, None);
    }

    #[test]
    fn detect_does_not_mutate_the_table() {
        let table = seeded();
        let before = table.clone();
        let _ = table.detect_change(1, "Mumbai");
        assert_eq!(table, before);
    }
}
