//! The SCD apply engine.
//!
//! [`apply`] is the one mutation path of the crate: given a table snapshot, a
//! business key, an incoming value for the tracked attribute, a strategy, and
//! an effective date, it returns a **new** table snapshot with exactly that
//! business key's data changed. All other rows are carried over untouched.
//!
//! Strategy semantics:
//! - **Type 1**: overwrite the active row's value + fingerprint in place; no
//!   history, cardinality unchanged. Idempotent under repeated input.
//! - **Type 2**: close the active row (`valid_to = effective_date`,
//!   `is_current = false`) and insert a fresh version with a new surrogate
//!   key; cardinality grows by one.
//! - **Type 3**: move the active row's value into `prior_value` (depth
//!   exactly one; an older prior is overwritten) and install the new value;
//!   cardinality unchanged.
//!
//! A business key with no active record is an error, not an implicit first
//! version; callers that want to create entities seed them through
//! [`DimensionTable::seed_version`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::digest::{fingerprint_v1, Fingerprint};
use crate::record::{BusinessKey, DimensionTable, SurrogateKey};

/// How a detected change is written back to the dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScdStrategy {
    /// Overwrite in place; history is lost.
    Type1Overwrite,
    /// Close the current version and insert a new one.
    Type2NewVersion,
    /// Keep the single most recent prior value alongside the new one.
    Type3PriorValue,
}

impl ScdStrategy {
    /// Short label used in logs and rendered SQL comments.
    pub fn label(self) -> &'static str {
        match self {
            ScdStrategy::Type1Overwrite => "SCD1",
            ScdStrategy::Type2NewVersion => "SCD2",
            ScdStrategy::Type3PriorValue => "SCD3",
        }
    }
}

impl std::fmt::Display for ScdStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors from the apply engine.
///
/// There is deliberately no "invalid strategy" variant: [`ScdStrategy`] is a
/// closed enum, so an unrecognized strategy is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScdError {
    #[error("no active record for business key {business_key} in `{table}`")]
    NotFound {
        table: String,
        business_key: BusinessKey,
    },
}

/// A completed apply: the new table snapshot plus the diff diagnostics the
/// presentation layer renders (old/new values and fingerprints).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub table: DimensionTable,
    pub strategy: ScdStrategy,
    pub business_key: BusinessKey,
    pub old_value: String,
    pub new_value: String,
    pub old_fingerprint: Fingerprint,
    pub new_fingerprint: Fingerprint,
    /// Surrogate key of the row a Type-2 apply inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted: Option<SurrogateKey>,
}

/// Apply `strategy` to `business_key` with the incoming tracked-attribute
/// value, returning the next table snapshot. The input table is not mutated.
pub fn apply(
    table: &DimensionTable,
    business_key: BusinessKey,
    incoming_value: &str,
    strategy: ScdStrategy,
    effective_date: NaiveDate,
) -> Result<ApplyOutcome, ScdError> {
    let active_idx = table
        .records()
        .iter()
        .position(|r| r.business_key == business_key && r.is_current)
        .ok_or_else(|| ScdError::NotFound {
            table: table.name.clone(),
            business_key,
        })?;

    let tracked = table.tracked_attribute.clone();
    let active = &table.records()[active_idx];
    let old_value = active.attribute(&tracked).unwrap_or_default().to_string();
    let old_fingerprint = active.fingerprint.clone();
    let new_fingerprint = fingerprint_v1(incoming_value);

    let mut next = table.clone();
    let mut inserted = None;

    match strategy {
        ScdStrategy::Type1Overwrite => {
            let row = &mut next.records_mut()[active_idx];
            row.set_attribute(&tracked, incoming_value);
            row.fingerprint = new_fingerprint.clone();
        }
        ScdStrategy::Type2NewVersion => {
            let surrogate_key = next.allocate_surrogate();
            let row = &mut next.records_mut()[active_idx];
            row.valid_to = Some(effective_date);
            row.is_current = false;

            let mut version = row.clone();
            version.surrogate_key = surrogate_key;
            version.set_attribute(&tracked, incoming_value);
            version.prior_value = None;
            version.valid_from = effective_date;
            version.valid_to = None;
            version.is_current = true;
            version.fingerprint = new_fingerprint.clone();
            next.records_mut().push(version);

            next.sort_for_display();
            inserted = Some(surrogate_key);
        }
        ScdStrategy::Type3PriorValue => {
            let row = &mut next.records_mut()[active_idx];
            row.prior_value = Some(old_value.clone());
            row.set_attribute(&tracked, incoming_value);
            row.fingerprint = new_fingerprint.clone();
        }
    }

    tracing::debug!(
        table = %next.name,
        business_key,
        %strategy,
        old = %old_value,
        new = %incoming_value,
        "applied dimension update"
    );

    Ok(ApplyOutcome {
        table: next,
        strategy,
        business_key,
        old_value,
        new_value: incoming_value.to_string(),
        old_fingerprint,
        new_fingerprint,
        inserted,
    })
}
