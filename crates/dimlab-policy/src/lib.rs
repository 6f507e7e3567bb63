//! dimlab-policy: warehouse governance policies over in-memory result sets.
//!
//! Two policy families, both applied at *read* time — stored rows are never
//! modified, which is the property that makes these policies composable with
//! the SCD engine's snapshots:
//!
//! - **Dynamic data masking** ([`masking`]): column-level rewriting of a
//!   value based on the querying role. An admin sees cleartext, an analyst a
//!   partial mask, everyone else a full redaction.
//! - **Row access policies** ([`row_access`]): an implicit row filter based
//!   on the querying role's assigned region. Filtered rows are invisible,
//!   not blanked.
//!
//! [`sql`] renders the equivalent policy DDL for display.

pub mod masking;
pub mod row_access;
pub mod sql;

use serde::{Deserialize, Serialize};

pub use masking::{MaskedColumn, MaskingPolicy};
pub use row_access::{AccessContext, FilterOutcome, RegionScoped, RowAccessPolicy};
pub use sql::{render_masking_policy, render_row_access_policy};

/// Querying role, as reported by `CURRENT_ROLE()` in the rendered DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Analyst,
    External,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Admin => "ADMIN",
            Role::Analyst => "ANALYST",
            Role::External => "EXTERNAL",
        };
        f.write_str(s)
    }
}

/// Data-residency region a row belongs to (and a role may be scoped to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Us,
    Eu,
    Apac,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Us, Region::Eu, Region::Apac];
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Region::Us => "US",
            Region::Eu => "EU",
            Region::Apac => "APAC",
        };
        f.write_str(s)
    }
}

/// A customer row carrying the PII columns the masking policies cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub ssn: String,
    pub credit_card: String,
    pub region: Region,
    pub revenue: u64,
}

impl RegionScoped for CustomerRow {
    fn region(&self) -> Region {
        self.region
    }
}

/// A regional activity sample used by the row-policy demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub id: u32,
    pub region: Region,
    pub value: u32,
}

impl RegionScoped for GeoPoint {
    fn region(&self) -> Region {
        self.region
    }
}
