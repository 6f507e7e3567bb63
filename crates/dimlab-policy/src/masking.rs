//! Dynamic data masking.
//!
//! A [`MaskingPolicy`] binds one column kind to its masking expressions.
//! Evaluation happens on the result set — the underlying value is untouched
//! and no copy of the data is kept.
//!
//! Masking tiers:
//! - `Admin`: cleartext
//! - `Analyst`: partial mask that keeps the routable/verifiable tail (email
//!   domain, last four digits)
//! - `External`: full redaction, length-preserving

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Role;

/// Which PII column a policy protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskedColumn {
    Email,
    Ssn,
    CreditCard,
}

impl MaskedColumn {
    /// Column name as it appears in the rendered DDL.
    pub fn column_name(self) -> &'static str {
        match self {
            MaskedColumn::Email => "email",
            MaskedColumn::Ssn => "ssn",
            MaskedColumn::CreditCard => "credit_card",
        }
    }
}

/// A named column-level masking policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingPolicy {
    pub name: String,
    pub column: MaskedColumn,
}

impl MaskingPolicy {
    pub fn email() -> Self {
        Self {
            name: "email_mask".to_string(),
            column: MaskedColumn::Email,
        }
    }

    pub fn ssn() -> Self {
        Self {
            name: "ssn_mask".to_string(),
            column: MaskedColumn::Ssn,
        }
    }

    pub fn credit_card() -> Self {
        Self {
            name: "card_mask".to_string(),
            column: MaskedColumn::CreditCard,
        }
    }

    /// Evaluate the policy for `role` against a raw column value.
    pub fn apply(&self, role: Role, value: &str) -> String {
        match role {
            Role::Admin => value.to_string(),
            Role::Analyst => partial_mask(self.column, value),
            Role::External => full_mask(value),
        }
    }
}

/// Length-preserving full redaction.
fn full_mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn partial_mask(column: MaskedColumn, value: &str) -> String {
    match column {
        MaskedColumn::Email => {
            // Same rewrite as REGEXP_REPLACE(val, '.+@', '****@'): everything
            // up to the last `@` collapses, the domain stays routable. A
            // value without `@` has no safe partial form and is fully
            // redacted.
            let re = email_local_part();
            if re.is_match(value) {
                re.replace(value, "****@").into_owned()
            } else {
                full_mask(value)
            }
        }
        MaskedColumn::Ssn => format!("***-**-{}", last_chars(value, 4)),
        MaskedColumn::CreditCard => format!("****-****-****-{}", last_chars(value, 4)),
    }
}

fn email_local_part() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^.+@").expect("static pattern compiles"))
}

fn last_chars(value: &str, n: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    chars[chars.len().saturating_sub(n)..].iter().collect()
}
