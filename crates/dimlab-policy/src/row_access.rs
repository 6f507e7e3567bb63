//! Row access policies.
//!
//! A row access policy is an implicit row filter: a querying context either
//! sees a row or has no evidence it exists. The policy here is the regional
//! isolation rule — admins see every region, any other role sees only rows
//! in its assigned region, and a role with no assignment sees nothing
//! (deny by default).

use serde::{Deserialize, Serialize};

use crate::{Region, Role};

/// Anything carrying a region column the policy can evaluate.
pub trait RegionScoped {
    fn region(&self) -> Region;
}

/// The querying principal: role plus optional region assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    pub role: Role,
    pub assigned_region: Option<Region>,
}

impl AccessContext {
    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            assigned_region: None,
        }
    }

    pub fn analyst(region: Region) -> Self {
        Self {
            role: Role::Analyst,
            assigned_region: Some(region),
        }
    }
}

/// A named row access policy (regional isolation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAccessPolicy {
    pub name: String,
}

impl RowAccessPolicy {
    pub fn regional_isolation() -> Self {
        Self {
            name: "regional_isolation".to_string(),
        }
    }

    /// Whether `ctx` may see a row in `row_region`.
    pub fn allows(&self, ctx: &AccessContext, row_region: Region) -> bool {
        match ctx.role {
            Role::Admin => true,
            _ => ctx.assigned_region == Some(row_region),
        }
    }

    /// Filter `rows` down to what `ctx` may see, keeping the hidden count so
    /// callers can report "N rows filtered by policy".
    pub fn filter<'a, R: RegionScoped>(
        &self,
        ctx: &AccessContext,
        rows: &'a [R],
    ) -> FilterOutcome<'a, R> {
        let visible: Vec<&R> = rows
            .iter()
            .filter(|r| self.allows(ctx, r.region()))
            .collect();
        let hidden = rows.len() - visible.len();
        FilterOutcome { visible, hidden }
    }
}

/// Result of applying a row access policy to a result set.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a, R> {
    pub visible: Vec<&'a R>,
    pub hidden: usize,
}
