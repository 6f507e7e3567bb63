//! Rendering of policy DDL for display.
//!
//! Like the SCD statement renderer, these are pure formatting helpers: the
//! evaluated policies live in [`crate::masking`] / [`crate::row_access`],
//! and the DDL here is the warehouse-side equivalent a reader would deploy.

use crate::masking::{MaskedColumn, MaskingPolicy};
use crate::row_access::RowAccessPolicy;

/// Render `CREATE MASKING POLICY` + the `ALTER TABLE` that attaches it.
pub fn render_masking_policy(policy: &MaskingPolicy, table: &str) -> String {
    let analyst_expr = match policy.column {
        MaskedColumn::Email => "REGEXP_REPLACE(val, '.+@', '****@')".to_string(),
        MaskedColumn::Ssn => "CONCAT('***-**-', RIGHT(val, 4))".to_string(),
        MaskedColumn::CreditCard => "CONCAT('****-****-****-', RIGHT(val, 4))".to_string(),
    };

    format!(
        "CREATE MASKING POLICY {name} AS (val string)\n\
         \x20 RETURNS string ->\n\
         \x20 CASE\n\
         \x20   WHEN CURRENT_ROLE() IN ('ADMIN', 'COMPLIANCE') THEN val\n\
         \x20   WHEN CURRENT_ROLE() = 'ANALYST' THEN {analyst_expr}\n\
         \x20   ELSE REPEAT('*', LENGTH(val))\n\
         \x20 END;\n\
         \n\
         -- Apply to column\n\
         ALTER TABLE {table}\n\
         \x20 MODIFY COLUMN {column}\n\
         \x20 SET MASKING POLICY {name};",
        name = policy.name,
        column = policy.column.column_name(),
    )
}

/// Render `CREATE ROW ACCESS POLICY` + the `ALTER TABLE` that attaches it.
pub fn render_row_access_policy(policy: &RowAccessPolicy, table: &str) -> String {
    format!(
        "CREATE ROW ACCESS POLICY {name} AS (region_col string)\n\
         \x20 RETURNS boolean ->\n\
         \x20 CASE\n\
         \x20   WHEN CURRENT_ROLE() = 'ADMIN' THEN TRUE\n\
         \x20   WHEN CURRENT_ROLE() = 'US_MANAGER' THEN region_col = 'US'\n\
         \x20   WHEN CURRENT_ROLE() = 'EU_MANAGER' THEN region_col = 'EU'\n\
         \x20   WHEN CURRENT_ROLE() = 'APAC_MANAGER' THEN region_col = 'APAC'\n\
         \x20   ELSE FALSE\n\
         \x20 END;\n\
         \n\
         -- Apply to table\n\
         ALTER TABLE {table}\n\
         \x20 ADD ROW ACCESS POLICY {name} ON (region);",
        name = policy.name,
    )
}
