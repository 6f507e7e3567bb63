//! Seeded datasets for demos and tests.
//!
//! The customer dimension mirrors a small e-commerce shipping-address master:
//! one customer with two superseded addresses plus a current one, and a
//! second customer with a single open version. Version intervals are
//! contiguous under half-open semantics — each closed row ends exactly where
//! its successor starts, which is what a Type-2 apply produces.

use chrono::NaiveDate;

use dimlab_policy::{CustomerRow, GeoPoint, Region};
use dimlab_scd::{DimensionTable, StatementContext};

/// SQL names for the customer dimension, used when rendering statements.
pub const CUSTOMER_SQL_CONTEXT: StatementContext<'static> = StatementContext {
    table: "DIM_CUSTOMER",
    stream: "STREAM_CUSTOMER",
    business_key_column: "CUSTOMER_ID",
    tracked_column: "LOCATION",
    prior_column: "PREV_LOCATION",
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("fixture dates are valid")
}

/// The seeded `DIM_CUSTOMER` table (4 rows, business keys 1 and 2).
pub fn customer_dimension() -> DimensionTable {
    let mut table = DimensionTable::new("DIM_CUSTOMER", "location");
    table.seed_version(
        1,
        vec![("name", "Sarah Johnson"), ("location", "New York, NY")],
        date(2020, 1, 15),
        Some(date(2022, 6, 10)),
    );
    table.seed_version(
        1,
        vec![("name", "Sarah Johnson"), ("location", "San Francisco, CA")],
        date(2022, 6, 10),
        Some(date(2024, 11, 5)),
    );
    table.seed_version(
        1,
        vec![("name", "Sarah Johnson"), ("location", "Seattle, WA")],
        date(2024, 11, 5),
        None,
    );
    table.seed_version(
        2,
        vec![("name", "Michael Chen"), ("location", "Seattle, WA")],
        date(2023, 3, 20),
        None,
    );
    table
}

/// Customer accounts with the PII columns the masking policies cover.
pub fn customer_accounts() -> Vec<CustomerRow> {
    vec![
        CustomerRow {
            id: 1,
            name: "Sarah Johnson".to_string(),
            email: "sarah.j@company.com".to_string(),
            ssn: "123-45-6789".to_string(),
            credit_card: "4532-1111-2222-3333".to_string(),
            region: Region::Us,
            revenue: 25_000,
        },
        CustomerRow {
            id: 2,
            name: "Michael Chen".to_string(),
            email: "m.chen@enterprise.eu".to_string(),
            ssn: "987-65-4321".to_string(),
            credit_card: "5500-4444-5555-6666".to_string(),
            region: Region::Eu,
            revenue: 42_000,
        },
        CustomerRow {
            id: 3,
            name: "Priya Patel".to_string(),
            email: "priya.p@tech.in".to_string(),
            ssn: "456-78-9123".to_string(),
            credit_card: "3782-7777-8888-9999".to_string(),
            region: Region::Apac,
            revenue: 38_000,
        },
        CustomerRow {
            id: 4,
            name: "James Smith".to_string(),
            email: "j.smith@corp.com".to_string(),
            ssn: "321-54-7890".to_string(),
            credit_card: "6011-1111-2222-3333".to_string(),
            region: Region::Us,
            revenue: 31_000,
        },
    ]
}

/// Regional activity samples for the row-policy demo.
pub fn regional_activity() -> Vec<GeoPoint> {
    vec![
        GeoPoint { id: 1, region: Region::Us, value: 150 },
        GeoPoint { id: 2, region: Region::Us, value: 200 },
        GeoPoint { id: 3, region: Region::Eu, value: 180 },
        GeoPoint { id: 4, region: Region::Eu, value: 220 },
        GeoPoint { id: 5, region: Region::Apac, value: 190 },
        GeoPoint { id: 6, region: Region::Apac, value: 210 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimlab_scd::{as_of, current};

    #[test]
    fn customer_dimension_has_one_current_row_per_key() {
        let table = customer_dimension();
        assert_eq!(table.len(), 4);
        assert_eq!(current(&table).count(), 2);
        assert_eq!(
            table.active_record(1).unwrap().attribute("location"),
            Some("Seattle, WA")
        );
    }

    #[test]
    fn customer_versions_are_contiguous() {
        let table = customer_dimension();
        // Every date from the first valid_from onward resolves to exactly
        // one version of customer 1.
        for probe in [
            date(2020, 1, 15),
            date(2022, 6, 9),
            date(2022, 6, 10),
            date(2024, 11, 4),
            date(2024, 11, 5),
            date(2030, 1, 1),
        ] {
            assert_eq!(as_of(&table, Some(1), probe).count(), 1, "probe {probe}");
        }
    }

    #[test]
    fn account_fixture_covers_every_region() {
        let accounts = customer_accounts();
        for region in Region::ALL {
            assert!(accounts.iter().any(|c| c.region == region));
        }
    }
}
