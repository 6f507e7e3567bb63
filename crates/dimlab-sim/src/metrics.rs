//! Table growth metrics for the simulation footer.

use serde::{Deserialize, Serialize};

use dimlab_scd::DimensionTable;

/// Row count now vs. at seed time.
///
/// Growth is the Type-2 storage story in one number: Type 1 and Type 3 stay
/// at 0%, every Type-2 apply adds a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetrics {
    pub seed_rows: usize,
    pub rows: usize,
    /// Percentage growth over the seed row count, rounded to whole percent.
    pub growth_percent: i64,
}

impl TableMetrics {
    pub fn compute(seed: &DimensionTable, table: &DimensionTable) -> Self {
        let seed_rows = seed.len();
        let rows = table.len();
        let growth_percent = if seed_rows == 0 {
            0
        } else {
            ((rows as f64 / seed_rows as f64 - 1.0) * 100.0).round() as i64
        };
        Self {
            seed_rows,
            rows,
            growth_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table_with_rows(n: usize) -> DimensionTable {
        let mut table = DimensionTable::new("DIM_T", "v");
        for i in 0..n {
            table.seed_version(
                (i + 1) as u64,
                vec![("v", "x")],
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                None,
            );
        }
        table
    }

    #[test]
    fn no_growth_for_identical_snapshots() {
        let seed = table_with_rows(4);
        let m = TableMetrics::compute(&seed, &seed);
        assert_eq!(m.growth_percent, 0);
    }

    #[test]
    fn one_extra_row_on_four_is_twenty_five_percent() {
        let seed = table_with_rows(4);
        let now = table_with_rows(5);
        let m = TableMetrics::compute(&seed, &now);
        assert_eq!(m.seed_rows, 4);
        assert_eq!(m.rows, 5);
        assert_eq!(m.growth_percent, 25);
    }

    #[test]
    fn empty_seed_reports_zero_growth() {
        let seed = DimensionTable::new("DIM_T", "v");
        let now = table_with_rows(2);
        assert_eq!(TableMetrics::compute(&seed, &now).growth_percent, 0);
    }
}
