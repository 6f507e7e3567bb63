//! Pacing for narrated runs.
//!
//! The state machine is synchronous; delays exist only so a human can watch
//! a run unfold. A [`Scheduler`] is consulted *between* transitions and
//! never inside them, so the engine and the tests stay instantaneous.

use chrono::NaiveDate;
use std::time::Duration;

use crate::pipeline::{PipelineError, PipelineRun, PipelineState};

/// Decides how long to linger before entering `next`.
pub trait Scheduler {
    fn pause(&self, next: PipelineState);
}

/// No pacing at all; the default for tests and scripted use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Scheduler for NoDelay {
    fn pause(&self, _next: PipelineState) {}
}

/// A fixed wall-clock pause between transitions.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    pub delay: Duration,
}

impl FixedDelay {
    pub fn from_millis(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
        }
    }
}

impl Scheduler for FixedDelay {
    fn pause(&self, _next: PipelineState) {
        std::thread::sleep(self.delay);
    }
}

/// Drive a run from `Idle` to `Done`, pausing between transitions.
///
/// When the scan reports a match the run ends there; otherwise the update is
/// applied with `effective_date`. Returns the final state (always `Done` on
/// success).
pub fn run_to_completion(
    run: &mut PipelineRun,
    incoming_value: &str,
    effective_date: NaiveDate,
    scheduler: &dyn Scheduler,
) -> Result<PipelineState, PipelineError> {
    run.begin_scan(incoming_value)?;
    scheduler.pause(PipelineState::Scanning);
    let matches = run.complete_scan()?.matches;

    if !matches {
        scheduler.pause(PipelineState::Updating);
        run.begin_update()?;
        scheduler.pause(PipelineState::Done);
        run.commit_update(effective_date)?;
    }

    Ok(run.state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimlab_scd::{DimensionTable, ScdStrategy};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn seeded_run(strategy: ScdStrategy) -> PipelineRun {
        let mut table = DimensionTable::new("DIM_BRANCH", "location");
        table.seed_version(1, vec![("location", "Delhi")], date(2020, 1, 1), None);
        PipelineRun::new(table, 1, strategy)
    }

    #[test]
    fn drives_a_change_all_the_way_to_done() {
        let mut run = seeded_run(ScdStrategy::Type2NewVersion);
        let state =
            run_to_completion(&mut run, "Mumbai", date(2025, 1, 1), &NoDelay).unwrap();
        assert_eq!(state, PipelineState::Done);
        assert_eq!(run.table().len(), 2);
        assert!(run.outcome().is_some());
    }

    #[test]
    fn stops_after_the_scan_when_nothing_changed() {
        let mut run = seeded_run(ScdStrategy::Type2NewVersion);
        let state =
            run_to_completion(&mut run, "Delhi", date(2025, 1, 1), &NoDelay).unwrap();
        assert_eq!(state, PipelineState::Done);
        assert_eq!(run.table().len(), 1);
        assert!(run.outcome().is_none());
    }
}
