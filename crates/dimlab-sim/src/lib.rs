//! dimlab-sim: the staged pipeline simulation over the SCD engine.
//!
//! The engine in `dimlab-scd` is instantaneous; what a reader watches is a
//! *narrated* run: scan the incoming stream, fingerprint, fetch the active
//! record, surface the diff, then commit the chosen strategy. This crate
//! models that narration as an explicit state machine
//! (`Idle → Scanning → DiffFound → Updating → Done`) whose transitions are
//! ordinary method calls, with a structured run log accumulated along the
//! way.
//!
//! Pacing is deliberately external to the machine: a [`Scheduler`] decides how
//! long to linger between transitions, and the no-op scheduler makes every
//! run instantaneous for tests.

pub mod fixtures;
pub mod metrics;
pub mod pipeline;
pub mod schedule;

pub use metrics::TableMetrics;
pub use pipeline::{LogEvent, LogLevel, PipelineError, PipelineRun, PipelineState};
pub use schedule::{run_to_completion, FixedDelay, NoDelay, Scheduler};
