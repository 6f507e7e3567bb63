//! The pipeline state machine and its run log.
//!
//! A [`PipelineRun`] owns the current table snapshot plus everything one
//! narrated run accumulates: the detector's verdict, the apply outcome, and
//! an ordered log of events. Transitions are explicit method calls and each
//! is legal in exactly one state:
//!
//! ```text
//! Idle ──begin_scan──► Scanning ──complete_scan──► DiffFound ──begin_update──► Updating
//!                          │                                                      │
//!                          └────────── (fingerprints match) ──► Done ◄──commit_update
//! ```
//!
//! `reset` returns to `Idle` with the seeded table restored. Because `Done`
//! is reached directly when the fingerprints match, `begin_update` is
//! unreachable for an unchanged value — the "don't Type-2 a non-change"
//! precondition is structural rather than a runtime check.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use dimlab_scd::{apply, ApplyOutcome, BusinessKey, ChangeDecision, DimensionTable, ScdError, ScdStrategy};

use crate::metrics::TableMetrics;

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Scanning,
    DiffFound,
    Updating,
    Done,
}

/// Severity of a run-log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Delta,
    Warn,
    Success,
}

/// One entry of the narrated run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    pub at: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Errors from driving the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("`{action}` is not legal in state {state:?}")]
    IllegalState {
        action: &'static str,
        state: PipelineState,
    },
    #[error(transparent)]
    Scd(#[from] ScdError),
}

/// One narrated pipeline run over an owned table snapshot.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    id: Uuid,
    state: PipelineState,
    seed: DimensionTable,
    table: DimensionTable,
    business_key: BusinessKey,
    strategy: ScdStrategy,
    incoming_value: Option<String>,
    decision: Option<ChangeDecision>,
    outcome: Option<ApplyOutcome>,
    log: Vec<LogEvent>,
}

impl PipelineRun {
    /// Start a run in `Idle` over `table`, targeting one business key with a
    /// chosen strategy. The seed snapshot is kept for `reset` and metrics.
    pub fn new(table: DimensionTable, business_key: BusinessKey, strategy: ScdStrategy) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: PipelineState::Idle,
            seed: table.clone(),
            table,
            business_key,
            strategy,
            incoming_value: None,
            decision: None,
            outcome: None,
            log: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn table(&self) -> &DimensionTable {
        &self.table
    }

    pub fn business_key(&self) -> BusinessKey {
        self.business_key
    }

    pub fn strategy(&self) -> ScdStrategy {
        self.strategy
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn decision(&self) -> Option<&ChangeDecision> {
        self.decision.as_ref()
    }

    pub fn outcome(&self) -> Option<&ApplyOutcome> {
        self.outcome.as_ref()
    }

    pub fn metrics(&self) -> TableMetrics {
        TableMetrics::compute(&self.seed, &self.table)
    }

    /// `Idle → Scanning`: note the incoming value and open the log.
    pub fn begin_scan(&mut self, incoming_value: &str) -> Result<(), PipelineError> {
        self.expect_state("begin_scan", PipelineState::Idle)?;
        self.log.clear();
        self.incoming_value = Some(incoming_value.to_string());
        self.state = PipelineState::Scanning;
        self.push(
            LogLevel::Info,
            format!(
                "[STEP 1] Scanning source stream for business key {}...",
                self.business_key
            ),
        );
        Ok(())
    }

    /// `Scanning → DiffFound | Done`: fingerprint the incoming value, fetch
    /// the active record, and log the verdict.
    pub fn complete_scan(&mut self) -> Result<&ChangeDecision, PipelineError> {
        self.expect_state("complete_scan", PipelineState::Scanning)?;
        let incoming = self
            .incoming_value
            .clone()
            .expect("begin_scan stored the incoming value");

        let active = self
            .table
            .active_record(self.business_key)
            .ok_or_else(|| ScdError::NotFound {
                table: self.table.name.clone(),
                business_key: self.business_key,
            })?;
        let active_value = active
            .attribute(&self.table.tracked_attribute)
            .unwrap_or_default()
            .to_string();
        let active_fingerprint = active.fingerprint.clone();

        let decision = self.table.detect_change(self.business_key, &incoming);
        self.push(
            LogLevel::Info,
            format!(
                "[STEP 2] Fingerprinting incoming '{}' -> '{}'",
                incoming, decision.incoming_fingerprint
            ),
        );
        self.push(
            LogLevel::Info,
            format!(
                "[STEP 3] Fetching active record for business key {}...",
                self.business_key
            ),
        );
        self.push(
            LogLevel::Info,
            format!(
                "Current active {}: '{}' (fingerprint '{}')",
                self.table.tracked_attribute, active_value, active_fingerprint
            ),
        );

        if active_value != incoming {
            self.push(
                LogLevel::Delta,
                format!(
                    "[DELTA] Column '{}' changed: {} -> {}",
                    self.table.tracked_attribute, active_value, incoming
                ),
            );
        }

        if decision.matches {
            self.state = PipelineState::Done;
            self.push(
                LogLevel::Success,
                "[RESULT] Fingerprints match. No action required.".to_string(),
            );
        } else {
            self.state = PipelineState::DiffFound;
            self.push(
                LogLevel::Warn,
                "[RESULT] Delta detected: fingerprint mismatch.".to_string(),
            );
            self.push(
                LogLevel::Info,
                format!("[ACTION] Preparing {} update strategy...", self.strategy),
            );
        }

        Ok(&*self.decision.insert(decision))
    }

    /// `DiffFound → Updating`: announce the write.
    pub fn begin_update(&mut self) -> Result<(), PipelineError> {
        self.expect_state("begin_update", PipelineState::DiffFound)?;
        self.state = PipelineState::Updating;
        self.push(
            LogLevel::Info,
            format!(
                "[EXECUTING] Applying {} changes to {}...",
                self.strategy, self.table.name
            ),
        );
        Ok(())
    }

    /// `Updating → Done`: run the engine and swap in the new snapshot.
    pub fn commit_update(
        &mut self,
        effective_date: NaiveDate,
    ) -> Result<&ApplyOutcome, PipelineError> {
        self.expect_state("commit_update", PipelineState::Updating)?;
        let incoming = self
            .incoming_value
            .clone()
            .expect("begin_scan stored the incoming value");

        let outcome = apply(
            &self.table,
            self.business_key,
            &incoming,
            self.strategy,
            effective_date,
        )?;

        self.table = outcome.table.clone();
        self.state = PipelineState::Done;
        self.push(
            LogLevel::Success,
            "[SUCCESS] Transaction committed. Table updated.".to_string(),
        );

        tracing::info!(
            run = %self.id,
            strategy = %self.strategy,
            business_key = self.business_key,
            rows = self.table.len(),
            "pipeline run committed"
        );

        Ok(&*self.outcome.insert(outcome))
    }

    /// Back to `Idle` with the seeded table restored and the log cleared.
    pub fn reset(&mut self) {
        self.table = self.seed.clone();
        self.state = PipelineState::Idle;
        self.incoming_value = None;
        self.decision = None;
        self.outcome = None;
        self.log.clear();
    }

    fn expect_state(
        &self,
        action: &'static str,
        expected: PipelineState,
    ) -> Result<(), PipelineError> {
        if self.state != expected {
            return Err(PipelineError::IllegalState {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    fn push(&mut self, level: LogLevel, message: String) {
        self.log.push(LogEvent {
            at: Utc::now(),
            level,
            message,
        });
    }
}
