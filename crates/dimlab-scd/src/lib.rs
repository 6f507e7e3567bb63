//! dimlab-scd: a slowly-changing-dimension engine.
//!
//! This crate is the write path of dimlab: it owns the rules for how a
//! dimension table mutates when an incoming attribute value differs from the
//! active record. Everything is synchronous, in-memory, and value-oriented —
//! the caller holds a [`DimensionTable`] snapshot, and every change produces
//! a new snapshot.
//!
//! Pipeline shape:
//!
//! ```text
//! incoming value ──► detect (fingerprint compare) ──► matches? ── yes ─► no-op
//!                                                        │
//!                                                        no
//!                                                        ▼
//!                                   apply (Type 1 / Type 2 / Type 3)
//!                                                        ▼
//!                                             new DimensionTable
//! ```
//!
//! The read path ([`query`]) reconstructs table state as of a date (Type-2
//! history only ever grows, so point-in-time queries are pure filters).
//! [`sql`] renders the equivalent warehouse statements for display.

pub mod apply;
pub mod detect;
pub mod digest;
pub mod query;
pub mod record;
pub mod sql;

pub use apply::{apply, ApplyOutcome, ScdError, ScdStrategy};
pub use detect::{detect, ChangeDecision};
pub use digest::{fingerprint_v1, Fingerprint, FINGERPRINT_V1_PREFIX};
pub use query::{as_of, current, history};
pub use record::{BusinessKey, DimensionRecord, DimensionTable, SurrogateKey};
pub use sql::{render_as_of_predicate, render_statement, StatementContext};
