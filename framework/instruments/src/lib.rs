//! Per-turn outcome recording and result aggregation.
//!
//! A conversation records one [Turn] per request it issues. The scheduler collects the resulting
//! [ConversationOutcome]s and reduces them to a report with [aggregate]. Nothing here performs
//! I/O; the records are plain values handed down the pipeline by ownership transfer.

mod aggregate;
mod record;
mod summary_table;

pub use aggregate::{aggregate, DEFAULT_P99_MIN_SAMPLES};
pub use record::{ConversationOutcome, Turn, TurnOutcome};
pub use summary_table::print_report_summary;
