//! Core engine: report loading + outcome ranking + verdict production.

mod evaluate;
mod rank;
mod render;
mod sortkey;

pub use evaluate::{
    evaluate_report, run_gate, Evaluation, GateError, GatePlan, GateRun, ServerEvaluation,
};
pub use rank::{acceptable, rank, status_level};
pub use render::{build_receipt, render_case_line, render_transcript};
pub use sortkey::{case_sort_key, CaseIdError};
