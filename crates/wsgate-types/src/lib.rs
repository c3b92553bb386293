//! Data types (report artifacts + tolerance config) for wsgate.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.

use std::collections::BTreeMap;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Schema Identifiers ─────────────────────────────────────────
pub const GATE_SCHEMA_V1: &str = "wsgate.gate.v1";

// ── Frozen Vocabulary ──────────────────────────────────────────
/// Canonical outcome ranking, least to most severe. Position in this list
/// IS the rank: never reorder or renumber without changing test expectations.
pub const OUTCOME_RANKING: [&str; 6] = [
    "OK",
    "INFORMATIONAL",
    "NON-STRICT",
    "UNIMPLEMENTED",
    "UNCLEAN",
    "FAILED",
];

/// Sentinel rank for absent or unrecognized outcome names.
/// Sorts strictly worse than every named outcome.
pub const UNKNOWN_RANK: usize = OUTCOME_RANKING.len();

/// Display name for the sentinel rank.
pub const UNKNOWN_OUTCOME: &str = "UNKNOWN";

/// One test case's raw result as written by the fuzzing client.
///
/// `behavior` is the primary protocol outcome; `behavior_close` classifies
/// the closing handshake. Both may be absent in degenerate reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaseReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,

    #[serde(
        default,
        rename = "behaviorClose",
        skip_serializing_if = "Option::is_none"
    )]
    pub behavior_close: Option<String>,
}

/// The generated index artifact: server identifier → case identifier → result.
///
/// `BTreeMap` keeps server iteration in sorted identifier order, which the
/// evaluation scan depends on.
pub type ReportIndex = BTreeMap<String, BTreeMap<String, CaseReport>>;

/// The fuzzing client's own configuration artifact.
///
/// Only `outdir` matters to the gate; every other field belongs to the client
/// and is ignored. A missing `outdir` is a fatal configuration error, checked
/// by the engine rather than serde so the message names the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdir: Option<PathBuf>,
}

/// Derived severity pair for one case, each component an outcome rank.
///
/// Field order matters: the derived `Ord` is lexicographic (behavior first,
/// close on ties), which is exactly the ordering the per-server aggregate
/// takes its maximum under. The two components are never merged into one
/// scalar.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub struct StatusLevel {
    pub behavior: usize,
    pub close: usize,
}

/// Operator-supplied tolerance: the maximum accepted rank, independently per
/// dimension. Deliberately NOT `Ord`: acceptability is a per-dimension
/// comparison, not a tuple comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Ceiling {
    pub behavior: usize,
    pub close: usize,
}

impl Default for Ceiling {
    /// The conventional invocation: behavior up to UNIMPLEMENTED (rank 3),
    /// close up to UNCLEAN (rank 4).
    fn default() -> Self {
        Self {
            behavior: 3,
            close: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Per-server slice of the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ServerSummary {
    pub server: String,
    pub cases: u32,
    pub aggregate: StatusLevel,
    /// Offending case identifiers in numeric order.
    pub offenders: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GateVerdict {
    pub acceptable: bool,
    /// The scan accumulator: the aggregate of the last server in sorted order.
    pub aggregate: StatusLevel,
    pub ceiling: Ceiling,
}

/// Machine-readable record of one gate run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GateReceipt {
    pub schema: String,
    pub tool: ToolMeta,
    pub servers: Vec<ServerSummary>,
    pub verdict: GateVerdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_report_uses_wire_field_names() {
        let case: CaseReport =
            serde_json::from_str(r#"{"behavior":"OK","behaviorClose":"UNCLEAN"}"#)
                .expect("parse case");
        assert_eq!(case.behavior.as_deref(), Some("OK"));
        assert_eq!(case.behavior_close.as_deref(), Some("UNCLEAN"));
    }

    #[test]
    fn case_report_tolerates_absent_fields() {
        let case: CaseReport = serde_json::from_str("{}").expect("parse case");
        assert_eq!(case, CaseReport::default());
    }

    #[test]
    fn client_config_ignores_foreign_fields() {
        let cfg: ClientConfig = serde_json::from_str(
            r#"{"servers":[{"url":"ws://127.0.0.1:8002"}],"outdir":"./reports","cases":["*"]}"#,
        )
        .expect("parse config");
        assert_eq!(cfg.outdir.as_deref(), Some(std::path::Path::new("./reports")));
    }

    #[test]
    fn status_level_orders_lexicographically() {
        let worst_behavior = StatusLevel {
            behavior: 5,
            close: 0,
        };
        let worst_close = StatusLevel {
            behavior: 0,
            close: 5,
        };
        // behavior dominates; close only breaks ties
        assert!(worst_behavior > worst_close);
        assert!(
            StatusLevel {
                behavior: 2,
                close: 6
            } > StatusLevel {
                behavior: 2,
                close: 3
            }
        );
    }

    #[test]
    fn default_ceiling_matches_conventional_invocation() {
        assert_eq!(
            Ceiling::default(),
            Ceiling {
                behavior: 3,
                close: 4
            }
        );
    }

    #[test]
    fn report_index_iterates_servers_in_sorted_order() {
        let index: ReportIndex = serde_json::from_str(
            r#"{"srv-b":{},"srv-a":{},"srv-c":{}}"#,
        )
        .expect("parse index");
        let order: Vec<&str> = index.keys().map(String::as_str).collect();
        assert_eq!(order, ["srv-a", "srv-b", "srv-c"]);
    }
}
