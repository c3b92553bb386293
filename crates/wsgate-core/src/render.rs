use wsgate_types::{
    CaseReport, GateReceipt, GateVerdict, ServerSummary, ToolMeta, GATE_SCHEMA_V1,
    UNKNOWN_OUTCOME,
};

use crate::evaluate::Evaluation;
use crate::rank::status_level;

/// Render the human-readable diagnostic stream: one header line per server,
/// one line per offending case.
pub fn render_transcript(evaluation: &Evaluation) -> String {
    let mut out = String::new();
    for server in &evaluation.servers {
        out.push_str(&format!("Reading report for \"{}\"...\n", server.server));
        for (case_id, case) in &server.offenders {
            out.push_str(&render_case_line(case_id, case));
            out.push('\n');
        }
    }
    out
}

/// One diagnostic line for an offending case.
///
/// The close outcome is appended in parenthetical form only when its rank is
/// nonzero, i.e. anything other than a clean `OK` close. An absent close
/// outcome has a nonzero (sentinel) rank but no name to print, so the
/// parenthetical is omitted.
pub fn render_case_line(case_id: &str, case: &CaseReport) -> String {
    let behavior = case.behavior.as_deref().unwrap_or(UNKNOWN_OUTCOME);
    match case.behavior_close.as_deref() {
        Some(close_name) if status_level(case).close > 0 => {
            format!("  Case {case_id} {behavior} ({close_name} close)")
        }
        _ => format!("  Case {case_id} {behavior}"),
    }
}

/// Machine-readable record of the run, in the same shape the transcript
/// narrates.
pub fn build_receipt(evaluation: &Evaluation) -> GateReceipt {
    GateReceipt {
        schema: GATE_SCHEMA_V1.to_string(),
        tool: ToolMeta {
            name: "wsgate".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        servers: evaluation
            .servers
            .iter()
            .map(|s| ServerSummary {
                server: s.server.clone(),
                cases: s.cases as u32,
                aggregate: s.aggregate,
                offenders: s.offenders.iter().map(|(id, _)| id.clone()).collect(),
            })
            .collect(),
        verdict: GateVerdict {
            acceptable: evaluation.acceptable,
            aggregate: evaluation.aggregate,
            ceiling: evaluation.ceiling,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(behavior: Option<&str>, close: Option<&str>) -> CaseReport {
        CaseReport {
            behavior: behavior.map(str::to_string),
            behavior_close: close.map(str::to_string),
        }
    }

    #[test]
    fn case_line_without_close_parenthetical() {
        assert_eq!(
            render_case_line("1.2", &case(Some("FAILED"), Some("OK"))),
            "  Case 1.2 FAILED"
        );
    }

    #[test]
    fn case_line_with_close_parenthetical() {
        assert_eq!(
            render_case_line("9.1.6", &case(Some("NON-STRICT"), Some("UNCLEAN"))),
            "  Case 9.1.6 NON-STRICT (UNCLEAN close)"
        );
        // unrecognized close names still print verbatim
        assert_eq!(
            render_case_line("2.1", &case(Some("FAILED"), Some("WEIRD"))),
            "  Case 2.1 FAILED (WEIRD close)"
        );
    }

    #[test]
    fn case_line_with_absent_fields() {
        // sentinel close rank but no name: parenthetical omitted
        assert_eq!(
            render_case_line("3.4", &case(Some("FAILED"), None)),
            "  Case 3.4 FAILED"
        );
        assert_eq!(render_case_line("3.4", &case(None, None)), "  Case 3.4 UNKNOWN");
    }
}
