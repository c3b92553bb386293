use wsgate_types::{CaseReport, Ceiling, StatusLevel, OUTCOME_RANKING, UNKNOWN_RANK};

/// Rank an outcome name by its position in the canonical ranking.
///
/// Absent or unrecognized names get the sentinel rank, one past the end of
/// the list. Never fails: an outcome the client invents tomorrow is simply
/// worse than everything known today.
pub fn rank(outcome: Option<&str>) -> usize {
    outcome
        .and_then(|name| OUTCOME_RANKING.iter().position(|known| *known == name))
        .unwrap_or(UNKNOWN_RANK)
}

/// Derive the severity pair for one case.
///
/// Both dimensions are ranked independently and stay independent; callers
/// that need a single ordering pick one explicitly.
pub fn status_level(case: &CaseReport) -> StatusLevel {
    StatusLevel {
        behavior: rank(case.behavior.as_deref()),
        close: rank(case.behavior_close.as_deref()),
    }
}

/// The single point of truth for tolerance.
///
/// Per-dimension comparison, NOT lexicographic: a case with an acceptable
/// behavior outcome still fails when its close rank exceeds the close
/// ceiling, and vice versa. Used identically for per-case filtering and for
/// the final verdict so the two can never disagree.
pub fn acceptable(status: StatusLevel, ceiling: Ceiling) -> bool {
    status.behavior <= ceiling.behavior && status.close <= ceiling.close
}
