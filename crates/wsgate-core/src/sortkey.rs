/// A case identifier segment that would not parse as an integer.
///
/// This is a programmer/report-shape error, not a tolerated input: the
/// upstream client addresses every case with a dotted numeric identifier,
/// so anything else means the report is malformed.
#[derive(Debug, thiserror::Error)]
#[error("invalid case identifier '{case_id}': segment '{segment}' is not an integer")]
pub struct CaseIdError {
    pub case_id: String,
    pub segment: String,
    #[source]
    pub source: std::num::ParseIntError,
}

/// Numeric sort key for a dotted case identifier.
///
/// Splits on `.` and parses each segment, so `"1.9.5"` orders before
/// `"1.10.2"` (lexicographic string order would reverse them).
pub fn case_sort_key(case_id: &str) -> Result<Vec<u64>, CaseIdError> {
    case_id
        .split('.')
        .map(|segment| {
            segment.parse::<u64>().map_err(|source| CaseIdError {
                case_id: case_id.to_string(),
                segment: segment.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_segments_numerically_not_lexicographically() {
        let earlier = case_sort_key("1.9.5").expect("sort key");
        let later = case_sort_key("1.10.2").expect("sort key");
        assert!(earlier < later);
        // the string comparison would get this backwards
        assert!("1.9.5" > "1.10.2");
    }

    #[test]
    fn compares_prefixes_before_depth() {
        assert!(case_sort_key("1.2").expect("sort key") < case_sort_key("1.2.1").expect("sort key"));
        assert!(case_sort_key("2.1").expect("sort key") > case_sort_key("1.99").expect("sort key"));
    }

    #[test]
    fn rejects_non_integer_segments() {
        let err = case_sort_key("1.x.3").expect_err("must reject");
        assert_eq!(err.case_id, "1.x.3");
        assert_eq!(err.segment, "x");
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(case_sort_key("1..2").is_err());
        assert!(case_sort_key("").is_err());
    }
}
