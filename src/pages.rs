//! Page-range parsing: `"0,2-5,7"` → a concrete list of page indices.
//!
//! The grammar is deliberately tiny: comma-separated tokens, each either a
//! single non-negative integer or an inclusive `start-end` range. Order is
//! preserved exactly as the user wrote it and duplicates are kept — the
//! remote service receives the list verbatim, so `"3,1,3"` genuinely asks
//! for page 3 twice. Parsing stops at the first bad token; a partial list
//! is never returned.

use crate::error::OcrError;

/// Parse a user-supplied page specification into zero-based page indices.
///
/// `None` or an empty string means "no restriction" — all pages.
///
/// Accepted forms, whitespace-tolerant around numbers and the dash:
///
/// ```text
/// "0"          → [0]
/// "0,1,2"      → [0, 1, 2]
/// "0-3"        → [0, 1, 2, 3]
/// "1, 3-5 ,7"  → [1, 3, 4, 5, 7]
/// ```
///
/// # Errors
/// [`OcrError::InvalidPageRange`] on an empty token, a non-integer literal,
/// a half-open range (`"1-"`, `"-2"`), or a range with `end < start`.
pub fn parse_pages(spec: Option<&str>) -> Result<Option<Vec<u32>>, OcrError> {
    let spec = match spec {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };

    let mut pages = Vec::new();
    for token in spec.split(',') {
        let token = token.trim();
        if token.is_empty() {
            return Err(OcrError::InvalidPageRange {
                token: token.to_string(),
                reason: "empty page specification".to_string(),
            });
        }

        if let Some((start_str, end_str)) = token.split_once('-') {
            let (start_str, end_str) = (start_str.trim(), end_str.trim());
            if start_str.is_empty() || end_str.is_empty() {
                return Err(OcrError::InvalidPageRange {
                    token: token.to_string(),
                    reason: "range is missing its start or end".to_string(),
                });
            }

            let start: u32 = parse_number(start_str, token)?;
            let end: u32 = parse_number(end_str, token)?;
            if end < start {
                return Err(OcrError::InvalidPageRange {
                    token: token.to_string(),
                    reason: "end of range is smaller than start".to_string(),
                });
            }
            pages.extend(start..=end);
        } else {
            pages.push(parse_number(token, token)?);
        }
    }

    Ok(Some(pages))
}

fn parse_number(literal: &str, token: &str) -> Result<u32, OcrError> {
    literal.parse().map_err(|_| OcrError::InvalidPageRange {
        token: token.to_string(),
        reason: format!("'{literal}' is not a non-negative integer"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_and_empty_mean_all_pages() {
        assert_eq!(parse_pages(None).unwrap(), None);
        assert_eq!(parse_pages(Some("")).unwrap(), None);
    }

    #[test]
    fn whitespace_only_spec_is_an_empty_token() {
        // Only a genuinely empty spec means "all pages"; blanks tokenize
        // to an empty token and are rejected like any other.
        let err = parse_pages(Some("   ")).unwrap_err();
        assert!(matches!(err, OcrError::InvalidPageRange { .. }));
        assert!(err.to_string().contains("empty"), "got: {err}");
    }

    #[test]
    fn single_pages() {
        assert_eq!(parse_pages(Some("0")).unwrap(), Some(vec![0]));
        assert_eq!(parse_pages(Some("0,1,2")).unwrap(), Some(vec![0, 1, 2]));
    }

    #[test]
    fn ranges_expand_inclusively() {
        assert_eq!(parse_pages(Some("0-2")).unwrap(), Some(vec![0, 1, 2]));
        assert_eq!(parse_pages(Some("5-5")).unwrap(), Some(vec![5]));
    }

    #[test]
    fn mixed_tokens_keep_user_order() {
        assert_eq!(
            parse_pages(Some("1,3-5,7")).unwrap(),
            Some(vec![1, 3, 4, 5, 7])
        );
        // No sorting, no deduplication.
        assert_eq!(
            parse_pages(Some("7,0-1,0")).unwrap(),
            Some(vec![7, 0, 1, 0])
        );
    }

    #[test]
    fn whitespace_is_ignored_around_numbers_and_dash() {
        assert_eq!(
            parse_pages(Some(" 1 , 3 - 5 , 7 ")).unwrap(),
            Some(vec![1, 3, 4, 5, 7])
        );
    }

    #[test]
    fn malformed_specs_fail_without_partial_output() {
        for bad in ["a,b", "1-", "-2", "1,a", "1,,2", "3-1", "1.5"] {
            let err = parse_pages(Some(bad)).unwrap_err();
            assert!(
                matches!(err, OcrError::InvalidPageRange { .. }),
                "{bad:?} should be rejected, got: {err}"
            );
        }
    }

    #[test]
    fn error_names_the_offending_token() {
        let err = parse_pages(Some("0,x-3")).unwrap_err();
        assert!(err.to_string().contains("'x-3'"), "got: {err}");
    }
}
