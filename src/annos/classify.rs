//! Classification of annotation records as impactful (damaging) or not.
//!
//! The PolyPhen and SIFT predictions live below the `cadd` block of a record.  Each
//! is either a single object or a list of per-transcript objects; for lists, only
//! the first entry is considered.  Whether any transcript being damaging should
//! count instead is an open question, the first-entry policy is kept as is.

use serde_json::Value;

/// PolyPhen categories considered damaging.
pub const POLYPHEN_DAMAGING: &[&str] = &["damaging", "possibly damaging", "probably damaging"];

/// SIFT categories considered damaging.
pub const SIFT_DAMAGING: &[&str] = &["deleterious", "deleterious - low confidence"];

/// Normalize a prediction field: first element of a list, else the value itself.
fn first_or_self(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Array(values)) => values.first(),
        other => other,
    }
}

/// Category label (`cat`) of a prediction field, if any.
fn category<'a>(impact: &'a Value, tool: &str) -> Option<&'a str> {
    first_or_self(impact.get(tool))
        .and_then(|prediction| prediction.get("cat"))
        .and_then(Value::as_str)
}

/// Decide whether the SNP described by `record` is impactful.
///
/// Total: malformed or partial records yield `false`.
pub fn is_impactful(record: &Value) -> bool {
    let Some(impact) = record.get("cadd") else {
        return false;
    };

    category(impact, "polyphen").map_or(false, |cat| POLYPHEN_DAMAGING.contains(&cat))
        || category(impact, "sift").map_or(false, |cat| SIFT_DAMAGING.contains(&cat))
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::is_impactful;

    #[rstest::rstest]
    #[case::polyphen_probably(json!({"cadd": {"polyphen": {"cat": "probably damaging"}}}), true)]
    #[case::polyphen_possibly(json!({"cadd": {"polyphen": {"cat": "possibly damaging"}}}), true)]
    #[case::polyphen_damaging(json!({"cadd": {"polyphen": {"cat": "damaging"}}}), true)]
    #[case::polyphen_benign(json!({"cadd": {"polyphen": {"cat": "benign"}}}), false)]
    #[case::sift_deleterious(json!({"cadd": {"sift": {"cat": "deleterious"}}}), true)]
    #[case::sift_low_confidence(
        json!({"cadd": {"sift": {"cat": "deleterious - low confidence"}}}),
        true
    )]
    #[case::sift_tolerated(json!({"cadd": {"sift": {"cat": "tolerated"}}}), false)]
    #[case::either_suffices(
        json!({"cadd": {"polyphen": {"cat": "benign"}, "sift": {"cat": "deleterious"}}}),
        true
    )]
    #[case::case_sensitive(json!({"cadd": {"polyphen": {"cat": "Probably Damaging"}}}), false)]
    fn categories(#[case] record: serde_json::Value, #[case] expected: bool) {
        assert_eq!(expected, is_impactful(&record));
    }

    #[rstest::rstest]
    #[case::list_first_damaging(
        json!({"cadd": {"polyphen": [{"cat": "probably damaging"}, {"cat": "benign"}]}}),
        true
    )]
    #[case::list_later_damaging_ignored(
        json!({"cadd": {"polyphen": [{"cat": "benign"}, {"cat": "probably damaging"}]}}),
        false
    )]
    #[case::sift_list_later_damaging_ignored(
        json!({"cadd": {"sift": [{"cat": "tolerated"}, {"cat": "deleterious"}]}}),
        false
    )]
    #[case::list_and_object(
        json!({"cadd": {"polyphen": [{"cat": "benign"}], "sift": {"cat": "deleterious"}}}),
        true
    )]
    fn first_transcript_only(#[case] record: serde_json::Value, #[case] expected: bool) {
        assert_eq!(expected, is_impactful(&record));
    }

    #[rstest::rstest]
    #[case::empty(json!({}))]
    #[case::null(json!(null))]
    #[case::not_an_object(json!("rs1"))]
    #[case::no_impact_block(json!({"dbsnp": {"rsid": "rs1"}}))]
    #[case::impact_block_null(json!({"cadd": null}))]
    #[case::impact_block_empty(json!({"cadd": {}}))]
    #[case::impact_block_list(json!({"cadd": [{"polyphen": {"cat": "damaging"}}]}))]
    #[case::empty_list(json!({"cadd": {"polyphen": [], "sift": []}}))]
    #[case::missing_cat(json!({"cadd": {"polyphen": {"val": 0.99}}}))]
    #[case::cat_not_string(json!({"cadd": {"polyphen": {"cat": 1}, "sift": {"cat": ["deleterious"]}}}))]
    #[case::prediction_scalar(json!({"cadd": {"polyphen": "probably damaging"}}))]
    fn malformed_is_not_impactful(#[case] record: serde_json::Value) {
        assert!(!is_impactful(&record));
    }
}
