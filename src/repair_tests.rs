//! Unit tests for the repairing JSON parser.

#[cfg(test)]
mod repair_tests {
    use crate::error::ConvertError;
    use crate::repair::{parse_document, repair_json};
    use serde_json::json;

    // ============= Strict Stage Tests =============

    #[test]
    fn test_clean_json_passes_through() {
        let value = repair_json(r#"{"strategy_sets": []}"#).unwrap();
        assert_eq!(value, json!({ "strategy_sets": [] }));
    }

    #[test]
    fn test_clean_json_array_passes_through() {
        // The strict stage accepts any JSON value, not just objects
        let value = repair_json("[1, 2, 3]").unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    // ============= Relaxed Stage Tests =============

    #[test]
    fn test_trailing_commas_are_repaired() {
        let value = repair_json(r#"{"sets": [{"type": "intraday",},],}"#).unwrap();
        assert_eq!(value["sets"][0]["type"], json!("intraday"));
    }

    #[test]
    fn test_comments_are_repaired() {
        let raw = "{\n  // generated strategy\n  \"sets\": []\n}";
        let value = repair_json(raw).unwrap();
        assert_eq!(value, json!({ "sets": [] }));
    }

    #[test]
    fn test_unquoted_keys_are_repaired() {
        let value = repair_json(r#"{strategy_sets: [], version: 2}"#).unwrap();
        assert_eq!(value["version"], json!(2));
    }

    #[test]
    fn test_single_quoted_strings_are_repaired() {
        let value = repair_json(r#"{'sets': ['a', 'b']}"#).unwrap();
        assert_eq!(value["sets"], json!(["a", "b"]));
    }

    // ============= Extraction Stage Tests =============

    #[test]
    fn test_markdown_fence_is_stripped() {
        let raw = "```json\n{\"strategy_sets\": []}\n```";
        let value = repair_json(raw).unwrap();
        assert_eq!(value, json!({ "strategy_sets": [] }));
    }

    #[test]
    fn test_prose_wrapped_object_is_extracted() {
        let raw = "Here is the strategy you asked for:\n{\"sets\": []}\nLet me know if it works!";
        let value = repair_json(raw).unwrap();
        assert_eq!(value, json!({ "sets": [] }));
    }

    #[test]
    fn test_extraction_spans_first_to_last_brace() {
        // Inner braces must not truncate the slice
        let raw = "output: {\"a\": {\"b\": 1}} done";
        let value = repair_json(raw).unwrap();
        assert_eq!(value["a"]["b"], json!(1));
    }

    // ============= Failure Tests =============

    #[test]
    fn test_no_braces_fails_with_raw_preserved() {
        let raw = "I cannot produce a strategy for that request.";
        let err = repair_json(raw).unwrap_err();
        if let ConvertError::MalformedDocument { raw: kept, .. } = &err {
            assert_eq!(kept, raw);
        } else {
            panic!("Expected MalformedDocument, got {err:?}");
        }
        assert_eq!(err.raw_artifact(), Some(raw));
    }

    #[test]
    fn test_reversed_braces_fail() {
        assert!(repair_json("} nothing here {").is_err());
    }

    #[test]
    fn test_garbage_inside_braces_fails() {
        let err = repair_json("{definitely not ; json}").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedDocument { .. }));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(repair_json("").is_err());
    }

    // ============= Document Conversion Tests =============

    #[test]
    fn test_parse_document_returns_model_and_value() {
        let raw = "```json\n{\"strategy_sets\": [{\"phases\": []}]}\n```";
        let (doc, value) = parse_document(raw).unwrap();
        assert_eq!(doc.sets.len(), 1);
        assert_eq!(value["strategy_sets"][0], json!({ "phases": [] }));
    }

    #[test]
    fn test_parse_document_accepts_unknown_shape() {
        // Conversion never fails on shape; unknown roots become empty documents
        let (doc, value) = parse_document(r#"{"unexpected": true}"#).unwrap();
        assert!(doc.sets.is_empty());
        assert_eq!(value, json!({ "unexpected": true }));
    }
}
