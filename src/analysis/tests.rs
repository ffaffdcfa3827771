// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Marginalia-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Marginalia and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use crate::align::DropReason;
use crate::model::Category;

use super::{
    analysis_response_schema, normalize_keywords, normalize_score, parse_analysis, AnalysisError,
    RawKeyword, DEFAULT_KEYWORD_DESCRIPTION,
};

const TEXT: &str = "Dear professor, i wanted to ask about the the deadline.";

#[test]
fn parses_and_anchors_a_typical_reply() {
    let raw = r#"{
        "score": 72.4,
        "suggestions": [
            {"id": "cap", "type": "correctness", "title": "Capitalize", "description": "Use I",
             "original": "i wanted", "replacement": "I wanted", "startIndex": 16, "endIndex": 24},
            {"id": "dup", "type": "clarity", "original": "the the", "replacement": "the",
             "startIndex": 3, "endIndex": 10},
            {"type": "delivery", "original": "not in the text", "replacement": "x"}
        ],
        "keywords": [{"id": "k1", "keyword": "  extension ", "description": "Ask directly"}]
    }"#;

    let analysis = parse_analysis(raw, TEXT).expect("analysis");

    assert_eq!(analysis.score, Some(72));
    assert_eq!(analysis.document.text, TEXT);
    assert_eq!(analysis.document.spans.len(), 2);
    assert_eq!(analysis.document.spans[0].id.as_str(), "cap");
    assert_eq!(analysis.document.spans[0].category, Category::Correctness);
    assert_eq!(
        (
            analysis.document.spans[1].start_index,
            analysis.document.spans[1].end_index
        ),
        (38, 45)
    );
    assert!(analysis.document.invariant_violations().is_empty());
    assert_eq!(analysis.dropped_suggestions(), 1);
    assert_eq!(analysis.dropped[0].index, 2);
    assert_eq!(analysis.dropped[0].reason, DropReason::NotFound);

    assert_eq!(analysis.document.keywords.len(), 1);
    assert_eq!(analysis.document.keywords[0].keyword, "extension");
    assert_eq!(analysis.document.keywords[0].description, "Ask directly");
}

#[rstest]
#[case("")]
#[case("   \n")]
fn blank_reply_is_empty(#[case] raw: &str) {
    assert!(matches!(parse_analysis(raw, TEXT), Err(AnalysisError::Empty)));
}

#[test]
fn non_json_reply_is_malformed() {
    let err = parse_analysis("Sure! Here are suggestions:", TEXT).expect_err("malformed");
    assert!(matches!(err, AnalysisError::Malformed { .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[rstest]
#[case("[]", "an array")]
#[case("42", "a number")]
#[case("null", "null")]
fn non_object_reply_is_rejected(#[case] raw: &str, #[case] found: &str) {
    let err = parse_analysis(raw, TEXT).expect_err("not an object");
    assert!(err.to_string().contains(found), "{err}");
}

#[test]
fn wrong_list_types_read_as_empty() {
    let analysis = parse_analysis(
        r#"{"score": "high", "suggestions": {"original": "the"}, "keywords": "deadline"}"#,
        TEXT,
    )
    .expect("analysis");
    assert_eq!(analysis.score, None);
    assert!(analysis.document.spans.is_empty());
    assert!(analysis.document.keywords.is_empty());
}

#[test]
fn garbage_list_elements_keep_their_positions() {
    let analysis = parse_analysis(
        r#"{"suggestions": [17, {"original": "Dear", "replacement": "Hi"}]}"#,
        TEXT,
    )
    .expect("analysis");
    assert_eq!(analysis.document.spans.len(), 1);
    assert_eq!(analysis.document.spans[0].id.as_str(), "s-1");
    assert_eq!(analysis.dropped[0].reason, DropReason::EmptyOriginal);
}

#[rstest]
#[case(72.5, Some(73))]
#[case(-4.0, Some(0))]
#[case(180.2, Some(100))]
#[case(99.49, Some(99))]
#[case(f64::NAN, None)]
#[case(f64::INFINITY, None)]
fn scores_are_rounded_and_clamped(#[case] score: f64, #[case] expected: Option<u8>) {
    assert_eq!(normalize_score(score), expected);
}

#[test]
fn keywords_are_trimmed_and_filled_in() {
    let raw = [
        RawKeyword {
            id: None,
            keyword: "   ".to_owned(),
            description: None,
        },
        RawKeyword {
            id: None,
            keyword: " deadline ".to_owned(),
            description: Some(String::new()),
        },
        RawKeyword {
            id: Some("kw-1".to_owned()),
            keyword: "extension".to_owned(),
            description: Some("Be explicit".to_owned()),
        },
    ];

    let keywords = normalize_keywords(&raw);

    assert_eq!(keywords.len(), 2);
    assert_eq!(keywords[0].id.as_str(), "kw-1");
    assert_eq!(keywords[0].keyword, "deadline");
    assert_eq!(keywords[0].description, DEFAULT_KEYWORD_DESCRIPTION);
    // Raw id collides with the positional id handed out above.
    assert_eq!(keywords[1].id.as_str(), "kw-2");
    assert_eq!(keywords[1].description, "Be explicit");
}

#[test]
fn schema_describes_the_reply_fields() {
    let schema = serde_json::to_value(analysis_response_schema()).expect("schema json");
    let properties = &schema["properties"];
    assert!(properties.get("score").is_some());
    assert!(properties.get("suggestions").is_some());
    assert!(properties.get("keywords").is_some());

    let rendered = schema.to_string();
    assert!(rendered.contains("startIndex"));
    assert!(rendered.contains("\"type\""));
}
