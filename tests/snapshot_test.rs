//! Tests for the JSON snapshot codec

use maturity_sunburst::application::{parse_snapshot, sample_snapshot, to_json, ApplicationError};

#[test]
fn given_current_shape_when_parsing_then_reads_headers_and_rows() {
    // Arrange
    let json = r#"{
        "maturityHeaders": ["Initial", "Managed", "Optimized"],
        "data": [
            {"id": "1", "name": "Quality", "weight": 1, "score": null, "maturities": []},
            {"id": "1.1", "name": "Tests", "weight": 0.5, "score": 0.5,
             "maturities": ["Some", "Most", "All"], "selectedMaturity": 1}
        ]
    }"#;

    // Act
    let snapshot = parse_snapshot(json).unwrap();

    // Assert
    assert_eq!(snapshot.maturity_headers, vec!["Initial", "Managed", "Optimized"]);
    assert_eq!(snapshot.data.len(), 2);
    assert_eq!(snapshot.data[0].maturities.len(), 3, "rows padded to header width");
    assert_eq!(snapshot.data[1].selected_maturity, Some(1));
    assert_eq!(snapshot.data[1].score, Some(0.5));
}

#[test]
fn given_legacy_row_list_when_parsing_then_synthesizes_headers() {
    // Arrange
    let json = r#"[
        {"id": "1", "name": "Quality", "weight": "70%", "maturityOptions": ["a", "b"],
         "selectedOptionIndex": 0},
        {"id": "2", "name": "Support", "weight": 30}
    ]"#;

    // Act
    let snapshot = parse_snapshot(json).unwrap();

    // Assert
    assert_eq!(snapshot.maturity_headers, vec!["Level 1", "Level 2"]);
    assert_eq!(snapshot.data[0].weight, 0.7);
    assert_eq!(snapshot.data[0].selected_maturity, Some(0));
    assert_eq!(snapshot.data[1].weight, 0.3);
    assert_eq!(snapshot.data[1].maturities, vec!["", ""]);
}

#[test]
fn given_unparseable_weight_when_parsing_then_weight_is_zero() {
    let json = r#"[{"id": "1", "name": "Quality", "weight": "lots", "score": ""}]"#;

    let snapshot = parse_snapshot(json).unwrap();

    assert_eq!(snapshot.data[0].weight, 0.0);
    assert_eq!(snapshot.data[0].score, None);
}

#[test]
fn given_row_without_id_when_parsing_then_import_error() {
    let json = r#"{"maturityHeaders": [], "data": [{"id": " ", "name": "Nameless"}]}"#;

    let err = parse_snapshot(json).unwrap_err();

    assert!(matches!(err, ApplicationError::Import { .. }));
}

#[test]
fn given_broken_json_when_parsing_then_import_error() {
    assert!(matches!(
        parse_snapshot("{ not json").unwrap_err(),
        ApplicationError::Import { .. }
    ));
}

#[test]
fn given_sample_when_serialized_then_uses_current_shape() {
    let json = to_json(&sample_snapshot()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["maturityHeaders"].is_array());
    assert_eq!(value["data"][0]["id"], "1");
    assert!(value["data"][0].get("selectedMaturity").is_none());
    assert_eq!(parse_snapshot(&json).unwrap(), sample_snapshot());
}
