//! Tests for pasted table import and TSV export

use maturity_sunburst::application::{sample_snapshot, ApplicationError, TableCodec};

#[test]
fn given_tab_separated_paste_when_parsing_then_maps_columns() {
    // Arrange
    let text = "ID\tName\tWeight\tScore\tBasic\tAdvanced\n\
                1\tQuality\t70%\t\t\t\n\
                1.1\tTests\t100\t50%\tUnit tests\tProperty tests\n";

    // Act
    let snapshot = TableCodec::new().parse(text).unwrap();

    // Assert
    assert_eq!(snapshot.maturity_headers, vec!["Basic", "Advanced"]);
    assert_eq!(snapshot.data.len(), 2);
    let row = &snapshot.data[1];
    assert_eq!(row.id, "1.1");
    assert_eq!(row.weight, 1.0);
    assert_eq!(row.score, Some(0.5));
    assert_eq!(row.maturities, vec!["Unit tests", "Property tests"]);
    assert_eq!(snapshot.data[0].score, None);
}

#[test]
fn given_comma_separated_paste_with_quotes_when_parsing_then_keeps_commas_in_fields() {
    let text = "cid,criterion,weight %\n\n1,\"Build, test and ship\",0.4\n,skipped,1\n";

    let snapshot = TableCodec::new().parse(text).unwrap();

    assert_eq!(snapshot.data.len(), 1);
    assert_eq!(snapshot.data[0].name, "Build, test and ship");
    assert_eq!(snapshot.data[0].weight, 0.4);
    assert!(snapshot.maturity_headers.is_empty());
}

#[test]
fn given_header_without_weight_when_parsing_then_import_error() {
    let err = TableCodec::new().parse("ID\tName\n1\tQuality\n").unwrap_err();

    assert!(matches!(err, ApplicationError::Import { .. }));
    assert!(err.to_string().contains("weight"));
}

#[test]
fn given_header_only_when_parsing_then_import_error() {
    assert!(TableCodec::new().parse("ID\tWeight\n").is_err());
    assert!(TableCodec::new().parse("   \n").is_err());
}

#[test]
fn given_snapshot_when_exporting_then_writes_percentages() {
    let tsv = TableCodec::new().to_tsv(&sample_snapshot());

    let mut lines = tsv.lines();
    assert_eq!(
        lines.next(),
        Some("ID\tName\tWeight\tScore\tSelected\tLevel 1\tLevel 2\tLevel 3\tLevel 4")
    );
    assert_eq!(lines.next(), Some("1\tOverall Quality\t70%\t0%\t\t\t\t\t"));
}

#[test]
fn given_exported_table_when_reimported_then_rows_survive() {
    let codec = TableCodec::new();
    let original = sample_snapshot();

    let reparsed = codec.parse(&codec.to_tsv(&original)).unwrap();

    assert_eq!(reparsed.maturity_headers, original.maturity_headers);
    let ids: Vec<&str> = reparsed.data.iter().map(|r| r.id.as_str()).collect();
    let expected: Vec<&str> = original.data.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, expected);
    assert_eq!(reparsed.data[2].maturities, original.data[2].maturities);
}

#[test]
fn given_fine_weight_and_selection_when_round_tripping_then_both_survive() {
    // Arrange
    let codec = TableCodec::new();
    let mut original = sample_snapshot();
    let leaf = original
        .data
        .iter_mut()
        .find(|r| r.id == "1.1.2")
        .expect("sample leaf");
    leaf.weight = 0.1234;
    leaf.selected_maturity = Some(2);
    leaf.score = Some(1.0);

    // Act
    let reparsed = codec.parse(&codec.to_tsv(&original)).unwrap();

    // Assert
    let row = reparsed.find("1.1.2").expect("row survives");
    assert!((row.weight - 0.1234).abs() < 1e-12);
    assert_eq!(row.selected_maturity, Some(2));
    assert_eq!(row.score, Some(1.0));
    assert_eq!(reparsed.find("1.1.1").unwrap().selected_maturity, None);
}

#[test]
fn given_selected_level_out_of_range_when_parsing_then_selection_is_dropped() {
    let text = "ID\tWeight\tSelected\tBasic\tAdvanced\n1\t100%\t3\tUnit\tProperty\n";

    let snapshot = TableCodec::new().parse(text).unwrap();

    assert_eq!(snapshot.maturity_headers, vec!["Basic", "Advanced"]);
    assert_eq!(snapshot.data[0].selected_maturity, None);
}
