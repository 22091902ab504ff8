//! Tests for maturity option scoring and toggling

use rstest::rstest;

use maturity_sunburst::domain::maturity::{resolve, toggle, Selection};
use maturity_sunburst::domain::{CriterionRow, DomainError};

#[rstest]
#[case(&["Level 1", "Level 2", "", ""], 1, 1.0)]
#[case(&["Level 1", "Level 2", "", ""], 0, 0.5)]
#[case(&["Manual", "Scripted", "Continuous", "no"], 3, 0.0)]
#[case(&["Manual", "Scripted", "Continuous", "no"], 2, 1.0)]
#[case(&["a", "", "c", "d"], 2, 2.0 / 3.0)]
#[case(&["", "", "", ""], 0, 0.0)]
fn given_options_when_resolving_click_then_returns_rank_fraction(
    #[case] options: &[&str],
    #[case] clicked: usize,
    #[case] expected: f64,
) {
    let score = resolve(options, clicked);
    assert!((score - expected).abs() < 1e-12, "got {score}");
}

fn leaf() -> CriterionRow {
    CriterionRow::new("1.1", "Tests", 1.0).with_maturities(["Level 1", "Level 2", "", ""])
}

#[test]
fn given_unselected_leaf_when_toggling_then_selects_and_scores() {
    // Arrange
    let mut row = leaf();

    // Act
    let selection = toggle(&mut row, 1).unwrap();

    // Assert
    assert_eq!(selection, Selection::Selected { index: 1, score: 1.0 });
    assert_eq!(row.selected_maturity, Some(1));
    assert_eq!(row.score, Some(1.0));
}

#[test]
fn given_selected_option_when_clicked_again_then_clears() {
    // Arrange
    let mut row = leaf();
    toggle(&mut row, 0).unwrap();

    // Act
    let selection = toggle(&mut row, 0).unwrap();

    // Assert
    assert_eq!(selection, Selection::Cleared);
    assert_eq!(row.selected_maturity, None);
    assert_eq!(row.score, None);
}

#[test]
fn given_other_option_when_clicked_then_switches_selection() {
    let mut row = leaf();
    toggle(&mut row, 0).unwrap();

    let selection = toggle(&mut row, 1).unwrap();

    assert_eq!(selection, Selection::Selected { index: 1, score: 1.0 });
}

#[test]
fn given_blank_option_when_clicked_then_fails_without_change() {
    let mut row = leaf();

    let err = toggle(&mut row, 2).unwrap_err();

    assert!(matches!(err, DomainError::BlankOption { index: 2, .. }));
    assert_eq!(row.score, None);
}

#[test]
fn given_index_past_options_when_clicked_then_out_of_range() {
    let mut row = leaf();

    let err = toggle(&mut row, 7).unwrap_err();

    assert!(matches!(
        err,
        DomainError::OptionOutOfRange { index: 7, len: 4, .. }
    ));
}
