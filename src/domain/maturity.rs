//! Maturity level selection: maps a clicked option to a fractional leaf score.

use tracing::debug;

use crate::domain::entities::CriterionRow;
use crate::domain::error::{DomainError, DomainResult};

/// Option text meaning "level not applicable".
pub const NOT_APPLICABLE: &str = "no";

/// True for the "no" sentinel (trimmed, case-insensitive).
pub fn is_not_applicable(option: &str) -> bool {
    option.trim().eq_ignore_ascii_case(NOT_APPLICABLE)
}

/// True for options that take part in rank math: neither blank nor "no".
pub fn is_rankable(option: &str) -> bool {
    !option.trim().is_empty() && !is_not_applicable(option)
}

/// Score for clicking `clicked` among `options`.
///
/// The "no" sentinel scores 0. Otherwise the score is the 1-based rank of the click
/// among rankable options, divided by the number of rankable options in the row.
pub fn resolve<S: AsRef<str>>(options: &[S], clicked: usize) -> f64 {
    if options
        .get(clicked)
        .is_some_and(|o| is_not_applicable(o.as_ref()))
    {
        return 0.0;
    }
    let valid_count = options.iter().filter(|o| is_rankable(o.as_ref())).count();
    if valid_count == 0 {
        return 0.0;
    }
    let rank = options
        .iter()
        .take(clicked.saturating_add(1))
        .filter(|o| is_rankable(o.as_ref()))
        .count();
    rank as f64 / valid_count as f64
}

/// Result of toggling a maturity option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Option selected, row scored
    Selected { index: usize, score: f64 },
    /// Same option clicked again, selection and score cleared
    Cleared,
}

/// Toggle option `clicked` on `row`.
///
/// Clicking the selected option clears selection and score; any other option
/// selects it and sets the resolved score. Blank options are not selectable.
pub fn toggle(row: &mut CriterionRow, clicked: usize) -> DomainResult<Selection> {
    let option = row
        .maturities
        .get(clicked)
        .ok_or_else(|| DomainError::OptionOutOfRange {
            id: row.id.clone(),
            index: clicked,
            len: row.maturities.len(),
        })?;
    if option.trim().is_empty() {
        return Err(DomainError::BlankOption {
            id: row.id.clone(),
            index: clicked,
        });
    }

    if row.selected_maturity == Some(clicked) {
        row.selected_maturity = None;
        row.score = None;
        debug!("toggle {}: cleared option {}", row.id, clicked);
        return Ok(Selection::Cleared);
    }

    let score = resolve(&row.maturities, clicked);
    row.selected_maturity = Some(clicked);
    row.score = Some(score);
    debug!("toggle {}: option {} -> {}", row.id, clicked, score);
    Ok(Selection::Selected {
        index: clicked,
        score,
    })
}
