//! Pasted table import (tab or comma separated) and TSV export.

use itertools::Itertools;
use regex::Regex;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{parse_fraction, CriterionRow, Snapshot};

/// Column positions resolved from a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: usize,
    pub name: Option<usize>,
    pub weight: usize,
    pub score: Option<usize>,
    /// 1-based index of the selected maturity level
    pub selected: Option<usize>,
    /// Remaining columns, in order, with their header text
    pub maturities: Vec<(usize, String)>,
}

/// Reads and writes the criteria table as delimited text.
pub struct TableCodec {
    id_regex: Regex,
    name_regex: Regex,
    weight_regex: Regex,
    score_regex: Regex,
    selected_regex: Regex,
}

impl Default for TableCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCodec {
    pub fn new() -> Self {
        Self {
            id_regex: Regex::new(r"^(c?id|#|no\.?|number)$").expect("static regex"),
            name_regex: Regex::new(r"^(name|criteri(on|a)|title)$").expect("static regex"),
            weight_regex: Regex::new(r"^(weight(ing)?\s*(\(?%\)?)?|%)$").expect("static regex"),
            score_regex: Regex::new(r"^((maturity\s*)?score|result)$").expect("static regex"),
            selected_regex: Regex::new(r"^selected(\s*(level|maturity))?$").expect("static regex"),
        }
    }

    /// Match header cells to columns. Unrecognized columns become maturity headers.
    pub fn map_columns(&self, headers: &[String]) -> ApplicationResult<ColumnMap> {
        let mut id = None;
        let mut name = None;
        let mut weight = None;
        let mut score = None;
        let mut selected = None;
        let mut maturities = Vec::new();

        for (position, header) in headers.iter().enumerate() {
            let key = header.trim().to_lowercase();
            if id.is_none() && self.id_regex.is_match(&key) {
                id = Some(position);
            } else if name.is_none() && self.name_regex.is_match(&key) {
                name = Some(position);
            } else if weight.is_none() && self.weight_regex.is_match(&key) {
                weight = Some(position);
            } else if score.is_none() && self.score_regex.is_match(&key) {
                score = Some(position);
            } else if selected.is_none() && self.selected_regex.is_match(&key) {
                selected = Some(position);
            } else {
                maturities.push((position, header.trim().to_string()));
            }
        }

        let id = id.ok_or_else(|| ApplicationError::import("no id column in table header"))?;
        let weight =
            weight.ok_or_else(|| ApplicationError::import("no weight column in table header"))?;
        Ok(ColumnMap {
            id,
            name,
            weight,
            score,
            selected,
            maturities,
        })
    }

    /// Parse pasted text into a snapshot. The first non-empty line is the header.
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn parse(&self, text: &str) -> ApplicationResult<Snapshot> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let header_line = lines
            .next()
            .ok_or_else(|| ApplicationError::import("table is empty"))?;
        let delimiter = if header_line.contains('\t') { '\t' } else { ',' };
        let headers = split_record(header_line, delimiter);
        let columns = self.map_columns(&headers)?;
        debug!("table columns: {:?}", columns);

        let mut data = Vec::new();
        for line in lines {
            let cells = split_record(line, delimiter);
            let cell = |position: usize| cells.get(position).map(|c| c.trim()).unwrap_or("");

            let id = cell(columns.id);
            if id.is_empty() {
                debug!("skipping row without id: {:?}", line);
                continue;
            }
            let mut row = CriterionRow {
                id: id.to_string(),
                name: columns.name.map(cell).unwrap_or_default().to_string(),
                weight: parse_fraction(cell(columns.weight)).unwrap_or(0.0),
                score: columns.score.and_then(|p| parse_fraction(cell(p))),
                maturities: columns
                    .maturities
                    .iter()
                    .map(|(p, _)| cell(*p).to_string())
                    .collect(),
                selected_maturity: None,
            };
            row.selected_maturity = columns
                .selected
                .and_then(|p| parse_selected(cell(p), row.maturities.len()));
            data.push(row);
        }

        if data.is_empty() {
            return Err(ApplicationError::import("table has no data rows"));
        }
        let headers = columns.maturities.into_iter().map(|(_, h)| h).collect();
        Ok(Snapshot::new(headers, data))
    }

    /// Render the snapshot as tab separated text with percentages.
    ///
    /// Percentages keep up to six decimals and the selected level is written
    /// 1-based, so a re-import reproduces weights, scores and selections.
    pub fn to_tsv(&self, snapshot: &Snapshot) -> String {
        let header = ["ID", "Name", "Weight", "Score", "Selected"]
            .iter()
            .map(|s| s.to_string())
            .chain(snapshot.maturity_headers.iter().map(|h| clean_cell(h)))
            .join("\t");

        let rows = snapshot.data.iter().map(|row| {
            [
                clean_cell(&row.id),
                clean_cell(&row.name),
                percent_cell(row.weight),
                row.score.map(percent_cell).unwrap_or_default(),
                row.selected_maturity
                    .map(|i| (i + 1).to_string())
                    .unwrap_or_default(),
            ]
            .into_iter()
            .chain(row.maturities.iter().map(|m| clean_cell(m)))
            .join("\t")
        });

        std::iter::once(header).chain(rows).join("\n") + "\n"
    }

}

/// Split one record, honoring double-quoted fields with `""` escapes.
fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => cells.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    cells.push(current);
    cells
}

/// 1-based level text to a 0-based index within `len` options.
fn parse_selected(text: &str, len: usize) -> Option<usize> {
    if text.is_empty() {
        return None;
    }
    match text.parse::<usize>() {
        Ok(level) if (1..=len).contains(&level) => Some(level - 1),
        _ => {
            debug!("ignoring selected level {:?} for {} options", text, len);
            None
        }
    }

}

fn percent_cell(value: f64) -> String {
    let text = format!("{:.6}", value * 100.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}%")
}

fn clean_cell(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_record_quotes() {
        assert_eq!(
            split_record(r#"1,"Name, with comma","say ""hi""""#, ','),
            vec!["1", "Name, with comma", r#"say "hi""#]
        );
        assert_eq!(split_record("a\t\tb", '\t'), vec!["a", "", "b"]);
    }

    #[test]
    fn test_map_columns_recognizes_aliases() {
        let codec = TableCodec::new();
        let headers: Vec<String> = ["CID", "Criterion", "Weight %", "Level 1", "Level 2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let map = codec.map_columns(&headers).unwrap();
        assert_eq!(map.id, 0);
        assert_eq!(map.name, Some(1));
        assert_eq!(map.weight, 2);
        assert_eq!(map.score, None);
        assert_eq!(map.selected, None);
        assert_eq!(
            map.maturities,
            vec![(3, "Level 1".to_string()), (4, "Level 2".to_string())]
        );
    }

    #[test]
    fn test_percent_cell_trims_trailing_zeros() {
        assert_eq!(percent_cell(0.7), "70%");
        assert_eq!(percent_cell(0.0), "0%");
        assert_eq!(percent_cell(0.1234), "12.34%");
    }

    #[test]
    fn test_parse_selected_is_one_based_and_bounded() {
        assert_eq!(parse_selected("1", 4), Some(0));
        assert_eq!(parse_selected("4", 4), Some(3));
        assert_eq!(parse_selected("5", 4), None);
        assert_eq!(parse_selected("0", 4), None);
        assert_eq!(parse_selected("", 4), None);
    }
}
