//! Domain entities: core data structures

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// One row of the criteria table.
///
/// Rows arrive flat; the parent/child structure is derived from the dotted `id`
/// every time the table is rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionRow {
    /// Dotted hierarchical id, e.g. "1.2.3"
    pub id: String,
    /// Display label
    #[serde(default)]
    pub name: String,
    /// Share of this row within its parent, as a fraction
    #[serde(default, deserialize_with = "lenient_weight")]
    pub weight: f64,
    /// Fraction in [0, 1], `None` while not yet evaluated
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<f64>,
    /// Maturity option labels, aligned by position with the snapshot headers
    #[serde(default, alias = "maturityOptions")]
    pub maturities: Vec<String>,
    /// Index into `maturities` of the selected option
    #[serde(default, alias = "selectedOptionIndex", skip_serializing_if = "Option::is_none")]
    pub selected_maturity: Option<usize>,
}

impl CriterionRow {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight,
            score: None,
            maturities: Vec::new(),
            selected_maturity: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_maturities<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.maturities = options.into_iter().map(Into::into).collect();
        self
    }

    /// Pad or keep the maturity array so it has at least `len` entries.
    pub fn pad_maturities(&mut self, len: usize) {
        if self.maturities.len() < len {
            self.maturities.resize(len, String::new());
        }
    }
}

/// The complete table as exchanged with load/save collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Column headers for the maturity options, in display order
    #[serde(default)]
    pub maturity_headers: Vec<String>,
    /// Flat row list
    #[serde(default)]
    pub data: Vec<CriterionRow>,
}

impl Snapshot {
    pub fn new(maturity_headers: Vec<String>, data: Vec<CriterionRow>) -> Self {
        let mut snapshot = Self {
            maturity_headers,
            data,
        };
        snapshot.align_maturities();
        snapshot
    }

    /// Size every row's maturity array to the header count.
    pub fn align_maturities(&mut self) {
        let len = self.maturity_headers.len();
        for row in &mut self.data {
            row.pad_maturities(len);
        }
    }

    pub fn find(&self, id: &str) -> Option<&CriterionRow> {
        self.data.iter().rev().find(|row| row.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.data.iter().any(|row| row.id == id)
    }
}

/// Parse percentage-like text into a fraction.
///
/// `"70%"` and `"70"` both mean 0.7, `"0.7"` stays 0.7. Returns `None` for blank
/// input and `Some(0.0)` for text that does not parse.
pub fn parse_fraction(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let (number, percent) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim(), true),
        None => (trimmed, false),
    };
    match number.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if percent || value > 1.0 {
                Some(value / 100.0)
            } else {
                Some(value)
            }
        }
        _ => {
            debug!("parse_fraction: cannot parse {:?}, using 0", text);
            Some(0.0)
        }
    }
}

/// Number or percentage text as written by table collaborators.
#[derive(Deserialize)]
#[serde(untagged)]
enum FractionField {
    Number(f64),
    Text(String),
}

impl FractionField {
    fn into_fraction(self) -> Option<f64> {
        match self {
            FractionField::Number(n) if n.is_finite() && n > 1.0 => Some(n / 100.0),
            FractionField::Number(n) => Some(n),
            FractionField::Text(text) => parse_fraction(&text),
        }
    }
}

fn lenient_weight<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let field = Option::<FractionField>::deserialize(deserializer)?;
    Ok(field.and_then(FractionField::into_fraction).unwrap_or(0.0))
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let field = Option::<FractionField>::deserialize(deserializer)?;
    Ok(field.and_then(FractionField::into_fraction))
}

/// Format a fraction as a whole-number percentage, e.g. `0.7` → `"70%"`.
pub fn format_percent(value: f64) -> String {
    let pct = value * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}%", pct.round() as i64)
    } else {
        format!("{:.1}%", pct)
    }
}
