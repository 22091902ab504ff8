//! JSON snapshot codec
//!
//! Current shape: `{ "maturityHeaders": [...], "data": [rows] }`.
//! Legacy shape: a bare `[rows]` list; headers are synthesized from the longest
//! maturity array.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CriterionRow, Snapshot};

/// Generic header name for position `index` (0-based).
pub fn generic_header(index: usize) -> String {
    format!("Level {}", index + 1)
}

/// Parse snapshot JSON in either the current or the legacy shape.
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn parse_snapshot(text: &str) -> ApplicationResult<Snapshot> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| ApplicationError::import(format!("invalid JSON: {e}")))?;

    let mut snapshot = match value {
        Value::Array(_) => {
            let rows: Vec<CriterionRow> = serde_json::from_value(value)
                .map_err(|e| ApplicationError::import(format!("invalid row list: {e}")))?;
            let width = rows.iter().map(|r| r.maturities.len()).max().unwrap_or(0);
            debug!("legacy snapshot: {} rows, {} maturity columns", rows.len(), width);
            Snapshot {
                maturity_headers: (0..width).map(generic_header).collect(),
                data: rows,
            }
        }
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| ApplicationError::import(format!("invalid snapshot: {e}")))?,
        other => {
            return Err(ApplicationError::import(format!(
                "expected an object or a list of rows, found {}",
                json_kind(&other)
            )))
        }
    };

    if let Some(row) = snapshot.data.iter().find(|r| r.id.trim().is_empty()) {
        return Err(ApplicationError::import(format!(
            "row {:?} has no id",
            row.name
        )));
    }
    snapshot.align_maturities();
    Ok(snapshot)
}

/// Serialize a snapshot in the current shape.
pub fn to_json(snapshot: &Snapshot) -> ApplicationResult<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize snapshot".to_string(),
        source: Box::new(e),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
