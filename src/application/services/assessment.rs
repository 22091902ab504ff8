//! Assessment service
//!
//! Owns the current snapshot. Every edit derives a new snapshot (rebuilt tree,
//! recomputed scores) and replaces the old one; a failed edit or import leaves the
//! current snapshot untouched.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::snapshot::{parse_snapshot, to_json};
use crate::application::table::TableCodec;
use crate::application::{sample, ApplicationResult, IoResultExt};
use crate::domain::maturity::{self, Selection};
use crate::domain::order::parent_id;
use crate::domain::{recompute, Chart, ChartSettings, CriterionRow, DomainError, Snapshot};
use crate::infrastructure::traits::FileSystem;

/// Service for editing and scoring a criteria table.
pub struct AssessmentService {
    fs: Arc<dyn FileSystem>,
    snapshot: Snapshot,
    table: TableCodec,
}

impl AssessmentService {
    /// Create a service holding the built-in sample table.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_snapshot(fs, sample::sample_snapshot())
    }

    pub fn with_snapshot(fs: Arc<dyn FileSystem>, snapshot: Snapshot) -> Self {
        let mut service = Self {
            fs,
            snapshot: Snapshot::default(),
            table: TableCodec::new(),
        };
        service.replace(snapshot);
        service
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn rows(&self) -> &[CriterionRow] {
        &self.snapshot.data
    }

    fn replace(&mut self, mut snapshot: Snapshot) {
        snapshot.data = recompute(snapshot.data);
        snapshot.align_maturities();
        self.snapshot = snapshot;
    }

    /// Apply `edit` to a copy of the rows, then recompute and swap it in.
    fn edit<T>(
        &mut self,
        edit: impl FnOnce(&mut Vec<CriterionRow>) -> Result<T, DomainError>,
    ) -> ApplicationResult<T> {
        let mut next = self.snapshot.clone();
        let outcome = edit(&mut next.data)?;
        self.replace(next);
        Ok(outcome)
    }

    /// Load a snapshot file (current or legacy JSON shape).
    #[instrument(level = "debug", skip(self))]
    pub fn load(&mut self, path: &Path) -> ApplicationResult<()> {
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read snapshot", path)?;
        self.import_json(&text)?;
        info!("loaded {} rows from {}", self.snapshot.data.len(), path.display());
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn save(&self, path: &Path) -> ApplicationResult<()> {
        let json = to_json(&self.snapshot)?;
        self.fs
            .write(path, &(json + "\n"))
            .with_path_context("write snapshot", path)
    }

    pub fn import_json(&mut self, text: &str) -> ApplicationResult<()> {
        let snapshot = parse_snapshot(text)?;
        self.replace(snapshot);
        Ok(())
    }

    /// Replace the table with pasted tab or comma separated text.
    pub fn import_table(&mut self, text: &str) -> ApplicationResult<()> {
        let snapshot = self.table.parse(text)?;
        debug!("imported {} rows", snapshot.data.len());
        self.replace(snapshot);
        Ok(())
    }

    pub fn export_table(&self) -> String {
        self.table.to_tsv(&self.snapshot)
    }

    /// Toggle maturity option `index` on leaf `id` and roll the result up.
    #[instrument(level = "debug", skip(self))]
    pub fn select_maturity(&mut self, id: &str, index: usize) -> ApplicationResult<Selection> {
        self.edit(|rows| {
            let position = position_of(rows, id)?;
            if has_children(rows, id) {
                return Err(DomainError::NotALeaf(id.to_string()));
            }
            maturity::toggle(&mut rows[position], index)
        })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_weight(&mut self, id: &str, weight: f64) -> ApplicationResult<()> {
        self.edit(|rows| {
            let position = position_of(rows, id)?;
            rows[position].weight = if weight.is_finite() { weight } else { 0.0 };
            Ok(())
        })
    }

    pub fn rename(&mut self, id: &str, name: &str) -> ApplicationResult<()> {
        self.edit(|rows| {
            let position = position_of(rows, id)?;
            rows[position].name = name.to_string();
            Ok(())
        })
    }

    /// Give row `id` a new dotted id. Children keep their ids and are re-linked.
    #[instrument(level = "debug", skip(self))]
    pub fn change_id(&mut self, id: &str, new_id: &str) -> ApplicationResult<()> {
        self.edit(|rows| {
            validate_id(new_id)?;
            if rows.iter().any(|r| r.id == new_id) {
                return Err(DomainError::DuplicateId(new_id.to_string()));
            }
            let position = position_of(rows, id)?;
            rows[position].id = new_id.to_string();
            Ok(())
        })
    }

    /// Add a row. Its maturity array is sized to the snapshot headers.
    #[instrument(level = "debug", skip(self, row), fields(id = %row.id))]
    pub fn add_row(&mut self, mut row: CriterionRow) -> ApplicationResult<()> {
        let width = self.snapshot.maturity_headers.len();
        self.edit(|rows| {
            validate_id(&row.id)?;
            if rows.iter().any(|r| r.id == row.id) {
                return Err(DomainError::DuplicateId(row.id.clone()));
            }
            row.pad_maturities(width);
            rows.push(row);
            Ok(())
        })
    }

    /// Remove row `id`. Its children stay and fall back to roots if orphaned.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_row(&mut self, id: &str) -> ApplicationResult<CriterionRow> {
        self.edit(|rows| {
            let position = position_of(rows, id)?;
            Ok(rows.remove(position))
        })
    }

    /// Chart over the current snapshot, synthetic root in focus.
    pub fn chart(&self, settings: ChartSettings) -> Chart {
        Chart::new(&self.snapshot.data, settings)
    }
}

/// Position of the row the id lookup resolves to (the last occurrence).
fn position_of(rows: &[CriterionRow], id: &str) -> Result<usize, DomainError> {
    rows.iter()
        .rposition(|r| r.id == id)
        .ok_or_else(|| DomainError::UnknownId(id.to_string()))
}

fn has_children(rows: &[CriterionRow], id: &str) -> bool {
    rows.iter().any(|r| parent_id(&r.id) == Some(id))
}

fn validate_id(id: &str) -> Result<(), DomainError> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed != id || id.split('.').any(str::is_empty) {
        return Err(DomainError::InvalidId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("1.2").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("1..2").is_err());
        assert!(validate_id(" 1").is_err());
        assert!(validate_id("1.").is_err());
    }
}
