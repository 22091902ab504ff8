//! Built-in default table shown on first start.

use crate::domain::{recompute, CriterionRow, Snapshot};

pub const SAMPLE_HEADERS: [&str; 4] = ["Level 1", "Level 2", "Level 3", "Level 4"];

/// The default criteria table: two top-level areas, nothing evaluated yet.
pub fn sample_snapshot() -> Snapshot {
    let rows = vec![
        CriterionRow::new("1", "Overall Quality", 0.7),
        CriterionRow::new("1.1", "Code Quality", 0.6),
        CriterionRow::new("1.1.1", "Static Analysis", 0.5).with_maturities([
            "Linting in CI",
            "Zero warnings policy",
            "",
            "",
        ]),
        CriterionRow::new("1.1.2", "Test Coverage", 0.5).with_maturities([
            "Below 50%",
            "50% to 80%",
            "Above 80%",
            "",
        ]),
        CriterionRow::new("1.2", "Delivery", 0.4),
        CriterionRow::new("1.2.1", "Release Automation", 1.0).with_maturities([
            "Manual",
            "Scripted",
            "Continuous",
            "no",
        ]),
        CriterionRow::new("2", "Support", 0.3),
        CriterionRow::new("2.1", "Documentation", 0.5).with_maturities([
            "Readme",
            "User guide",
            "",
            "",
        ]),
        CriterionRow::new("2.2", "Incident Response", 0.5).with_maturities([
            "Ad hoc",
            "On-call rotation",
            "Postmortems",
            "Error budgets",
        ]),
    ];
    Snapshot::new(
        SAMPLE_HEADERS.iter().map(|h| h.to_string()).collect(),
        recompute(rows),
    )
}
