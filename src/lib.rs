//! Weighted maturity assessment engine.
//!
//! A flat table of criteria with dotted ids (`1`, `1.1`, `1.1.2`) is turned into a
//! hierarchy, leaf maturity selections are rolled up as weighted means, and the
//! result is laid out as a zoomable sunburst chart.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
