//! Logging setup and human-readable run reports.

mod logging;
mod report;

pub use logging::{setup_logging, setup_logging_with_file};
pub use report::{analysis_summary, memory_summary, sizing_summary};
