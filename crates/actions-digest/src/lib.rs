//! actions-digest: workflow-run step reports for the clipboard and spreadsheets.
//!
//! A saved run page is read into a [`model::RunSummary`] by
//! [`extraction::extract`], rendered by [`report::render`] and handed to a
//! [`delivery::Sink`] (system clipboard or CSV download).

pub mod cli;
pub mod config;
pub mod delivery;
pub mod error;
pub mod extraction;
pub mod model;
pub mod report;

pub use error::{DigestError, Result};
pub use model::{Conclusion, RunSummary, StepRecord};
pub use report::ReportFormat;
