//! The page-facing side of extraction.
//!
//! A [`StepSource`] is anything that can hand over the raw step elements of a
//! run page plus the page's own identity. The extractor only ever talks to
//! this trait, so saved HTML, JSON dumps and test fixtures are interchangeable.

use serde::Deserialize;

/// Raw attribute text of one step element. Nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStep {
    pub name: Option<String>,
    pub external_id: Option<String>,
    pub conclusion: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    /// Precise duration in milliseconds, as the element reports it.
    #[serde(alias = "preciseDurationMs")]
    pub precise_duration: Option<f64>,
}

/// Identity of the page the steps were read from.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContext {
    pub url: String,
    #[serde(alias = "documentURI")]
    pub document_uri: String,
    pub title: String,
    pub heading: Option<String>,
}

/// Source of step elements for one run page.
pub trait StepSource {
    /// Step elements in document order.
    fn list_steps(&self) -> Vec<RawStep>;

    fn page_context(&self) -> PageContext;
}
