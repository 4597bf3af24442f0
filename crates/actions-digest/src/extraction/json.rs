//! Step source backed by a JSON dump of the step elements.
//!
//! The dump is what mapping the step elements to plain objects in the page
//! console produces:
//!
//! ```json
//! {
//!   "page": { "url": "...", "documentUri": "...", "title": "...", "heading": "..." },
//!   "steps": [
//!     { "name": "Build", "externalId": "...", "conclusion": "success",
//!       "startedAt": "2024-05-01T10:00:00Z", "completedAt": "2024-05-01T10:01:00Z",
//!       "preciseDuration": 60012.4 }
//!   ]
//! }
//! ```

use super::source::{PageContext, RawStep, StepSource};
use crate::error::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonStepSource {
    #[serde(default)]
    pub page: PageContext,
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

impl JsonStepSource {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fill in page identity the dump left blank.
    pub(crate) fn with_defaults(mut self, document_uri: &str, url_override: Option<&str>) -> Self {
        if self.page.document_uri.is_empty() {
            self.page.document_uri = document_uri.to_string();
        }
        if let Some(url) = url_override {
            self.page.url = url.to_string();
        } else if self.page.url.is_empty() {
            self.page.url = self.page.document_uri.clone();
        }
        self
    }
}

impl StepSource for JsonStepSource {
    fn list_steps(&self) -> Vec<RawStep> {
        self.steps.clone()
    }

    fn page_context(&self) -> PageContext {
        self.page.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_console_dump() {
        let json = r#"{
            "page": {
                "url": "https://github.com/o/r/actions/runs/5#summary",
                "documentURI": "https://github.com/o/r/actions/runs/5#summary",
                "title": "CI"
            },
            "steps": [
                {"name": "Checkout", "conclusion": "success",
                 "startedAt": "2024-05-01T10:00:00Z", "completedAt": "2024-05-01T10:00:03Z",
                 "preciseDuration": 3012.5},
                {"name": "Lint", "externalId": "x-2"}
            ]
        }"#;

        let source = JsonStepSource::from_json(json).unwrap();
        assert_eq!(source.page_context().title, "CI");
        assert_eq!(
            source.page_context().document_uri,
            "https://github.com/o/r/actions/runs/5#summary"
        );
        assert_eq!(source.page_context().heading, None);

        let steps = source.list_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].precise_duration, Some(3012.5));
        assert_eq!(steps[1].external_id.as_deref(), Some("x-2"));
        assert_eq!(steps[1].started_at, None);
    }

    #[test]
    fn test_defaults_fill_missing_page() {
        let source = JsonStepSource::from_json(r#"{"steps": []}"#)
            .unwrap()
            .with_defaults("file:///tmp/steps.json", None);
        assert_eq!(source.page.document_uri, "file:///tmp/steps.json");
        assert_eq!(source.page.url, "file:///tmp/steps.json");

        let source = JsonStepSource::from_json(r#"{"page": {"url": "https://x/y", "documentUri": "", "title": ""}}"#)
            .unwrap()
            .with_defaults("stdin:", Some("https://x/z"));
        assert_eq!(source.page.url, "https://x/z");
        assert_eq!(source.page.document_uri, "stdin:");
    }

    #[test]
    fn test_rejects_malformed_dump() {
        assert!(JsonStepSource::from_json("{\"steps\": 3}").is_err());
    }
}
