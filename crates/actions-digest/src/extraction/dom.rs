//! Step extraction from a saved run page.
//!
//! Run pages render each step as a `<check-step>` custom element whose
//! `data-*` attributes carry the step's name, conclusion and timestamps. The
//! page identity comes from the usual metadata tags.
//!
//! Parsing is synchronous; `scraper::Html` is not `Send`, so async callers
//! should build the source inside `tokio::task::spawn_blocking`. The parsed
//! document is dropped as soon as the raw steps have been copied out.

use super::source::{PageContext, RawStep, StepSource};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const STEP_SELECTOR: &str = "check-step";
const PRECISE_DURATION_ATTR: &str = "data-duration-ms";

/// Heading candidates, most specific first.
const HEADING_SELECTORS: &[&str] = &[r#"[data-testid="run-title"]"#, ".PageHeader-title", "h1"];

/// Step source backed by a saved HTML page.
#[derive(Debug, Clone)]
pub struct HtmlStepSource {
    steps: Vec<RawStep>,
    page: PageContext,
}

impl HtmlStepSource {
    /// Parse `html` read from `document_uri`.
    ///
    /// `url_override` replaces whatever page URL the document advertises;
    /// saved pages frequently lack `og:url` and `canonical` tags.
    pub fn parse(html: &str, document_uri: &str, url_override: Option<&str>) -> Self {
        let document = Html::parse_document(html);

        let steps = extract_steps(&document);
        debug!("found {} step elements in {document_uri}", steps.len());

        let url = url_override
            .map(String::from)
            .or_else(|| page_url(&document))
            .unwrap_or_else(|| document_uri.to_string());

        let page = PageContext {
            url,
            document_uri: document_uri.to_string(),
            title: first_text(&document, "title").unwrap_or_default(),
            heading: HEADING_SELECTORS
                .iter()
                .find_map(|sel| first_text(&document, sel)),
        };

        Self { steps, page }
    }
}

impl StepSource for HtmlStepSource {
    fn list_steps(&self) -> Vec<RawStep> {
        self.steps.clone()
    }

    fn page_context(&self) -> PageContext {
        self.page.clone()
    }
}

fn extract_steps(document: &Html) -> Vec<RawStep> {
    let Ok(sel) = Selector::parse(STEP_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&sel)
        .map(|el| RawStep {
            name: attr(&el, "data-name"),
            external_id: attr(&el, "data-external-id"),
            conclusion: attr(&el, "data-conclusion"),
            started_at: attr(&el, "data-started-at"),
            completed_at: attr(&el, "data-completed-at"),
            precise_duration: precise_duration(&el),
        })
        .collect()
}

/// Read the precise duration from the step element or its first descendant
/// that carries one.
fn precise_duration(el: &ElementRef<'_>) -> Option<f64> {
    let raw = attr(el, PRECISE_DURATION_ATTR).or_else(|| {
        let sel = Selector::parse(&format!("[{PRECISE_DURATION_ATTR}]")).ok()?;
        el.select(&sel)
            .next()
            .and_then(|inner| attr(&inner, PRECISE_DURATION_ATTR))
    })?;
    raw.parse::<f64>().ok()
}

/// Page URL advertised by the document itself.
fn page_url(document: &Html) -> Option<String> {
    // Try <meta property="og:url" content="...">
    if let Ok(sel) = Selector::parse(r#"meta[property="og:url"]"#) {
        if let Some(content) = document
            .select(&sel)
            .next()
            .and_then(|el| attr(&el, "content"))
        {
            return Some(content);
        }
    }

    // Try <link rel="canonical" href="...">
    if let Ok(sel) = Selector::parse(r#"link[rel="canonical"]"#) {
        if let Some(href) = document
            .select(&sel)
            .next()
            .and_then(|el| attr(&el, "href"))
        {
            return Some(href);
        }
    }

    None
}

fn attr(el: &ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Whitespace-collapsed text of the first element matching `selector`.
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    let el = document.select(&sel).next()?;
    let text = el.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Add caching · octo/widgets@4f2a1c9</title>
  <meta property="og:url" content="https://github.com/octo/widgets/actions/runs/42/job/7">
</head>
<body>
  <h1 class="PageHeader-title">
    Add   caching
  </h1>
  <check-step data-name="Set up job" data-number="1" data-conclusion="success"
      data-external-id="a1" data-started-at="2024-05-01T10:00:00Z"
      data-completed-at="2024-05-01T10:00:02Z" data-duration-ms="2113.5"></check-step>
  <check-step data-name="Run tests" data-conclusion="FAILURE"
      data-started-at="2024-05-01T10:00:02Z" data-completed-at="2024-05-01T10:01:02Z">
    <span class="duration" data-duration-ms="60004"></span>
  </check-step>
  <check-step data-name="Upload" data-conclusion=""></check-step>
</body>
</html>"#;

    #[test]
    fn test_extracts_steps_in_document_order() {
        let source = HtmlStepSource::parse(PAGE, "file:///tmp/run.html", None);
        let steps = source.list_steps();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].name.as_deref(), Some("Set up job"));
        assert_eq!(steps[0].external_id.as_deref(), Some("a1"));
        assert_eq!(steps[0].precise_duration, Some(2113.5));
        assert_eq!(steps[1].conclusion.as_deref(), Some("FAILURE"));
        assert_eq!(steps[1].precise_duration, Some(60004.0));
        assert_eq!(steps[2].conclusion, None);
        assert_eq!(steps[2].started_at, None);
    }

    #[test]
    fn test_page_context_from_metadata() {
        let source = HtmlStepSource::parse(PAGE, "file:///tmp/run.html", None);
        let page = source.page_context();

        assert_eq!(page.url, "https://github.com/octo/widgets/actions/runs/42/job/7");
        assert_eq!(page.document_uri, "file:///tmp/run.html");
        assert_eq!(page.title, "Add caching · octo/widgets@4f2a1c9");
        assert_eq!(page.heading.as_deref(), Some("Add caching"));
    }

    #[test]
    fn test_url_override_and_fallbacks() {
        let source = HtmlStepSource::parse(
            PAGE,
            "file:///tmp/run.html",
            Some("https://github.com/octo/widgets/actions/runs/99"),
        );
        assert_eq!(
            source.page_context().url,
            "https://github.com/octo/widgets/actions/runs/99"
        );

        let canonical = r#"<html><head>
            <link rel="canonical" href="https://github.com/a/b/actions/runs/1">
            </head><body></body></html>"#;
        let source = HtmlStepSource::parse(canonical, "stdin:", None);
        assert_eq!(source.page_context().url, "https://github.com/a/b/actions/runs/1");
        assert_eq!(source.page_context().heading, None);

        let bare = "<html><body><p>nothing here</p></body></html>";
        let source = HtmlStepSource::parse(bare, "file:///tmp/bare.html", None);
        assert_eq!(source.page_context().url, "file:///tmp/bare.html");
        assert!(source.list_steps().is_empty());
    }
}
