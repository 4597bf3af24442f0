//! Reading step data off a run page.
//!
//! Saved HTML pages go through [`dom::HtmlStepSource`]; console dumps go
//! through [`json::JsonStepSource`]. Both feed [`extractor::extract`].

pub mod dom;
pub mod extractor;
pub mod json;
pub mod source;

pub use extractor::extract;
pub use source::{PageContext, RawStep, StepSource};

use crate::error::{DigestError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read a page from `path` (`-` for stdin) and pick the matching source.
///
/// JSON is chosen by a `.json` extension or a leading `{`; anything else is
/// parsed as HTML.
pub fn load_source(path: &Path, url_override: Option<&str>) -> Result<Box<dyn StepSource + Send>> {
    let (body, document_uri) = read_page(path)?;

    let is_json = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json"))
        || body.trim_start().starts_with('{');

    if is_json {
        let source = json::JsonStepSource::from_json(&body)?.with_defaults(&document_uri, url_override);
        Ok(Box::new(source))
    } else {
        Ok(Box::new(dom::HtmlStepSource::parse(
            &body,
            &document_uri,
            url_override,
        )))
    }
}

fn read_page(path: &Path) -> Result<(String, String)> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .map_err(|source| DigestError::Io {
                path: PathBuf::from("-"),
                source,
            })?;
        return Ok((body, "stdin:".to_string()));
    }

    let body = std::fs::read_to_string(path).map_err(|source| DigestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((body, document_uri(path)))
}

/// `file://` URI for a page on disk; falls back to the display path.
fn document_uri(path: &Path) -> String {
    std::fs::canonicalize(path)
        .ok()
        .and_then(|abs| url::Url::from_file_path(abs).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_source_picks_html_or_json() {
        let dir = tempfile::tempdir().unwrap();

        let html_path = dir.path().join("run.html");
        std::fs::write(
            &html_path,
            r#"<html><head><title>CI</title></head><body>
               <check-step data-name="Build" data-conclusion="success"></check-step>
               </body></html>"#,
        )
        .unwrap();
        let source = load_source(&html_path, None).unwrap();
        assert_eq!(source.list_steps().len(), 1);
        assert!(source.page_context().document_uri.starts_with("file://"));
        assert!(source.page_context().document_uri.ends_with("run.html"));

        let mut dump = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
        write!(dump, r#"  {{"steps": [{{"name": "a"}}, {{"name": "b"}}]}}"#).unwrap();
        let source = load_source(dump.path(), Some("https://example.com/run")).unwrap();
        assert_eq!(source.list_steps().len(), 2);
        assert_eq!(source.page_context().url, "https://example.com/run");
    }

    #[test]
    fn test_load_source_missing_file() {
        let err = load_source(Path::new("/definitely/not/here.html"), None)
            .err()
            .unwrap();
        assert!(matches!(err, DigestError::Io { .. }));
    }
}
