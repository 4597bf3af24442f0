//! Getting rendered reports off the machine: clipboard and file output.
//!
//! Formatting code never performs I/O itself; the CLI hands the finished text
//! to a [`Sink`]. [`SystemSink`] talks to the real clipboard and filesystem,
//! [`memory::MemorySink`] records everything for tests.

pub mod clipboard;
pub mod download;
pub mod memory;

use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Fixed name of the CSV export.
pub const CSV_FILENAME: &str = "github-actions-data.csv";
pub const CSV_MIME: &str = "text/csv";

/// What the clipboard body is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Plain,
    /// HTML fragment.
    Html,
    /// Standalone HTML document.
    RichDocument,
}

impl ContentKind {
    pub fn mime(self) -> &'static str {
        match self {
            ContentKind::Plain => "text/plain",
            ContentKind::Html | ContentKind::RichDocument => "text/html",
        }
    }

    pub fn is_rich(self) -> bool {
        self != ContentKind::Plain
    }
}

/// Text destined for the clipboard, with the plain-text version to fall back
/// to when the rich one can't be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardPayload {
    pub kind: ContentKind,
    pub body: String,
    pub plain: String,
}

impl ClipboardPayload {
    pub fn plain(text: String) -> Self {
        Self {
            kind: ContentKind::Plain,
            plain: text.clone(),
            body: text,
        }
    }

    pub fn rich(kind: ContentKind, body: String, plain: String) -> Self {
        Self { kind, body, plain }
    }
}

/// Which step of the clipboard fallback chain delivered the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Rich body offered next to its plain-text alternative by the native clipboard.
    Rich,
    /// Plain text written by the native clipboard or a clipboard utility.
    PlainText,
    /// Plain text handed to the terminal emulator (OSC 52).
    Terminal,
    /// Nothing could reach the clipboard; the text was printed for manual copying.
    Manual,
}

impl Delivery {
    pub fn describe(self) -> &'static str {
        match self {
            Delivery::Rich => "copied to clipboard (rich)",
            Delivery::PlainText => "copied to clipboard (plain text)",
            Delivery::Terminal => "sent to terminal clipboard",
            Delivery::Manual => "printed for manual copy",
        }
    }
}

/// Delivery capability handed to the commands.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Put `payload` on the clipboard, degrading as far as needed.
    async fn write_clipboard(&self, payload: &ClipboardPayload) -> Result<Delivery>;

    /// Save `bytes` as a file called `name`; returns where it landed.
    async fn download_file(&self, name: &str, bytes: &[u8], mime: &str) -> Result<PathBuf>;
}

/// Sink backed by the system clipboard and a download directory.
pub struct SystemSink {
    clipboard: clipboard::SystemClipboard,
    download_dir: PathBuf,
}

impl SystemSink {
    pub fn new(clipboard: clipboard::SystemClipboard, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            clipboard,
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }
}

#[async_trait]
impl Sink for SystemSink {
    async fn write_clipboard(&self, payload: &ClipboardPayload) -> Result<Delivery> {
        Ok(self.clipboard.write(payload).await)
    }

    async fn download_file(&self, name: &str, bytes: &[u8], mime: &str) -> Result<PathBuf> {
        download::save(&self.download_dir, name, bytes, mime).await
    }
}
