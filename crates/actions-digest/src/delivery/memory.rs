use super::{ClipboardPayload, Delivery, Sink};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;

/// A file handed to [`MemorySink::download_file`].
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Sink that keeps everything in memory. Rich payloads are always accepted
/// as rich.
#[derive(Debug, Default)]
pub struct MemorySink {
    clipboard: Mutex<Vec<ClipboardPayload>>,
    files: Mutex<Vec<SavedFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clipboard(&self) -> Vec<ClipboardPayload> {
        self.clipboard
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    pub fn files(&self) -> Vec<SavedFile> {
        self.files.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn write_clipboard(&self, payload: &ClipboardPayload) -> Result<Delivery> {
        if let Ok(mut guard) = self.clipboard.lock() {
            guard.push(payload.clone());
        }
        Ok(if payload.kind.is_rich() {
            Delivery::Rich
        } else {
            Delivery::PlainText
        })
    }

    async fn download_file(&self, name: &str, bytes: &[u8], mime: &str) -> Result<PathBuf> {
        if let Ok(mut guard) = self.files.lock() {
            guard.push(SavedFile {
                name: name.to_string(),
                mime: mime.to_string(),
                bytes: bytes.to_vec(),
            });
        }
        Ok(PathBuf::from(name))
    }
}
