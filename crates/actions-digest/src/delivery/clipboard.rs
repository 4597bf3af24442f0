//! System clipboard access.
//!
//! Writes walk a fixed chain and stop at the first step that works:
//!
//! 1. the native clipboard (`arboard`): rich bodies as `text/html` together
//!    with their `text/plain` alternative, plain bodies as text
//! 2. plain text through a clipboard utility on `PATH`
//! 3. plain text through the terminal (OSC 52), when stderr is a terminal
//! 4. plain text printed to stdout for manual copying
//!
//! The utilities take a single content type per write, so they only ever get
//! the plain text. The last step cannot fail, so a write always ends in a
//! [`Delivery`].

use super::{ClipboardPayload, Delivery};
use crate::error::{DigestError, Result};
use base64::Engine as _;
use std::fmt;
use std::io::{IsTerminal, Write};
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// A clipboard that can hold several representations of one copy.
pub trait NativeClipboard: fmt::Debug + Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;

    /// Offer `html` as `text/html` with `plain` as its `text/plain`
    /// alternative, in a single write.
    fn set_html(&self, html: &str, plain: &str) -> Result<()>;
}

/// The platform clipboard through `arboard` (X11, Wayland, macOS, Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct Arboard;

impl NativeClipboard for Arboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().map_err(native_error)?;
        clipboard.set_text(text).map_err(native_error)
    }

    fn set_html(&self, html: &str, plain: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().map_err(native_error)?;
        clipboard.set_html(html, Some(plain)).map_err(native_error)
    }
}

fn native_error(e: impl fmt::Display) -> DigestError {
    DigestError::Clipboard {
        tool: "arboard".to_string(),
        reason: e.to_string(),
    }
}

/// A clipboard utility found on `PATH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardTool {
    WlCopy,
    Xclip,
    Xsel,
    Pbcopy,
    ClipExe,
}

impl ClipboardTool {
    /// Candidates in lookup order.
    const ALL: [ClipboardTool; 5] = [
        ClipboardTool::WlCopy,
        ClipboardTool::Xclip,
        ClipboardTool::Xsel,
        ClipboardTool::Pbcopy,
        ClipboardTool::ClipExe,
    ];

    pub fn program(self) -> &'static str {
        match self {
            ClipboardTool::WlCopy => "wl-copy",
            ClipboardTool::Xclip => "xclip",
            ClipboardTool::Xsel => "xsel",
            ClipboardTool::Pbcopy => "pbcopy",
            ClipboardTool::ClipExe => "clip.exe",
        }
    }

    /// Arguments for a plain-text write.
    pub fn plain_args(self) -> Vec<String> {
        let args: &[&str] = match self {
            ClipboardTool::WlCopy => &[],
            ClipboardTool::Xclip => &["-selection", "clipboard"],
            ClipboardTool::Xsel => &["--clipboard", "--input"],
            ClipboardTool::Pbcopy | ClipboardTool::ClipExe => &[],
        };
        args.iter().map(|a| a.to_string()).collect()
    }

    /// Pick the first usable utility. `wl-copy` only counts inside a Wayland
    /// session and the X11 tools only with a display.
    pub fn detect() -> Option<Self> {
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        let x11 = std::env::var_os("DISPLAY").is_some();

        Self::ALL.into_iter().find(|tool| {
            let session_ok = match tool {
                ClipboardTool::WlCopy => wayland,
                ClipboardTool::Xclip | ClipboardTool::Xsel => x11,
                _ => true,
            };
            session_ok && which::which(tool.program()).is_ok()
        })
    }
}

/// The machine's clipboard.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    native: Option<Arc<dyn NativeClipboard>>,
    tool: Option<ClipboardTool>,
    osc52: bool,
}

impl SystemClipboard {
    /// A clipboard without the native stage.
    pub fn new(tool: Option<ClipboardTool>, osc52: bool) -> Self {
        Self {
            native: None,
            tool,
            osc52,
        }
    }

    pub fn with_native(mut self, native: Arc<dyn NativeClipboard>) -> Self {
        self.native = Some(native);
        self
    }

    /// Native clipboard first, then whatever utility `PATH` offers.
    pub fn detect(osc52: bool) -> Self {
        let tool = ClipboardTool::detect();
        match tool {
            Some(t) => debug!("fallback clipboard utility {}", t.program()),
            None => debug!("no clipboard utility found"),
        }
        Self::new(tool, osc52).with_native(Arc::new(Arboard))
    }

    /// A clipboard that never reaches the system; every write ends up printed.
    pub fn disabled() -> Self {
        Self::new(None, false)
    }

    /// Deliver `payload` through the fallback chain.
    pub async fn write(&self, payload: &ClipboardPayload) -> Delivery {
        if let Some(native) = &self.native {
            match write_native(Arc::clone(native), payload).await {
                Ok(delivery) => {
                    info!("copied {} with the native clipboard", payload.kind.mime());
                    return delivery;
                }
                Err(e) => warn!("native clipboard write failed, falling back: {e}"),
            }
        }

        if let Some(tool) = self.tool {
            match run_tool(tool.program(), &tool.plain_args(), &payload.plain).await {
                Ok(()) => {
                    info!("copied plain text via {}", tool.program());
                    return Delivery::PlainText;
                }
                Err(e) => warn!("clipboard write failed: {e}"),
            }
        }

        if self.osc52 && std::io::stderr().is_terminal() {
            let mut stderr = std::io::stderr();
            match stderr
                .write_all(osc52_sequence(&payload.plain).as_bytes())
                .and_then(|()| stderr.flush())
            {
                Ok(()) => {
                    info!("sent {} bytes to the terminal clipboard", payload.plain.len());
                    return Delivery::Terminal;
                }
                Err(e) => warn!("terminal clipboard write failed: {e}"),
            }
        }

        warn!("clipboard unavailable; printing report for manual copy");
        print_for_manual_copy(&payload.plain);
        Delivery::Manual
    }
}

/// `arboard` blocks while it talks to the display server, so the write runs on
/// the blocking pool.
async fn write_native(native: Arc<dyn NativeClipboard>, payload: &ClipboardPayload) -> Result<Delivery> {
    let payload = payload.clone();
    tokio::task::spawn_blocking(move || {
        if payload.kind.is_rich() {
            native
                .set_html(&payload.body, &payload.plain)
                .map(|()| Delivery::Rich)
        } else {
            native.set_text(&payload.plain).map(|()| Delivery::PlainText)
        }
    })
    .await
    .map_err(native_error)?
}

/// Feed `input` to `program` on stdin and wait for it to exit.
///
/// Only the exit of the spawned process is awaited. `wl-copy` and `xclip`
/// leave a background child serving the selection, so stdout and stderr are
/// not captured.
async fn run_tool(program: &str, args: &[String], input: &str) -> Result<()> {
    let fail = |reason: String| DigestError::Clipboard {
        tool: program.to_string(),
        reason,
    };

    let mut child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| fail(e.to_string()))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(input.as_bytes())
            .await
            .map_err(|e| fail(e.to_string()))?;
        stdin.shutdown().await.map_err(|e| fail(e.to_string()))?;
    }

    let status = child.wait().await.map_err(|e| fail(e.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(fail(format!("exited with {status}")))
    }
}

/// OSC 52 "set clipboard" escape sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    format!("\x1b]52;c;{encoded}\x07")
}

fn print_for_manual_copy(text: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "----- BEGIN REPORT -----");
    let _ = stdout.write_all(text.as_bytes());
    if !text.ends_with('\n') {
        let _ = writeln!(stdout);
    }
    let _ = writeln!(stdout, "----- END REPORT -----");
}
