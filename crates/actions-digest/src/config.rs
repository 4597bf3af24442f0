//! Runtime settings: command-line flags first, then environment, then defaults.

use crate::delivery::clipboard::SystemClipboard;
use crate::delivery::download::default_download_dir;
use crate::delivery::SystemSink;
use std::path::PathBuf;

pub const ENV_DOWNLOAD_DIR: &str = "ACTIONS_DIGEST_DOWNLOAD_DIR";
pub const ENV_CLIPBOARD: &str = "ACTIONS_DIGEST_CLIPBOARD";
pub const ENV_OSC52: &str = "ACTIONS_DIGEST_OSC52";

/// Whether to try the system clipboard at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Auto,
    Off,
}

/// Values given on the command line; `None` defers to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub download_dir: Option<PathBuf>,
    pub no_clipboard: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DigestConfig {
    pub download_dir: PathBuf,
    pub clipboard: ClipboardMode,
    pub osc52: bool,
}

impl DigestConfig {
    /// Resolve settings against the process environment.
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings, reading environment variables through `env`.
    pub fn resolve_with(overrides: ConfigOverrides, env: impl Fn(&str) -> Option<String>) -> Self {
        let download_dir = overrides
            .download_dir
            .or_else(|| env(ENV_DOWNLOAD_DIR).filter(|v| !v.is_empty()).map(PathBuf::from))
            .unwrap_or_else(default_download_dir);

        let clipboard = if overrides.no_clipboard {
            ClipboardMode::Off
        } else {
            match env(ENV_CLIPBOARD).as_deref().map(str::trim) {
                Some(v) if v.eq_ignore_ascii_case("off") || v == "0" => ClipboardMode::Off,
                _ => ClipboardMode::Auto,
            }
        };

        let osc52 = !matches!(
            env(ENV_OSC52).as_deref().map(str::trim),
            Some("0") | Some("false") | Some("off")
        );

        Self {
            download_dir,
            clipboard,
            osc52,
        }
    }

    /// Build the delivery sink these settings describe.
    pub fn sink(&self) -> SystemSink {
        let clipboard = match self.clipboard {
            ClipboardMode::Auto => SystemClipboard::detect(self.osc52),
            ClipboardMode::Off => SystemClipboard::new(None, self.osc52),
        };
        SystemSink::new(clipboard, self.download_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DigestConfig::resolve_with(ConfigOverrides::default(), env_of(&[]));
        assert_eq!(config.clipboard, ClipboardMode::Auto);
        assert!(config.osc52);
        assert_eq!(config.download_dir, default_download_dir());
    }

    #[test]
    fn test_environment() {
        let config = DigestConfig::resolve_with(
            ConfigOverrides::default(),
            env_of(&[
                (ENV_DOWNLOAD_DIR, "/srv/reports"),
                (ENV_CLIPBOARD, "OFF"),
                (ENV_OSC52, "0"),
            ]),
        );
        assert_eq!(config.download_dir, PathBuf::from("/srv/reports"));
        assert_eq!(config.clipboard, ClipboardMode::Off);
        assert!(!config.osc52);
    }

    #[test]
    fn test_flags_beat_environment() {
        let config = DigestConfig::resolve_with(
            ConfigOverrides {
                download_dir: Some(PathBuf::from("out")),
                no_clipboard: true,
            },
            env_of(&[(ENV_DOWNLOAD_DIR, "/srv/reports"), (ENV_CLIPBOARD, "auto")]),
        );
        assert_eq!(config.download_dir, PathBuf::from("out"));
        assert_eq!(config.clipboard, ClipboardMode::Off);
        assert_eq!(config.sink().download_dir(), std::path::Path::new("out"));
    }
}
