use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::parse::Limits;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ShellConfig {
    /// Label rendered in the prompt.
    pub name: String,
    /// Input bytes kept per line; the remainder is discarded.
    pub max_line_len: usize,
    pub max_tokens: usize,
    pub max_stages: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            name: "nyush".into(),
            max_line_len: 1000,
            max_tokens: 500,
            max_stages: 500,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Directory that bare program names resolve against.
    pub bin_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("/usr/bin"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    /// Log file path; `~` and `$VAR` are expanded at startup.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            file: "~/.local/share/nyush/nyush.log".into(),
        }
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigOverlay {
    #[serde(default)]
    shell: ShellOverlay,
    #[serde(default)]
    paths: PathsOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ShellOverlay {
    name: Option<String>,
    max_line_len: Option<usize>,
    max_tokens: Option<usize>,
    max_stages: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PathsOverlay {
    bin_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LoggingOverlay {
    level: Option<String>,
    file: Option<String>,
}

// ── Merge logic ──

/// Replace `base` when the overlay carries a value.
fn merge_scalar<T>(base: &mut T, over: Option<T>) {
    if let Some(v) = over {
        *base = v;
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/nyush/config.toml (if exists)
    ///
    /// Only the keys present in the overlay replace defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/nyush/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/nyush/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("nyush: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config.
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.shell;
        merge_scalar(&mut self.shell.name, s.name);
        merge_scalar(&mut self.shell.max_line_len, s.max_line_len);
        merge_scalar(&mut self.shell.max_tokens, s.max_tokens);
        merge_scalar(&mut self.shell.max_stages, s.max_stages);

        merge_scalar(&mut self.paths.bin_dir, overlay.paths.bin_dir);

        let l = overlay.logging;
        merge_scalar(&mut self.logging.level, l.level);
        merge_scalar(&mut self.logging.file, l.file);
    }

    /// Parser bounds derived from the `[shell]` section.
    pub fn limits(&self) -> Limits {
        Limits {
            max_tokens: self.shell.max_tokens,
            max_stages: self.shell.max_stages,
        }
    }

    /// Render the merged configuration as TOML (for `--dump-config`).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
