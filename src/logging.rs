use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::LoggingConfig;

/// Install a file logger per `[logging]`.
///
/// Best-effort: a bad level, unwritable path, or an already-installed logger
/// leaves logging disabled. The shell never fails because of logging.
pub fn init(config: &LoggingConfig) {
    let Some(level) = parse_level(&config.level) else {
        return;
    };
    if level == LevelFilter::Off {
        return;
    }
    let Some(path) = expand_path(&config.file) else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, log_config, file);
}

/// `off`, `error`, `warn`, `info`, `debug`, `trace` (case-insensitive).
fn parse_level(level: &str) -> Option<LevelFilter> {
    LevelFilter::from_str(level.trim()).ok()
}

/// Expand `~` and `$VAR` in a configured path.
fn expand_path(raw: &str) -> Option<PathBuf> {
    let expanded = shellexpand::full(raw).ok()?;
    if expanded.trim().is_empty() {
        None
    } else {
        Some(PathBuf::from(expanded.into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse() {
        assert_eq!(parse_level("warn"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        let path = expand_path("~/.local/share/nyush/nyush.log").unwrap();
        assert!(path.starts_with(home));
        assert!(path.ends_with("nyush.log"));
    }

    #[test]
    fn empty_path_disables() {
        assert!(expand_path("").is_none());
    }
}
