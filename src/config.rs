use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ShellError;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// User overlay location, relative to `$HOME`.
const OVERLAY_PATH: &str = ".config/jsh/config.toml";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    /// Aliases defined at startup, in order.
    #[serde(default)]
    pub aliases: Vec<AliasConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default = "default_true")]
    pub load_rc: bool,
    #[serde(default)]
    pub rc_file: String,
    #[serde(default)]
    pub history_file: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_max_dir_length")]
    pub max_dir_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            color: true,
            load_rc: true,
            rc_file: String::new(),
            history_file: String::new(),
            prompt: String::new(),
            max_dir_length: default_max_dir_length(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_dir_length() -> usize {
    25
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AliasConfig {
    pub name: String,
    pub value: String,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    replace_aliases: bool,
    #[serde(default)]
    aliases: Vec<AliasConfig>,
    #[serde(default)]
    remove_aliases: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    debug: Option<bool>,
    color: Option<bool>,
    load_rc: Option<bool>,
    rc_file: Option<String>,
    history_file: Option<String>,
    prompt: Option<String>,
    max_dir_length: Option<usize>,
}

// ── Merge logic ──

/// Merge user aliases into the default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove names first, then add entries (same name replaces in place).
fn merge_aliases(
    base: &mut Vec<AliasConfig>,
    add: Vec<AliasConfig>,
    remove: &[String],
    replace: bool,
) {
    if replace {
        *base = add;
        return;
    }
    base.retain(|a| !remove.contains(&a.name));
    for alias in add {
        match base.iter_mut().find(|a| a.name == alias.name) {
            Some(existing) => existing.value = alias.value,
            None => base.push(alias),
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/jsh/config.toml (if exists)
    ///
    /// A malformed overlay is reported and ignored.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        match Self::load_overlay() {
            Ok(Some(overlay)) => config.apply_overlay(overlay),
            Ok(None) => {}
            Err(e) => eprintln!("jsh: {e}"),
        }
        config
    }

    /// Try to load user overlay from ~/.config/jsh/config.toml.
    fn load_overlay() -> Result<Option<ConfigOverlay>, ShellError> {
        let Some(home) = std::env::var_os("HOME") else {
            return Ok(None);
        };
        let path = Path::new(&home).join(OVERLAY_PATH);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Ok(None);
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ShellError::Config {
                path,
                source: Box::new(e),
            })
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.debug {
            self.settings.debug = v;
        }
        if let Some(v) = s.color {
            self.settings.color = v;
        }
        if let Some(v) = s.load_rc {
            self.settings.load_rc = v;
        }
        if let Some(v) = s.rc_file {
            self.settings.rc_file = v;
        }
        if let Some(v) = s.history_file {
            self.settings.history_file = v;
        }
        if let Some(v) = s.prompt {
            self.settings.prompt = v;
        }
        if let Some(v) = s.max_dir_length {
            self.settings.max_dir_length = v;
        }

        merge_aliases(
            &mut self.aliases,
            overlay.aliases,
            &overlay.remove_aliases,
            overlay.replace_aliases,
        );
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

impl Settings {
    /// The rc file with `~` expanded, or `None` when unset.
    pub fn rc_path(&self) -> Option<PathBuf> {
        expand_path(&self.rc_file)
    }

    /// The history file with `~` expanded, or `None` when unset.
    pub fn history_path(&self) -> Option<PathBuf> {
        expand_path(&self.history_file)
    }
}

fn expand_path(raw: &str) -> Option<PathBuf> {
    if raw.is_empty() {
        return None;
    }
    Some(PathBuf::from(shellexpand::tilde(raw).into_owned()))
}
