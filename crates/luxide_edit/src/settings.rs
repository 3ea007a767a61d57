//! Session settings
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `LUXIDE_SWEEP_ORPHANS=1`
//! 2. File named by `LUXIDE_CONFIG`
//! 3. `luxide.toml` in the working directory
//! 4. Defaults
//!
//! # Example Config File
//!
//! ```toml
//! sweep_orphans_on_delete = false
//! normalize_after_reconcile = true
//! include_builtins = true
//! ```

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default settings file name
pub const SETTINGS_FILE: &str = "luxide.toml";

/// Behaviour switches for an edit session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Remove unreachable entries after a table entry is deleted
    pub sweep_orphans_on_delete: bool,
    /// Normalize the live document after every reconciliation and after
    /// every write of an object
    pub normalize_after_reconcile: bool,
    /// Add missing built-in resources when a document is loaded
    pub include_builtins: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            sweep_orphans_on_delete: false,
            normalize_after_reconcile: true,
            include_builtins: true,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl SessionSettings {
    /// Load settings from all sources
    pub fn load() -> Self {
        let mut settings = Self::default();

        let mut candidates = vec![SETTINGS_FILE.to_string()];
        if let Ok(path) = std::env::var("LUXIDE_CONFIG") {
            if !path.is_empty() {
                candidates.insert(0, path);
            }
        }

        for path in &candidates {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(loaded) => {
                    settings = loaded;
                    log::info!("Loaded session settings from {}", path);
                    break;
                }
                Err(e) => log::warn!("Ignoring settings file {}: {}", path, e),
            }
        }

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Load settings from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `LUXIDE_*` overrides looked up through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let flags: [(&str, &mut bool); 3] = [
            ("LUXIDE_SWEEP_ORPHANS", &mut self.sweep_orphans_on_delete),
            (
                "LUXIDE_NORMALIZE_AFTER_RECONCILE",
                &mut self.normalize_after_reconcile,
            ),
            ("LUXIDE_BUILTINS", &mut self.include_builtins),
        ];

        for (key, flag) in flags {
            let Some(value) = lookup(key) else {
                continue;
            };
            match parse_flag(&value) {
                Some(parsed) => {
                    *flag = parsed;
                    log::debug!("{} from env: {}", key, parsed);
                }
                None => log::warn!("Ignoring {}={}: expected a boolean", key, value),
            }
        }
    }
}
