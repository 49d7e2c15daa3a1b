//! Comment engine settings
//!
//! Settings are stored as JSON. Missing fields take their defaults, and a
//! settings file that cannot be parsed is logged and replaced by defaults.

use crate::{CommandKind, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thread_render::{Messages, RenderOptions};

const SETTINGS_FILE: &str = "comment_settings.json";

/// All engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    /// Text shown in rendered threads
    pub messages: Messages,
    /// Edit summaries recorded with each write-back
    pub summaries: ChangeSummaries,
    /// Display options for rendered comments
    pub render: RenderOptions,
    /// Log forest invariant violations found in stored threads
    pub check_integrity: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            messages: Messages::default(),
            summaries: ChangeSummaries::default(),
            render: RenderOptions::default(),
            check_integrity: true,
        }
    }
}

/// Change summary per mutating command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChangeSummaries {
    pub add: String,
    pub reply: String,
    pub edit: String,
    pub delete: String,
}

impl Default for ChangeSummaries {
    fn default() -> Self {
        Self {
            add: "Comment added".to_string(),
            reply: "Comment reply added".to_string(),
            edit: "Comment edited".to_string(),
            delete: "Comment deleted".to_string(),
        }
    }
}

impl ChangeSummaries {
    /// Summary for a command; read-only commands never write
    pub fn for_command(&self, kind: CommandKind) -> &str {
        match kind {
            CommandKind::Add => &self.add,
            CommandKind::Reply => &self.reply,
            CommandKind::Edit => &self.edit,
            CommandKind::Delete => &self.delete,
            CommandKind::Source | CommandKind::View => "",
        }
    }
}

/// Loads and saves `EngineSettings` in a config directory
pub struct SettingsManager {
    settings_path: PathBuf,
    current: EngineSettings,
}

impl SettingsManager {
    /// Create a manager for the settings file in `config_dir`
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: config_dir.as_ref().join(SETTINGS_FILE),
            current: EngineSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or use defaults if there is no file
    pub fn load(&mut self) -> Result<&EngineSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<EngineSettings>(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}, using default settings: {}",
                        self.settings_path.display(),
                        e
                    );
                    EngineSettings::default()
                }
            }
        } else {
            EngineSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &EngineSettings {
        &self.current
    }

    /// Replace settings and save them
    pub fn update(&mut self, settings: EngineSettings) -> Result<()> {
        self.current = settings;
        self.save()
    }
}
