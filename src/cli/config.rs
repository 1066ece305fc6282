//! Editor Configuration
//!
//! Settings a consuming program can hand to the line editor. Nothing here
//! is read from the environment; a program that wants a config file
//! deserializes one with [`EditorConfig::from_json`].

use serde::{Deserialize, Serialize};

use super::history::History;

/// How the cursor is placed when a line is longer than the terminal is wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Count wrapped rows from the anchor using the terminal width
    #[default]
    Wrapped,
    /// Treat the line as a single row and move to an absolute column
    SingleRow,
}

/// Configuration for the line editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub prompt: String,
    pub max_history_size: usize,
    pub render_mode: RenderMode,
    /// Columns assumed when the terminal size query fails
    pub fallback_width: Option<u16>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            max_history_size: 1000,
            render_mode: RenderMode::Wrapped,
            fallback_width: None,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// An empty history sized by this configuration
    pub fn new_history(&self) -> History {
        History::new(self.max_history_size)
    }

    /// Get configuration summary for display
    pub fn get_summary(&self) -> Vec<String> {
        let fallback = self
            .fallback_width
            .map_or_else(|| "none".to_string(), |w| w.to_string());
        vec![
            "Configuration".to_string(),
            format!("  Prompt: {:?}", self.prompt),
            format!("  Max History Size: {}", self.max_history_size),
            format!("  Render Mode: {:?}", self.render_mode),
            format!("  Fallback Width: {}", fallback),
        ]
    }
}
