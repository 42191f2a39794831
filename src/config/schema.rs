use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Example YAML:
/// ```yaml
/// state_file: ~/volley/tournament.json
/// decimals: 2
/// colors: auto
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the tournament is saved (default: ~/.config/skill-tourney/tournament.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<String>,

    /// Decimals shown for averages (default: 2)
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    /// When to colour the ranking table
    #[serde(default)]
    pub colors: ColorMode,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

fn default_decimals() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: None,
            decimals: default_decimals(),
            colors: ColorMode::Auto,
        }
    }
}
