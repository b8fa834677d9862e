use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".rubyseek";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexer: IndexerConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// File extensions to index
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns excluded from the tree walk, matched against the full
    /// path. Matching directories are pruned before descending.
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    /// Track full block nesting (end-line spans, control blocks). Slower;
    /// the default summary parse only records declaration lines.
    #[serde(default)]
    pub fetch_details: bool,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude_patterns: default_exclude_patterns(),
            fetch_details: false,
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["rb".to_string(), "rake".to_string()]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/.git".to_string(),
        "**/vendor".to_string(),
        "**/node_modules".to_string(),
        "**/tmp".to_string(),
        "**/log".to_string(),
        "**/coverage".to_string(),
    ]
}

/// Name-matching backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Four-strategy weighted matching (prefix/exact/suffix/filename)
    Weighted,
    /// Levenshtein similarity matching with a threshold
    Fuzzy,
}

impl Default for MatchMode {
    fn default() -> Self {
        Self::Weighted
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Weighted => write!(f, "weighted"),
            MatchMode::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Matching backend: weighted or fuzzy
    #[serde(default)]
    pub mode: MatchMode,

    /// Default number of symbol groups to return
    #[serde(default = "default_search_limit")]
    pub default_limit: usize,

    /// Weight for prefix matches (most specific signal while typing)
    #[serde(default = "default_prefix_weight")]
    pub prefix_weight: f32,

    /// Weight for exact whole-name / token matches
    #[serde(default = "default_exact_weight")]
    pub exact_weight: f32,

    /// Weight for filename matches mapped back to declared symbols
    #[serde(default = "default_file_weight")]
    pub file_weight: f32,

    /// Weight for suffix matches (broadest signal)
    #[serde(default = "default_suffix_weight")]
    pub suffix_weight: f32,

    /// Minimum similarity (0.0 - 1.0) for the fuzzy backend
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            default_limit: default_search_limit(),
            prefix_weight: default_prefix_weight(),
            exact_weight: default_exact_weight(),
            file_weight: default_file_weight(),
            suffix_weight: default_suffix_weight(),
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

fn default_search_limit() -> usize {
    50
}

fn default_prefix_weight() -> f32 {
    4.0
}

fn default_exact_weight() -> f32 {
    2.0
}

fn default_file_weight() -> f32 {
    2.0
}

fn default_suffix_weight() -> f32 {
    1.0
}

fn default_fuzzy_threshold() -> f32 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable file logging under `directory`
    #[serde(default)]
    pub enabled: bool,

    /// Also log to stderr
    #[serde(default)]
    pub stderr: bool,

    /// Log level for the file layer: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log directory, relative to the project root unless absolute
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    /// Log file name prefix
    #[serde(default = "default_log_prefix")]
    pub file_prefix: String,

    /// Rotation strategy: hourly, daily, minutely, never
    #[serde(default = "default_log_rotation")]
    pub rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stderr: false,
            level: default_log_level(),
            directory: default_log_directory(),
            file_prefix: default_log_prefix(),
            rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from(".rubyseek/logs")
}

fn default_log_prefix() -> String {
    "rubyseek.log".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl Config {
    /// Load configuration from the .rubyseek directory
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = root.join(CONFIG_DIR).join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;

            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the .rubyseek directory
    pub fn save(&self, root: &Path) -> Result<()> {
        let config_dir = root.join(CONFIG_DIR);
        let config_path = config_dir.join(CONFIG_FILE);

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        Ok(())
    }

    /// Get the path to the .rubyseek directory
    pub fn rubyseek_dir(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR)
    }

    /// Check if rubyseek is initialized in the given directory
    pub fn is_initialized(root: &Path) -> bool {
        Self::rubyseek_dir(root).exists()
    }
}
