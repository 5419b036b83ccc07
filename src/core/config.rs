//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::ai::provider::Provider;

/// SCT configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// AI provider used by `sct generate`
    pub provider: Option<Provider>,

    /// OpenAI settings
    pub openai: ProviderSettings,

    /// Anthropic Claude settings
    pub claude: ProviderSettings,

    /// Google Gemini settings
    pub gemini: ProviderSettings,

    /// System prompt override for comment generation
    pub system_prompt: Option<String>,

    /// User prompt template override ({{name}}, {{understanding}}, {{comment}})
    pub user_template: Option<String>,

    /// Where the masking session map is stored between mask and unmask
    pub session_file: Option<PathBuf>,

    /// Where memo messages are stored
    pub memo_file: Option<PathBuf>,
}

/// Per-provider connection settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/sct/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Environment variables
        if let Ok(provider) = std::env::var("SCT_PROVIDER") {
            if let Ok(provider) = provider.parse() {
                config.provider = Some(provider);
            }
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.openai.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            config.claude.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini.api_key = Some(key);
        }
        if let Ok(path) = std::env::var("SCT_SESSION_FILE") {
            config.session_file = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("SCT_MEMO_FILE") {
            config.memo_file = Some(PathBuf::from(path));
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sct")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.provider.is_some() {
            self.provider = other.provider;
        }
        merge_provider(&mut self.openai, other.openai);
        merge_provider(&mut self.claude, other.claude);
        merge_provider(&mut self.gemini, other.gemini);
        if other.system_prompt.is_some() {
            self.system_prompt = other.system_prompt;
        }
        if other.user_template.is_some() {
            self.user_template = other.user_template;
        }
        if other.session_file.is_some() {
            self.session_file = other.session_file;
        }
        if other.memo_file.is_some() {
            self.memo_file = other.memo_file;
        }
    }

    /// The active provider, defaulting to the offline mock
    pub fn provider(&self) -> Provider {
        self.provider.unwrap_or_default()
    }

    /// Where to persist the masking session between invocations
    pub fn session_file(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(".sct-session.json"))
    }

    /// Where to persist memo messages
    pub fn memo_file(&self) -> PathBuf {
        if let Some(ref path) = self.memo_file {
            return path.clone();
        }
        directories::ProjectDirs::from("", "", "sct")
            .map(|dirs| dirs.data_dir().join("memo.json"))
            .unwrap_or_else(|| PathBuf::from(".sct-memo.json"))
    }
}

fn merge_provider(base: &mut ProviderSettings, other: ProviderSettings) {
    if other.api_key.is_some() {
        base.api_key = other.api_key;
    }
    if other.model.is_some() {
        base.model = other.model;
    }
    if other.endpoint.is_some() {
        base.endpoint = other.endpoint;
    }
    if other.max_tokens.is_some() {
        base.max_tokens = other.max_tokens;
    }
    if other.temperature.is_some() {
        base.temperature = other.temperature;
    }
}
