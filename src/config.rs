use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>, // For OpenAI-compatible APIs

    /// Optional: Override the per-post token budget (default: 512)
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// HTTP timeout for completion requests in seconds (default: 120)
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Get max_tokens value, using the default cap if not specified
    pub fn get_max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(512)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// User-Agent header sent with every crawl request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for the robots.txt probe in seconds (default: 10)
    #[serde(default = "default_robots_timeout")]
    pub robots_timeout_secs: u64,

    /// Timeout for sitemap and page fetches in seconds (default: 15)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Pause between content-generation calls in milliseconds (default: 1000)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            robots_timeout_secs: default_robots_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("wxrgen/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_robots_timeout() -> u64 {
    10
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_llm_timeout() -> u64 {
    120
}

impl Config {
    /// Load config from the working directory or user config directory
    #[allow(dead_code)]
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // If explicit path provided, use it
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        // Try working directory first (per-project config)
        if let Ok(config) = Self::load_from_path("wxrgen.toml") {
            debug!("Loaded config from ./wxrgen.toml");
            return Ok(config);
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("wxrgen").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        // Return defaults
        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get API key from environment variable specified in config
    pub fn get_api_key(&self) -> Result<String> {
        match &self.llm.api_key_env {
            Some(env_var) => {
                // Special case: "none" means no API key needed (e.g., Ollama)
                if env_var.to_lowercase() == "none" {
                    return Ok(String::new());
                }

                // openai-compatible: try env var but don't error if missing
                // (local models like Ollama don't need keys, but gateways do)
                if self.llm.provider == "openai-compatible" {
                    return Ok(env::var(env_var).unwrap_or_default());
                }

                env::var(env_var).map_err(|_| {
                    anyhow::anyhow!("API key not found in environment variable: {}", env_var)
                })
            }
            None => Ok(String::new()), // No API key needed
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                provider: "openai".to_string(),
                model: "gpt-4o-mini".to_string(),
                api_key_env: Some("OPENAI_API_KEY".to_string()),
                base_url: None,
                max_tokens: None,
                timeout_secs: default_llm_timeout(),
            },
            crawl: CrawlConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.api_key_env, Some("OPENAI_API_KEY".to_string()));
        assert_eq!(config.llm.get_max_tokens(), 512);
        assert_eq!(config.crawl.robots_timeout_secs, 10);
        assert_eq!(config.crawl.fetch_timeout_secs, 15);
        assert_eq!(config.crawl.delay_ms, 1000);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("provider = \"openai\""));
        assert!(toml_str.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_config_parses_minimal_file() {
        let toml_str = r#"
[llm]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        // Omitted sections fall back to defaults
        assert_eq!(config.crawl.delay_ms, 1000);
        assert_eq!(config.llm.timeout_secs, 120);
    }

    #[test]
    fn test_config_crawl_overrides() {
        let toml_str = r#"
[llm]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "OPENAI_API_KEY"

[crawl]
delay_ms = 0
fetch_timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.crawl.delay_ms, 0);
        assert_eq!(config.crawl.fetch_timeout_secs, 5);
        // Unset fields keep defaults
        assert_eq!(config.crawl.robots_timeout_secs, 10);
    }

    #[test]
    fn test_api_key_from_env() {
        env::set_var("WXRGEN_TEST_API_KEY", "test_key_123");
        let mut config = Config::default();
        config.llm.api_key_env = Some("WXRGEN_TEST_API_KEY".to_string());

        let api_key = config.get_api_key().unwrap();
        assert_eq!(api_key, "test_key_123");

        env::remove_var("WXRGEN_TEST_API_KEY");
    }

    #[test]
    fn test_api_key_missing_fails() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("WXRGEN_NONEXISTENT_KEY_XYZ".to_string());

        let result = config.get_api_key();
        assert!(result.is_err());
    }

    #[test]
    fn test_api_key_none_sentinel() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("none".to_string());
        let key = config.get_api_key().unwrap();
        assert_eq!(key, "");
    }

    #[test]
    fn test_api_key_openai_compatible_missing_ok() {
        let mut config = Config::default();
        config.llm.provider = "openai-compatible".to_string();
        config.llm.api_key_env = Some("WXRGEN_NONEXISTENT_KEY_OAI_999".to_string());
        let key = config.get_api_key().unwrap();
        assert_eq!(key, "");
    }

    #[test]
    fn test_max_tokens_override() {
        let mut config = Config::default();
        config.llm.max_tokens = Some(2000);
        assert_eq!(config.llm.get_max_tokens(), 2000);
    }

    #[test]
    fn test_default_user_agent_carries_version() {
        let config = CrawlConfig::default();
        assert!(config.user_agent.starts_with("wxrgen/"));
    }
}
