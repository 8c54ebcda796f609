use serde::Deserialize;

/// Main configuration structure for Inkfeed
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of concurrent detail fetches per run
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

/// Fetch-cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached entry before it is eligible for recomputation
    #[serde(rename = "ttl-secs", default = "default_cache_ttl")]
    pub ttl_secs: u64,

    /// Maximum number of settled entries retained
    #[serde(default = "default_cache_capacity")]
    pub capacity: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the fetcher
    #[serde(rename = "agent-name", default = "default_agent_name")]
    pub agent_name: String,

    /// Version of the fetcher
    #[serde(rename = "agent-version", default = "default_agent_version")]
    pub agent_version: String,

    /// URL with information about the fetcher
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,
}

fn default_max_concurrent() -> u32 {
    8
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_cache_ttl() -> u64 {
    // Matches the short-lived memoization intent: long enough to absorb
    // repeated requests, short enough to pick up new detail content.
    3600
}

fn default_cache_capacity() -> u32 {
    512
}

fn default_agent_name() -> String {
    "Inkfeed".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            agent_version: default_agent_version(),
            contact_url: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            cache: CacheConfig::default(),
            user_agent: UserAgentConfig::default(),
        }
    }
}
