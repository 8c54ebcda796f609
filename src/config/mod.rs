//! Configuration module for Inkfeed
//!
//! Handles loading, parsing, and validating TOML configuration files. Every
//! section has defaults, so an absent or empty config file yields a usable
//! configuration.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, PipelineConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
