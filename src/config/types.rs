//! Configuration types for acl-provider
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Resolution settings
    pub provider: ProviderConfig,

    /// Storage settings
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Resolution engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Optional bound on the number of ancestors walked above an object identity
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Number of object identities resolved concurrently in a batch
    pub batch_concurrency: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            batch_concurrency: 1,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// TOML fixture loaded into the in-memory store
    #[serde(default)]
    pub fixture: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
