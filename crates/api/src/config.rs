//! Runtime configuration read from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `USE_PERSISTENT_STORES` | `false` |
//! | `DATABASE_URL` | required when `USE_PERSISTENT_STORES=true` |
//! | `SEED_SAMPLE_DATA` | `false` (in-memory store only) |

use std::net::SocketAddr;

use anyhow::{bail, Context};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Which product store backs the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    InMemory { seed_sample_data: bool },
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the process env in production).
    ///
    /// Unset variables take their default; set-but-invalid values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_addr}"))?;

        let use_persistent = parse_flag(&lookup, "USE_PERSISTENT_STORES")?;
        let seed_sample_data = parse_flag(&lookup, "SEED_SAMPLE_DATA")?;

        let store = if use_persistent {
            let database_url = match lookup("DATABASE_URL") {
                Some(url) if !url.trim().is_empty() => url,
                _ => bail!("DATABASE_URL must be set when USE_PERSISTENT_STORES=true"),
            };
            if seed_sample_data {
                tracing::warn!("SEED_SAMPLE_DATA is ignored for persistent stores");
            }
            StoreConfig::Postgres { database_url }
        } else {
            StoreConfig::InMemory { seed_sample_data }
        };

        Ok(Self { bind_addr, store })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreConfig::InMemory {
                seed_sample_data: false,
            },
        }
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<bool> {
    match lookup(key) {
        None => Ok(false),
        Some(raw) => raw
            .trim()
            .parse::<bool>()
            .with_context(|| format!("{key} must be `true` or `false`, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<ApiConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_env_gives_defaults() {
        assert_eq!(config_from(&[]).unwrap(), ApiConfig::default());
    }

    #[test]
    fn persistent_store_requires_database_url() {
        let err = config_from(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn persistent_store_uses_database_url() {
        let cfg = config_from(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/catalog"),
        ])
        .unwrap();
        assert_eq!(
            cfg.store,
            StoreConfig::Postgres {
                database_url: "postgres://localhost/catalog".to_string()
            }
        );
    }

    #[test]
    fn seed_flag_applies_to_in_memory_store() {
        let cfg = config_from(&[("SEED_SAMPLE_DATA", "true"), ("BIND_ADDR", "127.0.0.1:5145")]).unwrap();
        assert_eq!(cfg.store, StoreConfig::InMemory { seed_sample_data: true });
        assert_eq!(cfg.bind_addr.port(), 5145);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config_from(&[("USE_PERSISTENT_STORES", "yes")]).is_err());
        assert!(config_from(&[("BIND_ADDR", "localhost")]).is_err());
    }
}
