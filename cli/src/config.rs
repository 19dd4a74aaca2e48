use crate::error::CliError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "gsp.toml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GspConfig {
    pub rpc_url: String,
    pub keypair_path: String,
    /// Mint of the gated asset every command operates on.
    pub asset_mint: Option<String>,
    /// Reference-unit atoms, used by `gate init` when no cap is given.
    pub default_max_address_cap: u64,
    pub default_max_staleness: i64,
}

impl Default for GspConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            keypair_path: "~/.config/solana/id.json".to_string(),
            asset_mint: None,
            default_max_address_cap: gsp_gatekeeper::constants::DEFAULT_MAX_ADDRESS_CAP,
            default_max_staleness: 300,
        }
    }
}

pub fn load_config(path: &str) -> Result<GspConfig, CliError> {
    if !Path::new(path).exists() {
        return Ok(GspConfig::default());
    }

    let contents =
        fs::read_to_string(path).map_err(|e| CliError::ConfigNotFound(e.to_string()))?;

    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<GspConfig, CliError> {
    toml::from_str(contents).map_err(|e| CliError::InvalidConfig(e.to_string()))
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub rpc_url: Option<String>,
    pub keypair_path: Option<String>,
    pub asset_mint: Option<String>,
}

impl GspConfig {
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.rpc_url {
            self.rpc_url = url;
        }
        if let Some(path) = overrides.keypair_path {
            self.keypair_path = path;
        }
        if overrides.asset_mint.is_some() {
            self.asset_mint = overrides.asset_mint;
        }
        self
    }

    pub fn keypair_file(&self) -> PathBuf {
        expand_home(&self.keypair_path, std::env::var("HOME").ok().as_deref())
    }

    /// Websocket endpoint matching the RPC URL.
    pub fn ws_url(&self) -> String {
        if let Some(rest) = self.rpc_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.rpc_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.rpc_url.clone()
        }
    }
}

fn expand_home(path: &str, home: Option<&str>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => Path::new(home).join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_means_defaults() {
        let config = load_config("/nonexistent/gsp.toml").expect("should default");
        assert_eq!(config, GspConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = parse_config(
            r#"
            rpc_url = "http://127.0.0.1:8899"
            asset_mint = "So11111111111111111111111111111111111111112"
            "#,
        )
        .expect("should parse");

        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(
            config.asset_mint.as_deref(),
            Some("So11111111111111111111111111111111111111112")
        );
        assert_eq!(config.default_max_address_cap, 10_000_000_000);
        assert_eq!(config.ws_url(), "ws://127.0.0.1:8899");
    }

    #[test]
    fn test_invalid_file() {
        let err = parse_config("rpc_url = 12").unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig(_)));
    }

    #[test]
    fn test_overrides_win() {
        let config = GspConfig::default().merge(Overrides {
            rpc_url: Some("http://localhost:8899".to_string()),
            keypair_path: None,
            asset_mint: Some("mint".to_string()),
        });
        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert_eq!(config.keypair_path, "~/.config/solana/id.json");
        assert_eq!(config.asset_mint.as_deref(), Some("mint"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home("~/.config/solana/id.json", Some("/home/op")),
            PathBuf::from("/home/op/.config/solana/id.json")
        );
        assert_eq!(expand_home("/keys/id.json", Some("/home/op")), PathBuf::from("/keys/id.json"));
        assert_eq!(expand_home("~/id.json", None), PathBuf::from("~/id.json"));
    }
}
