use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

const DEFAULT_AUTH_SCHEME: &str = "Bearer";
const ENDPOINT_ENV: &str = "GQLR_ENDPOINT";
const TOKEN_ENV: &str = "GQLR_TOKEN";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_scheme: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| Error::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        Self::parse(&contents).map_err(|e| Error::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "gqlr")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(Error::NoConfigDir)
    }

    /// Get endpoint with env var taking precedence over config file
    pub fn endpoint(&self) -> Result<Url> {
        self.endpoint_with_override(None)
    }

    /// Get endpoint from an explicit override (e.g. a command line flag),
    /// then the env var, then the config file
    pub fn endpoint_with_override(&self, endpoint: Option<&str>) -> Result<Url> {
        pick_endpoint(
            endpoint,
            std::env::var(ENDPOINT_ENV).ok().as_deref(),
            self.endpoint.as_deref(),
        )
    }

    /// Get token with env var taking precedence over config file
    pub fn token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .or_else(|| self.token.clone())
    }

    pub fn auth_scheme(&self) -> &str {
        self.auth_scheme.as_deref().unwrap_or(DEFAULT_AUTH_SCHEME)
    }
}

fn pick_endpoint(
    endpoint: Option<&str>,
    from_env: Option<&str>,
    from_file: Option<&str>,
) -> Result<Url> {
    let raw = endpoint
        .or(from_env)
        .or(from_file)
        .ok_or(Error::MissingEndpoint)?;

    Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))
}
