use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the recipes REST API.
    pub base_url: String,
    /// Sent as a bearer token on every request when set.
    pub api_token: Option<String>,
    pub page_size: u32,
    /// Use `/recipes/filter` instead of `/recipes/search` for listing.
    pub legacy_filter_endpoint: bool,
    pub timeout_secs: u64,
    /// Command that receives shared recipe text on stdin, e.g. `wl-copy`.
    pub share_command: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            page_size: 6,
            legacy_filter_endpoint: false,
            timeout_secs: 30,
            share_command: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("page_size", &self.page_size)
            .field("legacy_filter_endpoint", &self.legacy_filter_endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("share_command", &self.share_command)
            .finish()
    }
}

impl ClientConfig {
    /// Load the configuration from a YAML file. Missing keys keep their defaults.
    pub fn load(yml_path: &str) -> anyhow::Result<Self> {
        let yml = std::fs::read_to_string(yml_path)
            .with_context(|| format!("Reading config file {yml_path}"))?;
        let config = serde_yaml::from_str(&yml).context("Parsing config file")?;
        Ok(config)
    }

    /// Defaults, then the optional YAML file, then the environment.
    pub fn resolve(yml_path: Option<&str>) -> anyhow::Result<Self> {
        let config = match yml_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.with_env(|key| dotenvy::var(key).ok())
    }

    /// Apply `RECETARIO_*` overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        if let Some(url) = lookup("RECETARIO_API_URL") {
            self.base_url = url;
        }
        if let Some(token) = lookup("RECETARIO_API_TOKEN") {
            self.api_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(size) = lookup("RECETARIO_PAGE_SIZE") {
            self.page_size = size
                .parse()
                .with_context(|| format!("RECETARIO_PAGE_SIZE is not a number: {size}"))?;
        }
        if let Some(command) = lookup("RECETARIO_SHARE_COMMAND") {
            self.share_command = Some(command).filter(|c| !c.trim().is_empty());
        }
        anyhow::ensure!(self.page_size > 0, "Page size must be at least 1");
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn list_path(&self) -> &'static str {
        if self.legacy_filter_endpoint {
            "/recipes/filter"
        } else {
            "/recipes/search"
        }
    }
}
