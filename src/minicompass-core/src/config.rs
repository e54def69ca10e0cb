use serde::{Deserialize, Serialize};

use crate::models::ColumnTemplate;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Database selector applied to every request; unset means the server default
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Request timeout handed to the HTTP transport
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub column_template: ColumnTemplate,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Base URL without trailing slashes
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Selector with surrounding whitespace removed; blank counts as unset
    pub fn database(&self) -> Option<&str> {
        self.database
            .as_deref()
            .map(str::trim)
            .filter(|db| !db.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            database: None,
            insecure_skip_verify: false,
            timeout_secs: None,
            column_template: ColumnTemplate::default(),
        }
    }
}
