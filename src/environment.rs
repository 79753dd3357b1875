//! Runtime environment selection.
//!
//! The environment decides which `config/{environment}.yaml` file is loaded.
//! It is read from `SOLI_ENV` and defaults to `development`.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{config::Config, Result};

/// Variable naming the active environment.
pub const ENV_VARIABLE: &str = "SOLI_ENV";
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Reads the environment name from [`ENV_VARIABLE`].
#[must_use]
pub fn resolve_from_env() -> String {
    std::env::var(ENV_VARIABLE).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "production")]
    Production,
    #[serde(rename = "development")]
    #[default]
    Development,
    #[serde(rename = "test")]
    Test,
    #[serde(untagged)]
    Any(String),
}

impl Environment {
    /// Loads `config/{self}.yaml`.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, rendered or parsed.
    pub fn load(&self) -> Result<Config> {
        Config::new(self)
    }
}

impl From<String> for Environment {
    fn from(env: String) -> Self {
        Self::from_str(&env).unwrap_or(Self::Any(env))
    }
}

impl FromStr for Environment {
    type Err = &'static str;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            s => Ok(Self::Any(s.to_string())),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
            Self::Test => f.write_str("test"),
            Self::Any(s) => f.write_str(s),
        }
    }
}
