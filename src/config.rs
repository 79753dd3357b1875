//! # Configuration
//!
//! Configuration lives in `config/{environment}.yaml`. Files are rendered with
//! [`tera`] before being parsed, so values can be taken from the process
//! environment:
//!
//! ```yaml
//! ai:
//!   scorer:
//!     kind: open_ai
//!     api_key: {{ get_env(name="OPENAI_API_KEY", default="") }}
//!     model: gpt-4o-mini
//! ```
//!
//! Every section except `ontology` has defaults.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    environment::Environment,
    ontology::traversal::{Category, DEFAULT_MAX_DEPTH, TAXONOMY_DEFAULT_DEPTH},
    Error, Result,
};

/// Folder holding the per-environment configuration files.
pub const DEFAULT_FOLDER: &str = "config";

/// Namespace of the SOLI ontology class IRIs.
pub const DEFAULT_NAMESPACE: &str = "https://soli.openlegalstandard.org/";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logger: Logger,
    #[serde(default)]
    pub server: Server,
    pub ontology: OntologySettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub ai: AiSettings,
}

/// Logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logger {
    /// Enable log write to stdout
    #[serde(default = "default_true")]
    pub enable: bool,

    /// Set the logger level.
    ///
    /// * options: `trace` | `debug` | `info` | `warn` | `error`
    #[serde(default)]
    pub level: crate::logger::LogLevel,

    /// Set the logger format.
    ///
    /// * options: `compact` | `pretty` | `json`
    #[serde(default)]
    pub format: crate::logger::Format,

    /// Override our custom tracing filter.
    ///
    /// Set this to your own filter if you want to see traces from internal
    /// libraries. See more [here](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives)
    pub override_filter: Option<String>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            enable: true,
            level: crate::logger::LogLevel::default(),
            format: crate::logger::Format::default(),
            override_filter: None,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Server {
    /// The address on which the server should listen on for incoming
    /// connections.
    #[serde(default = "default_binding")]
    pub binding: String,
    /// The port on which the server should listen for incoming connections.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The webserver host
    #[serde(default = "default_host")]
    pub host: String,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            binding: default_binding(),
            port: default_port(),
            host: default_host(),
            cors_origins: Vec::new(),
        }
    }
}

impl Server {
    #[must_use]
    pub fn full_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where the ontology snapshot is read from.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OntologySource {
    /// JSON snapshot on the local filesystem.
    File { path: PathBuf },
    /// JSON snapshot fetched over HTTP, optionally cached on disk.
    Http {
        url: String,
        #[serde(default)]
        cache_path: Option<PathBuf>,
        /// Bound on the whole download.
        #[serde(default = "default_fetch_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for OntologySource {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from("data/soli.json"),
        }
    }
}

/// Ontology loading configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OntologySettings {
    #[serde(default)]
    pub source: OntologySource,
    /// Prefix joined to local class identifiers.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Overrides the snapshot title.
    #[serde(default)]
    pub title: Option<String>,
    /// Overrides the snapshot description.
    #[serde(default)]
    pub description: Option<String>,
    /// Root IRIs per category, replacing the `{namespace}{RootName}` default.
    #[serde(default)]
    pub categories: BTreeMap<Category, Vec<String>>,
}

impl Default for OntologySettings {
    fn default() -> Self {
        Self {
            source: OntologySource::default(),
            namespace: default_namespace(),
            title: None,
            description: None,
            categories: BTreeMap::new(),
        }
    }
}

/// Default traversal depths of the listing and semantic entry points.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default = "default_taxonomy_depth")]
    pub taxonomy_default_depth: usize,
    #[serde(default = "default_semantic_depth")]
    pub semantic_default_depth: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            taxonomy_default_depth: default_taxonomy_depth(),
            semantic_default_depth: default_semantic_depth(),
        }
    }
}

/// Semantic scorer configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AiSettings {
    /// Scorer backend. Semantic search is disabled when absent.
    #[serde(default)]
    pub scorer: Option<ScorerBackend>,
    /// Seconds a scorer call may take before it is abandoned.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            scorer: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScorerBackend {
    OpenAi(OpenAiSettings),
}

/// Settings of the OpenAI chat completion scorer.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    #[serde(default)]
    pub api_base: Option<String>,
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_binding() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5150
}

fn default_host() -> String {
    "http://localhost".to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_taxonomy_depth() -> usize {
    TAXONOMY_DEFAULT_DEPTH
}

fn default_semantic_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

impl Config {
    /// Loads the configuration of `env` from the default folder.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, rendered or parsed.
    pub fn new(env: &Environment) -> Result<Self> {
        Self::from_folder(env, Path::new(DEFAULT_FOLDER))
    }

    /// Loads `{path}/{env}.yaml`.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, rendered or parsed.
    pub fn from_folder(env: &Environment, path: &Path) -> Result<Self> {
        let file = path.join(format!("{env}.yaml"));
        info!(selected_path = %file.display(), "loading environment from");
        Self::from_file(&file)
    }

    /// Loads a single configuration file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, rendered or parsed.
    pub fn from_file(file: &Path) -> Result<Self> {
        let content = fs::read_to_string(file).map_err(|err| {
            Error::Message(format!("cannot read config `{}`: {err}", file.display()))
        })?;
        Self::from_yaml(&content, &file.display().to_string())
    }

    /// Renders and parses configuration text.
    ///
    /// # Errors
    /// Returns an error when the template or the YAML is invalid.
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self> {
        let rendered = render_string(content)?;
        serde_yaml::from_str(&rendered).map_err(|err| Error::YAMLFile(err, origin.to_string()))
    }
}

/// Renders a template with tera's built in functions, `get_env` included.
fn render_string(content: &str) -> Result<String> {
    Ok(tera::Tera::one_off(content, &tera::Context::new(), false)?)
}
