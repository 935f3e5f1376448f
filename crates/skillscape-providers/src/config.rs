//! Configuration loading and the provider/service factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use skillscape_core::session::DEFAULT_SESSION_TTL;
use skillscape_core::{InMemorySessionStore, Scorer, ScoringConfig, TriageService};

use crate::agents::{LlmMetadataExtractor, LlmQuizGenerator, LlmSummarizer};
use crate::anthropic::AnthropicProvider;
use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;
use crate::provider::LlmProvider;
use crate::retry::RetryingProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Anthropic {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    /// Any OpenAI-compatible endpoint, local servers included.
    OpenAI {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini { base_url, .. } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Anthropic { base_url, .. } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI {
                base_url, org_id, ..
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
        }
    }
}

impl ProviderConfig {
    fn api_key_mut(&mut self) -> &mut String {
        match self {
            ProviderConfig::Gemini { api_key, .. }
            | ProviderConfig::Anthropic { api_key, .. }
            | ProviderConfig::OpenAI { api_key, .. } => api_key,
        }
    }
}

/// Session store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds an unscored session stays valid. `0` disables expiry.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL.as_secs()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_secs > 0).then(|| Duration::from_secs(self.ttl_secs))
    }
}

/// Top-level skillscape configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillscapeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Quiz length when none is requested.
    #[serde(default = "default_questions")]
    pub default_questions: u32,
    /// Max retries on transient provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_questions() -> u32 {
    5
}
fn default_retries() -> u32 {
    4
}
fn default_retry_delay() -> u64 {
    1000
}

impl Default for SkillscapeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_questions: default_questions(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            scoring: ScoringConfig::default(),
            sessions: SessionConfig::default(),
        }
    }
}

/// Environment variables consulted for each provider's API key, in priority order.
const KEY_OVERRIDES: &[(&str, &[&str])] = &[
    ("gemini", &["SKILLSCAPE_GEMINI_KEY", "GOOGLE_API_KEY"]),
    ("anthropic", &["SKILLSCAPE_ANTHROPIC_KEY"]),
    ("openai", &["SKILLSCAPE_OPENAI_KEY"]),
];

fn empty_provider(name: &str) -> ProviderConfig {
    match name {
        "anthropic" => ProviderConfig::Anthropic {
            api_key: String::new(),
            base_url: None,
        },
        "openai" => ProviderConfig::OpenAI {
            api_key: String::new(),
            base_url: None,
            org_id: None,
        },
        _ => ProviderConfig::Gemini {
            api_key: String::new(),
            base_url: None,
        },
    }
}

/// Apply API key overrides, creating provider entries on demand.
fn apply_key_overrides(config: &mut SkillscapeConfig, lookup: impl Fn(&str) -> Option<String>) {
    for (name, vars) in KEY_OVERRIDES {
        let Some(key) = vars.iter().find_map(|var| lookup(var)) else {
            continue;
        };
        *config
            .providers
            .entry((*name).to_string())
            .or_insert_with(|| empty_provider(name))
            .api_key_mut() = key;
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    let resolve_url = |u: &Option<String>| u.as_deref().map(resolve_env_vars);
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_url(base_url),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_url(base_url),
        },
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_url(base_url),
            org_id: org_id.as_deref().map(resolve_env_vars),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `skillscape.toml` in the current directory
/// 2. `~/.config/skillscape/config.toml`
///
/// API key overrides: `SKILLSCAPE_GEMINI_KEY` (or `GOOGLE_API_KEY`),
/// `SKILLSCAPE_ANTHROPIC_KEY`, `SKILLSCAPE_OPENAI_KEY`.
pub fn load_config() -> Result<SkillscapeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SkillscapeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("skillscape.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkillscapeConfig::default(),
    };

    apply_key_overrides(&mut config, |var| std::env::var(var).ok());

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

/// Parse and validate a TOML config document.
pub fn parse_config(content: &str) -> Result<SkillscapeConfig> {
    let config: SkillscapeConfig = toml::from_str(content)?;
    config.scoring.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skillscape"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    let require_key = |api_key: &str| {
        if api_key.is_empty() {
            bail!("no API key configured for provider '{name}'");
        }
        Ok(())
    };
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            require_key(api_key)?;
            Ok(Box::new(GeminiProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::Anthropic { api_key, base_url } => {
            require_key(api_key)?;
            Ok(Box::new(AnthropicProvider::new(api_key, base_url.clone())?))
        }
        // Local OpenAI-compatible servers run without a key.
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Ok(Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )?)),
    }
}

/// Build a retrying provider by name, falling back to the configured default.
pub fn provider_from_config(
    config: &SkillscapeConfig,
    provider: Option<&str>,
) -> Result<Arc<dyn LlmProvider>> {
    let name = provider.unwrap_or(&config.default_provider);
    let Some(provider_config) = config.providers.get(name) else {
        let mut known: Vec<&str> = config.providers.keys().map(String::as_str).collect();
        known.sort_unstable();
        bail!(
            "provider '{name}' is not configured (configured: {}). Run `skillscape init` or set an API key environment variable",
            if known.is_empty() { "none".to_string() } else { known.join(", ") }
        );
    };
    let inner = create_provider(name, provider_config)?;
    Ok(Arc::new(RetryingProvider::new(
        inner,
        config.max_retries,
        Duration::from_millis(config.retry_delay_ms),
    )))
}

/// Assemble a [`TriageService`] whose collaborators all talk to `provider`.
pub fn build_service(
    config: &SkillscapeConfig,
    provider: Arc<dyn LlmProvider>,
    model: Option<&str>,
) -> Result<TriageService> {
    let model = model.unwrap_or(&config.default_model);
    let store = Arc::new(InMemorySessionStore::new(config.sessions.ttl()));
    let scorer = Scorer::new(config.scoring)?;

    Ok(TriageService::new(
        store,
        Arc::new(LlmQuizGenerator::new(provider.clone(), model)),
        Arc::new(LlmMetadataExtractor::new(provider.clone(), model)),
        Arc::new(LlmSummarizer::new(provider, model)),
        scorer,
    ))
}
