//! Subcommand implementations and the argument groups they share.

pub mod assess;
pub mod init;
pub mod list_models;
pub mod organize;
pub mod output;
pub mod summarize;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use base64::Engine;
use clap::{Args, ValueEnum};

use skillscape_core::model::{ContentType, OrganizeHints};
use skillscape_core::{ContentInput, TriageService};
use skillscape_providers::config::{
    build_service, load_config_from, provider_from_config, SkillscapeConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// The content a command works on.
#[derive(Debug, Args)]
pub struct ContentArgs {
    /// File holding the content (plain text, markdown, or PDF)
    #[arg(long = "content")]
    pub path: PathBuf,

    /// Content type: text, pdf (inferred from the file extension by default)
    #[arg(long, value_parser = ContentType::from_str)]
    pub content_type: Option<ContentType>,
}

impl ContentArgs {
    /// Read the file; PDFs are base64-encoded for the providers.
    pub fn load(&self) -> Result<ContentInput> {
        let content_type = self
            .content_type
            .unwrap_or_else(|| infer_content_type(&self.path));
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("failed to read content file: {}", self.path.display()))?;

        let content = match content_type {
            ContentType::Pdf => base64::engine::general_purpose::STANDARD.encode(&bytes),
            ContentType::Text => String::from_utf8(bytes).with_context(|| {
                format!(
                    "{} is not UTF-8 text (use --content-type pdf for PDF files)",
                    self.path.display()
                )
            })?,
        };

        Ok(ContentInput {
            content,
            content_type,
        })
    }
}

fn infer_content_type(path: &Path) -> ContentType {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => ContentType::Pdf,
        _ => ContentType::Text,
    }
}

/// Hints passed to the organizer.
#[derive(Debug, Args)]
pub struct HintArgs {
    /// Where the content came from
    #[arg(long)]
    pub url: Option<String>,

    /// Subjects to attach, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub subjects: Vec<String>,

    /// Subjects already in your knowledge graph, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub existing_subjects: Vec<String>,
}

impl From<HintArgs> for OrganizeHints {
    fn from(args: HintArgs) -> Self {
        OrganizeHints {
            url: args.url,
            subjects: args.subjects,
            existing_subjects: args.existing_subjects,
        }
    }
}

/// Provider selection shared by the LLM-backed commands.
#[derive(Debug, Args)]
pub struct ProviderArgs {
    /// Provider name from the config (default: `default_provider`)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model id (default: `default_model`)
    #[arg(long)]
    pub model: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ProviderArgs {
    pub fn load_config(&self) -> Result<SkillscapeConfig> {
        load_config_from(self.config.as_deref())
    }

    pub fn service(&self, config: &SkillscapeConfig) -> Result<TriageService> {
        let provider = provider_from_config(config, self.provider.as_deref())?;
        build_service(config, provider, self.model.as_deref())
    }
}
