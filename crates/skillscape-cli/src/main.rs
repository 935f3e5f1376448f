//! skillscape CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use skillscape_core::model::Audience;

mod commands;

use commands::{ContentArgs, HintArgs, OutputFormat, ProviderArgs};

#[derive(Parser)]
#[command(
    name = "skillscape",
    version,
    about = "Find out what you already know before you study something"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quiz yourself on content, then score and catalog it
    Assess {
        #[command(flatten)]
        content: ContentArgs,

        #[command(flatten)]
        hints: HintArgs,

        /// Number of questions (3-10, default from config)
        #[arg(long)]
        questions: Option<u32>,

        /// JSON file mapping question ids to answer labels; skips the interactive quiz
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Save the resulting report as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Catalog content without assessing it
    Organize {
        #[command(flatten)]
        content: ContentArgs,

        #[command(flatten)]
        hints: HintArgs,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Summarize content for an audience
    Summarize {
        #[command(flatten)]
        content: ContentArgs,

        /// Target audience: engineering, business, self
        #[arg(long, default_value = "self", value_parser = Audience::from_str)]
        audience: Audience,

        /// Saved assessment report whose knowledge gaps the summary should emphasize
        #[arg(long)]
        report: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("skillscape=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assess {
            content,
            hints,
            questions,
            answers,
            output,
            format,
            provider,
        } => {
            commands::assess::execute(content, hints, questions, answers, output, format, provider)
                .await
        }
        Commands::Organize {
            content,
            hints,
            format,
            provider,
        } => commands::organize::execute(content, hints, format, provider).await,
        Commands::Summarize {
            content,
            audience,
            report,
            format,
            provider,
        } => commands::summarize::execute(content, audience, report, format, provider).await,
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
