//! The `skillscape summarize` command.

use std::path::PathBuf;

use anyhow::Result;

use skillscape_core::model::Audience;
use skillscape_core::report::TriageReport;

use super::output;
use super::{ContentArgs, OutputFormat, ProviderArgs};

pub async fn execute(
    content_args: ContentArgs,
    audience: Audience,
    report_path: Option<PathBuf>,
    format: OutputFormat,
    provider_args: ProviderArgs,
) -> Result<()> {
    let config = provider_args.load_config()?;
    let content = content_args.load()?;
    let report = report_path
        .as_deref()
        .map(TriageReport::load_json)
        .transpose()?;
    let service = provider_args.service(&config)?;

    let summary = service
        .summarize(&content, audience, report.as_ref().map(|r| &r.assessment))
        .await?;

    match format {
        OutputFormat::Text => output::print_summary(&summary),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
