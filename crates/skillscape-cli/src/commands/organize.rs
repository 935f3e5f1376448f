//! The `skillscape organize` command.

use anyhow::Result;

use skillscape_core::model::OrganizeHints;

use super::output;
use super::{ContentArgs, HintArgs, OutputFormat, ProviderArgs};

pub async fn execute(
    content_args: ContentArgs,
    hint_args: HintArgs,
    format: OutputFormat,
    provider_args: ProviderArgs,
) -> Result<()> {
    let config = provider_args.load_config()?;
    let content = content_args.load()?;
    let service = provider_args.service(&config)?;

    let organization = service
        .organize(&content, &OrganizeHints::from(hint_args))
        .await?;

    match format {
        OutputFormat::Text => output::print_organization(&organization),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&organization)?),
    }

    Ok(())
}
