//! The `skillscape list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use skillscape_providers::config::load_config_from;
use skillscape_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config
        .providers
        .keys()
        .filter(|name| provider_filter.as_ref().map_or(true, |f| *name == f))
        .collect();
    names.sort();

    let mut found_any = false;
    for name in names {
        let provider = match create_provider(name, &config.providers[name]) {
            Ok(provider) => provider,
            Err(e) => {
                println!("Provider: {name} (unavailable: {e})\n");
                continue;
            }
        };
        let models = provider.available_models();
        if models.is_empty() {
            continue;
        }

        found_any = true;
        let default_marker = |id: &str| {
            if *name == config.default_provider && id == config.default_model {
                " [default]"
            } else {
                ""
            }
        };
        println!("Provider: {name}");
        for model in &models {
            println!(
                "  {}: {} ({}K context{}){}",
                model.id,
                model.name,
                model.max_context / 1000,
                if model.supports_pdf { ", PDF input" } else { "" },
                default_marker(&model.id),
            );
        }
        println!();
    }

    if !found_any {
        println!("No providers configured. Run `skillscape init` to create a config file.");
    }

    Ok(())
}
