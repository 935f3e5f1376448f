//! The `skillscape init` command.

use std::path::Path;

use anyhow::Result;

const CONFIG_FILE: &str = "skillscape.toml";

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE).exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
        return Ok(());
    }

    std::fs::write(CONFIG_FILE, SAMPLE_CONFIG)?;
    println!("Created {CONFIG_FILE}");

    println!("\nNext steps:");
    println!("  1. Export GOOGLE_API_KEY (or edit {CONFIG_FILE} for another provider)");
    println!("  2. Run: skillscape assess --content notes.md");
    println!("  3. Run: skillscape summarize --content notes.md --audience engineering");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillscape configuration

default_provider = "gemini"
default_model = "gemini-2.5-flash"
default_questions = 5
max_retries = 4
retry_delay_ms = 1000

[providers.gemini]
type = "gemini"
api_key = "${GOOGLE_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

# Any OpenAI-compatible server, e.g. a local Ollama.
[providers.ollama]
type = "openai"
base_url = "http://localhost:11434"

[scoring]
proficiency_threshold = 0.8
review_threshold = 0.5

[sessions]
ttl_secs = 3600
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config = skillscape_providers::config::parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.providers.len(), 3);
        assert_eq!(config.sessions.ttl_secs, 3600);
    }
}
