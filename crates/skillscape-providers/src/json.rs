//! Pulling JSON payloads out of free-form model replies.

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;

/// Extract the JSON object text from a model response.
///
/// Prefers a ```json fenced block, then an untagged fence, then the span
/// from the first `{` to the last `}` in the raw text. Unclosed fences
/// (truncated replies) are treated as ending at the end of the text.
pub fn extract_json_object(response: &str) -> Option<&str> {
    let mut json_block = None;
    let mut generic_block = None;

    let mut offset = 0;
    let mut open: Option<(usize, bool, bool)> = None; // (body start, is json, is generic)
    for line in response.split_inclusive('\n') {
        let trimmed = line.trim();
        let line_start = offset;
        offset += line.len();

        match open {
            None if trimmed.starts_with("```") => {
                let lang = trimmed.trim_start_matches('`').trim().to_ascii_lowercase();
                open = Some((offset, lang == "json", lang.is_empty()));
            }
            Some((start, is_json, is_generic)) if trimmed == "```" => {
                let body = &response[start..line_start];
                if is_json && json_block.is_none() {
                    json_block = Some(body);
                } else if is_generic && generic_block.is_none() {
                    generic_block = Some(body);
                }
                open = None;
            }
            _ => {}
        }
    }
    if let Some((start, is_json, is_generic)) = open {
        let body = &response[start.min(response.len())..];
        if is_json && json_block.is_none() {
            json_block = Some(body);
        } else if is_generic && generic_block.is_none() {
            generic_block = Some(body);
        }
    }

    let candidate = json_block.or(generic_block).unwrap_or(response);
    let first = candidate.find('{')?;
    let last = candidate.rfind('}')?;
    (last > first).then(|| &candidate[first..=last])
}

/// Extract and deserialize a JSON object from a model response.
pub fn parse_json<T: DeserializeOwned>(response: &str) -> anyhow::Result<T> {
    let Some(text) = extract_json_object(response) else {
        bail!("response did not contain a JSON object");
    };
    serde_json::from_str(text).context("response JSON did not match the expected shape")
}
