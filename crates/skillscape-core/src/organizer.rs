//! Builds catalog records from metadata suggestions and assessments.
//!
//! Everything here is deterministic: the model's suggestion is reconciled
//! with caller hints, and progress comes from the assessment alone.

use url::Url;

use crate::model::{
    AiSuggestion, Assessment, ContentNode, Medium, Organization, OrganizeHints, ProgressStatus,
};
use crate::traits::MetadataSuggestion;

/// Longest title kept on a content node, in characters.
pub const MAX_TITLE_CHARS: usize = 60;

/// Most tags kept on a content node.
pub const MAX_TAGS: usize = 5;

/// `round(overall_knowledge * 100)`, clamped to [0, 100].
///
/// With no assessment the content has not been started.
pub fn progress_percent(assessment: Option<&Assessment>) -> u8 {
    match assessment {
        Some(a) if a.overall_knowledge.is_finite() => {
            (a.overall_knowledge * 100.0).round().clamp(0.0, 100.0) as u8
        }
        _ => 0,
    }
}

/// Merge model subjects with caller hints: model order first, then hints,
/// dropping blanks and case-insensitive duplicates (first spelling wins).
pub fn merge_subjects(suggested: &[String], hints: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for subject in suggested.iter().chain(hints) {
        let subject = subject.trim();
        if subject.is_empty() {
            continue;
        }
        if merged.iter().any(|s| s.eq_ignore_ascii_case(subject)) {
            continue;
        }
        merged.push(subject.to_string());
    }
    merged
}

/// Reduce a URL to its bare host name; return other text as given.
pub fn normalize_source(source: &str) -> String {
    let trimmed = source.trim();
    match Url::parse(trimmed) {
        Ok(url) => match url.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => trimmed.to_string(),
        },
        Err(_) => trimmed.to_string(),
    }
}

fn clean_title(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        return "Untitled".to_string();
    }
    title.chars().take(MAX_TITLE_CHARS).collect::<String>().trim_end().to_string()
}

fn assessment_notes(assessment: &Assessment) -> Option<String> {
    let mut parts = Vec::new();
    if !assessment.focus_areas.is_empty() {
        parts.push(format!("Focus areas: {}.", assessment.focus_areas.join(", ")));
    }
    if !assessment.skip_areas.is_empty() {
        parts.push(format!(
            "Skip: {} (already known).",
            assessment.skip_areas.join(", ")
        ));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Reconcile a metadata suggestion, caller hints, and an optional
/// assessment into a content node plus the untouched suggestion.
pub fn organize(
    assessment: Option<&Assessment>,
    suggestion: &MetadataSuggestion,
    hints: &OrganizeHints,
) -> Organization {
    let progress = progress_percent(assessment);
    let medium = Medium::from_label(&suggestion.medium);

    let source = suggestion
        .source
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or(hints.url.as_deref())
        .map(normalize_source)
        .filter(|s| !s.is_empty());

    let url = hints
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);

    let content_node = ContentNode {
        title: clean_title(&suggestion.title),
        medium,
        subjects: merge_subjects(&suggestion.subjects, &hints.subjects),
        status: ProgressStatus::from_percent(progress),
        progress_percent: progress,
        source,
        url,
        author: suggestion
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string),
        tags: suggestion.tags.iter().take(MAX_TAGS).cloned().collect(),
        notes: assessment.and_then(assessment_notes),
    };

    let ai_suggestion = AiSuggestion {
        title: suggestion.title.clone(),
        medium,
        subjects: suggestion.subjects.clone(),
        tags: suggestion.tags.clone(),
        is_new_subject: suggestion.is_new_subject,
        confidence: suggestion.confidence,
    };

    tracing::debug!(
        title = %content_node.title,
        progress = content_node.progress_percent,
        subjects = content_node.subjects.len(),
        "organized content"
    );

    Organization {
        content_node,
        ai_suggestion,
    }
}
