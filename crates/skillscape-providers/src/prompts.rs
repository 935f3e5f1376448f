//! Prompt templates for the quiz, metadata, and summary agents.

use std::fmt::Write;

use skillscape_core::model::{Assessment, Audience, KnowledgeGaps};
use skillscape_core::organizer::progress_percent;

/// Placeholder used in place of inline content when a document is attached.
pub const ATTACHED_DOCUMENT: &str = "(the content is the attached PDF document)";

pub const ASSESSOR_SYSTEM_PROMPT: &str = "You are a knowledge assessor. You read learning \
material, pick out its key topics, and write multiple-choice questions that reveal how much \
of it a learner already understands. You always reply with a single JSON object.";

pub const ORGANIZER_SYSTEM_PROMPT: &str = "You are a knowledge organizer for a personal \
learning graph. You extract catalog metadata from learning material: title, medium, subjects, \
source, author, and tags. You always reply with a single JSON object.";

pub const SUMMARIZER_SYSTEM_PROMPT: &str = "You are a knowledge summarizer. You condense \
learning material into clear markdown summaries written for a specific audience, emphasizing \
the learner's knowledge gaps when they are known. You always reply with a single JSON object.";

/// Questions per topic, assuming the model finds about three topics.
fn questions_per_topic(num_questions: u32) -> u32 {
    (num_questions / 3).max(1)
}

pub fn quiz_prompt(content: &str, num_questions: u32) -> String {
    format!(
        r#"Build a knowledge check for the content below.

CONTENT:
{content}

RULES:
- Identify 3 to 5 key topics the content covers.
- Write about {per_topic} question(s) per topic, {num_questions} questions in total.
- Test understanding rather than recall, ranging from fundamentals to advanced points.
- Every question has exactly four options labelled "A", "B", "C", "D" and one correct label.
- Question ids are "q1", "q2", ... in order.

Reply with JSON only, shaped like:
{{
  "title": "title of the content",
  "topics": ["Topic one", "Topic two", "Topic three"],
  "questions": [
    {{
      "id": "q1",
      "topic": "Topic one",
      "question": "Why does X happen?",
      "options": {{"A": "...", "B": "...", "C": "...", "D": "..."}},
      "correct_answer": "B"
    }}
  ]
}}"#,
        per_topic = questions_per_topic(num_questions),
    )
}

fn assessment_section(assessment: &Assessment) -> String {
    format!(
        "ASSESSMENT:\n- Overall knowledge: {}%\n- Focus areas: {}\n- Already known: {}\n",
        progress_percent(Some(assessment)),
        join_or_none(&assessment.focus_areas),
        join_or_none(&assessment.skip_areas),
    )
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn organize_prompt(
    content: &str,
    url: Option<&str>,
    existing_subjects: &[String],
    assessment: Option<&Assessment>,
) -> String {
    let mut prompt = format!(
        "Extract catalog metadata for the content below.\n\nCONTENT:\n{content}\n\n\
         SOURCE URL: {}\n\nSUBJECTS ALREADY IN THE LEARNER'S GRAPH: {}\n\n",
        url.unwrap_or("unknown"),
        join_or_none(existing_subjects),
    );
    if let Some(assessment) = assessment {
        prompt.push_str(&assessment_section(assessment));
        prompt.push('\n');
    }
    prompt.push_str(
        r#"RULES:
- title: the content's title, at most 60 characters.
- medium: one of course, video, article, podcast, paper, other.
- subjects: 1 to 3 broad subjects. Reuse an existing subject when one fits.
- source: the publishing platform (e.g. "YouTube", "arXiv", "Udemy"), or null.
- author: the author's name if stated, otherwise null.
- tags: 3 to 5 short keywords.
- isNewSubject: true when the first subject is not among the existing subjects.
- confidence: your confidence in this classification, from 0.0 to 1.0.

Reply with JSON only, shaped like:
{
  "title": "Content title",
  "medium": "article",
  "subjects": ["Rust"],
  "source": "YouTube",
  "author": "Jane Doe",
  "tags": ["async", "tokio", "futures"],
  "isNewSubject": false,
  "confidence": 0.9
}"#,
    );
    prompt
}

fn audience_brief(audience: Audience) -> &'static str {
    match audience {
        Audience::Engineering => {
            "Write a technical summary for an engineering team. Cover implementation details, \
             architecture, trade-offs, integration points, and performance or security \
             implications. Use precise terminology and include code snippets where relevant."
        }
        Audience::Business => {
            "Write an executive summary for business stakeholders. Lead with value and impact, \
             use cases, risks, and resource implications. Keep it jargon-free and scannable, \
             with minimal technical detail."
        }
        Audience::SelfStudy => {
            "Write a personal learning reference. Capture the key mental models, gotchas, and \
             things worth remembering long-term, formatted as a quick-lookup cheat sheet with \
             concrete action items."
        }
    }
}

fn gap_section(gaps: &KnowledgeGaps) -> String {
    format!(
        "KNOWLEDGE GAPS:\nEmphasize these topics the learner needs to focus on: {}\n\
         Mention these already-known topics only briefly: {}\n",
        join_or_none(&gaps.focus_areas),
        join_or_none(&gaps.skip_areas),
    )
}

pub fn summary_prompt(content: &str, audience: Audience, gaps: Option<&KnowledgeGaps>) -> String {
    let mut prompt = format!(
        "Summarize the content below.\n\nCONTENT:\n{content}\n\nAUDIENCE: {audience}\n{}\n\n",
        audience_brief(audience),
    );
    if let Some(gaps) = gaps {
        prompt.push_str(&gap_section(gaps));
        prompt.push('\n');
    }
    let code_hint = if audience == Audience::Engineering {
        "an array of relevant code snippets"
    } else {
        "null"
    };
    let _ = write!(
        prompt,
        r###"Reply with JSON only, shaped like:
{{
  "content_title": "Title of the content",
  "content": "## Summary\n\nMarkdown body...",
  "key_takeaways": ["First point", "Second point", "Third point"],
  "code_examples": {code_hint}
}}
Include 3 to 5 key takeaways."###
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillscape_core::model::{TopicAssessment, TopicStatus};

    #[test]
    fn quiz_prompt_scales_questions_per_topic() {
        let prompt = quiz_prompt("Ownership rules", 9);
        assert!(prompt.contains("about 3 question(s) per topic, 9 questions in total"));
        assert!(quiz_prompt("x", 2).contains("about 1 question(s) per topic"));
        assert!(prompt.contains("Ownership rules"));
    }

    #[test]
    fn organize_prompt_includes_assessment() {
        let assessment = Assessment {
            session_id: "s".into(),
            content_title: "Tokio".into(),
            overall_knowledge: 0.42,
            topics_assessed: vec![TopicAssessment {
                topic: "Runtime".into(),
                score: 0.42,
                status: TopicStatus::NeedsReview,
                questions_correct: 0,
                questions_total: 0,
            }],
            focus_areas: vec!["Runtime".into()],
            skip_areas: vec![],
        };
        let prompt = organize_prompt("body", Some("https://tokio.rs"), &[], Some(&assessment));
        assert!(prompt.contains("Overall knowledge: 42%"));
        assert!(prompt.contains("Focus areas: Runtime"));
        assert!(prompt.contains("Already known: none"));
        assert!(prompt.contains("SOURCE URL: https://tokio.rs"));

        let bare = organize_prompt("body", None, &["Rust".into()], None);
        assert!(!bare.contains("ASSESSMENT"));
        assert!(bare.contains("GRAPH: Rust"));
    }

    #[test]
    fn summary_prompt_varies_by_audience() {
        let eng = summary_prompt("c", Audience::Engineering, None);
        assert!(eng.contains("AUDIENCE: engineering"));
        assert!(eng.contains("code snippets"));
        let biz = summary_prompt("c", Audience::Business, None);
        assert!(biz.contains("\"code_examples\": null"));

        let gaps = KnowledgeGaps {
            focus_areas: vec!["Pinning".into()],
            skip_areas: vec!["Traits".into()],
        };
        let focused = summary_prompt("c", Audience::SelfStudy, Some(&gaps));
        assert!(focused.contains("focus on: Pinning"));
        assert!(focused.contains("only briefly: Traits"));
    }
}
