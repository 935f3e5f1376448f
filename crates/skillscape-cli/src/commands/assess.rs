//! The `skillscape assess` command.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use skillscape_core::model::{AnswerSet, OrganizeHints, PublicQuestion, QuizStart};
use skillscape_core::report::TriageReport;
use skillscape_core::{SessionStore, TriageError};

use super::output;
use super::{ContentArgs, HintArgs, OutputFormat, ProviderArgs};

pub async fn execute(
    content_args: ContentArgs,
    hint_args: HintArgs,
    questions: Option<u32>,
    answers_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    format: OutputFormat,
    provider_args: ProviderArgs,
) -> Result<()> {
    let config = provider_args.load_config()?;
    let content = content_args.load()?;
    // Fail on a bad answers file before spending a model call.
    let preset_answers = answers_path.as_deref().map(read_answers).transpose()?;
    let service = provider_args.service(&config)?;
    let hints = OrganizeHints::from(hint_args);

    let quiz = service
        .start_assessment(&content, questions.unwrap_or(config.default_questions))
        .await?;
    info!(session_id = %quiz.session_id, questions = quiz.questions.len(), "quiz ready");

    let answers = match preset_answers {
        Some(answers) => normalize_labels(&quiz, answers),
        None => ask_questions(&quiz).await?,
    };

    let outcome = match service
        .submit_answers(&quiz.session_id, &answers, &content, &hints)
        .await
    {
        Ok(outcome) => outcome,
        // The assessment is already recorded; give organization one more try.
        Err(e @ TriageError::Extraction { .. }) => {
            warn!(session_id = %quiz.session_id, error = %e, "retrying organization");
            service.reorganize(&quiz.session_id, &content, &hints).await?
        }
        Err(e) => return Err(e.into()),
    };
    service.store().remove(&quiz.session_id);

    match format {
        OutputFormat::Text => {
            output::print_assessment(&outcome.assessment);
            output::print_organization(&outcome.organization);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }

    if let Some(path) = output_path {
        TriageReport::from(outcome).save_json(&path)?;
        eprintln!("Report written to {}", path.display());
    }

    Ok(())
}

fn read_answers(path: &Path) -> Result<AnswerSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| {
        format!(
            "answers file {} must be a JSON object of question id to option label",
            path.display()
        )
    })
}

/// Match user input against a question's option labels, ignoring case.
fn match_option(question: &PublicQuestion, input: &str) -> Option<String> {
    question
        .options
        .keys()
        .find(|label| label.eq_ignore_ascii_case(input))
        .cloned()
}

/// Canonicalize label case for known questions; anything else is left for
/// the scorer to reject.
fn normalize_labels(quiz: &QuizStart, answers: AnswerSet) -> AnswerSet {
    answers
        .into_iter()
        .map(|(id, label)| {
            let label = quiz
                .questions
                .iter()
                .find(|q| q.id == id)
                .and_then(|q| match_option(q, label.trim()))
                .unwrap_or(label);
            (id, label)
        })
        .collect()
}

async fn ask_questions(quiz: &QuizStart) -> Result<AnswerSet> {
    println!(
        "{}: {} questions covering {}",
        quiz.content_title,
        quiz.questions.len(),
        quiz.topics.join(", ")
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut answers = AnswerSet::new();
    let total = quiz.questions.len();

    for (index, question) in quiz.questions.iter().enumerate() {
        output::print_question(index, total, question);
        let labels = question
            .options
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("/");

        loop {
            print!("Answer ({labels}, Enter to skip): ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await.context("failed to read answer")? else {
                bail!("input ended before the quiz was finished");
            };
            let input = line.trim();
            if input.is_empty() {
                break;
            }
            if let Some(label) = match_option(question, input) {
                answers.insert(question.id.clone(), label);
                break;
            }
            println!("  '{input}' is not one of {labels}");
        }
    }

    Ok(answers)
}
