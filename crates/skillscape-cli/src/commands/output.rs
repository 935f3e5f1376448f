//! Console rendering for assessments, organizations, and summaries.

use comfy_table::{Cell, Table};

use skillscape_core::model::{Assessment, Organization, PublicQuestion, Summary};

pub fn print_question(index: usize, total: usize, question: &PublicQuestion) {
    println!("\n[{}/{}] ({}) {}", index + 1, total, question.topic, question.prompt);
    for (label, text) in &question.options {
        println!("  {label}) {text}");
    }
}

pub fn print_assessment(assessment: &Assessment) {
    let mut table = Table::new();
    table.set_header(vec!["Topic", "Score", "Correct", "Status"]);

    for topic in &assessment.topics_assessed {
        table.add_row(vec![
            Cell::new(&topic.topic),
            Cell::new(format!("{:.0}%", topic.score * 100.0)),
            Cell::new(format!("{}/{}", topic.questions_correct, topic.questions_total)),
            Cell::new(topic.status),
        ]);
    }

    println!("\n{}", assessment.content_title);
    println!("{table}");
    println!(
        "Overall knowledge: {:.0}%",
        assessment.overall_knowledge * 100.0
    );
    if !assessment.focus_areas.is_empty() {
        println!("Focus on: {}", assessment.focus_areas.join(", "));
    }
    if !assessment.skip_areas.is_empty() {
        println!("Safe to skip: {}", assessment.skip_areas.join(", "));
    }
}

pub fn print_organization(organization: &Organization) {
    let node = &organization.content_node;
    let suggestion = &organization.ai_suggestion;

    let mut table = Table::new();
    table.add_row(vec![Cell::new("Title"), Cell::new(&node.title)]);
    table.add_row(vec![Cell::new("Medium"), Cell::new(node.medium)]);
    table.add_row(vec![Cell::new("Subjects"), Cell::new(node.subjects.join(", "))]);
    table.add_row(vec![
        Cell::new("Progress"),
        Cell::new(format!("{}% ({})", node.progress_percent, node.status)),
    ]);
    if let Some(source) = &node.source {
        table.add_row(vec![Cell::new("Source"), Cell::new(source)]);
    }
    if let Some(author) = &node.author {
        table.add_row(vec![Cell::new("Author"), Cell::new(author)]);
    }
    if !node.tags.is_empty() {
        table.add_row(vec![Cell::new("Tags"), Cell::new(node.tags.join(", "))]);
    }
    if let Some(notes) = &node.notes {
        table.add_row(vec![Cell::new("Notes"), Cell::new(notes)]);
    }

    println!("\nContent node");
    println!("{table}");
    println!(
        "Suggestion confidence: {:.0}%{}",
        suggestion.confidence * 100.0,
        if suggestion.is_new_subject {
            " (new subject)"
        } else {
            ""
        }
    );
}

pub fn print_summary(summary: &Summary) {
    println!("# {} ({})\n", summary.content_title, summary.audience);
    println!("{}", summary.content.trim_end());

    if !summary.key_takeaways.is_empty() {
        println!("\n## Key takeaways\n");
        for takeaway in &summary.key_takeaways {
            println!("- {takeaway}");
        }
    }

    if let Some(examples) = summary.code_examples.as_ref().filter(|e| !e.is_empty()) {
        println!("\n## Code examples");
        for example in examples {
            println!("\n```\n{}\n```", example.trim_end());
        }
    }
}
