//! End-to-end runs of `assess` and `summarize` against a stubbed Gemini API.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn gemini_reply(payload: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": payload.to_string()}]}}],
        "usageMetadata": {"promptTokenCount": 100, "candidatesTokenCount": 50, "totalTokenCount": 150}
    }))
}

fn quiz() -> Value {
    json!({
        "title": "The Rust Book: Ownership",
        "topics": ["Ownership", "Borrowing"],
        "questions": [
            {"id": "q1", "topic": "Ownership", "question": "Who frees a String?",
             "options": {"A": "GC", "B": "Its owner", "C": "The caller", "D": "Nobody"},
             "correct_answer": "B"},
            {"id": "q2", "topic": "Ownership", "question": "What does a move do?",
             "options": {"A": "Transfers ownership", "B": "Copies", "C": "Clones", "D": "Nothing"},
             "correct_answer": "A"},
            {"id": "q3", "topic": "Borrowing", "question": "How many &mut at once?",
             "options": {"A": "0", "B": "Any", "C": "1", "D": "2"},
             "correct_answer": "C"}
        ]
    })
}

fn metadata() -> Value {
    json!({
        "title": "Understanding Ownership",
        "medium": "article",
        "subjects": ["Rust"],
        "source": null,
        "author": "Steve Klabnik",
        "tags": ["ownership", "borrowing", "memory"],
        "isNewSubject": false,
        "confidence": 0.91
    })
}

// Fields drop in order: the server verifies its expectations while the
// runtime is still alive.
struct Stub {
    server: MockServer,
    dir: TempDir,
    runtime: tokio::runtime::Runtime,
}

impl Stub {
    fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        let dir = TempDir::new().unwrap();

        std::fs::write(
            dir.path().join("skillscape.toml"),
            format!(
                "max_retries = 0\n\n[providers.gemini]\ntype = \"gemini\"\napi_key = \"test-key\"\nbase_url = \"{}\"\n",
                server.uri()
            ),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("ownership.md"),
            "# Understanding Ownership\n\nEach value in Rust has an owner...",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("answers.json"),
            r#"{"q1": "B", "q2": "a", "q3": "D"}"#,
        )
        .unwrap();

        Self {
            server,
            dir,
            runtime,
        }
    }

    fn mount(&self, system_marker: &str, reply: ResponseTemplate, calls: u64) {
        self.runtime.block_on(
            Mock::given(method("POST"))
                .and(path(GENERATE_PATH))
                .and(body_string_contains(system_marker))
                .respond_with(reply)
                .expect(calls)
                .mount(&self.server),
        );
    }

    fn command(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("skillscape").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("SKILLSCAPE_GEMINI_KEY")
            .env_remove("GOOGLE_API_KEY");
        cmd
    }
}

#[test]
fn assess_scores_and_organizes() {
    let stub = Stub::start();
    stub.mount("knowledge assessor", gemini_reply(quiz()), 1);
    stub.mount("knowledge organizer", gemini_reply(metadata()), 1);

    let output = stub
        .command()
        .args([
            "assess",
            "--content",
            "ownership.md",
            "--answers",
            "answers.json",
            "--url",
            "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
            "--subjects",
            "Systems Programming",
            "--format",
            "json",
            "--output",
            "report.json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let outcome: Value = serde_json::from_slice(&output).unwrap();
    let assessment = &outcome["assessment"];
    assert_eq!(assessment["overall_knowledge"], json!(0.5));
    assert_eq!(assessment["focus_areas"], json!(["Borrowing"]));
    assert_eq!(assessment["skip_areas"], json!(["Ownership"]));
    assert_eq!(assessment["topics_assessed"][0]["questions_correct"], json!(2));

    let node = &outcome["organization"]["content_node"];
    assert_eq!(node["progressPercent"], json!(50));
    assert_eq!(node["status"], json!("in_progress"));
    assert_eq!(node["source"], json!("doc.rust-lang.org"));
    assert_eq!(node["subjects"], json!(["Rust", "Systems Programming"]));
    assert_eq!(
        outcome["organization"]["ai_suggestion"]["confidence"],
        json!(0.91)
    );

    let saved = std::fs::read_to_string(stub.dir.path().join("report.json")).unwrap();
    let saved: Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["assessment"], outcome["assessment"]);
}

#[test]
fn assess_text_output_shows_topic_table() {
    let stub = Stub::start();
    stub.mount("knowledge assessor", gemini_reply(quiz()), 1);
    stub.mount("knowledge organizer", gemini_reply(metadata()), 1);

    stub.command()
        .args([
            "assess",
            "--content",
            "ownership.md",
            "--answers",
            "answers.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ownership"))
        .stdout(predicate::str::contains("proficient"))
        .stdout(predicate::str::contains("needs_review"))
        .stdout(predicate::str::contains("Overall knowledge: 50%"))
        .stdout(predicate::str::contains("Focus on: Borrowing"));
}

#[test]
fn assess_reads_answers_interactively() {
    let stub = Stub::start();
    stub.mount("knowledge assessor", gemini_reply(quiz()), 1);
    stub.mount("knowledge organizer", gemini_reply(metadata()), 1);

    // "x" is rejected and re-asked; the empty line skips q3.
    stub.command()
        .args(["assess", "--content", "ownership.md", "--format", "json"])
        .write_stdin("b\nx\nA\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("'x' is not one of A/B/C/D"))
        .stdout(predicate::str::contains("\"overall_knowledge\": 0.5"));
}

#[test]
fn assess_rejects_unknown_answer_labels() {
    let stub = Stub::start();
    stub.mount("knowledge assessor", gemini_reply(quiz()), 1);
    stub.mount("knowledge organizer", gemini_reply(metadata()), 0);
    std::fs::write(stub.dir.path().join("answers.json"), r#"{"q1": "Z"}"#).unwrap();

    stub.command()
        .args([
            "assess",
            "--content",
            "ownership.md",
            "--answers",
            "answers.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid score request"));
}

#[test]
fn summarize_uses_saved_report_gaps() {
    let stub = Stub::start();
    stub.mount("knowledge assessor", gemini_reply(quiz()), 1);
    stub.mount("knowledge organizer", gemini_reply(metadata()), 1);
    stub.mount(
        "focus on: Borrowing",
        gemini_reply(json!({
            "content_title": "Understanding Ownership",
            "content": "## Summary\n\nBorrowing lets you use a value without owning it.",
            "key_takeaways": ["One &mut or many &", "Moves transfer ownership"],
            "code_examples": ["let r = &mut s;"]
        })),
        1,
    );

    stub.command()
        .args([
            "assess",
            "--content",
            "ownership.md",
            "--answers",
            "answers.json",
            "--output",
            "report.json",
        ])
        .assert()
        .success();

    stub.command()
        .args([
            "summarize",
            "--content",
            "ownership.md",
            "--audience",
            "engineering",
            "--report",
            "report.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# Understanding Ownership (engineering)",
        ))
        .stdout(predicate::str::contains("- One &mut or many &"))
        .stdout(predicate::str::contains("let r = &mut s;"));
}
