//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lectern() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lectern").unwrap()
}

const ANSWERS: &str = r#"{
  "lecture_title": "Introduction to Machine Learning",
  "course_name": "Computer Science 101",
  "questions": [
    "What is machine learning and how does it differ from traditional programming?",
    "Describe the concept of overfitting and how to prevent it."
  ],
  "answers": [
    "Machine learning uses data and algorithms to learn patterns instead of explicit programming rules.",
    "idk"
  ]
}"#;

fn answers_file(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("answers.json");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn grade_prints_table() {
    let dir = TempDir::new().unwrap();
    let input = answers_file(&dir, ANSWERS);

    lectern()
        .arg("grade")
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Feedback"))
        .stdout(predicate::str::contains("Excellent answer!"))
        .stdout(predicate::str::contains("Overall score: 50.0%"));
}

#[test]
fn grade_json_output() {
    let dir = TempDir::new().unwrap();
    let input = answers_file(&dir, ANSWERS);

    let output = lectern()
        .arg("grade")
        .arg("--input")
        .arg(&input)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["overall_score"], 50.0);
    assert_eq!(body["results"][0]["score"], 100);
    assert_eq!(body["results"][1]["expected_keywords_count"], 5);
}

#[test]
fn grade_rejects_mismatched_lengths() {
    let dir = TempDir::new().unwrap();
    let input = answers_file(
        &dir,
        r#"{"lecture_title": "L", "course_name": "C", "questions": ["a", "b"], "answers": ["x"]}"#,
    );

    lectern()
        .arg("grade")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Number of questions and answers must match"));
}

#[test]
fn grade_nonexistent_file() {
    lectern()
        .arg("grade")
        .arg("--input")
        .arg("does-not-exist.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn offline_questions_use_static_bank() {
    lectern()
        .arg("questions")
        .arg("--lecture")
        .arg("Neural Networks")
        .arg("--course")
        .arg("AI 300")
        .arg("--offline")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1. Explain the basic structure of a neural network.",
        ))
        .stdout(predicate::str::contains("5. "));
}

#[test]
fn questions_without_provider_fall_back() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lectern.toml");
    std::fs::write(&config, "default_provider = \"missing\"\n").unwrap();

    lectern()
        .arg("questions")
        .arg("--lecture")
        .arg("Thermodynamics")
        .arg("--course")
        .arg("Physics 2")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1. Explain the core concepts of Thermodynamics.",
        ))
        .stderr(predicate::str::contains("warning"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    lectern()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lectern.toml"))
        .stdout(predicate::str::contains("Created sample-answers.json"));

    assert!(dir.path().join("lectern.toml").exists());
    assert!(dir.path().join("sample-answers.json").exists());

    // The sample answers file grades cleanly.
    lectern()
        .arg("grade")
        .arg("--input")
        .arg(dir.path().join("sample-answers.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall score"));
}

#[test]
fn init_skips_existing_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("lectern.toml"), "# mine\n").unwrap();

    lectern()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("lectern.toml already exists, skipping."));

    let kept = std::fs::read_to_string(dir.path().join("lectern.toml")).unwrap();
    assert_eq!(kept, "# mine\n");
}

#[test]
fn help_lists_subcommands() {
    lectern()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("grade"))
        .stdout(predicate::str::contains("questions"))
        .stdout(predicate::str::contains("init"));
}
