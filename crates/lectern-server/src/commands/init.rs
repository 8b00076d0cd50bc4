//! The `lectern init` command.

use std::path::Path;

use anyhow::Result;

const CONFIG_PATH: &str = "lectern.toml";
const ANSWERS_PATH: &str = "sample-answers.json";

pub fn execute() -> Result<()> {
    write_if_missing(CONFIG_PATH, SAMPLE_CONFIG)?;
    write_if_missing(ANSWERS_PATH, SAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_PATH} with your API keys");
    println!("  2. Run: lectern grade --input {ANSWERS_PATH}");
    println!("  3. Run: lectern serve");

    Ok(())
}

fn write_if_missing(path: &str, content: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content)?;
        println!("Created {path}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lectern configuration

default_provider = "openai"
default_model = "gpt-4.1"
temperature = 0.7
max_tokens = 1024
max_retries = 3
retry_delay_ms = 1000

[server]
host = "0.0.0.0"
port = 8000

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;

const SAMPLE_ANSWERS: &str = r#"{
  "lecture_title": "Introduction to Machine Learning",
  "course_name": "Computer Science 101",
  "questions": [
    "What is machine learning and how does it differ from traditional programming?",
    "Explain the difference between supervised and unsupervised learning.",
    "Describe the concept of overfitting and how to prevent it."
  ],
  "answers": [
    "Machine learning uses data and algorithms to learn patterns instead of explicit programming rules.",
    "Supervised learning uses labeled data, unsupervised does not.",
    "idk"
  ]
}
"#;
