//! The `lectern grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::{Cell, Table};

use lectern_server::routes::analysis::{AnalysisRequest, AnalysisResponse};

/// Longest question excerpt shown in the table.
const QUESTION_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn execute(input: PathBuf, format: OutputFormat) -> Result<()> {
    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let request: AnalysisRequest = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", input.display()))?;

    let response = request.grade()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Table => print_table(&response),
    }
    Ok(())
}

fn print_table(response: &AnalysisResponse) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Score", "Correct", "Keywords", "Feedback"]);

    for (i, result) in response.results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(excerpt(&result.question)),
            Cell::new(result.score),
            Cell::new(if result.is_correct { "yes" } else { "no" }),
            Cell::new(format!(
                "{}/{}",
                result.matched_keyword_count, result.expected_keyword_count
            )),
            Cell::new(&result.feedback),
        ]);
    }

    println!("{table}");
    println!("Overall score: {:.1}%", response.overall_score);
}

fn excerpt(question: &str) -> String {
    if question.chars().count() <= QUESTION_WIDTH {
        return question.to_string();
    }
    let cut: String = question.chars().take(QUESTION_WIDTH - 3).collect();
    format!("{cut}...")
}
