//! The `lectern questions` command.

use std::path::PathBuf;

use anyhow::Result;

use lectern_providers::{build_question_source, load_config_from};
use lectern_server::routes::quiz::quiz_for;
use lectern_server::AppState;

pub async fn execute(
    lecture: String,
    course: String,
    offline: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let state = if offline {
        AppState::offline()
    } else {
        let config = load_config_from(config_path.as_deref())?;
        AppState::new(build_question_source(&config)?)
    };

    let quiz = quiz_for(&state, &lecture, &course).await;
    if let Some(message) = &quiz.message {
        if !offline {
            eprintln!("warning: {message}");
        }
    }

    for (i, question) in quiz.questions.iter().enumerate() {
        println!("{}. {}", i + 1, question);
    }
    Ok(())
}
