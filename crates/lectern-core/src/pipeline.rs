//! Two-stage quiz generation over an LLM provider.
//!
//! A research stage asks the model for the key concepts of a lecture, then a
//! question-writing stage turns those concepts into a JSON array of quiz
//! questions. Transient provider failures are retried with exponential
//! backoff; the final output is parsed with
//! [`parse_question_list`](crate::questions::parse_question_list).

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::error::{GenerationError, ProviderError};
use crate::questions::{parse_question_list, QUIZ_LENGTH};
use crate::traits::{GenerateRequest, GenerateResponse, LlmProvider, QuestionSource, TokenUsage};

/// Upper bound for the backoff between retries.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

const RESEARCHER_SYSTEM_PROMPT: &str = "You are an Educational Content Analyst. Your goal is to analyze lecture and course materials to identify key concepts and learning objectives. You are an expert in curriculum analysis who can quickly identify the most important learning points from educational content.";

const QUESTION_WRITER_SYSTEM_PROMPT: &str = "You are a Quiz Question Writer. Your goal is to create 5 insightful questions about the lecture content that test understanding. You are a professional educator with years of experience creating effective assessment questions for university courses.";

/// Configuration for the quiz pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Max tokens per stage.
    pub max_tokens: u32,
    /// Retries on transient provider errors, per stage.
    pub max_retries: u32,
    /// Delay before the first retry; doubled after each attempt.
    pub retry_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Questions produced by one pipeline run, with what it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuiz {
    pub questions: Vec<String>,
    /// Model that answered the question stage.
    pub model: String,
    /// Tokens summed over both stages.
    pub token_usage: TokenUsage,
    /// Provider-reported latency summed over both stages.
    pub latency_ms: u64,
}

/// LLM-backed [`QuestionSource`].
pub struct QuizPipeline {
    provider: Arc<dyn LlmProvider>,
    config: PipelineConfig,
}

impl QuizPipeline {
    pub fn new(provider: Arc<dyn LlmProvider>, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Ask for the key concepts of the lecture as a markdown list.
    #[instrument(skip(self))]
    async fn research(
        &self,
        course_name: &str,
        lecture_title: &str,
    ) -> anyhow::Result<GenerateResponse> {
        let prompt = format!(
            "Analyze this educational content:\nCourse: {course_name}\nLecture: {lecture_title}\n\
             Identify the {QUIZ_LENGTH} most important concepts students should understand.\n\n\
             Expected output: a markdown list of {QUIZ_LENGTH} key concepts with brief explanations of their importance."
        );
        self.complete(prompt, RESEARCHER_SYSTEM_PROMPT).await
    }

    /// Turn the researched concepts into a JSON array of questions.
    #[instrument(skip(self, key_concepts))]
    async fn write_questions(
        &self,
        course_name: &str,
        lecture_title: &str,
        key_concepts: &str,
    ) -> anyhow::Result<GenerateResponse> {
        let prompt = format!(
            "Course: {course_name}\nLecture: {lecture_title}\n\nKey concepts:\n{key_concepts}\n\n\
             Using the key concepts above, create {QUIZ_LENGTH} assessment questions that:\n\
             1. Cover different cognitive levels (remember, understand, apply, analyze, evaluate)\n\
             2. Are clear and unambiguous\n\
             3. Test genuine understanding of the material\n\
             4. Are appropriate for university-level students\n\n\
             Expected output: a JSON array containing {QUIZ_LENGTH} well-formulated questions about the lecture content.\n\
             Format: [\"question1\", \"question2\", ...]"
        );
        self.complete(prompt, QUESTION_WRITER_SYSTEM_PROMPT).await
    }

    async fn complete(
        &self,
        prompt: String,
        system_prompt: &str,
    ) -> anyhow::Result<GenerateResponse> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt,
            system_prompt: Some(system_prompt.to_string()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        let response = self.complete_with_retry(&request).await?;
        debug!(
            model = %response.model,
            prompt_tokens = response.token_usage.prompt_tokens,
            completion_tokens = response.token_usage.completion_tokens,
            latency_ms = response.latency_ms,
            "stage completed"
        );
        Ok(response)
    }

    /// Retry on transient provider errors with exponential backoff.
    async fn complete_with_retry(
        &self,
        request: &GenerateRequest,
    ) -> anyhow::Result<GenerateResponse> {
        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay;

        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }
            match self.provider.generate(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if let Some(provider_err) = e.downcast_ref::<ProviderError>() {
                        if !provider_err.is_retryable() {
                            return Err(e);
                        }
                        if let Some(ms) = provider_err.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms).min(MAX_RETRY_DELAY);
                        }
                    }
                    warn!(
                        provider = self.provider.name(),
                        attempt = retry + 1,
                        "provider call failed: {e:#}"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
    }

    /// Run both stages and parse the result into exactly [`QUIZ_LENGTH`]
    /// questions when the model wrote more.
    pub async fn generate_quiz(
        &self,
        course_name: &str,
        lecture_title: &str,
    ) -> Result<GeneratedQuiz, GenerationError> {
        let start = Instant::now();

        let research = self
            .research(course_name, lecture_title)
            .await
            .map_err(GenerationError::Provider)?;
        let written = self
            .write_questions(course_name, lecture_title, &research.content)
            .await
            .map_err(GenerationError::Provider)?;

        let mut questions = parse_question_list(&written.content)?;
        if questions.len() > QUIZ_LENGTH {
            warn!(
                provider = self.provider.name(),
                received = questions.len(),
                "model wrote too many questions, keeping the first {QUIZ_LENGTH}"
            );
            questions.truncate(QUIZ_LENGTH);
        } else if questions.len() < QUIZ_LENGTH {
            warn!(
                provider = self.provider.name(),
                received = questions.len(),
                "model wrote fewer than {QUIZ_LENGTH} questions"
            );
        }

        let mut token_usage = research.token_usage;
        token_usage += written.token_usage;
        let latency_ms = research.latency_ms.saturating_add(written.latency_ms);

        info!(
            provider = self.provider.name(),
            model = %written.model,
            questions = questions.len(),
            prompt_tokens = token_usage.prompt_tokens,
            completion_tokens = token_usage.completion_tokens,
            total_tokens = token_usage.total_tokens,
            provider_latency_ms = latency_ms,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generated quiz questions"
        );
        Ok(GeneratedQuiz {
            questions,
            model: written.model,
            token_usage,
            latency_ms,
        })
    }
}

#[async_trait]
impl QuestionSource for QuizPipeline {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn generate(
        &self,
        course_name: &str,
        lecture_title: &str,
    ) -> Result<Vec<String>, GenerationError> {
        self.generate_quiz(course_name, lecture_title)
            .await
            .map(|quiz| quiz.questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned outcomes and records the prompts it saw.
    struct ScriptedProvider {
        outcomes: Mutex<VecDeque<Result<String, ProviderError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(outcomes: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::NetworkError("script exhausted".into())));
            let content = outcome?;
            Ok(GenerateResponse {
                content,
                model: request.model.clone(),
                token_usage: TokenUsage::new(100, 20),
                latency_ms: 7,
            })
        }
    }

    fn pipeline(provider: Arc<ScriptedProvider>, max_retries: u32) -> QuizPipeline {
        QuizPipeline::new(
            provider,
            PipelineConfig {
                max_retries,
                retry_delay: Duration::from_millis(10),
                ..Default::default()
            },
        )
    }

    const QUESTIONS_JSON: &str = r#"["Q1?", "Q2?", "Q3?", "Q4?", "Q5?"]"#;

    #[tokio::test]
    async fn research_feeds_question_stage() {
        let provider = ScriptedProvider::new(vec![
            Ok("- Ownership\n- Borrowing".into()),
            Ok(format!("Sure! {QUESTIONS_JSON}")),
        ]);
        let questions = pipeline(provider.clone(), 0)
            .generate("Systems Programming", "Rust Ownership")
            .await
            .unwrap();

        assert_eq!(questions.len(), 5);
        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Course: Systems Programming"));
        assert!(prompts[0].contains("Lecture: Rust Ownership"));
        assert!(prompts[1].contains("- Ownership\n- Borrowing"));
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::Timeout(30)),
            Ok("concepts".into()),
            Err(ProviderError::RateLimited { retry_after_ms: 50 }),
            Ok(QUESTIONS_JSON.into()),
        ]);
        let questions = pipeline(provider.clone(), 2)
            .generate("CS101", "Sorting")
            .await
            .unwrap();
        assert_eq!(questions[0], "Q1?");
        assert_eq!(provider.prompts().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn authentication_failure_is_not_retried() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::AuthenticationFailed("bad key".into())),
            Ok("never reached".into()),
        ]);
        let err = pipeline(provider.clone(), 3)
            .generate("CS101", "Sorting")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Provider(_)));
        assert!(err.to_string().contains("authentication failed"));
        assert_eq!(provider.prompts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::NetworkError("reset".into())),
            Err(ProviderError::NetworkError("reset".into())),
            Err(ProviderError::NetworkError("reset".into())),
        ]);
        let err = pipeline(provider.clone(), 2)
            .generate("CS101", "Sorting")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Provider(_)));
        assert_eq!(provider.prompts().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn client_errors_are_not_retried() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::ApiError {
                status: 400,
                message: "max_tokens too large".into(),
            }),
            Ok("never reached".into()),
        ]);
        let err = pipeline(provider.clone(), 3)
            .generate("CS101", "Sorting")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 400"));
        assert_eq!(provider.prompts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn server_errors_are_retried() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::ApiError {
                status: 503,
                message: "overloaded".into(),
            }),
            Ok("concepts".into()),
            Ok(QUESTIONS_JSON.into()),
        ]);
        let questions = pipeline(provider.clone(), 1)
            .generate("CS101", "Sorting")
            .await
            .unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(provider.prompts().len(), 3);
    }

    #[tokio::test]
    async fn usage_is_summed_over_both_stages() {
        let provider = ScriptedProvider::new(vec![
            Ok("concepts".into()),
            Ok(QUESTIONS_JSON.into()),
        ]);
        let quiz = pipeline(provider, 0)
            .generate_quiz("CS101", "Sorting")
            .await
            .unwrap();
        assert_eq!(quiz.token_usage, TokenUsage::new(200, 40));
        assert_eq!(quiz.latency_ms, 14);
        assert_eq!(quiz.model, "gpt-4.1");
    }

    #[tokio::test]
    async fn extra_questions_are_dropped() {
        let provider = ScriptedProvider::new(vec![
            Ok("concepts".into()),
            Ok(r#"["Q1?", "Q2?", "Q3?", "Q4?", "Q5?", "Q6?", "Q7?"]"#.into()),
        ]);
        let questions = pipeline(provider, 0)
            .generate("CS101", "Sorting")
            .await
            .unwrap();
        assert_eq!(questions, vec!["Q1?", "Q2?", "Q3?", "Q4?", "Q5?"]);
    }

    #[tokio::test]
    async fn short_lists_are_kept() {
        let provider = ScriptedProvider::new(vec![
            Ok("concepts".into()),
            Ok(r#"["Q1?", "Q2?"]"#.into()),
        ]);
        let questions = pipeline(provider, 0)
            .generate("CS101", "Sorting")
            .await
            .unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[tokio::test]
    async fn unparseable_questions_are_malformed() {
        let provider = ScriptedProvider::new(vec![
            Ok("concepts".into()),
            Ok("1. What is X?\n2. What is Y?".into()),
        ]);
        let err = pipeline(provider, 0)
            .generate("CS101", "Sorting")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MalformedOutput(_)));
    }
}
