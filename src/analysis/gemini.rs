//! Gemini-backed implementation of the analysis gateway. The model is asked
//! for JSON against an explicit response schema, so parsing failures are
//! malformed responses, never silent empties.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::analysis::types::{Question, VocabularyWord};
use crate::analysis::{AnalysisError, AnalysisGateway};
use crate::config::Config;
use crate::fetcher::get_client;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const MODEL: &str = "gemini-2.5-flash";

pub struct GeminiGateway {
    endpoint: String,
    api_key: String,
}

impl GeminiGateway {
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: config.analysis_api_key().to_string(),
        }
    }

    /// Point the gateway at a different endpoint (tests, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[instrument(skip_all)]
    async fn generate(&self, prompt: String, schema: Value) -> Result<String, AnalysisError> {
        let url = format!("{}/{}:generateContent", self.endpoint, MODEL);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        let response = get_client()
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(AnalysisError::Auth),
            StatusCode::TOO_MANY_REQUESTS => return Err(AnalysisError::Quota),
            s if !s.is_success() => return Err(AnalysisError::Service { status: s }),
            _ => {}
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AnalysisError::MalformedResponse("no candidate text".to_string()))
    }
}

#[async_trait]
impl AnalysisGateway for GeminiGateway {
    async fn analyze_vocabulary(
        &self,
        text: &str,
    ) -> Result<Vec<VocabularyWord>, AnalysisError> {
        let payload = self
            .generate(vocabulary_prompt(text), vocabulary_schema())
            .await?;
        parse_vocabulary(&payload)
    }

    async fn generate_questions(&self, text: &str) -> Result<Vec<Question>, AnalysisError> {
        let payload = self
            .generate(questions_prompt(text), questions_schema())
            .await?;
        parse_questions(&payload)
    }
}

fn vocabulary_prompt(text: &str) -> String {
    format!(
        "Analyze the following essay text and identify 10-15 difficult or \
         uncommon English words (approximately CEFR level C1/C2). For each \
         word, provide a concise definition and a sentence from the text \
         that shows its usage.\n\nEssay Text:\n---\n{text}\n---"
    )
}

fn questions_prompt(text: &str) -> String {
    format!(
        "Based on the following essay, generate 4-5 high-quality reading \
         comprehension questions suitable for a competitive exam. Cover a \
         variety of skills: main idea, inference, tone, \
         vocabulary-in-context, and specific details. For each question, \
         provide 4 distinct multiple-choice options, indicate the correct \
         answer by its index (0-3), and explain why that answer is correct \
         and the others are not.\n\nEssay Text:\n---\n{text}\n---"
    )
}

fn vocabulary_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "word": { "type": "STRING" },
                "definition": { "type": "STRING" },
                "usageExample": { "type": "STRING" }
            },
            "required": ["word", "definition", "usageExample"]
        }
    })
}

fn questions_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correctAnswerIndex": { "type": "INTEGER" },
                "explanation": { "type": "STRING" }
            },
            "required": ["question", "options", "correctAnswerIndex", "explanation"]
        }
    })
}

fn parse_vocabulary(payload: &str) -> Result<Vec<VocabularyWord>, AnalysisError> {
    let words: Vec<VocabularyWord> = serde_json::from_str(payload)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;
    if words.is_empty() {
        return Err(AnalysisError::MalformedResponse(
            "empty vocabulary list".to_string(),
        ));
    }
    if words.iter().any(|w| w.word.trim().is_empty()) {
        return Err(AnalysisError::MalformedResponse(
            "vocabulary entry with empty word".to_string(),
        ));
    }
    Ok(words)
}

fn parse_questions(payload: &str) -> Result<Vec<Question>, AnalysisError> {
    let questions: Vec<Question> = serde_json::from_str(payload)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;
    if questions.is_empty() {
        return Err(AnalysisError::MalformedResponse(
            "empty question list".to_string(),
        ));
    }
    if let Some(bad) = questions.iter().find(|q| !q.is_well_formed()) {
        return Err(AnalysisError::MalformedResponse(format!(
            "question with {} options, answer index {}",
            bad.options.len(),
            bad.correct_answer_index
        )));
    }
    Ok(questions)
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}
