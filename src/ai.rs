//! Optional AI-written summary of a dataset.
//!
//! This sits beside the rule engine, never inside it: the engine does not
//! read its output. [`generate_summary`] always returns displayable text.
//! A missing credential gives [`DISABLED_MESSAGE`], and any failure is folded
//! into a message instead of an error.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AiSettings;

pub const DISABLED_MESSAGE: &str =
    "AI mode is disabled. Add an API key to enable AI-powered insights.";

/// Number of leading rows shown to the provider.
pub const SAMPLE_ROWS: usize = 5;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("response contained no message")]
    EmptyResponse,
}

/// A remote text generator.
pub trait TextProvider {
    fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// OpenAI chat completions
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(settings: &AiSettings, api_key: &str) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            api_key: api_key.to_string(),
        })
    }
}

impl TextProvider for OpenAiProvider {
    fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp.json()?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ---------------------------------------------------------------------------
// Prompt and entry points
// ---------------------------------------------------------------------------

/// Analyst prompt listing the columns and a few sample rows.
pub fn build_prompt(columns: &[String], sample_rows: &[Vec<String>]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
    format!(
        "You are an AI data scientist. Analyze this dataset and provide 5 deep insights.\n\n\
         Columns: [{}]\n\
         Sample rows:\n{}",
        quoted.join(", "),
        render_table(columns, sample_rows),
    )
}

/// Right-aligned text table with a leading row index column.
fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let index_width = rows.len().saturating_sub(1).to_string().len();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|v| v.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (name, w) in columns.iter().zip(&widths) {
        out.push_str(&format!("  {name:>w$}"));
    }
    for (idx, row) in rows.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{idx:<index_width$}"));
        for (value, w) in row.iter().zip(&widths) {
            out.push_str(&format!("  {value:>w$}"));
        }
    }
    out
}

/// Asks `provider` for a summary, folding any failure into the returned text.
pub fn summarize_with(
    provider: &dyn TextProvider,
    columns: &[String],
    sample_rows: &[Vec<String>],
) -> String {
    let prompt = build_prompt(columns, sample_rows);
    match provider.complete(&prompt) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("{} summary failed: {e}", provider.name());
            format!("AI insight generation failed: {e}")
        }
    }
}

/// Generates an AI summary, or a fixed message when no credential is set.
pub fn generate_summary(
    columns: &[String],
    sample_rows: &[Vec<String>],
    credential: Option<&str>,
    settings: &AiSettings,
) -> String {
    let Some(key) = credential.filter(|k| !k.trim().is_empty()) else {
        return DISABLED_MESSAGE.to_string();
    };
    match OpenAiProvider::new(settings, key) {
        Ok(provider) => summarize_with(&provider, columns, sample_rows),
        Err(e) => format!("AI insight generation failed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<&'static str, u16>);

    impl TextProvider for Canned {
        fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(ProviderError::Api {
                    status,
                    body: "quota exceeded".to_string(),
                }),
            }
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    fn columns() -> Vec<String> {
        vec!["age".to_string(), "city".to_string()]
    }

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["31".to_string(), "Paris".to_string()],
            vec!["4".to_string(), "Rome".to_string()],
        ]
    }

    #[test]
    fn no_credential_means_disabled() {
        let settings = AiSettings::default();
        assert_eq!(generate_summary(&columns(), &rows(), None, &settings), DISABLED_MESSAGE);
        assert_eq!(
            generate_summary(&columns(), &rows(), Some("  "), &settings),
            DISABLED_MESSAGE
        );
    }

    #[test]
    fn provider_text_is_returned_verbatim() {
        let text = summarize_with(&Canned(Ok("Five insights.")), &columns(), &rows());
        assert_eq!(text, "Five insights.");
    }

    #[test]
    fn provider_failure_embeds_the_cause() {
        let text = summarize_with(&Canned(Err(429)), &columns(), &rows());
        assert_eq!(
            text,
            "AI insight generation failed: API error 429: quota exceeded"
        );
    }

    #[test]
    fn prompt_lists_columns_and_aligned_rows() {
        let prompt = build_prompt(&columns(), &rows());
        assert!(prompt.contains("Columns: ['age', 'city']"));
        assert!(prompt.ends_with("   age   city\n0   31  Paris\n1    4   Rome"));
    }
}
