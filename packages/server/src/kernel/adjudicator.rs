//! AI adjudicator adapter.
//!
//! The adjudicator is a stateless function from a trial transcript to a
//! verdict. The production implementation calls an OpenRouter-compatible
//! chat-completions endpoint; anything whose winner falls outside the
//! two-side enum, or whose narrative/reasoning is empty, is rejected as an
//! invalid verdict rather than silently coerced.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::domains::matches::Side;

/// Errors from the adjudication call. Transport failures and malformed
/// bodies are distinct kinds: the first may succeed on retry, the second
/// indicates the upstream model misbehaved.
#[derive(Error, Debug)]
pub enum AdjudicationError {
    #[error("adjudicator unreachable: {0}")]
    Transport(String),

    #[error("invalid verdict: {0}")]
    InvalidVerdict(String),
}

/// A validated verdict from the adjudicator.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub winner: Side,
    pub judgment: String,
    pub reasoning: String,
}

/// Stateless transcript-to-verdict function. External and fallible.
#[async_trait]
pub trait Adjudicator: Send + Sync {
    async fn adjudicate(&self, transcript: &str) -> Result<Verdict, AdjudicationError>;
}

const JUDGE_SYSTEM_PROMPT: &str = r#"You are an impartial AI judge presiding over a courtroom trial. Analyze the trial transcript carefully, considering:
1. The strength and relevance of arguments presented by each side
2. The quality and persuasiveness of evidence presented
3. The credibility and relevance of witnesses called
4. Legal reasoning and logical consistency
5. How well each side addressed the opposing arguments

Deliver a fair and well-reasoned judgment.

IMPORTANT: Respond in STRICT JSON format with exactly these fields:
{
  "winner": "prosecution" or "defense",
  "judgment": "A formal judgment (2-3 paragraphs) written as if read aloud in court",
  "reasoning": "A brief explanation of the key factors that influenced the decision"
}

Do NOT include any text outside the JSON object."#;

/// Production adjudicator backed by an OpenRouter-compatible API.
pub struct OpenRouterAdjudicator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct RawVerdict {
    winner: String,
    #[serde(default)]
    judgment: String,
    #[serde(default)]
    reasoning: String,
}

impl OpenRouterAdjudicator {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key,
            model,
        }
    }

    /// Override the API base URL (used for self-hosted gateways and tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl Adjudicator for OpenRouterAdjudicator {
    async fn adjudicate(&self, transcript: &str) -> Result<Verdict, AdjudicationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": JUDGE_SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Please review the following trial transcript and deliver your judgment:\n\n{}",
                        transcript
                    ),
                },
            ],
            "temperature": 0.7,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AdjudicationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AdjudicationError::Transport(format!(
                "upstream returned {}: {}",
                status, detail
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AdjudicationError::InvalidVerdict(format!("malformed body: {}", e)))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| {
                AdjudicationError::InvalidVerdict("no response content from adjudicator".into())
            })?;

        parse_verdict(content)
    }
}

/// Parses and validates the model's JSON verdict payload.
pub fn parse_verdict(content: &str) -> Result<Verdict, AdjudicationError> {
    let raw: RawVerdict = serde_json::from_str(content)
        .map_err(|e| AdjudicationError::InvalidVerdict(format!("unparseable verdict: {}", e)))?;

    let winner: Side = raw
        .winner
        .parse()
        .map_err(|_| AdjudicationError::InvalidVerdict(format!("unknown winner: {}", raw.winner)))?;

    if raw.judgment.trim().is_empty() {
        return Err(AdjudicationError::InvalidVerdict(
            "empty judgment narrative".into(),
        ));
    }
    if raw.reasoning.trim().is_empty() {
        return Err(AdjudicationError::InvalidVerdict("empty reasoning".into()));
    }

    Ok(Verdict {
        winner,
        judgment: raw.judgment,
        reasoning: raw.reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_valid_verdict() {
        let verdict = parse_verdict(
            r#"{"winner": "defense", "judgment": "The court finds for the defense.", "reasoning": "Weak evidence."}"#,
        )
        .unwrap();
        assert_eq!(verdict.winner, Side::Defense);
        assert!(verdict.judgment.contains("defense"));
    }

    #[test]
    fn rejects_unknown_winner() {
        let err = parse_verdict(
            r#"{"winner": "plaintiff", "judgment": "x", "reasoning": "y"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, AdjudicationError::InvalidVerdict(_)));
        assert!(err.to_string().contains("plaintiff"));
    }

    #[test]
    fn rejects_empty_judgment() {
        let err = parse_verdict(r#"{"winner": "prosecution", "judgment": "  ", "reasoning": "y"}"#)
            .unwrap_err();
        assert!(matches!(err, AdjudicationError::InvalidVerdict(_)));
    }

    #[test]
    fn rejects_empty_reasoning() {
        let err = parse_verdict(r#"{"winner": "prosecution", "judgment": "x", "reasoning": ""}"#)
            .unwrap_err();
        assert!(matches!(err, AdjudicationError::InvalidVerdict(_)));
    }

    #[test]
    fn rejects_non_json_body() {
        let err = parse_verdict("The winner is the prosecution.").unwrap_err();
        assert!(matches!(err, AdjudicationError::InvalidVerdict(_)));
    }
}
