//! Entity recognizer backed by a local Ollama model.
//!
//! The model is asked for JSON output and the reply is parsed into spans. The client is
//! synchronous, so the recognizer must be driven from a blocking context.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::{EntityRecognizer, EntitySpan, NerError};

const ENTITY_LABELS: &str = "PERSON, NORP, FAC, ORG, GPE, LOC, PRODUCT, EVENT, WORK_OF_ART, LAW, LANGUAGE, DATE, TIME, PERCENT, MONEY, QUANTITY, ORDINAL, CARDINAL";

/// Recognizer that prompts an Ollama model for entity spans.
pub struct OllamaRecognizer {
    http: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct EntityList {
    #[serde(default)]
    entities: Vec<EntitySpan>,
}

impl OllamaRecognizer {
    /// Create a client for `model` served at `base_url`.
    pub fn new(base_url: &str, model: &str) -> Result<Self, NerError> {
        let http = Client::builder()
            .user_agent("docmeta/ner")
            .build()
            .map_err(|error| {
                NerError::Unavailable(format!("failed to construct HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    /// Confirm the model is installed, pulling it once when Ollama reports it missing.
    pub fn ensure_model(&self) -> Result<(), NerError> {
        let response = self
            .http
            .post(self.endpoint("show"))
            .json(&json!({ "model": self.model }))
            .send()
            .map_err(|error| self.unreachable(error))?;

        match response.status() {
            status if status.is_success() => {
                tracing::debug!(model = %self.model, "Ollama model already installed");
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                tracing::info!(model = %self.model, "Ollama model missing; pulling");
                self.pull_model()
            }
            status => {
                let body = response.text().unwrap_or_default();
                Err(NerError::Unavailable(format!(
                    "Ollama returned {status} while checking model {}: {body}",
                    self.model
                )))
            }
        }
    }

    fn pull_model(&self) -> Result<(), NerError> {
        let response = self
            .http
            .post(self.endpoint("pull"))
            .json(&json!({ "model": self.model, "stream": false }))
            .send()
            .map_err(|error| self.unreachable(error))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(NerError::Unavailable(format!(
                "failed to pull model {}: Ollama returned {status}: {body}",
                self.model
            )));
        }

        let body: PullResponse = response.json().map_err(|error| {
            NerError::InvalidResponse(format!("failed to decode pull response: {error}"))
        })?;
        if body.status != "success" {
            return Err(NerError::Unavailable(format!(
                "pull of model {} ended with status `{}`",
                self.model, body.status
            )));
        }
        tracing::info!(model = %self.model, "Ollama model pulled");
        Ok(())
    }

    fn unreachable(&self, error: reqwest::Error) -> NerError {
        NerError::Unavailable(format!(
            "failed to reach Ollama at {}: {error}",
            self.base_url
        ))
    }
}

fn prompt_for(text: &str) -> String {
    format!(
        "Extract the named entities from the document below. Use only these labels: \
         {ENTITY_LABELS}. Copy each entity's text exactly as written and list entities in the \
         order they appear. Reply with JSON of the form \
         {{\"entities\": [{{\"text\": \"...\", \"label\": \"...\"}}]}}.\n\nDocument:\n{text}"
    )
}

impl EntityRecognizer for OllamaRecognizer {
    fn name(&self) -> &str {
        "ollama"
    }

    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, NerError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let payload = json!({
            "model": self.model,
            "prompt": prompt_for(text),
            "stream": false,
            "format": "json",
            "options": {
                "temperature": 0,
            }
        });

        let response = self
            .http
            .post(self.endpoint("generate"))
            .json(&payload)
            .send()
            .map_err(|error| self.unreachable(error))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(NerError::Unavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint("generate")
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(NerError::RecognitionFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: GenerateResponse = response.json().map_err(|error| {
            NerError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;
        if !body.done {
            return Err(NerError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        let parsed: EntityList = serde_json::from_str(body.response.trim()).map_err(|error| {
            NerError::InvalidResponse(format!("model output is not entity JSON: {error}"))
        })?;

        Ok(parsed
            .entities
            .into_iter()
            .map(|span| EntitySpan::new(span.text.trim(), span.label.trim().to_uppercase()))
            .filter(|span| !span.text.is_empty() && !span.label.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn recognizer(server: &MockServer) -> OllamaRecognizer {
        OllamaRecognizer::new(&server.base_url(), "llama3.2").expect("client")
    }

    #[test]
    fn parses_entities_from_model_output() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"model": "llama3.2", "format": "json", "stream": false}"#);
            then.status(200).json_body(json!({
                "response": r#"{"entities": [{"text": "Ada Lovelace", "label": "person"}, {"text": " London ", "label": "GPE"}, {"text": "", "label": "ORG"}]}"#,
                "done": true
            }));
        });

        let spans = recognizer(&server)
            .recognize("Ada Lovelace lived in London.")
            .expect("spans");

        mock.assert();
        assert_eq!(
            spans,
            vec![
                EntitySpan::new("Ada Lovelace", "PERSON"),
                EntitySpan::new("London", "GPE"),
            ]
        );
    }

    #[test]
    fn blank_text_skips_the_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500);
        });

        let spans = recognizer(&server).recognize("  \n").expect("spans");
        assert!(spans.is_empty());
        mock.assert_hits(0);
    }

    #[test]
    fn error_status_maps_to_recognition_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("boom");
        });

        let error = recognizer(&server).recognize("text").expect_err("error");
        assert!(matches!(error, NerError::RecognitionFailed(message) if message.contains("500")));
    }

    #[test]
    fn non_json_model_output_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .json_body(json!({ "response": "I found Paris.", "done": true }));
        });

        let error = recognizer(&server).recognize("Paris").expect_err("error");
        assert!(matches!(error, NerError::InvalidResponse(_)));
    }

    #[test]
    fn installed_model_is_not_pulled() {
        let server = MockServer::start();
        let show = server.mock(|when, then| {
            when.method(POST).path("/api/show");
            then.status(200).json_body(json!({ "modelfile": "" }));
        });
        let pull = server.mock(|when, then| {
            when.method(POST).path("/api/pull");
            then.status(200).json_body(json!({ "status": "success" }));
        });

        recognizer(&server).ensure_model().expect("model ready");
        show.assert();
        pull.assert_hits(0);
    }

    #[test]
    fn missing_model_is_pulled_once() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/show");
            then.status(404).body("model not found");
        });
        let pull = server.mock(|when, then| {
            when.method(POST)
                .path("/api/pull")
                .json_body_partial(r#"{"model": "llama3.2", "stream": false}"#);
            then.status(200).json_body(json!({ "status": "success" }));
        });

        recognizer(&server).ensure_model().expect("model pulled");
        pull.assert_hits(1);
    }

    #[test]
    fn unreachable_server_is_unavailable() {
        let recognizer = OllamaRecognizer::new("http://127.0.0.1:9", "llama3.2").expect("client");
        let error = recognizer.ensure_model().expect_err("unreachable");
        assert!(matches!(error, NerError::Unavailable(_)));
    }
}
