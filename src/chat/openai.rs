//! OpenAI-compatible chat completion provider
//!
//! Sends `POST {base_url}/chat/completions` with the request's two messages
//! and returns `choices[0].message.content` untouched.

use crate::chat::provider::CompletionProvider;
use crate::chat::types::{ChatMessage, ChatRequest};
use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Chat completion client for the OpenAI API and compatible endpoints
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiProvider {
    /// Create a provider from configuration and an already-resolved key
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn body<'a>(&'a self, request: &'a ChatRequest) -> CompletionBody<'a> {
        CompletionBody {
            model: &self.model,
            messages: request.messages(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, request: &ChatRequest) -> std::result::Result<String, ProviderError> {
        tracing::debug!(
            "Sending chat completion request to {} (model={})",
            self.base_url,
            self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = body_or_reason(response.text().await);
            return Err(status_error(status, &body));
        }

        let completion: CompletionResponse = response.json().await?;
        completion.into_text()
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl CompletionResponse {
    fn into_text(self) -> std::result::Result<String, ProviderError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::new("provider returned no choices"))?;
        choice
            .message
            .content
            .ok_or_else(|| ProviderError::new("provider returned a choice without text content"))
    }
}

/// Standard `{"error": {"message": ...}}` envelope
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Error body text, or why it could not be read
fn body_or_reason<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| {
        tracing::debug!("Failed to read error body: {}", e);
        format!("<unreadable error body: {}>", e)
    })
}

fn status_error(status: StatusCode, body: &str) -> ProviderError {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => "authentication failed",
        StatusCode::TOO_MANY_REQUESTS => "rate limited",
        s if s.is_server_error() => "provider unavailable",
        _ => "request rejected",
    };
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if detail.is_empty() {
        ProviderError::new(format!("{} (HTTP {})", kind, status.as_u16()))
    } else {
        ProviderError::new(format!("{} (HTTP {}): {}", kind, status.as_u16(), detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::{header, HeaderMap, StatusCode as AxumStatus},
        response::IntoResponse,
        routing::post,
        Router,
    };
    use std::sync::{Arc, Mutex};

    /// Recorded (authorization header, JSON body) pairs
    type Seen = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

    #[derive(Clone)]
    struct FakeApi {
        status: AxumStatus,
        body: String,
        delay: Duration,
        seen: Seen,
    }

    async fn handle(
        State(api): State<FakeApi>,
        headers: HeaderMap,
        body: String,
    ) -> impl IntoResponse {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let json = serde_json::from_str(&body).unwrap_or(serde_json::Value::Null);
        api.seen.lock().unwrap().push((auth, json));
        tokio::time::sleep(api.delay).await;
        (
            api.status,
            [(header::CONTENT_TYPE, "application/json")],
            api.body.clone(),
        )
    }

    /// Serve canned responses on an ephemeral port; returns the base URL
    async fn serve(status: AxumStatus, body: &str, delay: Duration) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/v1/chat/completions", post(handle))
            .with_state(FakeApi {
                status,
                body: body.to_string(),
                delay,
                seen: seen.clone(),
            });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/v1", addr), seen)
    }

    fn provider(base_url: &str, config: ProviderConfig) -> OpenAiProvider {
        let config = ProviderConfig {
            base_url: base_url.to_string(),
            ..config
        };
        OpenAiProvider::new(&config, "sk-test-key".to_string()).unwrap()
    }

    fn completion(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_complete_sends_messages_and_returns_text() {
        let reply = "## Salmon\n\nTry a *Pinot Noir*.  ";
        let (url, seen) = serve(AxumStatus::OK, &completion(reply), Duration::ZERO).await;
        let provider = provider(&url, ProviderConfig::default());

        let request = ChatRequest::new("You are a chef.", "What wine pairs with salmon?");
        let text = provider.complete(&request).await.unwrap();
        assert_eq!(text, reply);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test-key"));
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(
            body["messages"],
            serde_json::json!([
                {"role": "system", "content": "You are a chef."},
                {"role": "user", "content": "What wine pairs with salmon?"}
            ])
        );
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn test_sampling_parameters_are_sent_when_configured() {
        let (url, seen) = serve(AxumStatus::OK, &completion("ok"), Duration::ZERO).await;
        let config = ProviderConfig {
            model: "gpt-4o-mini".to_string(),
            temperature: Some(0.5),
            max_tokens: Some(128),
            ..Default::default()
        };
        let provider = provider(&format!("{}/", url), config);
        assert_eq!(provider.model(), "gpt-4o-mini");

        provider.complete(&ChatRequest::new("sys", "hi")).await.unwrap();

        let seen = seen.lock().unwrap();
        let body = &seen[0].1;
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["max_tokens"], 128);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_provider_error() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let (url, _seen) = serve(AxumStatus::UNAUTHORIZED, body, Duration::ZERO).await;
        let err = provider(&url, ProviderConfig::default())
            .complete(&ChatRequest::new("sys", "hi"))
            .await
            .unwrap_err();
        assert_eq!(
            err.message(),
            "authentication failed (HTTP 401): Incorrect API key provided"
        );
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_provider_error() {
        let (url, _seen) = serve(AxumStatus::TOO_MANY_REQUESTS, "", Duration::ZERO).await;
        let err = provider(&url, ProviderConfig::default())
            .complete(&ChatRequest::new("sys", "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "rate limited (HTTP 429)");
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept() {
        let (url, _seen) =
            serve(AxumStatus::BAD_GATEWAY, "upstream exploded\n", Duration::ZERO).await;
        let err = provider(&url, ProviderConfig::default())
            .complete(&ChatRequest::new("sys", "hi"))
            .await
            .unwrap_err();
        assert_eq!(
            err.message(),
            "provider unavailable (HTTP 502): upstream exploded"
        );
    }

    #[tokio::test]
    async fn test_empty_choices_is_provider_error() {
        let (url, _seen) = serve(AxumStatus::OK, r#"{"choices":[]}"#, Duration::ZERO).await;
        let err = provider(&url, ProviderConfig::default())
            .complete(&ChatRequest::new("sys", "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "provider returned no choices");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_provider_error() {
        let (url, _seen) = serve(AxumStatus::OK, "not json", Duration::ZERO).await;
        let err = provider(&url, ProviderConfig::default())
            .complete(&ChatRequest::new("sys", "hi"))
            .await
            .unwrap_err();
        assert!(err.message().starts_with("could not decode provider response"));
    }

    #[tokio::test]
    async fn test_timeout_is_provider_error() {
        let (url, _seen) =
            serve(AxumStatus::OK, &completion("late"), Duration::from_secs(3)).await;
        let config = ProviderConfig {
            timeout_secs: 1,
            ..Default::default()
        };
        let err = provider(&url, config)
            .complete(&ChatRequest::new("sys", "hi"))
            .await
            .unwrap_err();
        assert!(err.message().starts_with("request timed out"), "{}", err);
    }

    #[tokio::test]
    async fn test_connection_refused_is_provider_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{}/v1", addr), ProviderConfig::default())
            .complete(&ChatRequest::new("sys", "hi"))
            .await
            .unwrap_err();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_status_error_forbidden() {
        let err = status_error(StatusCode::FORBIDDEN, "  ");
        assert_eq!(err.message(), "authentication failed (HTTP 403)");
    }

    #[test]
    fn test_unreadable_error_body_is_reported() {
        let read: std::result::Result<String, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset mid-body",
        ));
        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, &body_or_reason(read));
        assert_eq!(
            err.message(),
            "provider unavailable (HTTP 503): <unreadable error body: connection reset mid-body>"
        );
        assert_eq!(body_or_reason::<std::io::Error>(Ok("quota".to_string())), "quota");
    }

    #[test]
    fn test_null_content_is_provider_error() {
        let response: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert!(response.into_text().is_err());
    }
}
