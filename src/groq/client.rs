use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use super::error::OracleError;
use super::types::{ChatRequest, ChatResponse};

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything that can answer a chat request.
///
/// The workflow steps take this seam instead of a concrete client so tests
/// can stand in for the real API.
pub trait ChatSender {
    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, OracleError>> + Send;
}

pub struct GroqClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client: build_http_client(REQUEST_TIMEOUT),
            base_url,
        }
    }

    /// Replace the request timeout on an already constructed client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }
}

fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .build()
        .expect("failed to build HTTP client")
}

impl ChatSender for GroqClient {
    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, OracleError> {
        let response = match self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(OracleError::Timeout),
            Err(e) => return Err(OracleError::Network(e)),
        };

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(OracleError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(OracleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = match response.json::<ChatResponse>().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return Err(OracleError::Timeout),
            Err(e) => return Err(OracleError::Network(e)),
        };
        Ok(body)
    }
}
