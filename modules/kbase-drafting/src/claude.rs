//! Minimal Anthropic Messages API client.
//!
//! Carries exactly what the drafting service needs: plain text completion
//! and structured extraction via a forced tool call.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DraftingError;
use crate::schema::StructuredOutput;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const RESPONSE_TOOL: &str = "structured_response";

// =============================================================================
// Client
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env(model: impl Into<String>) -> Result<Self, DraftingError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            DraftingError::Config("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key, model))
    }

    /// Override the API base URL (for proxies and test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask for output conforming to `T`'s schema via a forced tool call.
    pub async fn extract<T: StructuredOutput>(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<T, DraftingError> {
        let mut request = ChatRequest::new(&self.model)
            .system(system)
            .user(user)
            .temperature(0.0);
        request.tools = Some(vec![ToolDefinitionWire {
            name: RESPONSE_TOOL.to_string(),
            description: "Return the structured result.".to_string(),
            input_schema: T::response_schema(),
        }]);
        request.tool_choice = Some(serde_json::json!({
            "type": "tool",
            "name": RESPONSE_TOOL,
        }));

        let response = self.chat(&request).await?;

        for block in &response.content {
            if let ContentBlock::ToolUse { input, .. } = block {
                return serde_json::from_value(input.clone()).map_err(|e| {
                    DraftingError::Parse(format!("response does not match schema: {e}"))
                });
            }
        }

        Err(DraftingError::Parse(
            "no structured output in model response".to_string(),
        ))
    }

    /// Plain text completion.
    pub async fn complete(
        &self,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<String, DraftingError> {
        let request = ChatRequest::new(&self.model)
            .system(system)
            .user(user)
            .temperature(0.0);

        let response = self.chat(&request).await?;
        response
            .text()
            .ok_or_else(|| DraftingError::Api("empty model response".to_string()))
    }

    fn headers(&self) -> Result<HeaderMap, DraftingError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| DraftingError::Config("invalid API key".to_string()))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, DraftingError> {
        let url = format!("{}/messages", self.base_url);

        debug!(model = %request.model, "drafting request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DraftingError::Api(format!("{status}: {body}")));
        }

        Ok(response.json().await?)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: WireRole,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ToolDefinitionWire {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDefinitionWire>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<serde_json::Value>,
}

impl ChatRequest {
    fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 4096,
            messages: Vec::new(),
            system: None,
            temperature: None,
            tools: None,
            tool_choice: None,
        }
    }

    fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    fn user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(WireMessage {
            role: WireRole::User,
            content: content.into(),
        });
        self
    }

    fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        #[allow(dead_code)]
        id: String,
        #[allow(dead_code)]
        name: String,
        input: serde_json::Value,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    content: Vec<ContentBlock>,
}

impl ChatResponse {
    fn text(&self) -> Option<String> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.clone()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_stores_model() {
        let claude = Claude::new("sk-ant-test", "claude-sonnet-4-5-20250929");
        assert_eq!(claude.model(), "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn base_url_override() {
        let claude = Claude::new("sk-ant-test", "m").with_base_url("http://localhost:8080");
        assert_eq!(claude.base_url, "http://localhost:8080");
    }

    #[test]
    fn response_text_skips_tool_blocks() {
        let response = ChatResponse {
            content: vec![
                ContentBlock::ToolUse {
                    id: "t1".into(),
                    name: "structured_response".into(),
                    input: serde_json::json!({}),
                },
                ContentBlock::Text {
                    text: "hello".into(),
                },
            ],
        };
        assert_eq!(response.text().as_deref(), Some("hello"));
    }
}
