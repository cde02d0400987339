// OpenAI-compatible client implementation (HTTP direct, no SDK)

use crate::deferred::DeferredClient;
use crate::error::LlmError;
use crate::retry::parse_retry_after;
use crate::streaming::{parse_chat_sse_stream, StreamEvent};
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::{Content, ContentPart, Message, ToolCall};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Point the client at an OpenAI-compatible base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build chat completion request payload.
    ///
    /// Tool parameters are inserted only when present: sending an empty tool
    /// list with an auto tool-choice is rejected upstream.
    fn build_chat_request(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: &ChatOptions,
        stream: bool,
    ) -> Result<Value> {
        let wire_messages: Vec<Value> = messages
            .into_iter()
            .map(|msg| self.convert_message(msg))
            .collect::<Result<Vec<_>>>()?;

        let mut request = serde_json::json!({
            "model": model,
            "messages": wire_messages,
            "stream": stream,
        });

        let obj = request.as_object_mut().unwrap();

        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }
        if let Some(tools) = &options.tools {
            if !tools.is_empty() {
                obj.insert("tools".to_string(), serde_json::to_value(tools)?);

                if let Some(tool_choice) = &options.tool_choice {
                    obj.insert("tool_choice".to_string(), serde_json::to_value(tool_choice)?);
                }
            }
        }

        Ok(request)
    }

    /// Convert our Message type to the wire format
    fn convert_message(&self, message: Message) -> Result<Value> {
        match message {
            Message::System { content, name } => {
                self.role_message("system", content, name)
            }
            Message::Developer { content, name } => {
                self.role_message("developer", content, name)
            }
            Message::Human { content, name } => {
                self.role_message("user", content, name)
            }
            Message::AI {
                content,
                tool_calls,
                name,
            } => {
                let mut obj = serde_json::json!({
                    "role": "assistant",
                });

                let map = obj.as_object_mut().unwrap();

                if let Some(content) = content {
                    map.insert("content".to_string(), self.convert_content(content)?);
                }

                if let Some(tool_calls) = tool_calls {
                    map.insert("tool_calls".to_string(), serde_json::to_value(tool_calls)?);
                }

                if let Some(name) = name {
                    map.insert("name".to_string(), serde_json::json!(name));
                }

                Ok(obj)
            }
            Message::Tool {
                tool_call_id,
                content,
            } => Ok(serde_json::json!({
                "role": "tool",
                "tool_call_id": tool_call_id,
                "content": self.convert_content(content)?,
            })),
        }
    }

    fn role_message(&self, role: &str, content: Content, name: Option<String>) -> Result<Value> {
        let mut obj = serde_json::json!({
            "role": role,
            "content": self.convert_content(content)?,
        });
        if let Some(name) = name {
            obj.as_object_mut()
                .unwrap()
                .insert("name".to_string(), serde_json::json!(name));
        }
        Ok(obj)
    }

    /// Convert Content to wire format (string or parts array)
    fn convert_content(&self, content: Content) -> Result<Value> {
        match content {
            Content::Text(s) => Ok(serde_json::json!(s)),
            Content::Parts(parts) => {
                let converted: Vec<Value> = parts
                    .into_iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => Ok(serde_json::json!({
                            "type": "text",
                            "text": text,
                        })),
                        ContentPart::ImageUrl { image_url } => Ok(serde_json::json!({
                            "type": "image_url",
                            "image_url": serde_json::to_value(image_url)?,
                        })),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(serde_json::json!(converted))
            }
        }
    }

    /// Non-success statuses become typed errors: 429 is the recoverable
    /// class, everything else carries status and body.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers());
            return Err(LlmError::RateLimited { retry_after }.into());
        }

        let body = response.text().await.unwrap_or_default();
        Err(LlmError::Api {
            status: status.as_u16(),
            body,
        }
        .into())
    }

    fn convert_chat_response(raw: WireChatResponse) -> Result<ChatResponse> {
        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            tool_calls: choice.and_then(|c| c.message.tool_calls.clone()),
            usage: raw.usage.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(raw)?,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload =
            self.build_chat_request(&request.model, request.messages, &request.options, false)?;

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::check_status(response).await?;

        let raw: WireChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        Self::convert_chat_response(raw)
    }

    async fn chat_stream(
        &self,
        request: ChatRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>> {
        let payload =
            self.build_chat_request(&request.model, request.messages, &request.options, true)?;

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        let response = Self::check_status(response).await?;

        Ok(parse_chat_sse_stream(response))
    }
}

#[async_trait]
impl DeferredClient for OpenAIClient {
    async fn submit(&self, request: ChatRequest) -> Result<String> {
        let payload =
            self.build_chat_request(&request.model, request.messages, &request.options, false)?;

        let response = self
            .http_client
            .post(format!("{}/chat/deferred-completions", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to submit deferred request")?;

        let response = Self::check_status(response).await?;

        let submitted: DeferredSubmitResponse = response
            .json()
            .await
            .context("Failed to parse deferred submission")?;

        Ok(submitted.id)
    }

    async fn try_get_result(&self, job_id: &str) -> Result<Option<ChatResponse>> {
        let response = self
            .http_client
            .get(format!(
                "{}/chat/deferred-completions/{}",
                self.base_url, job_id
            ))
            .send()
            .await
            .context("Failed to poll deferred request")?;

        // 202 means the job is pending, not failed.
        if response.status() == StatusCode::ACCEPTED {
            return Ok(None);
        }

        let response = Self::check_status(response).await?;

        let raw: WireChatResponse = response
            .json()
            .await
            .context("Failed to parse deferred result")?;

        Ok(Some(Self::convert_chat_response(raw)?))
    }
}

// ============================================================================
// WIRE RESPONSE TYPES (Chat Completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireChatResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct DeferredSubmitResponse {
    pub id: String,
}
