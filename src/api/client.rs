use super::backend::AssistantBackend;
use super::models::{
    Assistant, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    SubmitToolOutputsRequest, UpdateAssistantRequest,
};
use super::response::api_error_message;
use crate::error::{KwAssistError, Result};
use crate::models::{Message, MessageList, Role, Run, Thread, ToolOutput};
use crate::ui::log_verbose;
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP client for the hosted assistants API (v2).
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: String,
    verbose: bool,
}

impl AssistantClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration, verbose: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                KwAssistError::ConfigError(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("OpenAI-Beta", HeaderValue::from_static("assistants=v2"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            verbose,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log_verbose(self.verbose, "api", format!("POST {}", path));
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        log_verbose(self.verbose, "api", format!("GET {}", path));
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(KwAssistError::ApiError {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

impl AssistantBackend for AssistantClient {
    fn create_assistant<'a>(
        &'a self,
        model: &'a str,
        name: &'a str,
        instructions: &'a str,
        tools: &'a [Value],
    ) -> BoxFuture<'a, Result<Assistant>> {
        let body = CreateAssistantRequest {
            model,
            name,
            instructions,
            tools,
        };
        async move { self.post_json("/assistants", &body).await }.boxed()
    }

    fn update_assistant_tools<'a>(
        &'a self,
        assistant_id: &'a str,
        tools: &'a [Value],
    ) -> BoxFuture<'a, Result<Assistant>> {
        async move {
            self.post_json(
                &format!("/assistants/{}", assistant_id),
                &UpdateAssistantRequest { tools },
            )
            .await
        }
        .boxed()
    }

    fn create_thread(&self) -> BoxFuture<'_, Result<Thread>> {
        async move { self.post_json("/threads", &json!({})).await }.boxed()
    }

    fn add_message<'a>(
        &'a self,
        thread_id: &'a str,
        content: &'a str,
    ) -> BoxFuture<'a, Result<Message>> {
        async move {
            self.post_json(
                &format!("/threads/{}/messages", thread_id),
                &CreateMessageRequest {
                    role: Role::User,
                    content,
                },
            )
            .await
        }
        .boxed()
    }

    fn create_run<'a>(
        &'a self,
        thread_id: &'a str,
        assistant_id: &'a str,
        instructions: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Run>> {
        async move {
            self.post_json(
                &format!("/threads/{}/runs", thread_id),
                &CreateRunRequest {
                    assistant_id,
                    instructions,
                },
            )
            .await
        }
        .boxed()
    }

    fn retrieve_run<'a>(&'a self, thread_id: &'a str, run_id: &'a str) -> BoxFuture<'a, Result<Run>> {
        async move {
            self.get_json(&format!("/threads/{}/runs/{}", thread_id, run_id), &[])
                .await
        }
        .boxed()
    }

    fn submit_tool_outputs<'a>(
        &'a self,
        thread_id: &'a str,
        run_id: &'a str,
        outputs: &'a [ToolOutput],
    ) -> BoxFuture<'a, Result<Run>> {
        async move {
            self.post_json(
                &format!("/threads/{}/runs/{}/submit_tool_outputs", thread_id, run_id),
                &SubmitToolOutputsRequest {
                    tool_outputs: outputs,
                },
            )
            .await
        }
        .boxed()
    }

    fn list_messages<'a>(
        &'a self,
        thread_id: &'a str,
        limit: u32,
    ) -> BoxFuture<'a, Result<Vec<Message>>> {
        async move {
            let list: MessageList = self
                .get_json(
                    &format!("/threads/{}/messages", thread_id),
                    &[("order", "desc".to_string()), ("limit", limit.to_string())],
                )
                .await?;
            Ok(list.data)
        }
        .boxed()
    }
}
