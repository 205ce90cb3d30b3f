#![allow(dead_code)]

use futures::future::{ready, BoxFuture, FutureExt};
use kwassist::api::{Assistant, AssistantBackend};
use kwassist::config::RunSettings;
use kwassist::error::{KwAssistError, Result};
use kwassist::keywords::{KeywordQuery, KeywordSource, LookupError};
use kwassist::models::{KeywordEntry, Message, Run, Thread, ToolOutput};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const THREAD_ID: &str = "thread_abc";

pub fn fast_settings(max_polls: u32) -> RunSettings {
    RunSettings {
        poll_interval: Duration::ZERO,
        max_polls,
        max_retries: 2,
        retry_delay: Duration::ZERO,
    }
}

pub fn run_with_status(status: &str) -> Run {
    serde_json::from_value(json!({
        "id": "run_1",
        "thread_id": THREAD_ID,
        "status": status,
    }))
    .unwrap()
}

pub fn failed_run(status: &str, message: &str) -> Run {
    serde_json::from_value(json!({
        "id": "run_1",
        "thread_id": THREAD_ID,
        "status": status,
        "last_error": { "code": "server_error", "message": message },
    }))
    .unwrap()
}

/// A `requires_action` run asking for `(call_id, tool_name, arguments)` calls.
pub fn requires_action(calls: &[(&str, &str, Value)]) -> Run {
    let tool_calls: Vec<Value> = calls
        .iter()
        .map(|(id, name, args)| {
            json!({
                "id": id,
                "type": "function",
                "function": { "name": name, "arguments": args.to_string() },
            })
        })
        .collect();

    serde_json::from_value(json!({
        "id": "run_1",
        "thread_id": THREAD_ID,
        "status": "requires_action",
        "required_action": {
            "type": "submit_tool_outputs",
            "submit_tool_outputs": { "tool_calls": tool_calls },
        },
    }))
    .unwrap()
}

pub fn message(id: &str, role: &str, text: &str) -> Message {
    serde_json::from_value(json!({
        "id": id,
        "role": role,
        "content": [{ "type": "text", "text": { "value": text, "annotations": [] } }],
    }))
    .unwrap()
}

#[derive(Default)]
struct FakeState {
    script: VecDeque<Run>,
    last: Option<Run>,
    retrieve_failures: u32,
    create_failures: Vec<u16>,
    events: Vec<String>,
    submissions: Vec<Vec<ToolOutput>>,
    user_messages: Vec<String>,
    created_runs: Vec<(String, Option<String>)>,
    messages: Vec<Message>,
    updated_tools: Vec<(String, usize)>,
    fail_update: bool,
}

/// In-memory assistant service that replays a script of run states.
///
/// Each `retrieve_run` pops the next scripted run; once the script is empty the
/// last one repeats. `create_run` and `submit_tool_outputs` answer `queued`.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new(script: Vec<Run>) -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().script = script.into();
        backend
    }

    pub fn with_retrieve_failures(self, failures: u32) -> Self {
        self.state.lock().unwrap().retrieve_failures = failures;
        self
    }

    /// Fail the next `create_run` calls with these HTTP statuses, in order.
    pub fn with_create_failures(self, statuses: &[u16]) -> Self {
        self.state.lock().unwrap().create_failures = statuses.to_vec();
        self
    }

    pub fn with_messages(self, messages: Vec<Message>) -> Self {
        self.state.lock().unwrap().messages = messages;
        self
    }

    pub fn with_failing_update(self) -> Self {
        self.state.lock().unwrap().fail_update = true;
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn submissions(&self) -> Vec<Vec<ToolOutput>> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn user_messages(&self) -> Vec<String> {
        self.state.lock().unwrap().user_messages.clone()
    }

    pub fn created_runs(&self) -> Vec<(String, Option<String>)> {
        self.state.lock().unwrap().created_runs.clone()
    }

    pub fn updated_tools(&self) -> Vec<(String, usize)> {
        self.state.lock().unwrap().updated_tools.clone()
    }

    pub fn retrieve_count(&self) -> usize {
        self.events().iter().filter(|e| *e == "retrieve").count()
    }

    /// Reply text built from the keywords in the last submitted tool outputs.
    fn reply_from_submissions(state: &FakeState) -> Option<Message> {
        let outputs = state.submissions.last()?;
        let keywords: Vec<String> = outputs
            .iter()
            .filter_map(|o| serde_json::from_str::<Value>(&o.output).ok())
            .filter_map(|v| v["keywords"].as_array().cloned())
            .flatten()
            .filter_map(|k| k["keyword"].as_str().map(|s| s.to_string()))
            .collect();
        Some(message(
            "msg_reply",
            "assistant",
            &format!("Top keywords: {}", keywords.join(", ")),
        ))
    }
}

impl AssistantBackend for FakeBackend {
    fn create_assistant<'a>(
        &'a self,
        _model: &'a str,
        _name: &'a str,
        _instructions: &'a str,
        tools: &'a [Value],
    ) -> BoxFuture<'a, Result<Assistant>> {
        self.state
            .lock()
            .unwrap()
            .updated_tools
            .push(("asst_new".to_string(), tools.len()));
        let assistant = serde_json::from_value(json!({ "id": "asst_new" })).unwrap();
        ready(Ok(assistant)).boxed()
    }

    fn update_assistant_tools<'a>(
        &'a self,
        assistant_id: &'a str,
        tools: &'a [Value],
    ) -> BoxFuture<'a, Result<Assistant>> {
        let mut state = self.state.lock().unwrap();
        if state.fail_update {
            return ready(Err(KwAssistError::ApiError {
                status: 404,
                message: "No assistant found".to_string(),
            }))
            .boxed();
        }
        state
            .updated_tools
            .push((assistant_id.to_string(), tools.len()));
        let assistant = serde_json::from_value(json!({ "id": assistant_id })).unwrap();
        ready(Ok(assistant)).boxed()
    }

    fn create_thread(&self) -> BoxFuture<'_, Result<Thread>> {
        let thread = serde_json::from_value(json!({ "id": THREAD_ID })).unwrap();
        ready(Ok(thread)).boxed()
    }

    fn add_message<'a>(
        &'a self,
        _thread_id: &'a str,
        content: &'a str,
    ) -> BoxFuture<'a, Result<Message>> {
        let mut state = self.state.lock().unwrap();
        state.user_messages.push(content.to_string());
        let id = format!("msg_user_{}", state.user_messages.len());
        ready(Ok(message(&id, "user", content))).boxed()
    }

    fn create_run<'a>(
        &'a self,
        _thread_id: &'a str,
        assistant_id: &'a str,
        instructions: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Run>> {
        let mut state = self.state.lock().unwrap();
        if !state.create_failures.is_empty() {
            let status = state.create_failures.remove(0);
            state.events.push("create_failed".to_string());
            return ready(Err(KwAssistError::ApiError {
                status,
                message: "create run failed".to_string(),
            }))
            .boxed();
        }
        state.events.push("create".to_string());
        state
            .created_runs
            .push((assistant_id.to_string(), instructions.map(|s| s.to_string())));
        ready(Ok(run_with_status("queued"))).boxed()
    }

    fn retrieve_run<'a>(&'a self, _thread_id: &'a str, _run_id: &'a str) -> BoxFuture<'a, Result<Run>> {
        let mut state = self.state.lock().unwrap();
        if state.retrieve_failures > 0 {
            state.retrieve_failures -= 1;
            state.events.push("retrieve_failed".to_string());
            return ready(Err(KwAssistError::ApiError {
                status: 503,
                message: "The server is overloaded".to_string(),
            }))
            .boxed();
        }

        state.events.push("retrieve".to_string());
        let run = match state.script.pop_front() {
            Some(run) => {
                state.last = Some(run.clone());
                run
            }
            None => state
                .last
                .clone()
                .unwrap_or_else(|| run_with_status("in_progress")),
        };
        ready(Ok(run)).boxed()
    }

    fn submit_tool_outputs<'a>(
        &'a self,
        _thread_id: &'a str,
        _run_id: &'a str,
        outputs: &'a [ToolOutput],
    ) -> BoxFuture<'a, Result<Run>> {
        let mut state = self.state.lock().unwrap();
        state.events.push("submit".to_string());
        state.submissions.push(outputs.to_vec());
        ready(Ok(run_with_status("queued"))).boxed()
    }

    fn list_messages<'a>(&'a self, _thread_id: &'a str, _limit: u32) -> BoxFuture<'a, Result<Vec<Message>>> {
        let state = self.state.lock().unwrap();
        let messages = if !state.messages.is_empty() {
            state.messages.clone()
        } else {
            Self::reply_from_submissions(&state).into_iter().collect()
        };
        ready(Ok(messages)).boxed()
    }
}

/// Keyword source returning a fixed answer and remembering every query.
pub struct FakeKeywords {
    answer: std::result::Result<Vec<KeywordEntry>, LookupError>,
    queries: Arc<Mutex<Vec<KeywordQuery>>>,
}

impl FakeKeywords {
    pub fn returning(keywords: &[(&str, u64)]) -> Self {
        Self {
            answer: Ok(keywords
                .iter()
                .map(|(keyword, volume)| KeywordEntry {
                    keyword: keyword.to_string(),
                    estimated_volume: *volume,
                })
                .collect()),
            queries: Arc::default(),
        }
    }

    pub fn failing(error: LookupError) -> Self {
        Self {
            answer: Err(error),
            queries: Arc::default(),
        }
    }

    pub fn queries(&self) -> Arc<Mutex<Vec<KeywordQuery>>> {
        Arc::clone(&self.queries)
    }
}

impl KeywordSource for FakeKeywords {
    fn top_keywords<'a>(
        &'a self,
        query: &'a KeywordQuery,
    ) -> BoxFuture<'a, std::result::Result<Vec<KeywordEntry>, LookupError>> {
        self.queries.lock().unwrap().push(query.clone());
        ready(self.answer.clone()).boxed()
    }
}

/// Keyword source whose lookup panics.
pub struct PanickingKeywords;

impl KeywordSource for PanickingKeywords {
    fn top_keywords<'a>(
        &'a self,
        query: &'a KeywordQuery,
    ) -> BoxFuture<'a, std::result::Result<Vec<KeywordEntry>, LookupError>> {
        async move {
            if query.limit > 0 {
                panic!("keyword backend exploded");
            }
            Ok(Vec::new())
        }
        .boxed()
    }
}
