//! In-memory provider driven by a script of canned replies.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::{ModelProvider, ModelRequest, ModelResponse};
use crate::error::WeftError;
use crate::types::ToolUse;

type Responder = dyn Fn(&ModelRequest) -> Result<ModelResponse, WeftError> + Send + Sync;

enum Step {
    Reply(ModelResponse),
    Fail(WeftError),
    Delay(Duration, ModelResponse),
}

/// Provider that replays queued responses and records every request.
///
/// Either a queue of steps or a responder function drives it. An empty
/// queue answers with `InvalidResponse`.
pub struct ScriptedProvider {
    name: String,
    steps: Mutex<VecDeque<Step>>,
    responder: Option<Arc<Responder>>,
    requests: Mutex<Vec<ModelRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Mutex::new(VecDeque::new()),
            responder: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Compute each reply from the request instead of a queue.
    pub fn from_fn<F>(name: impl Into<String>, responder: F) -> Self
    where
        F: Fn(&ModelRequest) -> Result<ModelResponse, WeftError> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Arc::new(responder)),
            ..Self::new(name)
        }
    }

    pub fn push_response(&self, response: ModelResponse) -> &Self {
        lock(&self.steps).push_back(Step::Reply(response));
        self
    }

    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        self.push_response(ModelResponse::text(text))
    }

    /// Queue a response requesting one tool call.
    pub fn push_tool_call(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> &Self {
        self.push_response(ModelResponse::tool_uses(vec![ToolUse {
            id: id.into(),
            name: name.into(),
            arguments,
        }]))
    }

    pub fn push_error(&self, error: WeftError) -> &Self {
        lock(&self.steps).push_back(Step::Fail(error));
        self
    }

    /// Queue a response delivered after `delay`.
    pub fn push_delayed(&self, delay: Duration, response: ModelResponse) -> &Self {
        lock(&self.steps).push_back(Step::Delay(delay, response));
        self
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<ModelRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn remaining(&self) -> usize {
        lock(&self.steps).len()
    }
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("name", &self.name)
            .field("remaining", &self.remaining())
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, WeftError> {
        lock(&self.requests).push(request.clone());

        if let Some(responder) = &self.responder {
            return responder(request);
        }

        let step = lock(&self.steps).pop_front();
        match step {
            Some(Step::Reply(response)) => Ok(response),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Delay(delay, response)) => {
                tokio::time::sleep(delay).await;
                Ok(response)
            }
            None => Err(WeftError::InvalidResponse(format!(
                "scripted provider '{}' has no more responses",
                self.name
            ))),
        }
    }
}
