//! Cooldown-governed action requests.

use std::sync::Arc;

use serde_json::Value;
use strum::Display;
use tracing::{debug, warn};

use super::cooldown::{CooldownGate, format_expiration};
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::error::AgentResult;

/// Classification of an action response status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionStatus {
    Success,
    /// Acted before the previous cooldown expired (499)
    CooldownViolation,
    /// Another action is still being processed (486)
    InProgress,
    /// Already at the requested destination (490)
    AlreadyThere,
    Rejected(u16),
    ServerError(u16),
}

impl ActionStatus {
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => ActionStatus::Success,
            486 => ActionStatus::InProgress,
            490 => ActionStatus::AlreadyThere,
            499 => ActionStatus::CooldownViolation,
            500..=599 => ActionStatus::ServerError(code),
            _ => ActionStatus::Rejected(code),
        }
    }

    pub fn is_success(self) -> bool {
        self == ActionStatus::Success
    }

    /// Failures that waiting out the cooldown can fix
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            ActionStatus::CooldownViolation | ActionStatus::InProgress | ActionStatus::ServerError(_)
        )
    }
}

/// Outcome of a single action, body passed through unmodified
#[derive(Debug, Clone)]
pub struct ActionResponse {
    pub status: ActionStatus,
    pub code: u16,
    pub body: Value,
}

impl ActionResponse {
    pub fn message(&self) -> String {
        self.body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

impl From<ApiResponse> for ActionResponse {
    fn from(response: ApiResponse) -> Self {
        Self {
            status: ActionStatus::from_code(response.status),
            code: response.status,
            body: response.body,
        }
    }
}

/// Extract `data.cooldown.expiration` from a response body
pub fn cooldown_expiration(body: &Value) -> Option<&str> {
    body.pointer("/data/cooldown/expiration")
        .and_then(Value::as_str)
}

/// Issues actions for one character and keeps its cooldown gate current.
pub struct ActionClient<T> {
    transport: Arc<T>,
    gate: CooldownGate,
    last_failed: bool,
}

impl<T: Transport> ActionClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            gate: CooldownGate::new(),
            last_failed: false,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn gate(&self) -> &CooldownGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut CooldownGate {
        &mut self.gate
    }

    /// Perform one action.
    ///
    /// A successful previous action never waits here: the server already held
    /// the request until its cooldown passed. After a failure, or when the
    /// server refuses this request for a recoverable reason, the known cooldown
    /// is waited out and the same request is re-issued once.
    pub async fn perform(&mut self, request: ApiRequest) -> AgentResult<ActionResponse> {
        if self.last_failed && self.gate.is_known() {
            self.gate.await_ready().await;
        }

        let mut response = self.issue(&request).await?;

        if response.status.is_recoverable() && self.gate.is_known() {
            warn!(
                path = %request.path,
                status = response.code,
                "Action refused, retrying once after cooldown"
            );
            metrics::counter!("artifacts_action_retries_total").increment(1);
            self.gate.await_ready().await;
            response = self.issue(&request).await?;
        }

        self.last_failed = !response.status.is_success();
        metrics::counter!(
            "artifacts_actions_total",
            "action" => action_label(&request.path),
            "status" => response.status.to_string()
        )
        .increment(1);

        Ok(response)
    }

    async fn issue(&mut self, request: &ApiRequest) -> AgentResult<ActionResponse> {
        let raw = match self.transport.send(request).await {
            Ok(raw) => raw,
            Err(e) => {
                self.last_failed = true;
                return Err(e.into());
            }
        };
        self.gate.record(cooldown_expiration(&raw.body));
        debug!(
            path = %request.path,
            status = raw.status,
            cooldown_until = ?self.gate.expires_at().map(format_expiration),
            "Action issued"
        );
        Ok(raw.into())
    }
}

/// `/my/hero/action/bank/deposit` -> `bank/deposit`
fn action_label(path: &str) -> String {
    path.split_once("/action/")
        .map(|(_, action)| action)
        .unwrap_or(path)
        .to_string()
}
