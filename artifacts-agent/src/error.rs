use thiserror::Error;

use crate::artifacts::ApiError;

/// Main agent error type
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Action {action} rejected (status {status}): {message}")]
    ActionRejected {
        action: String,
        status: u16,
        message: String,
    },

    #[error("Monster not found: {code}")]
    MonsterNotFound { code: String },

    #[error("No map tile found for {target}")]
    MapNotFound { target: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Engine for {character} has stopped")]
    EngineStopped { character: String },
}

impl AgentError {
    /// Short machine-friendly label used for metrics and log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            AgentError::Api(ApiError::Request(_)) => "request_failed",
            AgentError::Api(ApiError::Status { .. }) => "api_status",
            AgentError::Api(ApiError::InvalidResponse { .. }) => "invalid_response",
            AgentError::ActionRejected { .. } => "action_rejected",
            AgentError::MonsterNotFound { .. } => "monster_not_found",
            AgentError::MapNotFound { .. } => "map_not_found",
            AgentError::Config { .. } => "config_error",
            AgentError::EngineStopped { .. } => "engine_stopped",
        }
    }
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AgentError::ActionRejected {
            action: "fight".to_string(),
            status: 497,
            message: "inventory full".to_string(),
        };
        assert_eq!(err.error_code(), "action_rejected");
        assert_eq!(
            err.to_string(),
            "Action fight rejected (status 497): inventory full"
        );

        let err: AgentError = ApiError::Status {
            status: 503,
            path: "/maps".to_string(),
            message: String::new(),
        }
        .into();
        assert_eq!(err.error_code(), "api_status");
    }
}
