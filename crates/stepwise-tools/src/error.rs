#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("tool already registered: {name}")]
    AlreadyRegistered { name: String },

    #[error("tool not found: {name}")]
    NotFound { name: String },

    #[error("{message}")]
    ExecutionFailed { message: String },
}

impl ToolError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ToolError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        ToolError::ExecutionFailed {
            message: message.into(),
        }
    }
}
