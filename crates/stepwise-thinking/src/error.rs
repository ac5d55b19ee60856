use thiserror::Error;

use crate::reflection::ReflectionStrategy;

/// Rejections from the thinking tracker. None of them mutate the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThinkingError {
    #[error("thoughtNumber must be positive.")]
    NonPositiveThoughtNumber,

    #[error("totalThoughts cannot be less than thoughtNumber.")]
    TotalBelowThoughtNumber,

    #[error("revisesThought must be provided for revisions.")]
    MissingRevisionTarget,

    #[error("branchId must be provided when branching.")]
    MissingBranchId,

    #[error("Invalid reflectionStrategy. Choose from {}.", ReflectionStrategy::names())]
    InvalidReflectionStrategy,

    #[error("performanceFeedback required for reflection.")]
    MissingPerformanceFeedback,

    #[error("thought must not be empty.")]
    EmptyThought,

    #[error("Cannot revise thought {0}. Invalid thought number.")]
    RevisionOutOfRange(i64),

    #[error("Cannot revise thought {thought} on branch {branch}. No such thought exists.")]
    RevisionTargetNotFound { thought: i64, branch: String },

    #[error("Cannot branch from thought {0}. Invalid thought number.")]
    BranchOutOfRange(i64),

    #[error("Cannot add thought {got}. Next expected thought is {expected}.")]
    UnexpectedThoughtNumber { got: i64, expected: i64 },
}

impl ThinkingError {
    /// Stable identifier for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NonPositiveThoughtNumber
            | Self::TotalBelowThoughtNumber
            | Self::MissingRevisionTarget
            | Self::MissingBranchId
            | Self::InvalidReflectionStrategy
            | Self::MissingPerformanceFeedback
            | Self::EmptyThought => "invalid_input",
            Self::RevisionOutOfRange(_)
            | Self::RevisionTargetNotFound { .. }
            | Self::BranchOutOfRange(_) => "out_of_range",
            Self::UnexpectedThoughtNumber { .. } => "sequencing",
        }
    }
}

pub type ThinkingResult<T> = Result<T, ThinkingError>;
