use stepwise_config::{BranchNumbering, RevisionFallback, ThinkingSettings};
use uuid::Uuid;

use crate::error::{ThinkingError, ThinkingResult};
use crate::reflection::{PerformanceEntry, ReflectionEntry, ReflectionStrategy};
use crate::store::SessionStore;
use crate::summary::render_summary;
use crate::types::{ThinkingSession, ThoughtRecord, ThoughtRequest, MAIN_BRANCH};

/// What an accepted request did to its session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThoughtAction {
    Revised,
    Branched,
    Appended,
}

/// Result of an accepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThoughtReceipt {
    /// Session the request was applied to, minted if the caller gave none
    pub session_id: String,
    pub action: ThoughtAction,
    /// Text returned to the caller
    pub message: String,
}

/// Resolved mutation, decided before the session is touched
enum Step {
    Revise { index: usize },
    Branch { branch_id: String, parent: i64 },
    Append,
}

/// Applies thought requests to sessions held in a [`SessionStore`]
#[derive(Clone)]
pub struct ThinkingTracker {
    store: SessionStore,
    settings: ThinkingSettings,
}

impl ThinkingTracker {
    pub fn new(store: SessionStore, settings: ThinkingSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn settings(&self) -> ThinkingSettings {
        self.settings
    }

    /// Validate and apply one request.
    ///
    /// The store lock is held from the range checks through the mutation, so
    /// concurrent calls on one session cannot interleave. A rejected request
    /// leaves the store untouched, including not creating the session.
    pub async fn submit(&self, request: ThoughtRequest) -> ThinkingResult<ThoughtReceipt> {
        let strategy = validate(&request)?;

        let request = if request.forced_revision() {
            let target = request.thought_number;
            tracing::debug!(thought_number = target, "feedback marks thought incorrect, revising");
            request.revising(target)
        } else {
            request
        };

        let session_id = request
            .session_key()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut sessions = self.store.lock().await;

        let step = self
            .plan(sessions.get(&session_id), &request)
            .inspect_err(|e| {
                tracing::debug!(
                    session_id = %session_id,
                    thought_number = request.thought_number,
                    kind = e.kind(),
                    error = %e,
                    "rejected thought"
                );
            })?;

        let session = sessions.entry(session_id.clone()).or_insert_with(|| {
            tracing::debug!(session_id = %session_id, "created thinking session");
            ThinkingSession::new(request.total_thoughts)
        });

        Ok(apply(session_id, session, request, step, strategy))
    }

    fn plan(
        &self,
        session: Option<&ThinkingSession>,
        request: &ThoughtRequest,
    ) -> ThinkingResult<Step> {
        let in_range = |n: i64| session.is_some_and(|s| s.contains_position(n));
        let expected = session.map_or(1, ThinkingSession::next_thought_number);

        if request.is_revision {
            let target = request
                .revises_thought
                .ok_or(ThinkingError::MissingRevisionTarget)?;
            if !in_range(target) {
                return Err(ThinkingError::RevisionOutOfRange(target));
            }

            let branch = request.branch_name();
            if let Some(index) = session.and_then(|s| s.find(target, branch)) {
                return Ok(Step::Revise { index });
            }

            match self.settings.revision_fallback {
                RevisionFallback::Reject => {
                    return Err(ThinkingError::RevisionTargetNotFound {
                        thought: target,
                        branch: branch.to_string(),
                    });
                }
                RevisionFallback::Append => {}
            }
        }

        if let Some(parent) = request.branch_from_thought {
            let branch_id = request.branch_key().ok_or(ThinkingError::MissingBranchId)?;
            if !in_range(parent) {
                return Err(ThinkingError::BranchOutOfRange(parent));
            }
            if self.settings.branch_numbering == BranchNumbering::Sequential
                && request.thought_number != expected
            {
                return Err(ThinkingError::UnexpectedThoughtNumber {
                    got: request.thought_number,
                    expected,
                });
            }
            return Ok(Step::Branch {
                branch_id: branch_id.to_string(),
                parent,
            });
        }

        if request.thought_number != expected {
            return Err(ThinkingError::UnexpectedThoughtNumber {
                got: request.thought_number,
                expected,
            });
        }

        Ok(Step::Append)
    }
}

/// Input checks that need no session state, in reporting order. Returns the
/// reflection strategy when one was requested.
fn validate(request: &ThoughtRequest) -> ThinkingResult<Option<ReflectionStrategy>> {
    if request.thought_number < 1 {
        return Err(ThinkingError::NonPositiveThoughtNumber);
    }
    if request.total_thoughts < request.thought_number {
        return Err(ThinkingError::TotalBelowThoughtNumber);
    }
    if request.is_revision && request.revises_thought.is_none() {
        return Err(ThinkingError::MissingRevisionTarget);
    }
    if request.branch_from_thought.is_some() && request.branch_key().is_none() {
        return Err(ThinkingError::MissingBranchId);
    }

    let strategy = if request.reflection_needed {
        let strategy = request
            .reflection_strategy
            .as_deref()
            .and_then(ReflectionStrategy::from_name)
            .ok_or(ThinkingError::InvalidReflectionStrategy)?;
        if request.feedback_key().is_none() {
            return Err(ThinkingError::MissingPerformanceFeedback);
        }
        Some(strategy)
    } else {
        None
    };

    if request.thought.trim().is_empty() {
        return Err(ThinkingError::EmptyThought);
    }
    Ok(strategy)
}

fn apply(
    session_id: String,
    session: &mut ThinkingSession,
    request: ThoughtRequest,
    step: Step,
    strategy: Option<ReflectionStrategy>,
) -> ThoughtReceipt {
    let feedback = request.feedback_key().map(str::to_string);
    let reflection = strategy
        .zip(feedback.as_deref())
        .map(|(strategy, feedback)| ReflectionEntry::new(request.thought_number, strategy, feedback));
    let note = reflection.as_ref().map(|entry| entry.note.clone());

    let ThoughtRequest {
        thought,
        thought_number,
        total_thoughts,
        next_thought_needed,
        needs_more_thoughts,
        ..
    } = request;

    if let Some(entry) = reflection {
        tracing::debug!(
            session_id = %session_id,
            thought_number,
            strategy = %entry.strategy,
            "recorded reflection"
        );
        session.reflections.push(entry);
    }

    let (action, header) = match step {
        Step::Revise { index } => {
            let record = &mut session.thoughts[index];
            record.text = thought;
            record.reflection = note.clone();
            let number = record.number;
            tracing::debug!(
                session_id = %session_id,
                thought_number = number,
                branch = %record.branch,
                "revised thought"
            );

            let mut message = format!(
                "Revised thought {} in session {}: {}",
                number, session_id, record.text
            );
            if let Some(note) = &note {
                message.push('\n');
                message.push_str(note);
            }
            if let Some(feedback) = feedback {
                session.performance.push(PerformanceEntry {
                    thought: number,
                    feedback,
                });
            }
            return ThoughtReceipt {
                session_id,
                action: ThoughtAction::Revised,
                message,
            };
        }
        Step::Branch { branch_id, parent } => {
            let header = format!(
                "Added thought {thought_number} to branch {branch_id} from thought {parent} in session {session_id}"
            );
            session.branches.insert(branch_id.clone(), parent);
            session.thoughts.push(
                ThoughtRecord::new(thought_number, thought, branch_id).with_reflection(note),
            );
            (ThoughtAction::Branched, Some(header))
        }
        Step::Append => {
            session.thoughts.push(
                ThoughtRecord::new(thought_number, thought, MAIN_BRANCH).with_reflection(note),
            );
            (ThoughtAction::Appended, None)
        }
    };

    if let Some(feedback) = feedback {
        session.performance.push(PerformanceEntry {
            thought: thought_number,
            feedback,
        });
    }

    if needs_more_thoughts && session.raise_estimate(total_thoughts) {
        tracing::debug!(
            session_id = %session_id,
            total_thoughts,
            "raised total thoughts estimate"
        );
    }

    tracing::debug!(
        session_id = %session_id,
        thought_number,
        action = ?action,
        thoughts = session.len(),
        "accepted thought"
    );

    let summary = render_summary(&session_id, session, next_thought_needed);
    let message = match header {
        Some(header) => format!("{header}\n{summary}"),
        None => summary,
    };

    ThoughtReceipt {
        session_id,
        action,
        message,
    }
}
