use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::reflection::{flags_incorrect, PerformanceEntry, ReflectionEntry};

/// Branch name used for thoughts submitted without a `branchId`
pub const MAIN_BRANCH: &str = "main";

/// One recorded reasoning step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThoughtRecord {
    /// Caller-assigned number; unique on `main`, not across branches
    pub number: i64,
    pub text: String,
    pub branch: String,
    /// Reflection note from the request that last wrote this record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

impl ThoughtRecord {
    pub fn new(number: i64, text: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            branch: branch.into(),
            reflection: None,
        }
    }

    pub fn with_reflection(mut self, reflection: Option<String>) -> Self {
        self.reflection = reflection;
        self
    }

    pub fn is_main(&self) -> bool {
        self.branch == MAIN_BRANCH
    }
}

/// Accumulated state of one thinking session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingSession {
    /// Expected number of thoughts; only ever raised
    pub total_thoughts_estimate: i64,
    /// Insertion-ordered; never shrinks
    pub thoughts: Vec<ThoughtRecord>,
    /// Branch id -> thought number it was forked from, in first-seen order
    pub branches: IndexMap<String, i64>,
    /// Append-only, one entry per accepted reflection
    #[serde(default)]
    pub reflections: Vec<ReflectionEntry>,
    /// Append-only, one entry per accepted thought that carried feedback
    #[serde(default)]
    pub performance: Vec<PerformanceEntry>,
}

impl ThinkingSession {
    pub fn new(total_thoughts_estimate: i64) -> Self {
        Self {
            total_thoughts_estimate,
            thoughts: Vec::new(),
            branches: IndexMap::new(),
            reflections: Vec::new(),
            performance: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    /// Number the next regular thought must carry
    pub fn next_thought_number(&self) -> i64 {
        self.thoughts.len() as i64 + 1
    }

    /// Whether `number` names an existing position in the thought list
    pub fn contains_position(&self, number: i64) -> bool {
        number >= 1 && number <= self.thoughts.len() as i64
    }

    /// Index of the first record with this `(number, branch)` pair
    pub fn find(&self, number: i64, branch: &str) -> Option<usize> {
        self.thoughts
            .iter()
            .position(|t| t.number == number && t.branch == branch)
    }

    pub fn raise_estimate(&mut self, total_thoughts: i64) -> bool {
        if total_thoughts > self.total_thoughts_estimate {
            self.total_thoughts_estimate = total_thoughts;
            true
        } else {
            false
        }
    }
}

/// Arguments of one `sequential_thinking` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtRequest {
    pub thought: String,
    pub next_thought_needed: bool,
    pub thought_number: i64,
    pub total_thoughts: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub is_revision: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revises_thought: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_from_thought: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(default)]
    pub needs_more_thoughts: bool,
    #[serde(default)]
    pub reflection_needed: bool,
    /// Raw strategy name; checked against the known strategies during validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_feedback: Option<String>,
}

impl ThoughtRequest {
    pub fn new(thought: impl Into<String>, thought_number: i64, total_thoughts: i64) -> Self {
        Self {
            thought: thought.into(),
            thought_number,
            total_thoughts,
            ..Default::default()
        }
    }

    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn next_needed(mut self, needed: bool) -> Self {
        self.next_thought_needed = needed;
        self
    }

    pub fn revising(mut self, thought: i64) -> Self {
        self.is_revision = true;
        self.revises_thought = Some(thought);
        self
    }

    pub fn branching(mut self, from_thought: i64, branch_id: impl Into<String>) -> Self {
        self.branch_from_thought = Some(from_thought);
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn on_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    pub fn needs_more(mut self) -> Self {
        self.needs_more_thoughts = true;
        self
    }

    pub fn reflecting(
        mut self,
        strategy: impl Into<String>,
        feedback: impl Into<String>,
    ) -> Self {
        self.reflection_needed = true;
        self.reflection_strategy = Some(strategy.into());
        self.performance_feedback = Some(feedback.into());
        self
    }

    pub fn feedback(mut self, feedback: impl Into<String>) -> Self {
        self.performance_feedback = Some(feedback.into());
        self
    }

    /// Caller-supplied session id, treating an empty string as absent
    pub fn session_key(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Branch id, treating an empty string as absent
    pub fn branch_key(&self) -> Option<&str> {
        self.branch_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Performance feedback, treating an empty string as absent
    pub fn feedback_key(&self) -> Option<&str> {
        self.performance_feedback
            .as_deref()
            .filter(|feedback| !feedback.is_empty())
    }

    /// A reflection whose feedback calls the thought incorrect turns the
    /// request into a revision of its own thought number.
    pub fn forced_revision(&self) -> bool {
        self.reflection_needed && self.feedback_key().is_some_and(flags_incorrect)
    }

    /// Branch the request addresses, `main` when none is given
    pub fn branch_name(&self) -> &str {
        self.branch_key().unwrap_or(MAIN_BRANCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_deserializes_camel_case_with_defaults() {
        let req: ThoughtRequest = serde_json::from_value(json!({
            "thought": "A",
            "nextThoughtNeeded": true,
            "thoughtNumber": 1,
            "totalThoughts": 2
        }))
        .unwrap();

        assert_eq!(req, ThoughtRequest::new("A", 1, 2).next_needed(true));
        assert!(!req.is_revision);
        assert!(!req.needs_more_thoughts);
        assert_eq!(req.branch_name(), MAIN_BRANCH);
        assert!(!req.reflection_needed);
        assert!(req.feedback_key().is_none());
    }

    #[test]
    fn test_request_reflection_fields() {
        let req: ThoughtRequest = serde_json::from_value(json!({
            "thought": "A",
            "nextThoughtNeeded": true,
            "thoughtNumber": 2,
            "totalThoughts": 3,
            "reflectionNeeded": true,
            "reflectionStrategy": "clarify_assumptions",
            "performanceFeedback": "Incorrect unit"
        }))
        .unwrap();

        assert_eq!(
            req,
            ThoughtRequest::new("A", 2, 3)
                .next_needed(true)
                .reflecting("clarify_assumptions", "Incorrect unit")
        );
        assert!(req.forced_revision());
        assert!(!ThoughtRequest::new("A", 1, 1).feedback("incorrect").forced_revision());
    }

    #[test]
    fn test_request_accepts_null_optionals() {
        let req: ThoughtRequest = serde_json::from_value(json!({
            "thought": "A",
            "nextThoughtNeeded": false,
            "thoughtNumber": 1,
            "totalThoughts": 1,
            "sessionId": null,
            "revisesThought": null,
            "branchId": null
        }))
        .unwrap();
        assert!(req.session_key().is_none());
        assert!(req.revises_thought.is_none());
    }

    #[test]
    fn test_empty_ids_count_as_absent() {
        let req = ThoughtRequest::new("A", 1, 1).session("").on_branch("");
        assert!(req.session_key().is_none());
        assert!(req.branch_key().is_none());
        assert_eq!(req.branch_name(), MAIN_BRANCH);
    }

    #[test]
    fn test_session_find_matches_number_and_branch() {
        let mut session = ThinkingSession::new(3);
        session.thoughts.push(ThoughtRecord::new(1, "a", MAIN_BRANCH));
        session.thoughts.push(ThoughtRecord::new(1, "b", "alt"));

        assert_eq!(session.find(1, MAIN_BRANCH), Some(0));
        assert_eq!(session.find(1, "alt"), Some(1));
        assert_eq!(session.find(2, MAIN_BRANCH), None);
        assert!(session.contains_position(2));
        assert!(!session.contains_position(0));
        assert!(!session.contains_position(3));
        assert_eq!(session.next_thought_number(), 3);
    }

    #[test]
    fn test_raise_estimate_only_upward() {
        let mut session = ThinkingSession::new(5);
        assert!(!session.raise_estimate(3));
        assert_eq!(session.total_thoughts_estimate, 5);
        assert!(session.raise_estimate(8));
        assert_eq!(session.total_thoughts_estimate, 8);
    }
}
