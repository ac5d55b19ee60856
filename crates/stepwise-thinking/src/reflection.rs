use serde::{Deserialize, Serialize};
use std::fmt;

/// How a caller asks a thought to be reflected on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionStrategy {
    /// Why the thought went wrong
    ErrorAnalysis,
    AlternativeApproach,
    ClarifyAssumptions,
    /// Decompose into smaller parts
    BreakDownProblem,
}

impl ReflectionStrategy {
    pub const ALL: [ReflectionStrategy; 4] = [
        Self::ErrorAnalysis,
        Self::AlternativeApproach,
        Self::ClarifyAssumptions,
        Self::BreakDownProblem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ErrorAnalysis => "error_analysis",
            Self::AlternativeApproach => "alternative_approach",
            Self::ClarifyAssumptions => "clarify_assumptions",
            Self::BreakDownProblem => "break_down_problem",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Wire names, comma separated, for error messages
    pub fn names() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for ReflectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reflection logged against a submitted thought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionEntry {
    pub thought: i64,
    pub strategy: ReflectionStrategy,
    pub note: String,
}

impl ReflectionEntry {
    pub fn new(thought: i64, strategy: ReflectionStrategy, feedback: &str) -> Self {
        Self {
            thought,
            strategy,
            note: format!("Reflection ({strategy}): Analyzed thought {thought}. Feedback: {feedback}."),
        }
    }
}

/// Caller feedback recorded for an accepted thought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub thought: i64,
    pub feedback: String,
}

/// Whether feedback marks the thought as wrong and due for revision
pub fn flags_incorrect(feedback: &str) -> bool {
    feedback.to_lowercase().contains("incorrect")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names_round_trip_through_serde() {
        for strategy in ReflectionStrategy::ALL {
            let value = serde_json::to_value(strategy).unwrap();
            assert_eq!(value, strategy.as_str());
            assert_eq!(ReflectionStrategy::from_name(strategy.as_str()), Some(strategy));
        }
        assert_eq!(ReflectionStrategy::from_name("bogus"), None);
        assert_eq!(ReflectionStrategy::from_name("ErrorAnalysis"), None);
    }

    #[test]
    fn test_entry_note() {
        let entry = ReflectionEntry::new(2, ReflectionStrategy::ErrorAnalysis, "off by one");
        assert_eq!(
            entry.note,
            "Reflection (error_analysis): Analyzed thought 2. Feedback: off by one."
        );
    }

    #[test]
    fn test_flags_incorrect_ignores_case() {
        assert!(flags_incorrect("Incorrect premise"));
        assert!(flags_incorrect("this was INCORRECT"));
        assert!(!flags_incorrect("correct"));
        assert!(!flags_incorrect("needs work"));
    }
}
