use crate::types::ThinkingSession;

/// Render the session state returned after a regular or branch thought.
pub fn render_summary(
    session_id: &str,
    session: &ThinkingSession,
    next_thought_needed: bool,
) -> String {
    let mut lines = vec![
        format!("Session {session_id} Summary:"),
        format!("Total Thoughts Estimated: {}", session.total_thoughts_estimate),
        "Thoughts:".to_string(),
    ];

    for thought in &session.thoughts {
        let mut line = format!("  {}. {}", thought.number, thought.text);
        if !thought.is_main() {
            line.push_str(&format!(" (Branch: {})", thought.branch));
        }
        if let Some(reflection) = &thought.reflection {
            line.push_str(&format!(" (Reflection: {reflection})"));
        }
        lines.push(line);
    }

    if !session.branches.is_empty() {
        lines.push("Branches:".to_string());
        for (branch, parent) in &session.branches {
            lines.push(format!("  {branch}: Branched from thought {parent}"));
        }
    }

    if !session.reflections.is_empty() {
        lines.push("Reflections:".to_string());
        for entry in &session.reflections {
            lines.push(format!(
                "  Thought {}: {} - {}",
                entry.thought, entry.strategy, entry.note
            ));
        }
    }

    if !session.performance.is_empty() {
        lines.push("Performance:".to_string());
        for entry in &session.performance {
            lines.push(format!("  Thought {}: {}", entry.thought, entry.feedback));
        }
    }

    let next = if next_thought_needed { "Yes" } else { "No" };
    lines.push(format!("Next Thought Needed: {next}"));

    lines.join("\n")
}
