//! Sequential thinking: an ordered, revisable, branchable record of reasoning
//! steps submitted one call at a time and correlated by session id.
//!
//! - [`SessionStore`] holds every session for the life of the process
//! - [`ThinkingTracker`] validates and applies one [`ThoughtRequest`]
//! - [`SequentialThinkingTool`] exposes the tracker as the `sequential_thinking` tool

mod error;
mod reflection;
mod store;
mod summary;
mod tool;
mod tracker;
mod types;

pub use error::{ThinkingError, ThinkingResult};
pub use reflection::{PerformanceEntry, ReflectionEntry, ReflectionStrategy};
pub use store::SessionStore;
pub use summary::render_summary;
pub use tool::{SequentialThinkingTool, SEQUENTIAL_THINKING};
pub use tracker::{ThinkingTracker, ThoughtAction, ThoughtReceipt};
pub use types::{ThinkingSession, ThoughtRecord, ThoughtRequest, MAIN_BRANCH};
