//! Tool foundations: the `Tool` trait, its error type, and the name-based router

mod error;
mod router;
mod traits;

pub use error::ToolError;
pub use router::ToolRouter;
pub use traits::{BoxedTool, Tool, ToolContext};
