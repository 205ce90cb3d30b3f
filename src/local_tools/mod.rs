mod registry;
mod tools;

pub use registry::{LocalTool, ToolRegistry};
pub use tools::{format_tools_for_llm, handle_top_keywords};
