mod keywords;
mod run;
mod thread;
mod tool;

pub use keywords::KeywordEntry;
pub use run::{RequiredAction, Run, RunLastError, RunStatus, SubmitToolOutputs};
pub use thread::{Message, MessageContent, MessageList, Role, TextContent, Thread};
pub use tool::{FunctionCall, ToolCall, ToolOutput};
