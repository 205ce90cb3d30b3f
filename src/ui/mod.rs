mod output;

pub use output::{
    display_assistant_reply, display_notice, display_tool_call, display_tool_error,
    display_tool_result, display_turn_failure, log_verbose, preview,
};
