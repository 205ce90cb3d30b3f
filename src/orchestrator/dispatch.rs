use crate::local_tools::ToolRegistry;
use crate::models::{ToolCall, ToolOutput};
use crate::ui::{display_tool_call, display_tool_error, display_tool_result, log_verbose, preview};
use futures::FutureExt;
use serde_json::{json, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Execute every call independently, producing exactly one output per call id.
pub async fn dispatch_tool_calls(
    registry: &ToolRegistry,
    calls: &[ToolCall],
    verbose: bool,
) -> Vec<ToolOutput> {
    let mut outputs = Vec::with_capacity(calls.len());

    for call in calls {
        let output = execute_tool_call(registry, call, verbose).await;
        outputs.push(ToolOutput {
            tool_call_id: call.id.clone(),
            output,
        });
    }

    outputs
}

async fn execute_tool_call(registry: &ToolRegistry, call: &ToolCall, verbose: bool) -> String {
    let name = call.function.name.as_str();
    log_verbose(
        verbose,
        "tools",
        format!(
            "Selected tool: '{}' with args: {}",
            name,
            preview(&call.function.arguments)
        ),
    );

    if call.tool_type != "function" {
        let message = format!(
            "Unsupported tool call type '{}' for '{}'",
            call.tool_type, name
        );
        display_tool_error(name, &message);
        return error_output(&message);
    }

    let Some(tool) = registry.get(name) else {
        let message = format!("Tool '{}' not found", name);
        display_tool_error(name, &message);
        return error_output(&message);
    };

    let arguments: Value = if call.function.arguments.trim().is_empty() {
        json!({})
    } else {
        match serde_json::from_str(&call.function.arguments) {
            Ok(arguments) => arguments,
            Err(err) => {
                let message = format!("Failed to parse arguments for tool '{}': {}", name, err);
                display_tool_error(name, &message);
                return error_output(&message);
            }
        }
    };

    display_tool_call(name);

    match AssertUnwindSafe(registry.call(tool, &arguments))
        .catch_unwind()
        .await
    {
        Ok(Ok(result)) => {
            display_tool_result(name, &result);
            result
        }
        Ok(Err(message)) => {
            display_tool_error(name, &message);
            error_output(&message)
        }
        Err(panic) => {
            let message = format!(
                "Tool '{}' failed unexpectedly: {}",
                name,
                panic_message(panic.as_ref())
            );
            display_tool_error(name, &message);
            error_output(&message)
        }
    }
}

/// Output text for a failed call, in the same JSON shape the model sees for successes.
pub fn error_output(message: &str) -> String {
    json!({ "error": message }).to_string()
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
