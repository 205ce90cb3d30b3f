use colored::*;
use std::io::{self, Write};

const BOX_RULE: &str = "──────────────────────────────────────────────────────────";
const PREVIEW_CHARS: usize = 300;

/// Diagnostic line on stderr, shown only in verbose mode.
pub fn log_verbose(verbose: bool, tag: &str, message: impl AsRef<str>) {
    if verbose {
        eprintln!("{}", format!("[{}] {}", tag, message.as_ref()).dimmed());
    }
}

/// Truncate long text on a char boundary for display.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

pub fn display_tool_call(name: &str) {
    println!("{}", format!("Calling tool: {}...", name).cyan());
}

/// Display a tool result in a boxed format
pub fn display_tool_result(name: &str, result: &str) {
    print_box(&format!("TOOL: {}", name), &preview(result), false);
}

/// Display a tool error in a boxed format
pub fn display_tool_error(name: &str, error: &str) {
    print_box(&format!("TOOL ERROR: {}", name), error, true);
}

pub fn display_assistant_reply(reply: &str) {
    println!();
    println!("{} {}", "Assistant:".green().bold(), reply.trim_end());
    let _ = io::stdout().flush();
}

pub fn display_turn_failure(reason: &str) {
    eprintln!(
        "{} {}",
        "The assistant could not complete this request.".red(),
        reason.dimmed()
    );
}

pub fn display_notice(message: &str) {
    println!("{}", message.yellow());
}

fn print_box(title: &str, body: &str, is_error: bool) {
    let header = format!("┌─[{}]", title);
    if is_error {
        println!("{}", header.red());
    } else {
        println!("{}", header.cyan());
    }
    for line in body.lines() {
        println!("{} {}", "│".dimmed(), line);
    }
    println!("{}", format!("└{}", BOX_RULE).dimmed());
}
