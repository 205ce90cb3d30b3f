use clap::Parser;
use colored::*;
use std::process;
use tokio::io::BufReader;

use kwassist::api::AssistantClient;
use kwassist::cli::Args;
use kwassist::config::{Config, Credentials};
use kwassist::conversation::{ensure_assistant, run_interactive, Conversation};
use kwassist::error::Result;
use kwassist::keywords::SimilarWebClient;
use kwassist::local_tools::ToolRegistry;

#[tokio::main]
async fn main() {
    let _args = Args::parse();

    // A missing .env file is fine; the variables may come from the shell.
    let _ = dotenvy::dotenv();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            process::exit(1);
        }
    };

    if let Err(e) = run(config, credentials).await {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}

async fn run(config: Config, credentials: Credentials) -> Result<()> {
    let keywords = SimilarWebClient::new(
        &config.keywords_endpoint,
        &credentials.similarweb_api_key,
        config.request_timeout,
        config.verbose,
    )?
    .with_retry_policy(config.run.max_retries, config.run.retry_delay);
    let registry = ToolRegistry::new(Box::new(keywords));

    let client = AssistantClient::new(
        &config.assistants_endpoint,
        &credentials.openai_api_key,
        config.request_timeout,
        config.verbose,
    )?;

    println!("{}", "Starting keyword research assistant...".cyan());
    let assistant_id = ensure_assistant(&client, &registry, &config.assistant, config.verbose).await?;
    println!("{}", format!("Using assistant: {}", assistant_id).dimmed());

    let conversation = Conversation::start(
        &client,
        &registry,
        assistant_id,
        Some(config.assistant.run_instructions.clone()),
        config.run.clone(),
        config.verbose,
    )
    .await?;
    println!(
        "{}",
        format!("New conversation started on thread {}", conversation.thread_id()).dimmed()
    );
    println!("{}", "Type 'quit' or 'exit' to end the conversation.".dimmed());

    run_interactive(&conversation, BufReader::new(tokio::io::stdin())).await?;

    println!("\nConversation finished.");
    Ok(())
}
