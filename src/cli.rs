use clap::Parser;

/// Interactive keyword-research chat. Type `quit` or `exit` to leave.
///
/// Requires OPENAI_API_KEY and SIMILARWEB_API_KEY in the environment or a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "kwassist", version)]
#[command(about = "Chat with an assistant that can look up SimilarWeb top keywords", long_about = None)]
pub struct Args {}
