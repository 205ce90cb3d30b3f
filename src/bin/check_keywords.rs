use clap::Parser;
use colored::*;
use serde_json::{json, Value};

use kwassist::config::{Config, SIMILARWEB_API_KEY_VAR};
use kwassist::keywords::{interpret_response, KeywordQuery, SimilarWebClient};

/// Issue one SimilarWeb top-keywords request and show what comes back.
#[derive(Parser, Debug)]
#[command(name = "check-keywords")]
struct CheckArgs {
    #[arg(long, allow_hyphen_values = true, help = "Category id or path, e.g. -1")]
    category: String,

    #[arg(long, help = "Domain to analyze, e.g. amazon.com")]
    domain: String,

    #[arg(long = "start-date", help = "Start month, YYYY-MM")]
    start_date: Option<String>,

    #[arg(long = "end-date", help = "End month, YYYY-MM")]
    end_date: Option<String>,

    #[arg(long)]
    country: Option<String>,

    #[arg(long, help = "Daily, Weekly or Monthly")]
    granularity: Option<String>,

    #[arg(long)]
    limit: Option<u32>,

    #[arg(long, help = "Print the raw response body instead of parsed keywords")]
    raw: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CheckArgs::parse();
    let _ = dotenvy::dotenv();

    let api_key = std::env::var(SIMILARWEB_API_KEY_VAR).unwrap_or_else(|_| {
        eprintln!("Error: {} environment variable not set", SIMILARWEB_API_KEY_VAR);
        std::process::exit(1);
    });
    let config = Config::from_env()?;

    let mut arguments = json!({
        "category": args.category,
        "domain": args.domain,
    });
    let optional = [
        ("start_date", args.start_date.map(Value::from)),
        ("end_date", args.end_date.map(Value::from)),
        ("country", args.country.map(Value::from)),
        ("granularity", args.granularity.map(Value::from)),
        ("limit", args.limit.map(Value::from)),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            arguments[key] = value;
        }
    }

    let query = KeywordQuery::from_arguments(&arguments, chrono::Local::now().date_naive())?;

    println!("{}", format!("Endpoint: {}", config.keywords_endpoint).green());
    println!("{}", "Query parameters:".bold());
    for (key, value) in query.query_pairs() {
        println!("  {} = {}", key.cyan(), value);
    }
    println!("{}", "-".repeat(80).dimmed());

    let client = SimilarWebClient::new(
        &config.keywords_endpoint,
        &api_key,
        config.request_timeout,
        config.verbose,
    )?;
    let (status, body) = client.fetch_raw(&query).await?;
    println!("{}", format!("HTTP {}", status).yellow());

    if args.raw {
        match serde_json::from_str::<Value>(&body) {
            Ok(parsed) => println!("{}", serde_json::to_string_pretty(&parsed)?),
            Err(_) => println!("{}", body),
        }
        return Ok(());
    }

    match interpret_response(status, &body, query.limit as usize) {
        Ok(entries) => {
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "{:>3}. {} {}",
                    rank + 1,
                    entry.keyword,
                    format!("({})", entry.estimated_volume).dimmed()
                );
            }
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(1);
        }
    }

    Ok(())
}
