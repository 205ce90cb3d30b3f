use super::registry::ToolRegistry;
use crate::keywords::{KeywordQuery, KeywordSource};
use serde_json::{json, Value};

pub fn format_tools_for_llm(registry: &ToolRegistry) -> Vec<Value> {
    registry
        .list()
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name(),
                    "description": tool.description(),
                    "parameters": tool.input_schema(),
                }
            })
        })
        .collect()
}

// Tool handlers

pub async fn handle_top_keywords(source: &dyn KeywordSource, args: &Value) -> Result<String, String> {
    let today = chrono::Local::now().date_naive();
    let query = KeywordQuery::from_arguments(args, today).map_err(|e| e.to_string())?;

    let entries = source
        .top_keywords(&query)
        .await
        .map_err(|e| e.to_string())?;

    Ok(json!({
        "category": query.category,
        "domain": query.domain,
        "start_date": query.start_date,
        "end_date": query.end_date,
        "country": query.country,
        "granularity": query.granularity.as_str(),
        "count": entries.len(),
        "keywords": entries,
    })
    .to_string())
}
