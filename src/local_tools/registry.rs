use crate::keywords::KeywordSource;
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};

use super::tools;

/// Every tool the assistant may call locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTool {
    TopKeywords,
}

impl LocalTool {
    pub const ALL: [LocalTool; 1] = [LocalTool::TopKeywords];

    pub fn name(self) -> &'static str {
        match self {
            LocalTool::TopKeywords => "get_similarweb_top_keywords",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            LocalTool::TopKeywords => "Get top keywords for a specific category and domain from SimilarWeb. \
Useful for market research and understanding search trends related to e-commerce. \
Returns keywords in rank order with their estimated search volume.",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            LocalTool::TopKeywords => json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": ["string", "integer"],
                        "description": "The category to search keywords for. Often a numerical ID or a path-like string (e.g. \"/Electronics/Computers\"). Use -1 for all categories."
                    },
                    "domain": {
                        "type": "string",
                        "description": "The domain name to analyze (e.g. amazon.com, ebay.com)."
                    },
                    "period": {
                        "type": "string",
                        "pattern": "^\\d{4}-(0[1-9]|1[0-2])$",
                        "description": "A single month to analyze, in YYYY-MM format. Shorthand for start_date = end_date."
                    },
                    "start_date": {
                        "type": "string",
                        "pattern": "^\\d{4}-(0[1-9]|1[0-2])$",
                        "description": "Start of the analysis period, in YYYY-MM format. Defaults to the last complete month."
                    },
                    "end_date": {
                        "type": "string",
                        "pattern": "^\\d{4}-(0[1-9]|1[0-2])$",
                        "description": "End of the analysis period, in YYYY-MM format. Defaults to start_date."
                    },
                    "country": {
                        "type": "string",
                        "description": "Two-letter country code. Defaults to us."
                    },
                    "granularity": {
                        "type": "string",
                        "enum": ["Daily", "Weekly", "Monthly"],
                        "description": "The time granularity for the data. Defaults to Monthly."
                    },
                    "limit": {
                        "type": "integer",
                        "description": "The maximum number of keywords to return. Defaults to 10; values outside 1..100 are clamped."
                    }
                },
                "required": ["category", "domain"]
            }),
        }
    }
}

/// Read-only table of the tools offered to the assistant and the sources they call.
pub struct ToolRegistry {
    tools: Vec<LocalTool>,
    keywords: Box<dyn KeywordSource>,
}

impl ToolRegistry {
    pub fn new(keywords: Box<dyn KeywordSource>) -> Self {
        Self {
            tools: LocalTool::ALL.to_vec(),
            keywords,
        }
    }

    pub fn get(&self, name: &str) -> Option<LocalTool> {
        LocalTool::from_name(name).filter(|tool| self.tools.contains(tool))
    }

    pub fn list(&self) -> &[LocalTool] {
        &self.tools
    }

    pub fn validate_arguments(&self, tool: LocalTool, arguments: &Value) -> Result<(), String> {
        let schema_value = tool.input_schema();
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_value)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{}: {}", path, e)
                    }
                })
                .collect();
            return Err(format!("Invalid arguments: {}", error_messages.join("; ")));
        }

        Ok(())
    }

    /// Validate and run one tool. `Err` carries a message meant for the model.
    pub async fn call(&self, tool: LocalTool, arguments: &Value) -> Result<String, String> {
        self.validate_arguments(tool, arguments)?;

        match tool {
            LocalTool::TopKeywords => {
                tools::handle_top_keywords(self.keywords.as_ref(), arguments).await
            }
        }
    }
}
