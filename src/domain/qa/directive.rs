//! Reading the reasoning engine's first reply.
//!
//! A reply is either a data directive or prose. Anything that does not parse
//! as a directive asking for data is prose; parse errors never escape.

use serde::Deserialize;
use serde_json::Value;

/// Structured request for data embedded in a reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Directive {
    #[serde(default)]
    pub requires_data: bool,
    /// Raw entries; each is validated on its own by the executor.
    #[serde(default)]
    pub data_requests: Vec<Value>,
}

/// Classified reply from the reasoning engine.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// The engine wants data before answering.
    Directive(Directive),
    /// The engine answered directly; holds the reply untouched.
    Prose(String),
}

impl ModelReply {
    pub fn parse(reply: &str) -> Self {
        match serde_json::from_str::<Directive>(strip_fences(reply)) {
            Ok(directive) if directive.requires_data => ModelReply::Directive(directive),
            Ok(_) => ModelReply::Prose(reply.to_string()),
            Err(err) => {
                tracing::debug!(error = %err, "Reply is not a directive, treating as prose");
                ModelReply::Prose(reply.to_string())
            }
        }
    }
}

/// Removes a leading ```` ```json ```` or ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence, plus surrounding whitespace.
pub fn strip_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(body) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    let body = body.trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}
