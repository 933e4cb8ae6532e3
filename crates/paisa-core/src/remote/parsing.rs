//! JSON extraction helpers for remote parser responses
//!
//! Generative completions often wrap their JSON payload in markdown code
//! fences or surround it with prose. These helpers peel that off before
//! deserializing.

use crate::error::{Error, Result};

use super::types::RemoteExpense;

/// Strip markdown code-fence markers from a completion body
pub fn strip_code_fences(response: &str) -> String {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }
    trimmed
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the first balanced JSON object from free text
///
/// Braces inside string values (and escaped quotes inside those strings)
/// do not count toward nesting depth.
pub fn extract_json_object(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| Error::InvalidData(no_json_error(response)))?;

    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in response[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&response[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    Err(Error::InvalidData(no_json_error(response)))
}

/// Parse a completion body into a `RemoteExpense`
///
/// Tolerates code fences and surrounding prose; any remaining malformed
/// JSON is a parse failure that the orchestrator turns into a fallback.
pub fn parse_remote_expense(response: &str) -> Result<RemoteExpense> {
    let cleaned = strip_code_fences(response);
    let json_str = extract_json_object(&cleaned)?;

    serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid expense JSON from parser: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })
}

fn no_json_error(response: &str) -> String {
    format!("No JSON found in parser response | Raw: {}", truncate(response))
}

fn truncate(s: &str) -> String {
    if s.len() > 200 {
        let mut end = 200;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    } else {
        s.to_string()
    }
}
