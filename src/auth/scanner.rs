// Token scanner
// Depth-first search for a token-shaped string in decoded JSON

use serde_json::Value;

/// Does this key name look like it holds an authentication token?
pub fn is_token_key(key: &str) -> bool {
    let key = key.to_lowercase();
    key.contains("token") || key.contains("access") || key == "jwt"
}

/// Find the first token-shaped string in `value`.
///
/// Mapping keys are visited in document order. For each key the value is
/// taken when it is a non-empty string under a token-like key, otherwise
/// the scan descends into it. Sequences are visited element by element.
/// Non-string scalars are never tokens.
///
/// Input is decoded network JSON and therefore acyclic.
pub fn find_token(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => map.iter().find_map(|(key, child)| match child {
            Value::String(s) if !s.is_empty() && is_token_key(key) => Some(s.as_str()),
            _ => find_token(child),
        }),
        Value::Array(items) => items.iter().find_map(find_token),
        _ => None,
    }
}

/// GraphQL variant: look under `data` first, then fall back to the whole document
pub fn find_graphql_token(response: &Value) -> Option<&str> {
    response
        .get("data")
        .and_then(find_token)
        .or_else(|| find_token(response))
}
