use serde::Serialize;

/// Serialize a parse tree, token list, or result to a pretty-printed JSON string.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
