//! The `Name=[...]` micro-format embedded in `content` and `contentShort`.
//!
//! Stored text looks like `"\nBob=[He is tall]"`. Events are keyed by the
//! literal `Current event` instead of their name. Decoding never fails:
//! text in any other shape comes back unchanged.

use crate::NodeType;

/// Key used by event bodies in place of the node name.
pub const EVENT_KEY: &str = "Current event";

fn key_for<'a>(name: &'a str, node_type: NodeType) -> &'a str {
    match node_type {
        NodeType::Event => EVENT_KEY,
        _ => name,
    }
}

/// Wrap `inner` as `\n{key}=[{inner}]`, or return an empty string for an
/// empty body.
pub fn encode(inner: &str, name: &str, node_type: NodeType) -> String {
    if inner.is_empty() {
        return String::new();
    }
    format!("\n{}=[{}]", key_for(name, node_type), inner)
}

/// Extract the body from `\n{key}=[{body}]` or a bare `[{body}]`.
///
/// The body runs to the last `]` of the text, so a body containing `]` is
/// only recovered when nothing but whitespace follows the closing bracket.
pub fn decode(raw: &str, name: &str, node_type: NodeType) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let key = key_for(name, node_type);
    let start = raw.trim_start();

    let keyed = start
        .strip_prefix(key)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('='))
        .map(str::trim_start)
        .and_then(bracketed);

    keyed
        .or_else(|| bracketed(start))
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}

/// `[{body}]` followed only by whitespace.
fn bracketed(text: &str) -> Option<&str> {
    text.strip_prefix('[')?.trim_end().strip_suffix(']')
}
