//! Deterministic placeholder tokens for expression attribute names and values.
//!
//! The store's expression language reserves a large set of words and forbids
//! most punctuation in attribute names, so every name and value is substituted
//! through a token. Tokens are derived by hashing a canonical rendering of the
//! field or value: SHA-256, truncated to the first 10 hex characters. The same
//! field or value always yields the same token, within a process and across
//! processes, so expressions are reproducible and cacheable.

use docstore_core::Value;
use sha2::{Digest, Sha256};

/// Expression attribute name token for a field: `#` + 10-hex digest.
#[must_use]
pub fn name_token(field: &str) -> String {
    format!("#{}", digest10(&render_str(field)))
}

/// Expression attribute value token for a value: `:` + 10-hex digest.
#[must_use]
pub fn value_token(value: &Value) -> String {
    format!(":{}", digest10(&render(value)))
}

fn digest10(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(10);
    hash
}

// Canonical rendering. Strings are single-quoted, numbers and bools bare,
// lists bracketed, maps braced with sorted keys (BTreeMap iteration order).
// Distinct fields or values must render distinctly or their tokens collide.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => render_str(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => {
            let parts: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Map(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{k}: {}", render(v)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
    }
}

fn render_str(s: &str) -> String {
    format!("'{s}'")
}
