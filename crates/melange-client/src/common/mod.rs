//! Common utilities for the Melange API client
//!
//! Provides the shared vocabulary used by the transport, the resource
//! endpoint and the typed clients.

pub mod query;

use serde_json::{Map, Value};

/// Versioned prefix every IPAM resource path is rooted under
pub const API_ROOT: &str = "/v0.1/ipam/";

/// A JSON object of resource attributes or query parameters.
///
/// `Value::Null` is the "unset" marker: callers fill in every parameter an
/// operation knows about and [`remove_nones`] strips the ones left unset.
pub type Fields = Map<String, Value>;

/// Build a [`Fields`] map from `(key, value)` pairs
pub fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Drop every entry whose value is unset (`null`)
pub fn remove_nones(fields: Fields) -> Fields {
    fields.into_iter().filter(|(_, value)| !value.is_null()).collect()
}

/// Convert a snake_case name to PascalCase.
///
/// The first character and every character following an underscore are
/// upper-cased and the underscore consumed; names already in PascalCase pass
/// through unchanged (`"ip_block"` -> `"IpBlock"`, `"IpBlock"` -> `"IpBlock"`).
pub fn camelize(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());
    let mut i = 0;

    while i < chars.len() {
        if i == 0 {
            out.extend(chars[0].to_uppercase());
            i += 1;
        } else if chars[i] == '_' && i + 1 < chars.len() {
            out.extend(chars[i + 1].to_uppercase());
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}
