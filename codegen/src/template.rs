//! Keyword substitution.
//!
//! Templates are plain text with `#`-prefixed tokens. Substitution walks
//! the keyword table in ascending key order and replaces every occurrence
//! of each token; tokens with no table entry pass through untouched, so a
//! template can address several objects and each one consumes only its
//! own tokens.
//!
//! The ascending order is part of the contract: a table may alias one
//! token to another (`#nldstride` maps to the literal text `#stride2`),
//! and the alias resolves in the same pass exactly because its target
//! sorts later.

use std::collections::BTreeMap;

/// Replaces every keyword of `keywords` occurring in `template`.
pub fn substitute(template: &str, keywords: &BTreeMap<String, String>) -> String {
    let mut text = template.to_string();
    for (token, value) in keywords {
        if text.contains(token.as_str()) {
            text = text.replace(token.as_str(), value);
        }
    }
    text
}
