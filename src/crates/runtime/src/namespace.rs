//! Namespace & identity (C1)
//!
//! Every piece of cross-thread memory the graph engine stores is keyed by a
//! 4-tuple of `(org_id, user_id, assistant_id, category)`. Two pseudo-ids
//! widen the scope: `user_id = "shared"` for an org-wide namespace, and
//! `assistant_id = "global"` for a namespace shared across all of a user's
//! assistants.

use serde_json::Value;
use thiserror::Error;

pub const CATEGORY_TOKENS: &str = "tokens";
pub const CATEGORY_CONTEXT: &str = "context";
pub const CATEGORY_MEMORIES: &str = "memories";
pub const CATEGORY_PREFERENCES: &str = "preferences";

pub const SHARED_USER_ID: &str = "shared";
pub const GLOBAL_AGENT_ID: &str = "global";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("namespace segment cannot be empty or whitespace-only: {field}")]
    EmptySegment { field: &'static str },
}

/// The four components extracted from a run's `configurable` dict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceComponents {
    pub org_id: String,
    pub user_id: String,
    pub assistant_id: String,
    pub category: String,
}

/// Read `supabase_organization_id` / `owner` / `assistant_id` out of a run's
/// `configurable` object. Returns `None` (rather than erroring) when any
/// field is missing or not a string — callers fall back to a namespace-less
/// path in that case, the same way the graph does when memory features are
/// unavailable.
pub fn extract_components(configurable: &Value, category: &str) -> Option<NamespaceComponents> {
    let org_id = configurable.get("supabase_organization_id")?.as_str()?;
    let user_id = configurable.get("owner")?.as_str()?;
    let assistant_id = configurable.get("assistant_id")?.as_str()?;

    Some(NamespaceComponents {
        org_id: org_id.trim().to_string(),
        user_id: user_id.trim().to_string(),
        assistant_id: assistant_id.trim().to_string(),
        category: category.trim().to_string(),
    })
}

/// Build and validate a namespace tuple, trimming each segment. Every
/// segment must be non-empty after trimming.
pub fn build(
    org_id: &str,
    user_id: &str,
    assistant_id: &str,
    category: &str,
) -> Result<(String, String, String, String), NamespaceError> {
    let org_id = org_id.trim();
    let user_id = user_id.trim();
    let assistant_id = assistant_id.trim();
    let category = category.trim();

    if org_id.is_empty() {
        return Err(NamespaceError::EmptySegment { field: "org_id" });
    }
    if user_id.is_empty() {
        return Err(NamespaceError::EmptySegment { field: "user_id" });
    }
    if assistant_id.is_empty() {
        return Err(NamespaceError::EmptySegment { field: "assistant_id" });
    }
    if category.is_empty() {
        return Err(NamespaceError::EmptySegment { field: "category" });
    }

    Ok((
        org_id.to_string(),
        user_id.to_string(),
        assistant_id.to_string(),
        category.to_string(),
    ))
}

/// Normalise a store-endpoint namespace, accepted either as a JSON array in
/// the request body or as a scalar query-string value. Never splits on
/// dots — a dot-separated string is a single opaque segment.
///
/// Input forms accepted:
///   * a JSON array of strings → kept as-is, empty strings dropped.
///   * a bare string → percent-decoded; if the decoded text itself parses as
///     a JSON array of strings, it is treated as such; otherwise it becomes
///     a single-element sequence.
pub fn normalise_store_namespace(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => {
            let segments: Vec<String> = items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if segments.is_empty() {
                None
            } else {
                Some(segments)
            }
        }
        Value::String(raw) => normalise_store_namespace_str(raw),
        _ => None,
    }
}

pub fn normalise_store_namespace_str(raw: &str) -> Option<Vec<String>> {
    let decoded = percent_decode(raw);
    if decoded.is_empty() {
        return None;
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&decoded) {
        let segments: Vec<String> = items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .collect();
        return if segments.is_empty() { None } else { Some(segments) };
    }

    Some(vec![decoded])
}

fn percent_decode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut bytes = raw.bytes().peekable();
    let mut buf = Vec::new();

    while let Some(b) = bytes.next() {
        match b {
            b'%' => {
                let hi = bytes.next();
                let lo = bytes.next();
                if let (Some(hi), Some(lo)) = (hi, lo) {
                    if let (Some(h), Some(l)) = (hex_val(hi), hex_val(lo)) {
                        buf.push(h * 16 + l);
                        continue;
                    }
                }
                flush(&mut buf, &mut out);
                out.push('%');
            }
            b'+' => {
                flush(&mut buf, &mut out);
                out.push(' ');
            }
            other => buf.push(other),
        }
    }
    flush(&mut buf, &mut out);
    out
}

fn flush(buf: &mut Vec<u8>, out: &mut String) {
    if !buf.is_empty() {
        out.push_str(&String::from_utf8_lossy(buf));
        buf.clear();
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_trims_and_validates() {
        let tuple = build(" org ", "user", "assistant", " tokens ").unwrap();
        assert_eq!(tuple, ("org".into(), "user".into(), "assistant".into(), "tokens".into()));
    }

    #[test]
    fn build_rejects_empty_segment() {
        let err = build("", "user", "assistant", "tokens").unwrap_err();
        assert_eq!(err, NamespaceError::EmptySegment { field: "org_id" });
    }

    #[test]
    fn build_rejects_whitespace_only_segment() {
        assert!(build("org", "   ", "assistant", "tokens").is_err());
    }

    #[test]
    fn extract_components_returns_none_on_missing_field() {
        let cfg = json!({"owner": "u1", "assistant_id": "a1"});
        assert!(extract_components(&cfg, CATEGORY_MEMORIES).is_none());
    }

    #[test]
    fn extract_components_returns_none_on_non_string_field() {
        let cfg = json!({
            "supabase_organization_id": 123,
            "owner": "u1",
            "assistant_id": "a1",
        });
        assert!(extract_components(&cfg, CATEGORY_MEMORIES).is_none());
    }

    #[test]
    fn extract_components_happy_path() {
        let cfg = json!({
            "supabase_organization_id": "org1",
            "owner": "user1",
            "assistant_id": "asst1",
        });
        let got = extract_components(&cfg, CATEGORY_TOKENS).unwrap();
        assert_eq!(got.org_id, "org1");
        assert_eq!(got.category, "tokens");
    }

    #[test]
    fn normalise_array_is_idempotent_with_string_wrap() {
        let from_array = normalise_store_namespace(&json!(["prefs"])).unwrap();
        let from_string = normalise_store_namespace(&json!("prefs")).unwrap();
        assert_eq!(from_array, from_string);
    }

    #[test]
    fn normalise_does_not_split_on_dots() {
        let got = normalise_store_namespace_str("a.b.c").unwrap();
        assert_eq!(got, vec!["a.b.c".to_string()]);
    }

    #[test]
    fn normalise_decodes_percent_encoding() {
        let got = normalise_store_namespace_str("shared%20prefs").unwrap();
        assert_eq!(got, vec!["shared prefs".to_string()]);
    }

    #[test]
    fn normalise_decodes_json_array_string() {
        let got = normalise_store_namespace_str("%5B%22a%22%2C%22b%22%5D").unwrap();
        assert_eq!(got, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn normalise_empty_string_is_none() {
        assert!(normalise_store_namespace_str("").is_none());
    }

    #[test]
    fn normalise_is_idempotent() {
        let once = normalise_store_namespace_str("a.b").unwrap();
        let twice = normalise_store_namespace(&json!(once)).unwrap();
        assert_eq!(once, twice);
    }
}
