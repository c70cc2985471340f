use serde_json::Value;
use std::collections::HashSet;

use crate::constants::MAX_HISTORY;
use crate::directory::{ConversationId, Directory};

/// Filter identifiers down to a deduplicated, bounded list of eligible conversations
///
/// Order is preserved and the first occurrence of a duplicate wins. Identifiers that
/// are empty, unresolvable or not direct/group conversations are dropped.
pub fn sanitize<I, S>(directory: &dyn Directory, ids: I) -> Vec<ConversationId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sanitize_bounded(directory, ids, MAX_HISTORY)
}

/// Same as [`sanitize`] with an explicit length bound
pub fn sanitize_bounded<I, S>(directory: &dyn Directory, ids: I, limit: usize) -> Vec<ConversationId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for raw in ids {
        if result.len() >= limit {
            break;
        }
        let raw = raw.as_ref();
        if raw.is_empty() || seen.contains(raw) {
            continue;
        }
        seen.insert(raw.to_string());

        let id = ConversationId::from(raw);
        if directory.resolve_eligible(&id).is_some() {
            result.push(id);
        }
    }

    result
}

/// Extract candidate identifiers from an untrusted persisted value
///
/// Anything other than a JSON array yields nothing; non-string elements are skipped.
pub fn persisted_ids(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
