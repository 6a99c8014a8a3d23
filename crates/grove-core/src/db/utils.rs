//! Shared helpers: ID minting, JSON ID-set codecs, timestamp parsing.

use jiff::Timestamp;
use rusqlite::types::Type;
use uuid::Uuid;

use crate::error::Result;

/// Mints a prefixed opaque ID, e.g. `plant_1f8a9c2d`.
pub(crate) fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &hex[..8])
}

/// Decodes a JSON-encoded ID set column.
pub(crate) fn decode_id_set(raw: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(raw)?)
}

/// Encodes an ID set for storage.
pub(crate) fn encode_id_set(ids: &[String]) -> Result<String> {
    Ok(serde_json::to_string(ids)?)
}

/// Adds a member to an ID set if absent. Returns whether the set changed, so
/// re-applied updates are no-ops.
pub(crate) fn set_union(ids: &mut Vec<String>, member: &str) -> bool {
    if ids.iter().any(|id| id == member) {
        false
    } else {
        ids.push(member.to_string());
        true
    }
}

/// Removes a member from an ID set if present. Returns whether the set
/// changed.
pub(crate) fn set_remove(ids: &mut Vec<String>, member: &str) -> bool {
    let before = ids.len();
    ids.retain(|id| id != member);
    ids.len() != before
}

/// Parses an RFC 3339 TEXT column into a Timestamp, mapped into a rusqlite
/// row error for use inside row closures.
pub(crate) fn parse_timestamp(column: usize, raw: &str) -> rusqlite::Result<Timestamp> {
    raw.parse::<Timestamp>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
    })
}

/// Parses an optional RFC 3339 TEXT column.
pub(crate) fn parse_timestamp_opt(
    column: usize,
    raw: Option<String>,
) -> rusqlite::Result<Option<Timestamp>> {
    raw.map(|s| parse_timestamp(column, &s)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_prefixed_and_unique() {
        let a = new_id("plant");
        let b = new_id("plant");
        assert!(a.starts_with("plant_"));
        assert_eq!(a.len(), "plant_".len() + 8);
        assert_ne!(a, b);
    }

    #[test]
    fn id_set_round_trip() {
        let ids = vec!["quest_1".to_string(), "quest_2".to_string()];
        let encoded = encode_id_set(&ids).unwrap();
        assert_eq!(decode_id_set(&encoded).unwrap(), ids);
        assert_eq!(decode_id_set("[]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn set_union_is_idempotent() {
        let mut ids = vec!["a".to_string()];
        assert!(set_union(&mut ids, "b"));
        assert!(!set_union(&mut ids, "b"));
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn set_remove_is_idempotent() {
        let mut ids = vec!["a".to_string(), "b".to_string()];
        assert!(set_remove(&mut ids, "a"));
        assert!(!set_remove(&mut ids, "a"));
        assert_eq!(ids, vec!["b".to_string()]);
    }
}
