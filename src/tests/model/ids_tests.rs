use std::collections::HashSet;

use super::*;

#[test]
fn generated_ids_are_unique_and_alphanumeric() {
    let ids = (0..1000).map(|_| PatternId::generate()).collect::<Vec<_>>();
    let unique = ids.iter().map(|id| id.as_str()).collect::<HashSet<_>>();
    assert_eq!(unique.len(), ids.len());
    for id in &ids {
        assert!(!id.is_empty());
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

#[test]
fn base36_encodes_known_values() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(35), "z");
    assert_eq!(to_base36(36), "10");
    assert_eq!(to_base36(u64::MAX), "3w5e11264sgsf");
}

#[test]
fn id_serializes_as_plain_string() {
    let id = PatternId::from("abc123");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
}
