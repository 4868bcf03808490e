use linktopics_types::{Error, SessionId};
use std::collections::HashSet;
use std::str::FromStr;

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn parse_keeps_opaque_value() {
    let id = SessionId::parse("cs_test_a1B2c3").unwrap();
    assert_eq!(id.as_str(), "cs_test_a1B2c3");
}

#[test]
fn parse_trims_whitespace() {
    let id = SessionId::parse("  cs_live_xyz \n").unwrap();
    assert_eq!(id.as_str(), "cs_live_xyz");
}

#[test]
fn parse_empty_is_missing() {
    assert!(matches!(SessionId::parse(""), Err(Error::MissingSessionId)));
}

#[test]
fn parse_whitespace_is_missing() {
    assert!(matches!(SessionId::parse("   "), Err(Error::MissingSessionId)));
}

#[test]
fn from_query_none_is_missing() {
    assert!(matches!(
        SessionId::from_query(None),
        Err(Error::MissingSessionId)
    ));
}

#[test]
fn from_query_some() {
    let id = SessionId::from_query(Some("cs_test_1")).unwrap();
    assert_eq!(id.to_string(), "cs_test_1");
}

#[test]
fn from_str_matches_parse() {
    let a = SessionId::from_str("cs_test_1").unwrap();
    let b = SessionId::parse("cs_test_1").unwrap();
    assert_eq!(a, b);
}

// ── Serde ────────────────────────────────────────────────────────

#[test]
fn serializes_as_plain_string() {
    let id = SessionId::parse("cs_test_1").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""cs_test_1""#);
}

#[test]
fn deserialize_rejects_empty() {
    let parsed: Result<SessionId, _> = serde_json::from_str(r#""""#);
    assert!(parsed.is_err());
}

#[test]
fn hash_and_eq() {
    let id = SessionId::parse("cs_test_1").unwrap();
    let mut set = HashSet::new();
    set.insert(id.clone());
    set.insert(id);
    assert_eq!(set.len(), 1);
}
