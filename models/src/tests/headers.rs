use crate::HeaderSet;

/// **VALUE**: Verifies case-insensitive, last-write-wins header semantics.
///
/// **WHY THIS MATTERS**: HTTP header names are case-insensitive. If
/// `X-Tenant` and `x-tenant` were kept as two entries, the content would
/// receive both values and pick one arbitrarily.
///
/// **BUG THIS CATCHES**: Would catch `insert` comparing names case-sensitively.
#[test]
fn given_same_name_different_case_when_inserted_then_last_write_wins() {
    // GIVEN: A set with one header
    let mut headers = HeaderSet::new();
    headers.insert("X-Tenant", "first");

    // WHEN: Inserting the same name in another casing
    let previous = headers.insert("x-tenant", "second");

    // THEN: One entry remains, holding the newest value and casing
    assert_eq!(previous.as_deref(), Some("first"));
    assert_eq!(headers.len(), 1);
    assert_eq!(headers.get("X-TENANT"), Some("second"));
    assert_eq!(headers.iter().next(), Some(("x-tenant", "second")));
}

#[test]
fn given_two_sets_when_merged_then_other_wins_on_collision() {
    let mut base = HeaderSet::from([("Accept", "application/json"), ("A", "1")]);
    let overlay = HeaderSet::from([("accept", "text/html"), ("B", "2")]);

    base.merge(&overlay);

    assert_eq!(base.len(), 3);
    assert_eq!(base.get("Accept"), Some("text/html"));
    assert_eq!(base.get("b"), Some("2"));
}

#[test]
fn given_header_when_removed_then_lookup_misses() {
    let mut headers = HeaderSet::from([("launchHeader", "launchValue")]);

    assert_eq!(headers.remove("LAUNCHHEADER").as_deref(), Some("launchValue"));
    assert!(headers.is_empty());
    assert!(!headers.contains("launchHeader"));
}

#[test]
fn given_headers_when_serialized_then_produces_object_in_insertion_order() {
    let headers = HeaderSet::from([("b", "2"), ("a", "1")]);

    let json = serde_json::to_string(&headers).unwrap();

    assert_eq!(json, r#"{"b":"2","a":"1"}"#);
}
