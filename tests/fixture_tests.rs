//! Store fixture tests
//!
//! Loads fixtures from disk and resolves ACLs against them end to end.

use acl_provider::acl::{MatchStrategy, ObjectIdentity, SecurityIdentity};
use acl_provider::error::StoreError;
use acl_provider::provider::AclProvider;
use acl_provider::store::StoreFixture;
use std::io::Write;
use std::sync::Arc;

const LIBRARY_FIXTURE: &str = r#"
[[object_identities]]
object = "Document:42"
parent = "Folder:1"

[[object_identities]]
object = "Folder:1"

[[object_identities]]
object = "Document:43"
parent = "Folder:1"
inheriting = false

[[entries]]
object = "Document:42"
sid = "role:ADMIN"
mask = 7

[[entries]]
object = "Document:42"
sid = "user:alice"
mask = 1
strategy = "equal"

[[entries]]
object = "Document:42"
sid = "user:bob"
mask = 2
granting = false
field = "title"
audit_failure = true

[[entries]]
object = "Folder:1"
sid = "role:ADMIN"
mask = 7

[[entries]]
object = "Document:43"
sid = "user:alice"
mask = 4
"#;

fn write_fixture(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_resolve_from_fixture_file() {
    let file = write_fixture(LIBRARY_FIXTURE);
    let store = StoreFixture::from_path(file.path())
        .unwrap()
        .into_store()
        .await
        .unwrap();
    assert_eq!(store.object_identity_count().await, 3);
    assert_eq!(store.entry_count().await, 5);

    let provider = AclProvider::new(Arc::new(store));
    let acl = provider
        .resolve(&ObjectIdentity::new("42", "Document"), &[])
        .await
        .unwrap();

    assert_eq!(acl.object_aces().len(), 2);
    assert_eq!(acl.object_aces()[1].strategy(), MatchStrategy::Equal);

    let title = acl.field_aces("title");
    assert_eq!(title.len(), 1);
    assert!(!title[0].is_granting());
    assert!(title[0].is_audit_failure());
    assert_eq!(title[0].security_identity(), &SecurityIdentity::user("bob"));

    assert_eq!(acl.security_identities().len(), 3);
    assert_eq!(
        acl.parent_acl().unwrap().object_identity(),
        &ObjectIdentity::new("1", "Folder")
    );
}

#[tokio::test]
async fn test_non_inheriting_fixture_object() {
    let store = StoreFixture::from_toml_str(LIBRARY_FIXTURE)
        .unwrap()
        .into_store()
        .await
        .unwrap();
    let provider = AclProvider::new(Arc::new(store));

    let acl = provider
        .resolve(&ObjectIdentity::new("43", "Document"), &[])
        .await
        .unwrap();

    assert!(!acl.is_entries_inheriting());
    assert!(acl.parent_acl().is_some());
    assert!(acl.inherited_parent().is_none());
}

#[tokio::test]
async fn test_fixture_children() {
    let store = StoreFixture::from_toml_str(LIBRARY_FIXTURE)
        .unwrap()
        .into_store()
        .await
        .unwrap();
    let provider = AclProvider::new(Arc::new(store));

    let children = provider
        .children(&ObjectIdentity::new("1", "Folder"), true)
        .await
        .unwrap();

    assert_eq!(
        children,
        vec![
            ObjectIdentity::new("42", "Document"),
            ObjectIdentity::new("43", "Document")
        ]
    );
}

#[tokio::test]
async fn test_acl_serializes_to_json() {
    let store = StoreFixture::from_toml_str(LIBRARY_FIXTURE)
        .unwrap()
        .into_store()
        .await
        .unwrap();
    let provider = AclProvider::new(Arc::new(store));

    let acl = provider
        .resolve(&ObjectIdentity::new("42", "Document"), &[])
        .await
        .unwrap();
    let json = serde_json::to_value(&acl).unwrap();

    assert_eq!(json["object_identity"]["type"], "Document");
    assert_eq!(json["object_aces"].as_array().unwrap().len(), 2);
    assert_eq!(json["field_aces"]["title"][0]["granting"], false);
    assert_eq!(json["parent"]["object_identity"]["identifier"], "1");
    assert!(json.get("strategy").is_none());
}

#[test]
fn test_missing_fixture_file() {
    let err = StoreFixture::from_path("/nonexistent/fixture.toml").unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[test]
fn test_malformed_fixture() {
    let err = StoreFixture::from_toml_str("[[entries]]\nobject = 42\n").unwrap_err();
    assert!(matches!(err, StoreError::Fixture(_)));
}

#[tokio::test]
async fn test_entry_for_unknown_object() {
    let fixture = StoreFixture::from_toml_str(
        r#"
[[entries]]
object = "Document:42"
sid = "user:alice"
mask = 1
"#,
    )
    .unwrap();

    let err = fixture.into_store().await.unwrap_err();
    assert!(matches!(err, StoreError::UnknownObjectIdentity(_)));
}
