//! End-to-end checks of the client's local behavior: session lifecycle,
//! role gating, and schema validation all resolve before any network
//! traffic, so these tests run against an unroutable base URL.

use gridbase_client::{ClientConfig, GridbaseClient, MemoryTokenStore, SessionState, TokenPair};
use gridbase_core::{Field, FieldType, Role, RoleAssignment, SelectPolicy, Table, User};
use serde_json::{Map, Value, json};
use std::sync::Arc;

fn offline_client() -> GridbaseClient {
    let config = ClientConfig::with_base_url("http://127.0.0.1:9/api");
    GridbaseClient::with_store(config, Arc::new(MemoryTokenStore::new())).unwrap()
}

fn assignment(workspace: i64, role: Role) -> RoleAssignment {
    RoleAssignment {
        id: 1,
        workspace,
        role,
        user: User {
            id: 1,
            username: "ada".into(),
            email: String::new(),
        },
    }
}

fn people_table() -> Table {
    Table {
        id: 7,
        database: 3,
        name: "People".into(),
        deleted_at: None,
        workspace_id: 1,
    }
}

fn people_fields() -> Vec<Field> {
    vec![
        Field::new(7, "Name", FieldType::Text).required(),
        Field::new(7, "Age", FieldType::Number),
        Field::new(7, "Status", FieldType::SingleSelect).with_choices(["open", "closed"]),
    ]
}

fn payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[tokio::test]
async fn fresh_client_is_logged_out() {
    let client = offline_client();
    assert_eq!(client.session().state().await, SessionState::LoggedOut);
    assert_eq!(client.session().access_token().await, None);
}

#[tokio::test]
async fn installed_tokens_authenticate_the_session() {
    let client = offline_client();
    client
        .session()
        .install(TokenPair::new("access", "refresh"))
        .await
        .unwrap();
    assert_eq!(client.session().state().await, SessionState::Authenticated);

    client.session().clear().await.unwrap();
    assert_eq!(client.session().state().await, SessionState::LoggedOut);
}

#[tokio::test]
async fn viewer_mutation_fails_locally() {
    let client = offline_client();
    client
        .role_gate()
        .write()
        .await
        .rebuild(&[assignment(1, Role::Viewer)]);

    let records = client.records(&people_table(), people_fields());
    let err = records
        .create(&payload(json!({"Name": "Ada"})))
        .await
        .unwrap_err();
    assert!(err.is_capability_denied());
}

#[tokio::test]
async fn invalid_payload_fails_locally_for_members() {
    let client = offline_client();
    client
        .role_gate()
        .write()
        .await
        .rebuild(&[assignment(1, Role::Member)]);

    let records = client.records(&people_table(), people_fields());
    let err = records
        .create(&payload(json!({"Age": "abc", "Status": "archived"})))
        .await
        .unwrap_err();

    let fields: Vec<_> = err
        .field_errors()
        .expect("validation failure")
        .iter()
        .map(|e| e.field.clone())
        .collect();
    // Missing required Name plus both coercion failures, all reported.
    assert_eq!(fields, vec!["Name", "Age", "Status"]);
}

#[tokio::test]
async fn lenient_select_policy_applies_to_record_clients() {
    let client = offline_client().with_select_policy(SelectPolicy::Lenient);
    client
        .role_gate()
        .write()
        .await
        .rebuild(&[assignment(1, Role::Member)]);

    let records = client.records(&people_table(), people_fields());
    let err = records
        .create(&payload(json!({"Name": "Ada", "Status": "archived"})))
        .await
        .unwrap_err();
    // Status passes under the lenient policy; the only failure left is
    // the unreachable host.
    assert!(err.is_transport());
}
