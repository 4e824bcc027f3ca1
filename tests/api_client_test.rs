use dev_finder::core::{AccountApi, ReferenceApi, SearchApi};
use dev_finder::{ApiClient, AuthContext, AuthPhase, FinderError, MemoryAddressBar, SearchSession};
use httpmock::prelude::*;
use std::sync::Arc;

fn mock_lookups(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/skills");
        then.status(200).json_body(serde_json::json!({
            "data": [{"id": 3, "skill": "Rust"}, {"id": 7, "skill": "Go"}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/professions");
        then.status(200)
            .json_body(serde_json::json!([{"id": 2, "profession": "Backend Developer"}]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/locations");
        then.status(200).json_body(serde_json::json!({
            "data": [{"id": 9, "city": "Vienna", "country": "Austria"}]
        }));
    });
}

#[tokio::test]
async fn test_lookups_accept_wrapped_and_bare_arrays() {
    let server = MockServer::start();
    mock_lookups(&server);
    let client = ApiClient::new(&server.base_url(), None).unwrap();

    let skills = client.skills().await.unwrap();
    let professions = client.professions().await.unwrap();
    let locations = client.locations().await.unwrap();

    assert_eq!(skills.len(), 2);
    assert_eq!(skills[1].skill, "Go");
    assert_eq!(professions[0].profession, "Backend Developer");
    assert_eq!(locations[0].label(), "Vienna, Austria");
}

#[tokio::test]
async fn test_bootstrap_loads_lookups_then_searches() {
    let server = MockServer::start();
    mock_lookups(&server);
    let search_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/users/search")
            .query_param("skills[]", "3");
        then.status(200).json_body(serde_json::json!({
            "data": [], "current_page": 1, "last_page": 1, "per_page": 15, "total": 0
        }));
    });

    let api = Arc::new(ApiClient::new(&server.base_url(), None).unwrap());
    let session = SearchSession::new(api, Arc::new(MemoryAddressBar::new("skills[]=3")));

    let outcome = session.bootstrap().await.unwrap();
    assert!(outcome.is_applied());
    search_mock.assert();

    let lookups = session.lookups();
    assert_eq!(lookups.skill_label("3"), Some("Rust"));
    assert_eq!(lookups.location_label("9").as_deref(), Some("Vienna, Austria"));
}

#[tokio::test]
async fn test_bootstrap_stops_when_lookups_fail() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/skills");
        then.status(500).json_body(serde_json::json!({"error": "database offline"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/professions");
        then.status(200).json_body(serde_json::json!([]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/locations");
        then.status(200).json_body(serde_json::json!([]));
    });
    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/api/users/search");
        then.status(200).json_body(serde_json::json!({"data": []}));
    });

    let api = Arc::new(ApiClient::new(&server.base_url(), None).unwrap());
    let session = SearchSession::new(api, Arc::new(MemoryAddressBar::default()));

    let err = session.bootstrap().await.unwrap_err();
    assert!(matches!(
        err,
        FinderError::HttpStatus { status: 500, ref message } if message.as_deref() == Some("database offline")
    ));
    search_mock.assert_hits(0);
    assert!(session.state().result.is_none());
}

#[tokio::test]
async fn test_missing_pagination_fields_use_defaults() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users/search");
        then.status(200).json_body(serde_json::json!({
            "data": [{"id": 1, "first_name": "Ada", "last_name": "L", "username": "ada",
                      "user_info": {"status": "on sabbatical"}}]
        }));
    });

    let client = ApiClient::new(&server.base_url(), None).unwrap();
    let result = client.search_users(&[]).await.unwrap();

    assert_eq!(result.current_page, 1);
    assert_eq!(result.last_page, 1);
    assert_eq!(result.page_size, 15);
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].status().map(|s| s.label()), Some("unknown"));
}

#[tokio::test]
async fn test_csrf_cookie_is_decoded_and_sent_back() -> anyhow::Result<()> {
    let server = MockServer::start();
    let csrf_mock = server.mock(|when, then| {
        when.method(GET).path("/sanctum/csrf-cookie");
        then.status(204)
            .header("Set-Cookie", "XSRF-TOKEN=eyJpdiI6IkF%3D%3D; Path=/; SameSite=Lax");
    });
    let user_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/user")
            .header("X-XSRF-TOKEN", "eyJpdiI6IkF==");
        then.status(200).json_body(serde_json::json!({
            "data": {"id": 5, "first_name": "Grace", "last_name": "Hopper", "username": "grace"}
        }));
    });

    let client = ApiClient::new(&server.base_url(), None)?;
    let mut auth = AuthContext::new();
    let phase = auth.check(&client).await.clone();

    csrf_mock.assert();
    user_mock.assert();
    assert!(matches!(phase, AuthPhase::Authenticated(ref user) if user.username == "grace"));
    assert_eq!(client.csrf_token().await?.as_deref(), Some("eyJpdiI6IkF=="));
    Ok(())
}

#[tokio::test]
async fn test_unauthenticated_session_is_anonymous() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sanctum/csrf-cookie");
        then.status(204);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/user");
        then.status(401).json_body(serde_json::json!({"message": "Unauthenticated."}));
    });

    let client = ApiClient::new(&server.base_url(), None).unwrap();
    assert_eq!(client.csrf_token().await.unwrap(), None);

    let mut auth = AuthContext::new();
    assert_eq!(auth.check(&client).await, &AuthPhase::Anonymous);
    assert!(auth.is_ready());
    assert_eq!(auth.error(), None);
    assert!(client.current_user().await.unwrap_err().is_unauthenticated());
}
