// Integration tests for the credential prober
//
// These drive the real reqwest transport against a local mock server.

use mockito::Matcher;
use serde_json::json;

use sofit_toolkit::auth::{CredentialProber, Credentials, GraphqlProber, Protocol, RestProber};
use sofit_toolkit::http_client::HttpTransport;

// ==================================================================================================
// Test Helpers
// ==================================================================================================

fn creds() -> Credentials {
    Credentials::new("fleet@example.com", "s3cret")
}

fn transport() -> HttpTransport {
    HttpTransport::new(5).expect("Failed to create transport")
}

fn prober(base_url: &str) -> CredentialProber {
    CredentialProber::new(Box::new(transport()), base_url, false)
}

// ==================================================================================================
// REST Tests
// ==================================================================================================

#[tokio::test]
async fn test_first_rest_attempt_short_circuits() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/api/v2/auth/login")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "email": "fleet@example.com",
            "password": "s3cret"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"user":{"id":1},"token":"abc"}"#)
        .expect(1)
        .create_async()
        .await;

    let result = prober(&server.url()).probe(&creds()).await;

    login.assert_async().await;
    assert_eq!(result.token(), Some("abc"));
    assert_eq!(
        result.source_endpoint(),
        Some(format!("{}/api/v2/auth/login", server.url()).as_str())
    );
    assert_eq!(result.source_label(), Some("rest"));
    assert_eq!(result.attempts, 1);
}

#[tokio::test]
async fn test_rest_exhausts_all_combinations() {
    let mut server = mockito::Server::new_async().await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error":"invalid credentials"}"#)
        .expect(24)
        .create_async()
        .await;

    let transport = transport();
    let url = server.url();
    let result = RestProber::new(&transport, &url, false)
        .probe(&creds())
        .await;

    any_post.assert_async().await;
    assert!(!result.found());
    assert_eq!(result.attempts, 24);
}

#[tokio::test]
async fn test_non_json_response_moves_on() {
    let mut server = mockito::Server::new_async().await;
    let html = server
        .mock("POST", "/api/v2/auth/login")
        .with_status(200)
        .with_body("<html>login page</html>")
        .expect(4)
        .create_async()
        .await;
    let v2_login = server
        .mock("POST", "/api/v2/login")
        .match_body(Matcher::PartialJson(json!({"username": "fleet@example.com"})))
        .with_status(200)
        .with_body(r#"{"data":{"accessToken":"from-v2"}}"#)
        .expect(1)
        .create_async()
        .await;

    let result = prober(&server.url()).probe(&creds()).await;

    html.assert_async().await;
    v2_login.assert_async().await;
    assert_eq!(result.token(), Some("from-v2"));
    // 4 on the first path, email then username on the second
    assert_eq!(result.attempts, 6);
}

// ==================================================================================================
// GraphQL Tests
// ==================================================================================================

#[tokio::test]
async fn test_falls_back_to_graphql_sign_in() {
    let mut server = mockito::Server::new_async().await;
    let sign_in = server
        .mock("POST", "/api/v2/graphql")
        .match_body(Matcher::Regex("signIn\\(".to_string()))
        .with_status(200)
        .with_body(r#"{"data":{"signIn":{"token":"gql-token","access_token":null,"jwt":null}}}"#)
        .expect(1)
        .create_async()
        .await;

    let result = prober(&server.url()).probe(&creds()).await;

    sign_in.assert_async().await;
    let matched = result.matched.as_ref().expect("token should be found");
    assert_eq!(matched.token, "gql-token");
    assert_eq!(matched.source_label, "signIn");
    assert_eq!(matched.protocol, Protocol::GraphQl);
    assert_eq!(
        matched.source_endpoint,
        format!("{}/api/v2/graphql", server.url())
    );
    assert_eq!(result.attempts, 27);
}

#[tokio::test]
async fn test_graphql_sends_query_and_variables() {
    let mut server = mockito::Server::new_async().await;
    let login = server
        .mock("POST", "/api/v2/graphql")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"email": "fleet@example.com", "password": "s3cret"}
        })))
        .with_status(200)
        .with_body(r#"{"data":{"login":{"token":"t1"}}}"#)
        .expect(1)
        .create_async()
        .await;

    let transport = transport();
    let url = server.url();
    let result = GraphqlProber::new(&transport, &url, false)
        .probe(&creds())
        .await;

    login.assert_async().await;
    assert_eq!(result.token(), Some("t1"));
    assert_eq!(result.source_label(), Some("login"));
}

// ==================================================================================================
// Failure Tests
// ==================================================================================================

#[tokio::test]
async fn test_total_exhaustion_is_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .with_status(200)
        .with_body(r#"{"ok":false}"#)
        .expect(27)
        .create_async()
        .await;

    let result = prober(&server.url()).probe(&creds()).await;

    any_post.assert_async().await;
    assert!(!result.found());
    assert_eq!(result.token(), None);
    assert_eq!(result.source_endpoint(), None);
    assert_eq!(result.source_label(), None);
}

#[tokio::test]
async fn test_connection_refused_does_not_abort() {
    // Nothing listens on port 1; every attempt is a transport error
    let result = prober("http://127.0.0.1:1").probe(&creds()).await;

    assert!(!result.found());
    assert_eq!(result.attempts, 27);
}
