use crate::HttpTransport;
use gqlbind_core::OperationKind;
use gqlbind_core::Value;
use gqlbind_core::binder::BoundRequest;
use gqlbind_core::document::RequestTemplate;
use gqlbind_core::schema::SchemaRegistry;
use gqlbind_core::transport::QueryTransport;
use gqlbind_core::transport::TransportError;
use indexmap::IndexMap;
use serde_json::json;
use std::time::Duration;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn hero_request() -> BoundRequest {
    let registry = SchemaRegistry::builtin();
    let template = RequestTemplate::assemble(
        &registry,
        "query Hero($episode: String) { hero(episode: $episode, limit: &limit) { name } }",
        None,
        OperationKind::Query,
    ).expect("request assembles");
    let mut values = IndexMap::new();
    values.insert("episode".to_string(), Value::from("JEDI"));
    values.insert("limit".to_string(), Value::Int(3));
    template.bind(&registry, &values).expect("request binds")
}

#[tokio::test]
async fn posts_the_wire_body_and_parses_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer s3cret"))
        .and(header("x-client", "gqlbind"))
        .and(body_json(json!({
            "query": "query Hero($episode: String) { hero(episode: $episode, limit: 3) { name } }",
            "operationName": "Hero",
            "variables": {"episode": "JEDI"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"hero": {"name": "R2-D2"}},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(format!("{}/graphql", server.uri()))
        .with_bearer_token("s3cret")
        .with_header("X-Client", "gqlbind")
        .build()
        .unwrap();
    let envelope = transport.send(&hero_request()).await.unwrap();

    assert_eq!(envelope.data, Some(json!({"hero": {"name": "R2-D2"}})));
    assert!(envelope.errors.is_empty());
}

#[tokio::test]
async fn error_envelope_with_error_status_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"message": "Unknown argument \"limit\"", "locations": [{"line": 1, "column": 50}]}],
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri()).build().unwrap();
    let envelope = transport.send(&hero_request()).await.unwrap();

    assert_eq!(envelope.errors.len(), 1);
    assert_eq!(envelope.errors[0].locations[0].column, 50);
}

#[tokio::test]
async fn other_error_statuses_become_http_status_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri()).build().unwrap();

    assert_eq!(
        transport.send(&hero_request()).await,
        Err(TransportError::HttpStatus {
            body: "bad gateway".to_string(),
            status: 502,
        }),
    );
}

#[tokio::test]
async fn non_graphql_bodies_are_invalid_responses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri()).build().unwrap();

    assert!(matches!(
        transport.send(&hero_request()).await,
        Err(TransportError::InvalidResponse(_)),
    ));
}

#[tokio::test]
async fn slow_servers_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {}}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::builder(server.uri())
        .with_timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    assert!(matches!(transport.send(&hero_request()).await, Err(TransportError::Http(_))));
}

#[test]
fn endpoint_must_be_an_http_url() {
    assert!(matches!(
        HttpTransport::builder("not a url").build(),
        Err(TransportError::InvalidUrl { .. }),
    ));
    assert!(matches!(
        HttpTransport::builder("ws://localhost:4000/graphql").build(),
        Err(TransportError::InvalidUrl { ref reason, .. }) if reason.contains("ws"),
    ));
    assert!(matches!(
        HttpTransport::builder("http://localhost:4000").with_header("bad header", "x").build(),
        Err(TransportError::Http(_)),
    ));
}
