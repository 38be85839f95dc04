use super::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, provider: Provider, api_key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.providers.insert(
        provider.as_str().to_string(),
        ProviderConfig {
            api_key: api_key.map(String::from),
            base_url: Some(format!("{}/v1/{}", server.uri(), provider)),
            ..Default::default()
        },
    );
    config
}

fn messages() -> Vec<ChatMessage> {
    vec![ChatMessage::user("group these")]
}

#[tokio::test]
async fn test_anthropic_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/anthropic"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", ANTHROPIC_VERSION))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20240620",
            "max_tokens": 8192,
            "temperature": 0.5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "hi"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = UpstreamClient::new(config_for(&server, Provider::Anthropic, Some("sk-ant-test")));
    let body = client.forward(Provider::Anthropic, &messages()).await.unwrap();
    assert_eq!(body["content"][0]["text"], "hi");

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["messages"][0]["content"], "group these");
}

#[tokio::test]
async fn test_groq_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/groq"))
        .and(header("authorization", "Bearer gsk-test"))
        .and(body_partial_json(json!({"model": "llama-3.1-8b-instant"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = UpstreamClient::new(config_for(&server, Provider::Groq, Some("gsk-test")));
    let body = client.forward(Provider::Groq, &messages()).await.unwrap();
    assert_eq!(body["choices"][0]["message"]["content"], "ok");

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent.get("max_tokens").is_none());
}

#[tokio::test]
async fn test_upstream_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
        .mount(&server)
        .await;

    let client = UpstreamClient::new(config_for(&server, Provider::Anthropic, Some("bad")));
    let err = client.forward(Provider::Anthropic, &messages()).await.unwrap_err();
    match err {
        RelayError::Upstream { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid x-api-key");
        }
        other => panic!("Expected Upstream, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_api_key_is_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = UpstreamClient::new(config_for(&server, Provider::Groq, Some("")));
    let err = client.forward(Provider::Groq, &messages()).await.unwrap_err();
    assert!(matches!(err, RelayError::MissingApiKey(Provider::Groq)));
}
