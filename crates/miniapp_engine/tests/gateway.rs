use miniapp_core::{Credential, JobStatus};
use miniapp_engine::{ApiGateway, FailureKind, GatewaySettings, ReqwestGateway};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> ReqwestGateway {
    ReqwestGateway::new(GatewaySettings {
        base_url: server.uri(),
    })
    .expect("valid base url")
}

fn credential() -> Credential {
    Credential::new("sess_1").unwrap()
}

#[tokio::test]
async fn authenticate_posts_init_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/telegram"))
        .and(body_json(json!({ "initData": "tg_init_abc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "token": "sess_1",
            "user": { "telegram_id": 42 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = gateway_for(&server)
        .authenticate("tg_init_abc")
        .await
        .expect("auth ok");
    assert!(response.ok);
    assert_eq!(response.token, "sess_1");
    assert_eq!(response.user.telegram_id, 42);
}

#[tokio::test]
async fn authenticate_rejection_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/telegram"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Bad initData signature"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .authenticate("tg_init_forged")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::AuthRejected(401));
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn submit_generation_sends_bearer_and_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(header("authorization", "Bearer sess_1"))
        .and(body_json(json!({ "prompt": "hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "j1",
            "status": "queued",
            "echo_prompt": "hello",
            "result_text": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = gateway_for(&server)
        .submit_generation(&credential(), "hello")
        .await
        .expect("generate ok");
    assert_eq!(response.job_id(), "j1");
    assert_eq!(response.job_status(), Some(JobStatus::Queued));
    assert_eq!(response.echo_prompt(), Some("hello"));
    assert_eq!(response.result_text(), None);
}

#[tokio::test]
async fn submit_generation_accepts_unknown_status_and_extra_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "j1",
            "status": "pending",
            "eta_seconds": 5
        })))
        .mount(&server)
        .await;

    let response = gateway_for(&server)
        .submit_generation(&credential(), "hello")
        .await
        .expect("generate ok");
    assert_eq!(response.status(), "pending");
    assert_eq!(response.job_status(), None);
    assert_eq!(
        response.body(),
        &json!({ "job_id": "j1", "status": "pending", "eta_seconds": 5 })
    );
}

#[tokio::test]
async fn submit_generation_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .submit_generation(&credential(), "hello")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert!(!err.is_auth_error());
}

#[tokio::test]
async fn list_jobs_keeps_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(header("authorization", "Bearer sess_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "j2",
                "status": "done",
                "prompt": "second",
                "created_at": "2024-05-02T10:00:00+00:00",
                "result_text": "five ideas"
            },
            {
                "id": "j1",
                "status": "queued",
                "prompt": "first",
                "created_at": "2024-05-01T10:00:00+00:00",
                "result_text": null
            }
        ])))
        .mount(&server)
        .await;

    let jobs = gateway_for(&server)
        .list_jobs(&credential())
        .await
        .expect("jobs ok");
    let ids: Vec<_> = jobs.iter().map(|job| job.id.as_str()).collect();
    assert_eq!(ids, vec!["j2", "j1"]);
    assert_eq!(jobs[0].result_text.as_deref(), Some("five ideas"));
    assert_eq!(jobs[1].result_text, None);
}

#[tokio::test]
async fn list_jobs_not_found_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = gateway_for(&server)
        .list_jobs(&credential())
        .await
        .expect("404 lists as empty");
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn list_jobs_other_failures_surface() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .list_jobs(&credential())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
}

#[tokio::test]
async fn create_payment_returns_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/create"))
        .and(header("authorization", "Bearer sess_1"))
        .and(body_json(json!({ "productId": "credits_100" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://example.com/pay?product=credits_100&user=42"
        })))
        .mount(&server)
        .await;

    let response = gateway_for(&server)
        .create_payment(&credential(), "credits_100")
        .await
        .expect("payment ok");
    assert_eq!(
        response.url,
        "https://example.com/pay?product=credits_100&user=42"
    );
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/create"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .create_payment(&credential(), "credits_100")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn health_checks_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    gateway_for(&server).health().await.expect("healthy");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Nothing listens on port 9 locally.
    let gateway = ReqwestGateway::new(GatewaySettings {
        base_url: "http://127.0.0.1:9".to_string(),
    })
    .unwrap();

    let err = gateway.health().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Network);
}

#[test]
fn rejects_invalid_base_url() {
    let err = ReqwestGateway::new(GatewaySettings {
        base_url: "not a url".to_string(),
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[test]
fn trailing_slash_is_trimmed() {
    let gateway = ReqwestGateway::new(GatewaySettings {
        base_url: "https://api.example.com/v1/".to_string(),
    })
    .unwrap();
    assert_eq!(gateway.base_url(), "https://api.example.com/v1");
}
