use actix_web::http::Method;
use actix_web::web::{self, Bytes};
use actix_web::{HttpRequest, HttpResponse};
use netviz_gateway::relay::{http_client, UpstreamForwarder, MAX_RELAY_BYTES};
use netviz_gateway::{Error, HostAllowlist};
use serde_json::json;

use super::support::{loopback_allowlist, spawn_upstream};

/// Forwarder admitting the loopback mock upstreams.
fn loopback_forwarder() -> UpstreamForwarder {
    UpstreamForwarder::new(http_client().unwrap(), loopback_allowlist())
}

/// Forwarder with the production allowlist, for precondition tests that
/// never reach the network.
fn production_forwarder() -> UpstreamForwarder {
    UpstreamForwarder::new(http_client().unwrap(), HostAllowlist::default())
}

async fn echo_body(body: Bytes) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(body)
}

async fn echo_headers(req: HttpRequest) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    HttpResponse::Ok().json(json!({
        "authorization": header("Authorization"),
        "contract": header("X-Contract-Number"),
        "userAgent": header("User-Agent"),
    }))
}

#[tokio::test]
async fn test_missing_url_parameter() {
    let result = production_forwarder()
        .forward(Method::GET, None, Some("abc"), None, None)
        .await;
    match result {
        Err(Error::MissingParameter(name)) => assert_eq!(name, "url"),
        other => panic!("expected MissingParameter, got {:?}", other.map(|_| ())),
    }

    // Whitespace-only counts as missing too
    let result = production_forwarder()
        .forward(Method::GET, Some("   "), Some("abc"), None, None)
        .await;
    assert!(matches!(result, Err(Error::MissingParameter(_))));
}

#[tokio::test]
async fn test_non_http_scheme_rejected() {
    let result = production_forwarder()
        .forward(
            Method::GET,
            Some("file:///etc/passwd"),
            Some("abc"),
            None,
            None,
        )
        .await;
    assert!(matches!(result, Err(Error::InvalidScheme)));
}

#[tokio::test]
async fn test_forbidden_target_names_host() {
    let result = production_forwarder()
        .forward(
            Method::GET,
            Some("https://evil.example.com/x"),
            Some("abc"),
            None,
            None,
        )
        .await;
    match result {
        Err(err @ Error::ForbiddenTarget(_)) => {
            let message = err.to_string();
            assert!(
                message.contains("evil.example.com"),
                "error should name the rejected host: {}",
                message
            );
            assert!(
                !message.contains("/x"),
                "error must not echo the full URL: {}",
                message
            );
        }
        other => panic!("expected ForbiddenTarget, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_missing_token_rejected_before_any_network_call() {
    // api.ionos.com is allow-listed but never contacted: the credential
    // check fails first, and no mock upstream exists to answer anyway.
    let result = production_forwarder()
        .forward(
            Method::GET,
            Some("https://api.ionos.com/cloudapi/v6/datacenters"),
            None,
            None,
            None,
        )
        .await;
    assert!(matches!(result, Err(Error::MissingCredential)));

    let result = production_forwarder()
        .forward(
            Method::GET,
            Some("https://api.ionos.com/cloudapi/v6/datacenters"),
            Some(""),
            None,
            None,
        )
        .await;
    assert!(matches!(result, Err(Error::MissingCredential)), "empty token counts as missing");
}

#[tokio::test]
async fn test_relays_status_content_type_and_body() {
    let base = spawn_upstream(|cfg| {
        cfg.route(
            "/datacenters",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .content_type("application/vnd.ionos+json")
                    .body(r#"{"items":[{"id":"dc-1"}]}"#)
            }),
        );
    })
    .await;

    let forwarder = loopback_forwarder();
    let url = format!("{}/datacenters", base);

    let first = forwarder
        .forward(Method::GET, Some(&url), Some("token"), None, None)
        .await
        .expect("relay should succeed");
    assert_eq!(first.status.as_u16(), 200);
    assert_eq!(first.content_type, "application/vnd.ionos+json");
    assert_eq!(&first.body[..], br#"{"items":[{"id":"dc-1"}]}"#);

    // Idempotence: the same request relays a byte-identical body
    let second = forwarder
        .forward(Method::GET, Some(&url), Some("token"), None, None)
        .await
        .expect("repeat relay should succeed");
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_post_body_forwarded_verbatim() {
    let base = spawn_upstream(|cfg| {
        cfg.route("/echo", web::post().to(echo_body));
    })
    .await;

    let payload = Bytes::from_static(br#"{"properties":{"name":"lan-1"}}"#);
    let relay = loopback_forwarder()
        .forward(
            Method::POST,
            Some(&format!("{}/echo", base)),
            Some("token"),
            None,
            Some(payload.clone()),
        )
        .await
        .expect("POST relay should succeed");

    assert_eq!(relay.body, payload);
}

#[tokio::test]
async fn test_outbound_headers_rewritten() {
    let base = spawn_upstream(|cfg| {
        cfg.route("/headers", web::get().to(echo_headers));
    })
    .await;

    let relay = loopback_forwarder()
        .forward(
            Method::GET,
            Some(&format!("{}/headers", base)),
            Some("secret-token"),
            Some("31415926"),
            None,
        )
        .await
        .expect("relay should succeed");

    let seen: serde_json::Value = serde_json::from_slice(&relay.body).unwrap();
    assert_eq!(seen["authorization"], "Bearer secret-token");
    assert_eq!(seen["contract"], "31415926");
    assert!(
        seen["userAgent"]
            .as_str()
            .unwrap()
            .starts_with("netviz-gateway/"),
        "fixed user agent expected, got {}",
        seen["userAgent"]
    );
}

#[tokio::test]
async fn test_oversized_response_aborted_without_partial_relay() {
    let base = spawn_upstream(|cfg| {
        cfg.route(
            "/huge",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .content_type("application/octet-stream")
                    .body(vec![b'x'; MAX_RELAY_BYTES + 1])
            }),
        );
    })
    .await;

    let result = loopback_forwarder()
        .forward(
            Method::GET,
            Some(&format!("{}/huge", base)),
            Some("token"),
            None,
            None,
        )
        .await;

    match result {
        Err(Error::ResponseTooLarge(limit)) => assert_eq!(limit, MAX_RELAY_BYTES),
        other => panic!("expected ResponseTooLarge, got {:?}", other.map(|r| r.body.len())),
    }
}

#[tokio::test]
async fn test_response_at_exactly_the_cap_is_relayed() {
    let base = spawn_upstream(|cfg| {
        cfg.route(
            "/exact",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .content_type("application/octet-stream")
                    .body(vec![b'x'; MAX_RELAY_BYTES])
            }),
        );
    })
    .await;

    let relay = loopback_forwarder()
        .forward(
            Method::GET,
            Some(&format!("{}/exact", base)),
            Some("token"),
            None,
            None,
        )
        .await
        .expect("body exactly at the cap should relay");
    assert_eq!(relay.body.len(), MAX_RELAY_BYTES);
}

#[tokio::test]
async fn test_upstream_error_passthrough_with_truncated_detail() {
    let base = spawn_upstream(|cfg| {
        cfg.route(
            "/fail",
            web::get().to(|| async {
                HttpResponse::InternalServerError()
                    .content_type("text/plain")
                    .body("e".repeat(3000))
            }),
        );
    })
    .await;

    let result = loopback_forwarder()
        .forward(
            Method::GET,
            Some(&format!("{}/fail", base)),
            Some("token"),
            None,
            None,
        )
        .await;

    match result {
        Err(Error::UpstreamHttpError { status, detail }) => {
            assert_eq!(status, 500);
            assert_eq!(detail.chars().count(), 500, "detail is truncated to 500 characters");
        }
        other => panic!("expected UpstreamHttpError, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_unreachable_upstream_maps_to_bad_gateway() {
    // Bind a port and immediately release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = loopback_forwarder()
        .forward(
            Method::GET,
            Some(&format!("http://127.0.0.1:{}/x", port)),
            Some("token"),
            None,
            None,
        )
        .await;

    assert!(matches!(result, Err(Error::UpstreamUnreachable(_))));
}
