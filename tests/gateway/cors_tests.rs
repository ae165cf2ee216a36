use super::support::start_gateway;

fn header<'a>(response: &'a reqwest::Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_localhost_origin_echoed_exactly() {
    let gateway = start_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", gateway.base_url))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .expect("request");

    assert_eq!(
        header(&response, "Access-Control-Allow-Origin"),
        "http://localhost:5173"
    );

    gateway.handle.shutdown().await;
}

#[tokio::test]
async fn test_missing_origin_falls_back_to_gateway_origin() {
    let gateway = start_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", gateway.base_url))
        .send()
        .await
        .expect("request");

    assert_eq!(
        header(&response, "Access-Control-Allow-Origin"),
        format!("http://localhost:{}", gateway.handle.port()),
        "fallback uses the actually-bound port"
    );

    gateway.handle.shutdown().await;
}

#[tokio::test]
async fn test_foreign_origin_never_echoed() {
    let gateway = start_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", gateway.base_url))
        .header("Origin", "http://evil.com")
        .send()
        .await
        .expect("request");

    let allowed = header(&response, "Access-Control-Allow-Origin");
    assert_eq!(
        allowed,
        format!("http://localhost:{}", gateway.handle.port())
    );
    assert_ne!(allowed, "*", "credentials flow through this proxy, never wildcard");

    gateway.handle.shutdown().await;
}

#[tokio::test]
async fn test_allow_and_expose_header_sets() {
    let gateway = start_gateway().await;
    let client = reqwest::Client::new();

    let response = client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/proxy", gateway.base_url),
        )
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .expect("preflight");

    assert_eq!(header(&response, "Access-Control-Allow-Methods"), "GET, POST, OPTIONS");

    let allowed_headers = header(&response, "Access-Control-Allow-Headers").to_string();
    for name in ["Content-Type", "X-Token", "Authorization", "X-Contract-Number", "Mcp-Session-Id"] {
        assert!(
            allowed_headers.contains(name),
            "allow-headers must list {}: {}",
            name,
            allowed_headers
        );
    }

    assert!(
        header(&response, "Access-Control-Expose-Headers").contains("Mcp-Session-Id"),
        "browser code must be able to read the session id"
    );

    gateway.handle.shutdown().await;
}
