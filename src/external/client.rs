use std::sync::LazyLock;
use std::time::Duration;

/// User-Agent sent on every upstream call, e.g. `push-relay/0.1.0`
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Global HTTP client shared by the OAuth, FCM, and Firestore clients
///
/// Initialized lazily on first access and reused for the life of the process,
/// so connections to the Google endpoints are pooled across requests.
///
/// # Features
/// - **Timeouts**: 30s request timeout, 10s connect timeout
/// - **Compression**: gzip, deflate, brotli, and zstd
/// - **HTTP/2**: adaptive window sizing and keep-alive
/// - **TLS**: Rustls (no OpenSSL dependency)
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // HTTP/2 settings
        .http2_adaptive_window(true)
        .http2_keep_alive_interval(Duration::from_secs(10))
        .http2_keep_alive_timeout(Duration::from_secs(20))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .use_rustls_tls()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
});

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_initialization() {
        let _ = &*HTTP_CLIENT;
    }

    #[tokio::test]
    async fn test_client_sends_package_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let response = HTTP_CLIENT.get(server.uri()).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 204);
    }
}
