//! HTTP client for the Hetzner Cloud load balancer API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::debug;

use lbwatch_core::{FetchError, FetchResult, LoadBalancerSnapshot, SnapshotFetcher};

use crate::wire::{ErrorResponse, ListResponse};

/// Public Hetzner Cloud API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://api.hetzner.cloud/v1";

/// Largest page size the API accepts.
const PER_PAGE: u32 = 50;

/// Connection settings for `HcloudClient`.
#[derive(Debug, Clone)]
pub struct HcloudConfig {
    /// API base URL without a trailing slash.
    pub endpoint: String,
    /// API token (sent as a bearer token).
    pub token: String,
    /// Transport timeout for a single HTTP request.
    pub request_timeout: Duration,
}

impl HcloudConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Lists load balancers through the Hetzner Cloud API.
#[derive(Debug, Clone)]
pub struct HcloudClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HcloudClient {
    /// Build a client. Fails if the token is empty or not a valid header value.
    pub fn new(config: HcloudConfig) -> FetchResult<Self> {
        if config.token.trim().is_empty() {
            return Err(FetchError::Config("API token is empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| FetchError::Config(format!("API token is not a valid header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .user_agent(concat!("lbwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a single page of load balancers.
    async fn list_page(&self, page: u64) -> FetchResult<ListResponse> {
        let url = format!("{}/load_balancers", self.endpoint);
        let response = self
            .http
            .get(&url)
            .query(&[("page", page.to_string()), ("per_page", PER_PAGE.to_string())])
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => format!("{}: {}", err.error.code, err.error.message),
                Err(_) => body,
            };
            return Err(FetchError::from_status(status.as_u16(), message));
        }

        response.json::<ListResponse>().await.map_err(classify_transport)
    }

    /// Fetch every page and collapse them into one list.
    pub async fn list_load_balancers(&self) -> FetchResult<Vec<LoadBalancerSnapshot>> {
        let mut snapshots = Vec::new();
        let mut page = 1;

        loop {
            let response = self.list_page(page).await?;
            let next = response.next_page();
            snapshots.extend(response.load_balancers.into_iter().map(|lb| lb.into_snapshot()));

            match next {
                Some(next) if next > page => page = next,
                Some(next) => {
                    return Err(FetchError::Decode(format!(
                        "pagination did not advance (page {page} → {next})"
                    )));
                }
                None => break,
            }
        }

        debug!(loadbalancers = snapshots.len(), pages = page, "load balancers listed");
        Ok(snapshots)
    }
}

impl SnapshotFetcher for HcloudClient {
    async fn fetch(&self) -> FetchResult<Vec<LoadBalancerSnapshot>> {
        self.list_load_balancers().await
    }
}

fn classify_transport(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else if e.is_decode() {
        FetchError::Decode(e.to_string())
    } else if let Some(status) = e.status() {
        FetchError::from_status(status.as_u16(), e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::{Query, State};
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;

    const TOKEN: &str = "test-token";

    #[derive(Clone)]
    struct Stub {
        calls: Arc<AtomicUsize>,
        mode: &'static str,
    }

    async fn list(
        State(stub): State<Stub>,
        headers: AxumHeaders,
        Query(query): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        stub.calls.fetch_add(1, Ordering::SeqCst);

        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {TOKEN}"));
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                r#"{"error":{"code":"unauthorized","message":"unable to authenticate"}}"#.to_string(),
            );
        }

        let page: u64 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        match stub.mode {
            "rate_limited" => (
                StatusCode::TOO_MANY_REQUESTS,
                r#"{"error":{"code":"rate_limit_exceeded","message":"slow down"}}"#.to_string(),
            ),
            "garbage" => (StatusCode::OK, "not json".to_string()),
            "stuck" => (
                StatusCode::OK,
                r#"{"load_balancers":[],"meta":{"pagination":{"next_page":1}}}"#.to_string(),
            ),
            _ => {
                let next = if page < 2 { "2" } else { "null" };
                let body = format!(
                    r#"{{
                        "load_balancers": [{{
                            "id": {page},
                            "name": "lb{page}",
                            "targets": [{{"type": "ip", "ip": {{"ip": "10.0.0.{page}"}},
                                        "health_status": [{{"listen_port": 80, "status": "healthy"}}]}}],
                            "services": [],
                            "ingoing_traffic": 10,
                            "outgoing_traffic": 20
                        }}],
                        "meta": {{"pagination": {{"page": {page}, "next_page": {next}}}}}
                    }}"#
                );
                (StatusCode::OK, body)
            }
        }
    }

    async fn start_stub(mode: &'static str) -> (String, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/v1/load_balancers", get(list))
            .with_state(Stub {
                calls: calls.clone(),
                mode,
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/v1"), calls)
    }

    fn client(endpoint: String, token: &str) -> HcloudClient {
        HcloudClient::new(HcloudConfig {
            endpoint,
            token: token.to_string(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn follows_pagination() {
        let (endpoint, calls) = start_stub("ok").await;
        let snapshots = client(endpoint, TOKEN).fetch().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let names: Vec<_> = snapshots.iter().map(|lb| lb.name.as_str()).collect();
        assert_eq!(names, vec!["lb1", "lb2"]);
        assert_eq!(snapshots[1].targets[0].identifier, "10.0.0.2");
        assert_eq!(snapshots[0].outgoing_traffic, 20);
    }

    #[tokio::test]
    async fn trailing_slash_in_endpoint_is_ignored() {
        let (endpoint, _) = start_stub("ok").await;
        let snapshots = client(format!("{endpoint}/"), TOKEN).fetch().await.unwrap();
        assert_eq!(snapshots.len(), 2);
    }

    #[tokio::test]
    async fn bad_token_is_permanent() {
        let (endpoint, _) = start_stub("ok").await;
        let err = client(endpoint, "wrong").fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Unauthorized { status: 401, .. }), "{err:?}");
        assert!(!err.is_transient());
        assert!(err.to_string().contains("unable to authenticate"));
    }

    #[tokio::test]
    async fn rate_limit_is_transient() {
        let (endpoint, _) = start_stub("rate_limited").await;
        let err = client(endpoint, TOKEN).fetch().await.unwrap_err();
        assert_eq!(err, FetchError::RateLimited);
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn undecodable_body_is_permanent() {
        let (endpoint, _) = start_stub("garbage").await;
        let err = client(endpoint, TOKEN).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn pagination_loop_is_detected() {
        let (endpoint, calls) = start_stub("stuck").await;
        let err = client(endpoint, TOKEN).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "{err:?}");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transient() {
        // Bind and drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}/v1"), TOKEN).fetch().await.unwrap_err();
        assert!(err.is_transient(), "{err:?}");
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = HcloudClient::new(HcloudConfig::new("  ")).unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let err = HcloudClient::new(HcloudConfig::new("abc\ndef")).unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }
}
