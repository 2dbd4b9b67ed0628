use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use reqwest::StatusCode;
use traceparent_lite::{Client, Context, RemoteNamespace, SpanSession, TraceContext};

use crate::error::HandlerError;

/// Address of the IP-echo service.
pub const DEFAULT_HTTP_GET_ADDRESS: &str = "https://checkip.amazonaws.com";

const SERVICE_NAME: &str = "checkip.amazonaws.com";

/// Invocation handler asking the IP-echo service for the function's public IP.
#[derive(Clone, Debug)]
pub struct CheckIp {
    client: reqwest::Client,
    url: String,
}

impl Default for CheckIp {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckIp {
    /// Creates a handler calling [`DEFAULT_HTTP_GET_ADDRESS`] with the
    /// transport's default settings.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_HTTP_GET_ADDRESS)
    }

    pub(crate) fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Handles one invocation.
    ///
    /// The request itself is not consulted. The outbound GET is recorded as a
    /// client span within `context`.
    pub async fn handle<C: Client>(
        &self,
        _request: ApiGatewayProxyRequest,
        context: TraceContext<C>,
    ) -> Result<ApiGatewayProxyResponse, HandlerError> {
        let mut session = context.enter_span(RemoteNamespace::new(SERVICE_NAME, "GET", &self.url));
        let ip = match self.get_ip(&mut session).await {
            Ok(ip) => ip,
            Err(e) => {
                session.record_error(e.to_string());
                return Err(e);
            }
        };

        Ok(ApiGatewayProxyResponse {
            status_code: 200,
            body: Some(Body::Text(format!("Hello, {ip}"))),
            ..Default::default()
        })
    }

    async fn get_ip<C: Client>(
        &self,
        session: &mut SpanSession<C, RemoteNamespace>,
    ) -> Result<String, HandlerError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if let Some(namespace) = session.namespace_mut() {
            namespace.response_status(status.as_u16());
        }
        if status != StatusCode::OK {
            return Err(HandlerError::NonSuccessStatus(status));
        }

        let ip = response.bytes().await?;
        if ip.is_empty() {
            return Err(HandlerError::EmptyPayload);
        }
        Ok(String::from_utf8_lossy(&ip).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traceparent_lite::{MemoryClient, TracerProvider};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn upstream(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(template)
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    fn body_text(response: &ApiGatewayProxyResponse) -> &str {
        match &response.body {
            Some(Body::Text(text)) => text,
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn greets_with_ip() {
        let server = upstream(ResponseTemplate::new(200).set_body_string("203.0.113.7\n")).await;
        let client = MemoryClient::new();
        let provider = TracerProvider::new(client.clone());

        let response = CheckIp::with_url(server.uri())
            .handle(
                ApiGatewayProxyRequest::default(),
                TraceContext::new(provider.tracer(), None),
            )
            .await
            .unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(body_text(&response), "Hello, 203.0.113.7\n");

        provider.shutdown().unwrap();
        let spans = client.documents();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0]["name"], "checkip.amazonaws.com");
        assert_eq!(spans[0]["kind"], "client");
        assert_eq!(spans[0]["http"]["request"]["method"], "GET");
        assert_eq!(spans[0]["http"]["request"]["url"], server.uri());
        assert_eq!(spans[0]["http"]["response"]["status"], 200);
        assert!(spans[0].get("error").is_none());
    }

    #[tokio::test]
    async fn sends_no_custom_headers() {
        let server = upstream(ResponseTemplate::new(200).set_body_string("203.0.113.7")).await;
        let provider = TracerProvider::new(MemoryClient::new());
        let parent = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

        CheckIp::with_url(server.uri())
            .handle(
                ApiGatewayProxyRequest::default(),
                TraceContext::new(provider.tracer(), Some(parent.parse().unwrap())),
            )
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("traceparent").is_none());
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn non_200_status_is_an_error() {
        for status in [201u16, 404, 503] {
            let server =
                upstream(ResponseTemplate::new(status).set_body_string("203.0.113.7")).await;
            let client = MemoryClient::new();
            let provider = TracerProvider::new(client.clone());

            let err = CheckIp::with_url(server.uri())
                .handle(
                    ApiGatewayProxyRequest::default(),
                    TraceContext::new(provider.tracer(), None),
                )
                .await
                .unwrap_err();
            assert!(
                matches!(err, HandlerError::NonSuccessStatus(s) if s.as_u16() == status),
                "unexpected error for {status}: {err:?}"
            );

            provider.shutdown().unwrap();
            let spans = client.documents();
            assert_eq!(spans[0]["error"], true);
            assert_eq!(spans[0]["http"]["response"]["status"], status);
        }
    }

    #[tokio::test]
    async fn empty_body_is_an_error() {
        let server = upstream(ResponseTemplate::new(200)).await;
        let provider = TracerProvider::new(MemoryClient::new());

        let err = CheckIp::with_url(server.uri())
            .handle(
                ApiGatewayProxyRequest::default(),
                TraceContext::new(provider.tracer(), None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::EmptyPayload));
        assert_eq!(err.to_string(), "No IP in HTTP response");
    }

    #[tokio::test]
    async fn network_failure_is_a_transport_error() {
        // nothing listens on the address once the listener is gone
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let uri = format!("http://{addr}");
        let client = MemoryClient::new();
        let provider = TracerProvider::new(client.clone());

        let err = CheckIp::with_url(uri)
            .handle(
                ApiGatewayProxyRequest::default(),
                TraceContext::new(provider.tracer(), None),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::TransportError(_)));

        provider.shutdown().unwrap();
        let spans = client.documents();
        assert_eq!(spans[0]["error"], true);
        assert!(spans[0]["http"].get("response").is_none());
    }

    #[test]
    fn default_address_is_checkip() {
        assert_eq!(CheckIp::new().url, "https://checkip.amazonaws.com");
    }
}
