use aws_lambda_events::event::apigw::ApiGatewayProxyRequest;
use hello_world::{event_to_carrier, CheckIp};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use traceparent_lite::{Exporter, TraceContext, TracerProvider};
use traceparent_lite_lambda::instrument_handler;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout is left to span documents
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();

    let provider = TracerProvider::from_lambda_env()?;

    let check_ip = CheckIp::new();
    let handler = instrument_handler(
        provider.tracer(),
        move |request: ApiGatewayProxyRequest, context: TraceContext<Exporter>| {
            let check_ip = check_ip.clone();
            async move { check_ip.handle(request, context).await }
        },
        event_to_carrier,
    )
    .with_trigger("http");

    let result = lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = handler.clone();
        async move { handler.invoke(event).await }
    }))
    .await;

    // flush all spans before the process exits
    tracing::info!("runtime loop ended, shutting down tracer provider");
    provider.shutdown()?;
    result
}
