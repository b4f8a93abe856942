mod device_api_client;
mod error;
mod handler;
mod rules;
mod secrets_client;
mod sqs_queue_client;
mod time_range;

use lambda_runtime::{handler_fn, Context, Error};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    lambda_runtime::run(handler_fn(snapshot_handler)).await?;
    Ok(())
}

async fn snapshot_handler(event: Value, _: Context) -> Result<Value, Error> {
    Ok(handler::handle(event).await)
}
