use crate::device_api_client::{DeviceApi, DeviceApiClient};
use crate::error::DeviceNotifierError;
use crate::rules::{has_panic_press, has_spoiled_food_reading};
use crate::secrets_client::{ResolveToken, SecretsTokenClient};
use crate::sqs_queue_client::{PublishBatch, SqsQueueClient};
use crate::time_range::{TimeRange, MESSAGE_WINDOW_MINUTES};

use chrono::Utc;
use once_cell::sync::Lazy;
use rusoto_core::Region;
use rusoto_secretsmanager::SecretsManagerClient;
use rusoto_sqs::SqsClient;
use serde_json::{json, Value};
use std::env;
use tracing::{error, info, warn};

// Shared across warm invocations; nothing invocation-specific lives here.
static SQS_QUEUE: Lazy<SqsQueueClient> =
    Lazy::new(|| SqsQueueClient::new_with_client(SqsClient::new(Region::default())));
static SECRETS: Lazy<SecretsTokenClient> = Lazy::new(|| {
    SecretsTokenClient::new_with_client(
        SecretsManagerClient::new(Region::default()),
        env::var("SECRET_ARN").ok().filter(|arn| !arn.is_empty()),
    )
});

pub struct Config {
    pub realtime_queue_url: String,
    pub spoiled_food_queue_url: String,
    pub panic_alert_queue_url: String,
    pub device_api_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, DeviceNotifierError> {
        Ok(Config {
            realtime_queue_url: require_env("sqs_realtime_box_QUEUE")?,
            spoiled_food_queue_url: require_env("sqs_spoiled_food_QUEUE")?,
            panic_alert_queue_url: require_env("sqs_panic_alert_QUEUE")?,
            device_api_url: env::var("DEVICE_API_URL").ok().filter(|url| !url.is_empty()),
        })
    }
}

fn require_env(name: &'static str) -> Result<String, DeviceNotifierError> {
    env::var(name).map_err(|_| DeviceNotifierError::MissingEnvVar(name))
}

/// Entry point for one invocation. Every failure funnels into a single
/// FAILED envelope; the handler itself never errors out.
pub async fn handle(_event: Value) -> Value {
    info!("Function execution started.");
    match run().await {
        Ok(count) => success_response(count),
        Err(error) => {
            error!("An unexpected error occurred during execution: {}", error);
            failure_response(&error)
        }
    }
}

async fn run() -> Result<usize, DeviceNotifierError> {
    let config = Config::from_env()?;
    // Fail-fast before any network call if the API endpoint is unset.
    let devices_url = config
        .device_api_url
        .clone()
        .ok_or(DeviceNotifierError::MissingDeviceApiUrl)?;
    let api = DeviceApiClient::new(devices_url);
    process(&*SECRETS, &api, &*SQS_QUEUE, &config).await
}

pub async fn process<S, A, Q>(
    secrets: &S,
    api: &A,
    queues: &Q,
    config: &Config,
) -> Result<usize, DeviceNotifierError>
where
    S: ResolveToken + Sync,
    A: DeviceApi + Sync,
    Q: PublishBatch + Sync,
{
    let token = secrets.resolve_token().await?;

    let items = api.list_devices(&token).await?;
    info!("Successfully fetched summary for {} devices.", items.len());

    let window = TimeRange::trailing_minutes(Utc::now(), MESSAGE_WINDOW_MINUTES);
    let batch = enrich_devices(api, &token, items, &window).await;

    if has_spoiled_food_reading(&batch) {
        queues
            .send_device_batch(&config.spoiled_food_queue_url, &batch)
            .await?;
    }
    if has_panic_press(&batch) {
        queues
            .send_device_batch(&config.panic_alert_queue_url, &batch)
            .await?;
    }
    // The realtime queue always gets the batch, whatever the rules decided.
    queues
        .send_device_batch(&config.realtime_queue_url, &batch)
        .await?;

    Ok(batch.len())
}

/// Attaches each device's recent messages to its own summary object. One
/// shared window keeps the snapshot instant consistent across the batch.
async fn enrich_devices<A>(
    api: &A,
    token: &str,
    items: Vec<Value>,
    window: &TimeRange,
) -> Vec<Value>
where
    A: DeviceApi + Sync,
{
    let mut batch = Vec::with_capacity(items.len());
    for mut device in items {
        let device_id = match device.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            // Numeric ids ride along as their decimal form in the query.
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                warn!("Skipping a device because it has no ID: {}", device);
                continue;
            }
        };

        info!(
            "Fetching last {} minutes of messages for device {}...",
            MESSAGE_WINDOW_MINUTES, device_id
        );
        let messages = match api.recent_messages(token, &device_id, window).await {
            Ok(messages) => {
                info!("Found {} messages for device {}.", messages.len(), device_id);
                messages
            }
            Err(device_error) => {
                // A per-device failure keeps the device in the batch with
                // an empty message list; it never aborts the invocation.
                error!(
                    "Failed to fetch messages for device {}: {}",
                    device_id, device_error
                );
                Vec::new()
            }
        };

        if let Value::Object(summary) = &mut device {
            summary.insert("messages".to_string(), Value::Array(messages));
        }
        batch.push(device);
    }
    batch
}

fn success_response(enriched_devices_sent: usize) -> Value {
    json!({
        "statusCode": 200,
        "body": json!({
            "status": "SUCCESS",
            "enriched_devices_sent": enriched_devices_sent,
        })
        .to_string(),
    })
}

fn failure_response(error: &DeviceNotifierError) -> Value {
    json!({
        "statusCode": 500,
        "body": json!({
            "status": "FAILED",
            "reason": error.to_string(),
        })
        .to_string(),
    })
}
