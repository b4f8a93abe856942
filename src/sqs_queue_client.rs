use crate::error::DeviceNotifierError;
use async_trait::async_trait;

use rusoto_sqs::{SendMessageRequest, Sqs, SqsClient};
use serde_json::{json, Value};
use tracing::{info, warn};

pub struct SqsQueueClient {
    client: SqsClient,
}

#[async_trait]
pub trait PublishBatch {
    async fn send_device_batch(
        &self,
        queue_url: &str,
        devices: &[Value],
    ) -> Result<(), DeviceNotifierError>;
}

#[async_trait]
impl PublishBatch for SqsQueueClient {
    async fn send_device_batch(
        &self,
        queue_url: &str,
        devices: &[Value],
    ) -> Result<(), DeviceNotifierError> {
        if devices.is_empty() {
            warn!("Device list is empty. Nothing to send to SQS.");
            return Ok(());
        }

        info!("Sending {} devices to SQS queue: {}", devices.len(), queue_url);
        let message_body = json!({ "devices": devices }).to_string();
        self.client
            .send_message(SendMessageRequest {
                queue_url: queue_url.to_string(),
                message_body,
                ..SendMessageRequest::default()
            })
            .await?;
        info!("Successfully sent device list to SQS.");
        Ok(())
    }
}

impl SqsQueueClient {
    pub fn new_with_client(client: SqsClient) -> Self {
        SqsQueueClient { client }
    }
}
