use crate::error::DeviceNotifierError;
use crate::time_range::TimeRange;
use async_trait::async_trait;

use serde_json::Value;
use std::time::Duration;
use tracing::info;

const LIST_DEVICES_TIMEOUT: Duration = Duration::from_secs(10);
const RECENT_MESSAGES_TIMEOUT: Duration = Duration::from_secs(15);

pub struct DeviceApiClient {
    client: reqwest::Client,
    devices_url: String,
    messages_url: String,
}

#[async_trait]
pub trait DeviceApi {
    async fn list_devices(&self, token: &str) -> Result<Vec<Value>, DeviceNotifierError>;

    async fn recent_messages(
        &self,
        token: &str,
        device_id: &str,
        window: &TimeRange,
    ) -> Result<Vec<Value>, DeviceNotifierError>;
}

#[async_trait]
impl DeviceApi for DeviceApiClient {
    async fn list_devices(&self, token: &str) -> Result<Vec<Value>, DeviceNotifierError> {
        info!("Requesting initial device list from {}", self.devices_url);
        let body: Value = self
            .client
            .get(&self.devices_url)
            .bearer_auth(token)
            .query(&[("includeState", "true")])
            .timeout(LIST_DEVICES_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(take_items(body))
    }

    async fn recent_messages(
        &self,
        token: &str,
        device_id: &str,
        window: &TimeRange,
    ) -> Result<Vec<Value>, DeviceNotifierError> {
        let start = window.start_param();
        let end = window.end_param();
        let body: Value = self
            .client
            .get(&self.messages_url)
            .bearer_auth(token)
            .query(&[
                ("deviceId", device_id),
                ("start", start.as_str()),
                ("end", end.as_str()),
            ])
            .timeout(RECENT_MESSAGES_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(take_items(body))
    }
}

impl DeviceApiClient {
    pub fn new(devices_url: String) -> Self {
        let messages_url = derive_messages_url(&devices_url);
        DeviceApiClient {
            client: reqwest::Client::new(),
            devices_url,
            messages_url,
        }
    }
}

/// The messages endpoint lives on the same host with one path segment swapped.
fn derive_messages_url(devices_url: &str) -> String {
    devices_url.replace("/devices", "/messages")
}

fn take_items(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => vec![],
        },
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use crate::device_api_client::{derive_messages_url, take_items};
    use serde_json::json;

    #[test]
    fn test_derive_messages_url() {
        assert_eq!(
            derive_messages_url("https://api.nrfcloud.com/v1/devices"),
            "https://api.nrfcloud.com/v1/messages"
        );
    }

    #[test]
    fn test_take_items() {
        let body = json!({"items": [{"id": "box-1"}, {"id": "box-2"}], "total": 2});

        let items = take_items(body);
        assert_eq!(items, vec![json!({"id": "box-1"}), json!({"id": "box-2"})]);
    }

    #[test]
    fn test_take_items_when_absent() {
        assert_eq!(take_items(json!({"total": 0})), Vec::<serde_json::Value>::new());
    }

    #[test]
    fn test_take_items_when_not_an_array() {
        assert_eq!(
            take_items(json!({"items": "unexpected"})),
            Vec::<serde_json::Value>::new()
        );
    }
}
