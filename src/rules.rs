use serde_json::Value;
use tracing::error;

const TEMPERATURE_APP_ID: &str = "TEMP";
const BUTTON_APP_ID: &str = "BUTTON";
const SPOILED_FOOD_THRESHOLD: f64 = 60.0;

/// True when any device in the batch carries a temperature reading below the
/// spoiled-food threshold. Stops at the first qualifying message.
pub fn has_spoiled_food_reading(devices: &[Value]) -> bool {
    devices
        .iter()
        .any(|device| messages_of(device).iter().any(is_spoiled_food_reading))
}

/// True when any device in the batch carries a panic-button press. The data
/// field must be exactly the string "1"; no numeric coercion.
pub fn has_panic_press(devices: &[Value]) -> bool {
    devices
        .iter()
        .any(|device| messages_of(device).iter().any(is_panic_press))
}

fn messages_of(device: &Value) -> &[Value] {
    device
        .get("messages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn is_spoiled_food_reading(entry: &Value) -> bool {
    let message = match entry.get("message") {
        Some(message) => message,
        None => return false,
    };
    if message.get("appId").and_then(Value::as_str) != Some(TEMPERATURE_APP_ID) {
        return false;
    }
    match message.get("data") {
        Some(Value::String(data)) => match data.parse::<f64>() {
            Ok(temperature) => temperature < SPOILED_FOOD_THRESHOLD,
            Err(parse_error) => {
                error!(
                    "Error parsing temperature data '{}': {}. Skipping this message.",
                    data, parse_error
                );
                false
            }
        },
        Some(Value::Number(data)) => data
            .as_f64()
            .map(|temperature| temperature < SPOILED_FOOD_THRESHOLD)
            .unwrap_or(false),
        _ => false,
    }
}

fn is_panic_press(entry: &Value) -> bool {
    let message = match entry.get("message") {
        Some(message) => message,
        None => return false,
    };
    message.get("appId").and_then(Value::as_str) == Some(BUTTON_APP_ID)
        && message.get("data").and_then(Value::as_str) == Some("1")
}

#[cfg(test)]
mod tests {
    use crate::rules::{has_panic_press, has_spoiled_food_reading};
    use serde_json::{json, Value};

    fn device_with_messages(messages: Vec<Value>) -> Value {
        json!({"id": "box-1", "messages": messages})
    }

    #[test]
    fn test_spoiled_food_below_threshold() {
        let batch = vec![device_with_messages(vec![
            json!({"message": {"appId": "TEMP", "data": "55"}}),
        ])];

        assert!(has_spoiled_food_reading(&batch));
    }

    #[test]
    fn test_spoiled_food_at_threshold() {
        let batch = vec![device_with_messages(vec![
            json!({"message": {"appId": "TEMP", "data": "60"}}),
        ])];

        assert!(!has_spoiled_food_reading(&batch));
    }

    #[test]
    fn test_spoiled_food_numeric_data() {
        let batch = vec![device_with_messages(vec![
            json!({"message": {"appId": "TEMP", "data": 42.5}}),
        ])];

        assert!(has_spoiled_food_reading(&batch));
    }

    #[test]
    fn test_spoiled_food_skips_unparsable_data() {
        let batch = vec![device_with_messages(vec![
            json!({"message": {"appId": "TEMP", "data": "not-a-number"}}),
            json!({"message": {"appId": "TEMP", "data": "58.5"}}),
        ])];

        assert!(has_spoiled_food_reading(&batch));
    }

    #[test]
    fn test_spoiled_food_ignores_other_app_ids() {
        let batch = vec![device_with_messages(vec![
            json!({"message": {"appId": "HUMID", "data": "10"}}),
        ])];

        assert!(!has_spoiled_food_reading(&batch));
    }

    #[test]
    fn test_spoiled_food_found_on_later_device() {
        let batch = vec![
            device_with_messages(vec![]),
            json!({"id": "box-2"}),
            device_with_messages(vec![json!({"message": {"appId": "TEMP", "data": "12"}})]),
        ];

        assert!(has_spoiled_food_reading(&batch));
    }

    #[test]
    fn test_panic_press() {
        let batch = vec![device_with_messages(vec![
            json!({"message": {"appId": "BUTTON", "data": "1"}}),
        ])];

        assert!(has_panic_press(&batch));
    }

    #[test]
    fn test_panic_press_released_button() {
        let batch = vec![device_with_messages(vec![
            json!({"message": {"appId": "BUTTON", "data": "0"}}),
        ])];

        assert!(!has_panic_press(&batch));
    }

    #[test]
    fn test_panic_press_requires_exact_string() {
        let batch = vec![device_with_messages(vec![
            json!({"message": {"appId": "BUTTON", "data": 1}}),
        ])];

        assert!(!has_panic_press(&batch));
    }

    #[test]
    fn test_rules_on_empty_batch() {
        assert!(!has_spoiled_food_reading(&[]));
        assert!(!has_panic_press(&[]));
    }
}
