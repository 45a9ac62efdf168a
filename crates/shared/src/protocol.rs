use serde::{Deserialize, Serialize};

use crate::domain::{COUNTER_MAX, COUNTER_MIN};

/// Body a client may attach to a counter request.
///
/// The value is the client's own last known counter. The service treats it as
/// informational only; missing or `null` both decode to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRequest {
    #[serde(default)]
    pub value: Option<i64>,
}

impl CounterRequest {
    pub fn with_value(value: i64) -> Self {
        Self { value: Some(value) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterResponse {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub min: i64,
    pub max: i64,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            message: "Counter service: increment, decrement, read or reset a shared value."
                .to_string(),
            min: COUNTER_MIN,
            max: COUNTER_MAX,
        }
    }
}

pub fn home_route() -> &'static str {
    "/"
}

pub fn healthz_route() -> &'static str {
    "/healthz"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_value_is_optional() {
        let empty: CounterRequest = serde_json::from_str("{}").expect("empty");
        assert_eq!(empty.value, None);

        let null: CounterRequest = serde_json::from_str(r#"{"value":null}"#).expect("null");
        assert_eq!(null.value, None);

        let given: CounterRequest = serde_json::from_str(r#"{"value":7}"#).expect("given");
        assert_eq!(given, CounterRequest::with_value(7));
    }

    #[test]
    fn response_uses_value_field() {
        let json = serde_json::to_value(CounterResponse { value: -3 }).expect("json");
        assert_eq!(json, serde_json::json!({ "value": -3 }));
    }

    #[test]
    fn service_info_reports_range() {
        let info = ServiceInfo::default();
        assert_eq!((info.min, info.max), (-10_001, 10_001));
    }
}
