//! Response unification.
//!
//! Mailjet answers sends with `{"Sent": [...]}` and REST reads with
//! `{"Count": n, "Data": [...], "Total": n}`. Both become a [`Response<T>`].

use crate::error::{MailjetError, MailjetResult};
use crate::models::{Campaign, CampaignAggregate, GraphStatistics, SendAck};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const COUNT_KEY: &str = "Count";

/// Uniform result of one round-trip.
///
/// `count` is the number of records the provider acknowledged. For batch sends it may be
/// lower than the number of recipients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> Response<T> {
    pub fn empty() -> Self {
        Self {
            count: 0,
            data: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.data.first()
    }
}

impl<T> Default for Response<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// An item type that knows where its records live in a provider payload.
pub trait ResponseItem: DeserializeOwned {
    const DATA_KEY: &'static str = "Data";
}

impl ResponseItem for SendAck {
    const DATA_KEY: &'static str = "Sent";
}

impl ResponseItem for Campaign {}
impl ResponseItem for CampaignAggregate {}
impl ResponseItem for GraphStatistics {}

/// Parse a raw body. An empty body is treated as "no data".
pub fn unify<T: ResponseItem>(body: &str) -> MailjetResult<Response<T>> {
    if body.trim().is_empty() {
        return Ok(Response::empty());
    }
    let value: Value = serde_json::from_str(body)?;
    unify_value(&value)
}

/// Unify an already parsed payload.
///
/// - `count` comes from the provider's `Count` when present, else the number of records
/// - a missing or `null` data section yields an empty response
/// - anything that is not a list of `T` is a [`MailjetError::MalformedResponse`]
pub fn unify_value<T: ResponseItem>(value: &Value) -> MailjetResult<Response<T>> {
    let object = value.as_object().ok_or_else(|| {
        MailjetError::MalformedResponse(format!("expected a JSON object, got {}", kind(value)))
    })?;

    let items = match object.get(T::DATA_KEY) {
        None | Some(Value::Null) => {
            debug!(key = T::DATA_KEY, "Response has no data section");
            return Ok(Response::empty());
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(MailjetError::MalformedResponse(format!(
                "'{}' should be a list, got {}",
                T::DATA_KEY,
                kind(other)
            )))
        }
    };

    let data = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item).map_err(|e| {
                MailjetError::MalformedResponse(format!("{}[{}]: {}", T::DATA_KEY, index, e))
            })
        })
        .collect::<MailjetResult<Vec<T>>>()?;

    let count = match object.get(COUNT_KEY) {
        Some(Value::Null) | None => data.len(),
        Some(count) => count
            .as_u64()
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| {
                MailjetError::MalformedResponse(format!("'{}' is not a non-negative integer", COUNT_KEY))
            })?,
    };

    debug!(key = T::DATA_KEY, count, records = data.len(), "Unified response");

    Ok(Response { count, data })
}

/// Pull a human-readable message out of a Mailjet error body.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["ErrorMessage", "ErrorInfo"]
                .iter()
                .filter_map(|key| value.get(key).and_then(Value::as_str))
                .find(|message| !message.trim().is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_ack_list() {
        let body = r#"{"Sent":[{"Email":"b@x.com","MessageID":19140583165963916}]}"#;
        let response: Response<SendAck> = unify(body).unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.data[0].email, "b@x.com");
        assert_eq!(response.data[0].message_id, 19140583165963916);
    }

    #[test]
    fn test_count_prefers_provider_field() {
        let body = r#"{"Count":1,"Data":[{"ID":5,"Name":"agg","CampaignIDS":"1,2"}],"Total":3}"#;
        let response: Response<CampaignAggregate> = unify(body).unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.data[0].id, Some(5));
    }

    #[test]
    fn test_null_and_missing_data_are_empty() {
        for body in [
            r#"{"Count":0,"Data":null,"Total":0}"#,
            r#"{"Count":0,"Data":[],"Total":0}"#,
            r#"{"Total":0}"#,
            "",
        ] {
            let response: Response<GraphStatistics> = unify(body).unwrap();
            assert_eq!(response, Response::empty(), "body: {body}");
        }
    }

    #[test]
    fn test_malformed_payloads() {
        let not_json = unify::<SendAck>("<html>oops</html>");
        assert!(matches!(not_json, Err(MailjetError::MalformedResponse(_))));

        let wrong_root = unify::<SendAck>("[1,2,3]");
        assert!(matches!(wrong_root, Err(MailjetError::MalformedResponse(_))));

        let wrong_section = unify::<Campaign>(r#"{"Count":1,"Data":"nope"}"#);
        assert!(matches!(wrong_section, Err(MailjetError::MalformedResponse(_))));

        let wrong_item = unify::<SendAck>(r#"{"Sent":[{"Email":"b@x.com"}]}"#);
        let err = wrong_item.unwrap_err().to_string();
        assert!(err.contains("Sent[0]"), "{err}");

        let negative_count = unify::<GraphStatistics>(r#"{"Count":-1,"Data":[]}"#);
        assert!(matches!(negative_count, Err(MailjetError::MalformedResponse(_))));
    }

    #[test]
    fn test_unify_is_idempotent() {
        let body = r#"{"Count":2,"Data":[{"RefTimestamp":"2024-05-11","ProcessedCount":3},{"RefTimestamp":"2024-05-12"}]}"#;
        let first: Response<GraphStatistics> = unify(body).unwrap();
        let second: Response<GraphStatistics> = unify(body).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.count, 2);
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"ErrorInfo":"","ErrorMessage":"API key authentication/authorization failure","StatusCode":401}"#),
            "API key authentication/authorization failure"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }
}
