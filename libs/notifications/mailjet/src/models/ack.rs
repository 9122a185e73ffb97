use serde::{Deserialize, Serialize};

/// Acknowledgement for one logical send, as listed under `Sent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendAck {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "MessageID")]
    pub message_id: i64,
    #[serde(rename = "MessageUUID", default, skip_serializing_if = "Option::is_none")]
    pub message_uuid: Option<String>,
}
