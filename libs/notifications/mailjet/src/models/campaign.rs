use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Campaign record; everything here is assigned by Mailjet and read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(rename = "ID")]
    pub id: i64,
    /// Name given through `Mj-campaign` when sending
    #[serde(rename = "CustomValue", default)]
    pub name: String,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "Subject", default)]
    pub subject: String,
    #[serde(rename = "FromEmail", default)]
    pub from_email: String,
    #[serde(rename = "FromName", default)]
    pub from_name: String,
    #[serde(rename = "Status", default)]
    pub status: i64,
    #[serde(rename = "FirstMessageID", default)]
    pub first_message_id: i64,
    #[serde(rename = "NewsLetterID", default)]
    pub newsletter_id: i64,
    #[serde(rename = "ListID", default)]
    pub list_id: i64,
    #[serde(rename = "IsStarred", default)]
    pub is_starred: bool,
    #[serde(rename = "IsDeleted", default)]
    pub is_deleted: bool,
    #[serde(rename = "SendStartAt", default)]
    pub send_start_at: Option<String>,
    #[serde(rename = "SendEndAt", default)]
    pub send_end_at: Option<String>,
}

/// Provider-side grouping of campaigns.
///
/// Sent as `{CampaignIDS, Name}`; Mailjet answers with the same record plus the
/// assigned `ID`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignAggregate {
    #[serde(
        rename = "ID",
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,
    /// Comma-joined campaign ids
    #[serde(rename = "CampaignIDS", default)]
    pub campaign_ids: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

impl CampaignAggregate {
    pub fn new(campaign_ids: impl IntoIterator<Item = i64>, name: impl Into<String>) -> Self {
        let campaign_ids = campaign_ids
            .into_iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            id: None,
            campaign_ids,
            name: name.into(),
        }
    }

    /// Split `campaign_ids` back into ids, skipping anything that is not a number
    pub fn campaign_id_list(&self) -> Vec<i64> {
        self.campaign_ids
            .split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect()
    }
}

// Mailjet has returned ids both as numbers and as numeric strings.
fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
