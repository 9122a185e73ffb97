//! Request builders for the send endpoint and the read-only statistics endpoints.
//!
//! Builders never check that a campaign or aggregate exists; an unknown id simply comes
//! back as an empty result.

use crate::error::{MailjetError, MailjetResult};
use crate::models::{AggregatePeriod, CampaignAggregate, StatisticsScale};
use crate::normalize::ProviderRequest;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};

pub const SEND_PATH: &str = "/v3/send";
pub const CAMPAIGN_PATH: &str = "/v3/REST/campaign";
pub const GRAPH_STATISTICS_PATH: &str = "/v3/REST/graphstatistics";
pub const CAMPAIGN_AGGREGATE_PATH: &str = "/v3/REST/campaignaggregate";
pub const AGGREGATE_GRAPH_STATISTICS_PATH: &str = "/v3/REST/aggregategraphstatistics";

/// One request ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

impl Query {
    fn get(path: String) -> Self {
        Self {
            method: Method::GET,
            path,
            payload: None,
        }
    }

    fn post(path: &str, payload: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.to_string(),
            payload: Some(payload),
        }
    }
}

/// Graph statistics for one campaign over `[from, to]`, bucketed by `scale`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStatisticsQuery {
    pub campaign_id: i64,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub scale: StatisticsScale,
}

/// A single request is sent as-is; several go out together under `Messages`.
pub fn send(requests: &[ProviderRequest]) -> MailjetResult<Query> {
    let payload = match requests {
        [] => {
            return Err(MailjetError::InvalidMessage(
                "nothing to send".to_string(),
            ))
        }
        [single] => to_payload(single)?,
        many => json!({ "Messages": to_payload(many)? }),
    };
    Ok(Query::post(SEND_PATH, payload))
}

pub fn campaign_by_name(name: &str) -> Query {
    Query::get(format!(
        "{}?CustomCampaign={}",
        CAMPAIGN_PATH,
        urlencoding::encode(name)
    ))
}

pub fn graph_statistics(query: &GraphStatisticsQuery) -> Query {
    Query::get(format!(
        "{}?CampaignID={}&FromTS={}&ToTS={}&Scale={}",
        GRAPH_STATISTICS_PATH,
        query.campaign_id,
        query.from.timestamp(),
        query.to.timestamp(),
        query.scale.as_ref()
    ))
}

pub fn create_campaign_aggregate(aggregate: &CampaignAggregate) -> MailjetResult<Query> {
    Ok(Query::post(CAMPAIGN_AGGREGATE_PATH, to_payload(aggregate)?))
}

pub fn aggregate_graph_statistics(aggregate_id: i64, period: AggregatePeriod) -> Query {
    Query::get(format!(
        "{}?CampaignAggregateID={}&Range={}",
        AGGREGATE_GRAPH_STATISTICS_PATH,
        aggregate_id,
        period.as_ref()
    ))
}

fn to_payload<T: Serialize + ?Sized>(value: &T) -> MailjetResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| MailjetError::InvalidMessage(format!("failed to serialize request: {}", e)))
}
