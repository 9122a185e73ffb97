use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Bucket size for graph statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum StatisticsScale {
    #[strum(serialize = "hour")]
    Hour,
    #[strum(serialize = "day")]
    Day,
    #[strum(serialize = "week")]
    Week,
    #[strum(serialize = "month")]
    Month,
    #[strum(serialize = "24h")]
    Last24Hours,
    #[strum(serialize = "7d")]
    Last7Days,
}

/// Aggregation window for campaign aggregate statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(ascii_case_insensitive)]
pub enum AggregatePeriod {
    #[strum(serialize = "24h")]
    Last24Hours,
    #[strum(serialize = "7d")]
    Last7Days,
}

/// Activity counters for one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GraphStatistics {
    pub ref_timestamp: String,
    #[serde(rename = "SendtimeStart")]
    pub send_time_start: i64,
    pub processed_count: i64,
    pub delivered_count: i64,
    pub opened_count: i64,
    pub clicked_count: i64,
    pub bounced_count: i64,
    pub blocked_count: i64,
    pub queued_count: i64,
    #[serde(rename = "SpamcomplaintCount")]
    pub spam_complaint_count: i64,
    pub unsubscribed_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scale_strings() {
        assert_eq!(StatisticsScale::Day.as_ref(), "day");
        assert_eq!(StatisticsScale::Last7Days.to_string(), "7d");
        assert_eq!("24H".parse::<StatisticsScale>().unwrap(), StatisticsScale::Last24Hours);
        assert!("fortnight".parse::<StatisticsScale>().is_err());
        assert_eq!("7d".parse::<AggregatePeriod>().unwrap(), AggregatePeriod::Last7Days);
        assert!("day".parse::<AggregatePeriod>().is_err());
    }

    #[test]
    fn test_graph_statistics_field_names() {
        let bucket: GraphStatistics = serde_json::from_value(json!({
            "RefTimestamp": "2024-05-11",
            "SendtimeStart": 1715385600,
            "ProcessedCount": 3,
            "DeliveredCount": 2,
            "OpenedCount": 1,
            "SpamcomplaintCount": 0,
            "UnsubscribedCount": 1
        }))
        .unwrap();

        assert_eq!(bucket.send_time_start, 1715385600);
        assert_eq!(bucket.delivered_count, 2);
        assert_eq!(bucket.unsubscribed_count, 1);
        assert_eq!(bucket.clicked_count, 0);
    }
}
