//! Command line definition

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use mailjet::{AggregatePeriod, StatisticsScale};

#[derive(Parser)]
#[command(name = "mailjet-cli")]
#[command(about = "Send email and read campaign statistics through Mailjet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a message to one or more recipients
    Send(SendArgs),

    /// Send a stored template
    SendTemplate {
        #[arg(long)]
        template_id: i64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: String,
        /// Template variables as KEY=VALUE; values are parsed as JSON when possible
        #[arg(long = "var", value_parser = parse_key_value)]
        vars: Vec<(String, String)>,
    },

    /// Look up campaigns by name
    Campaign { name: String },

    /// Graph statistics for a campaign
    Stats {
        #[arg(long)]
        campaign_id: i64,
        /// RFC 3339 start of the window
        #[arg(long)]
        from: DateTime<Utc>,
        /// RFC 3339 end of the window
        #[arg(long)]
        to: DateTime<Utc>,
        /// Bucket size: hour, day, week, month, 24h or 7d
        #[arg(long, default_value = "day")]
        scale: StatisticsScale,
    },

    /// Create a campaign aggregate
    CreateAggregate {
        #[arg(long, value_delimiter = ',', required = true)]
        campaign_ids: Vec<i64>,
        #[arg(long)]
        name: String,
    },

    /// Graph statistics for a campaign aggregate
    AggregateStats {
        #[arg(long)]
        aggregate_id: i64,
        /// 24h or 7d
        #[arg(long, default_value = "24h")]
        period: AggregatePeriod,
    },
}

#[derive(Args)]
pub struct SendArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub from_name: Option<String>,
    /// Recipient address; repeat for a batch send
    #[arg(long, required = true)]
    pub to: Vec<String>,
    #[arg(long)]
    pub subject: String,
    /// Plain text body
    #[arg(long, conflicts_with = "html")]
    pub text: Option<String>,
    /// HTML body
    #[arg(long)]
    pub html: Option<String>,
    /// File to attach, as PATH=CONTENT_TYPE
    #[arg(long = "attach", value_parser = parse_key_value)]
    pub attachments: Vec<(String, String)>,
    /// Campaign name; switches to a campaign-aware send
    #[arg(long)]
    pub campaign: Option<String>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("FirstName=Test User").unwrap(),
            ("FirstName".to_string(), "Test User".to_string())
        );
        assert_eq!(
            parse_key_value("report.pdf=application/pdf").unwrap(),
            ("report.pdf".to_string(), "application/pdf".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn test_parse_stats_command() {
        let cli = Cli::try_parse_from([
            "mailjet-cli",
            "stats",
            "--campaign-id",
            "1234",
            "--from",
            "2024-05-11T00:00:00Z",
            "--to",
            "2024-05-21T00:00:00Z",
            "--scale",
            "7d",
        ])
        .unwrap();

        match cli.command {
            Commands::Stats {
                campaign_id, scale, ..
            } => {
                assert_eq!(campaign_id, 1234);
                assert_eq!(scale, StatisticsScale::Last7Days);
            }
            _ => panic!("expected stats command"),
        }
    }

    #[test]
    fn test_send_requires_recipient() {
        assert!(Cli::try_parse_from([
            "mailjet-cli",
            "send",
            "--from",
            "a@x.com",
            "--subject",
            "test",
            "--text",
            "test",
        ])
        .is_err());
    }
}
