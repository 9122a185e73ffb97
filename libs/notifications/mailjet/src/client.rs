//! Mailjet client: normalize, dispatch, unify.

use crate::config::MailjetConfig;
use crate::error::{MailjetError, MailjetResult};
use crate::models::{
    Address, AggregatePeriod, Campaign, CampaignAggregate, GenericMessage, GraphStatistics,
    NativeMessage, OutgoingMessage, SendAck, StatisticsScale,
};
use crate::normalize::{Normalizer, TemplateMessage};
use crate::query::{self, GraphStatisticsQuery, Query};
use crate::response::{self, Response, ResponseItem};
use crate::transport::{HttpTransport, Transport};
use chrono::{DateTime, Utc};
use core_config::FromEnv;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Stateless client. Every call is one normalization, one round-trip and one unification.
pub struct MailjetClient<T = HttpTransport> {
    transport: T,
    normalizer: Normalizer,
}

impl MailjetClient<HttpTransport> {
    pub fn new(config: &MailjetConfig) -> MailjetResult<Self> {
        Ok(Self::with_transport(
            HttpTransport::new(config)?,
            Normalizer::new(config.tracking),
        ))
    }

    /// Create from environment variables, see [`MailjetConfig::from_env`]
    pub fn from_env() -> MailjetResult<Self> {
        Self::new(&MailjetConfig::from_env()?)
    }
}

impl<T: Transport> MailjetClient<T> {
    pub fn with_transport(transport: T, normalizer: Normalizer) -> Self {
        Self {
            transport,
            normalizer,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a provider-neutral message.
    ///
    /// All recipients share one request. `count` on the result is the number of
    /// acknowledgements Mailjet returned, which can be lower than the recipient count.
    #[instrument(skip_all, fields(recipients = message.to.len()))]
    pub async fn send_generic(&self, message: &GenericMessage) -> MailjetResult<Response<SendAck>> {
        let request = self.normalizer.normalize_generic(message)?;
        self.dispatch(query::send(&[request])?).await
    }

    /// Send a campaign-aware message
    #[instrument(skip_all, fields(recipients = message.recipients.len(), campaign = ?message.campaign))]
    pub async fn send_native(&self, message: &NativeMessage) -> MailjetResult<Response<SendAck>> {
        let request = self.normalizer.normalize_native(message)?;
        self.dispatch(query::send(&[request])?).await
    }

    /// Send a stored template, substituting `variables`
    #[instrument(skip(self, to, from, subject, variables))]
    pub async fn send_template(
        &self,
        template_id: i64,
        to: Address,
        from: Address,
        subject: impl Into<String>,
        variables: BTreeMap<String, Value>,
    ) -> MailjetResult<Response<SendAck>> {
        let request = self.normalizer.normalize_template(&TemplateMessage {
            template_id,
            to,
            from,
            subject: subject.into(),
            variables,
        })?;
        self.dispatch(query::send(&[request])?).await
    }

    /// Send several distinct messages in one round-trip.
    ///
    /// Every message is validated before anything is sent.
    #[instrument(skip_all, fields(messages = messages.len()))]
    pub async fn send_batch(&self, messages: &[OutgoingMessage]) -> MailjetResult<Response<SendAck>> {
        let requests = self.normalizer.normalize_all(messages)?;
        self.dispatch(query::send(&requests)?).await
    }

    /// Look up campaigns by the name given through `Mj-campaign`
    #[instrument(skip(self))]
    pub async fn get_campaign(&self, name: &str) -> MailjetResult<Response<Campaign>> {
        self.dispatch(query::campaign_by_name(name)).await
    }

    /// Activity buckets for one campaign. A window with no activity is an empty result.
    #[instrument(skip(self))]
    pub async fn get_graph_statistics(
        &self,
        campaign_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        scale: StatisticsScale,
    ) -> MailjetResult<Response<GraphStatistics>> {
        self.dispatch(query::graph_statistics(&GraphStatisticsQuery {
            campaign_id,
            from,
            to,
            scale,
        }))
        .await
    }

    #[instrument(skip(self), fields(name = %aggregate.name))]
    pub async fn create_campaign_aggregate(
        &self,
        aggregate: &CampaignAggregate,
    ) -> MailjetResult<Response<CampaignAggregate>> {
        self.dispatch(query::create_campaign_aggregate(aggregate)?).await
    }

    #[instrument(skip(self))]
    pub async fn get_aggregate_graph_statistics(
        &self,
        aggregate_id: i64,
        period: AggregatePeriod,
    ) -> MailjetResult<Response<GraphStatistics>> {
        self.dispatch(query::aggregate_graph_statistics(aggregate_id, period))
            .await
    }

    async fn dispatch<I: ResponseItem>(&self, query: Query) -> MailjetResult<Response<I>> {
        debug!(method = %query.method, path = %query.path, "Dispatching Mailjet request");

        let raw = self
            .transport
            .execute(query.method, &query.path, query.payload)
            .await?;

        if !raw.is_success() {
            let message = response::error_message(&raw.body);
            warn!(status = raw.status, error = %message, "Mailjet API error");
            return Err(MailjetError::Api {
                status: raw.status,
                message,
            });
        }

        response::unify(&raw.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, RawResponse, TransportError};
    use mockall::predicate::{always, eq};
    use reqwest::Method;

    fn message() -> GenericMessage {
        GenericMessage::new("a@x.com", "test").to("b@x.com").with_text("test")
    }

    #[tokio::test]
    async fn test_send_generic_posts_once() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .with(eq(Method::POST), eq("/v3/send"), always())
            .times(1)
            .returning(|_, _, _| {
                Ok(RawResponse::new(
                    200,
                    r#"{"Sent":[{"Email":"b@x.com","MessageID":1}]}"#,
                ))
            });

        let client = MailjetClient::with_transport(transport, Normalizer::default());
        let response = client.send_generic(&message()).await.unwrap();

        assert_eq!(response.count, 1);
        assert_eq!(response.data[0].email, "b@x.com");
    }

    #[tokio::test]
    async fn test_invalid_message_never_reaches_transport() {
        let mut transport = MockTransport::new();
        transport.expect_execute().times(0);

        let client = MailjetClient::with_transport(transport, Normalizer::default());
        let no_recipients = GenericMessage::new("a@x.com", "test").with_text("test");

        let err = client.send_generic(&no_recipients).await.unwrap_err();
        assert!(matches!(err, MailjetError::InvalidMessage(_)));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let mut transport = MockTransport::new();
        transport
            .expect_execute()
            .returning(|_, _, _| Err(TransportError::new("connection reset by peer")));

        let client = MailjetClient::with_transport(transport, Normalizer::default());
        let err = client.send_generic(&message()).await.unwrap_err();

        assert!(matches!(err, MailjetError::Transport(_)));
        assert!(err.to_string().contains("connection reset by peer"));
    }

    #[tokio::test]
    async fn test_non_success_status_is_api_error() {
        let mut transport = MockTransport::new();
        transport.expect_execute().returning(|_, _, _| {
            Ok(RawResponse::new(
                401,
                r#"{"ErrorInfo":"","ErrorMessage":"API key authentication/authorization failure","StatusCode":401}"#,
            ))
        });

        let client = MailjetClient::with_transport(transport, Normalizer::default());
        let err = client.get_campaign("TestApi_2024-5").await.unwrap_err();

        match err {
            MailjetError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("authentication"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_env_builds_http_client() {
        temp_env::with_vars(
            [
                ("MAILJET_PUBLIC_KEY", Some("pub")),
                ("MAILJET_PRIVATE_KEY", Some("priv")),
                ("MAILJET_TRACK_OPEN", None),
                ("MAILJET_TRACK_CLICK", None),
                ("MAILJET_TIMEOUT_SECS", None),
            ],
            || {
                assert!(MailjetClient::from_env().is_ok());
            },
        );
    }

    #[test]
    fn test_from_env_without_credentials() {
        temp_env::with_vars_unset(
            ["MAILJET_PUBLIC_KEY", "MAILJET_PRIVATE_KEY", "MailJetPub", "MailJetPri"],
            || {
                let err = MailjetClient::from_env().err().unwrap();
                assert!(matches!(err, MailjetError::Config(_)));
            },
        );
    }
}
