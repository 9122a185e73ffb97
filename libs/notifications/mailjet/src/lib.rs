//! Mailjet client library
//!
//! Sends transactional and campaign email through Mailjet and reads back campaign
//! statistics. The library is a translation layer: it turns caller messages into
//! Mailjet payloads and Mailjet responses into one uniform [`Response<T>`].
//!
//! ## Components
//!
//! - **Attachments**: [`attachment`] encodes payloads and inline `cid:` resources
//! - **Normalization**: [`Normalizer`] builds `/v3/send` payloads from [`GenericMessage`]
//!   and [`NativeMessage`]
//! - **Unification**: [`response::unify`] maps send acks and REST lists into [`Response<T>`]
//! - **Queries**: [`query`] builds campaign, statistics and aggregate requests
//! - **Transport**: [`Transport`] with a reqwest implementation and an in-memory
//!   [`RecordingTransport`]
//!
//! ## Usage
//!
//! ```ignore
//! use mailjet::{GenericMessage, MailjetClient};
//!
//! let client = MailjetClient::from_env()?;
//! let message = GenericMessage::new("a@example.com", "Hello")
//!     .to("b@example.com")
//!     .with_text("test");
//! let response = client.send_generic(&message).await?;
//! println!("{} acknowledgement(s)", response.count);
//! ```

pub mod attachment;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod query;
pub mod response;
pub mod transport;

pub use attachment::{Attachment, InlineResource, ProviderAttachment};
pub use client::MailjetClient;
pub use config::MailjetConfig;
pub use error::{MailjetError, MailjetResult};
pub use models::{
    Address, AggregatePeriod, AlternateView, Campaign, CampaignAggregate, GenericMessage,
    GraphStatistics, NativeMessage, OutgoingMessage, Recipient, SendAck, StatisticsScale,
    Tracking, TrackingMode,
};
pub use normalize::{Normalizer, ProviderRecipient, ProviderRequest, TemplateMessage};
pub use response::Response;
pub use transport::{HttpTransport, RawResponse, RecordingTransport, Transport, TransportError};
