//! Caller-facing message models and the provider's read-only records.

pub mod ack;
pub mod campaign;
pub mod message;
pub mod statistics;

pub use ack::SendAck;
pub use campaign::{Campaign, CampaignAggregate};
pub use message::{
    Address, AlternateView, GenericMessage, NativeMessage, OutgoingMessage, Recipient, Tracking,
    TrackingMode,
};
pub use statistics::{AggregatePeriod, GraphStatistics, StatisticsScale};
