use crate::attachment::{Attachment, InlineResource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

/// Mailjet v3 encoding of the tracking flags.
const TRACK_ACCOUNT_DEFAULT: u8 = 0;
const TRACK_OFF: u8 = 1;
const TRACK_ON: u8 = 2;

/// Email address with an optional display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Address {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<&str> for Address {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

/// Alternative rendering of the body, with the resources it links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateView {
    pub content_type: String,
    pub content: String,
    pub linked_resources: Vec<InlineResource>,
}

impl AlternateView {
    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content_type: "text/html".to_string(),
            content: content.into(),
            linked_resources: Vec::new(),
        }
    }

    pub fn with_linked_resource(mut self, resource: InlineResource) -> Self {
        self.linked_resources.push(resource);
        self
    }

    pub fn is_html(&self) -> bool {
        crate::attachment::mime_essence(&self.content_type) == "text/html"
    }
}

/// Provider-neutral email message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericMessage {
    pub from: Address,
    /// Order-preserving, duplicates allowed
    pub to: Vec<Address>,
    pub subject: String,
    pub body: String,
    pub is_body_html: bool,
    pub attachments: Vec<Attachment>,
    pub alternate_views: Vec<AlternateView>,
}

impl GenericMessage {
    pub fn new(from: impl Into<Address>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: Vec::new(),
            subject: subject.into(),
            body: String::new(),
            is_body_html: false,
            attachments: Vec::new(),
            alternate_views: Vec::new(),
        }
    }

    pub fn to(mut self, address: impl Into<Address>) -> Self {
        self.to.push(address.into());
        self
    }

    pub fn with_text(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self.is_body_html = false;
        self
    }

    pub fn with_html(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self.is_body_html = true;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_alternate_view(mut self, view: AlternateView) -> Self {
        self.alternate_views.push(view);
        self
    }

    /// The first HTML alternate view, which takes precedence over `body`
    pub fn html_view(&self) -> Option<&AlternateView> {
        self.alternate_views.iter().find(|view| view.is_html())
    }
}

/// Per-flag tracking choice.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TrackingMode {
    /// Defer to the account setting
    #[serde(rename = "default")]
    #[strum(serialize = "default")]
    AccountDefault,
    #[default]
    On,
    Off,
}

impl TrackingMode {
    pub fn wire_value(self) -> u8 {
        match self {
            TrackingMode::AccountDefault => TRACK_ACCOUNT_DEFAULT,
            TrackingMode::Off => TRACK_OFF,
            TrackingMode::On => TRACK_ON,
        }
    }
}

/// Open/click tracking flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tracking {
    pub open: TrackingMode,
    pub click: TrackingMode,
}

/// Recipient of a native message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<Address> for Recipient {
    fn from(address: Address) -> Self {
        Self {
            email: address.email,
            name: address.name,
        }
    }
}

/// Campaign-aware Mailjet message; its fields are sent without reinterpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeMessage {
    pub from_email: String,
    pub from_name: Option<String>,
    pub recipients: Vec<Recipient>,
    pub subject: String,
    pub html_part: String,
    pub text_part: Option<String>,
    pub campaign: Option<String>,
    pub deduplicate_campaign: Option<bool>,
    pub tracking: Tracking,
    pub custom_id: Option<i64>,
    pub event_payload: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub attachments: Vec<Attachment>,
}

impl NativeMessage {
    pub fn new(from_email: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from_email: from_email.into(),
            from_name: None,
            recipients: Vec::new(),
            subject: subject.into(),
            html_part: String::new(),
            text_part: None,
            campaign: None,
            deduplicate_campaign: None,
            tracking: Tracking::default(),
            custom_id: None,
            event_payload: None,
            headers: BTreeMap::new(),
            attachments: Vec::new(),
        }
    }

    pub fn recipient(mut self, recipient: impl Into<Recipient>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_part = html.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_part = Some(text.into());
        self
    }

    pub fn with_campaign(mut self, campaign: impl Into<String>) -> Self {
        self.campaign = Some(campaign.into());
        self
    }

    pub fn with_tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn with_custom_id(mut self, custom_id: i64) -> Self {
        self.custom_id = Some(custom_id);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

impl From<&str> for Recipient {
    fn from(email: &str) -> Self {
        Self::new(email)
    }
}

/// Either message model, as accepted by batch sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    Generic(GenericMessage),
    Native(NativeMessage),
}

impl From<GenericMessage> for OutgoingMessage {
    fn from(message: GenericMessage) -> Self {
        Self::Generic(message)
    }
}

impl From<NativeMessage> for OutgoingMessage {
    fn from(message: NativeMessage) -> Self {
        Self::Native(message)
    }
}
