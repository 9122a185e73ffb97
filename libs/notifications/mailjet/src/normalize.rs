//! Message normalization.
//!
//! Turns [`GenericMessage`]s and [`NativeMessage`]s into Mailjet v3 send payloads. A
//! message with several recipients becomes one payload with one `Recipients` entry per
//! address, never one payload per address.

use crate::attachment::{self, Attachment, ProviderAttachment};
use crate::error::{MailjetError, MailjetResult};
use crate::models::{Address, GenericMessage, NativeMessage, OutgoingMessage, Tracking};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Recipient entry of a send payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRecipient {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Mailjet v3 `/send` payload for one message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRequest {
    #[serde(rename = "FromEmail")]
    pub from_email: String,
    #[serde(rename = "FromName", skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Text-part", skip_serializing_if = "Option::is_none")]
    pub text_part: Option<String>,
    #[serde(rename = "Html-part", skip_serializing_if = "Option::is_none")]
    pub html_part: Option<String>,
    #[serde(rename = "Recipients")]
    pub recipients: Vec<ProviderRecipient>,
    #[serde(rename = "Attachments", skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<ProviderAttachment>,
    #[serde(rename = "Inline_attachments", skip_serializing_if = "Vec::is_empty")]
    pub inline_attachments: Vec<ProviderAttachment>,
    #[serde(rename = "Mj-campaign", skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(rename = "Mj-deduplicatecampaign", skip_serializing_if = "Option::is_none")]
    pub deduplicate_campaign: Option<bool>,
    #[serde(rename = "Mj-trackopen", skip_serializing_if = "Option::is_none")]
    pub track_open: Option<u8>,
    #[serde(rename = "Mj-trackclick", skip_serializing_if = "Option::is_none")]
    pub track_click: Option<u8>,
    #[serde(rename = "Mj-CustomID", skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<i64>,
    #[serde(rename = "Mj-EventPayLoad", skip_serializing_if = "Option::is_none")]
    pub event_payload: Option<String>,
    #[serde(rename = "Headers", skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(rename = "Mj-TemplateID", skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    #[serde(rename = "Mj-TemplateLanguage", skip_serializing_if = "Option::is_none")]
    pub template_language: Option<bool>,
    #[serde(rename = "Vars", skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, Value>,
}

impl ProviderRequest {
    fn new(from: &Address, subject: &str, recipients: Vec<ProviderRecipient>) -> Self {
        Self {
            from_email: from.email.clone(),
            from_name: from.name.clone(),
            subject: subject.to_string(),
            text_part: None,
            html_part: None,
            recipients,
            attachments: Vec::new(),
            inline_attachments: Vec::new(),
            campaign: None,
            deduplicate_campaign: None,
            track_open: None,
            track_click: None,
            custom_id: None,
            event_payload: None,
            headers: BTreeMap::new(),
            template_id: None,
            template_language: None,
            variables: BTreeMap::new(),
        }
    }

    fn with_tracking(mut self, tracking: Tracking) -> Self {
        self.track_open = Some(tracking.open.wire_value());
        self.track_click = Some(tracking.click.wire_value());
        self
    }

    /// Route each attachment to `Attachments` or `Inline_attachments`
    fn push_attachments<'a>(
        &mut self,
        attachments: impl IntoIterator<Item = &'a Attachment>,
    ) -> MailjetResult<()> {
        for attachment in attachments {
            let record = attachment::encode(attachment)?;
            if record.content_id.is_some() {
                self.inline_attachments.push(record);
            } else {
                self.attachments.push(record);
            }
        }
        Ok(())
    }
}

/// Template send input
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMessage {
    pub template_id: i64,
    pub to: Address,
    pub from: Address,
    pub subject: String,
    pub variables: BTreeMap<String, Value>,
}

/// Converts caller messages into provider requests.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    tracking: Tracking,
}

impl Normalizer {
    /// `tracking` applies to provider-neutral messages; native messages carry their own
    pub fn new(tracking: Tracking) -> Self {
        Self { tracking }
    }

    pub fn normalize(&self, message: &OutgoingMessage) -> MailjetResult<Vec<ProviderRequest>> {
        let request = match message {
            OutgoingMessage::Generic(generic) => self.normalize_generic(generic)?,
            OutgoingMessage::Native(native) => self.normalize_native(native)?,
        };
        Ok(vec![request])
    }

    /// Normalize every message; any invalid message fails the whole batch.
    pub fn normalize_all(&self, messages: &[OutgoingMessage]) -> MailjetResult<Vec<ProviderRequest>> {
        let mut requests = Vec::with_capacity(messages.len());
        for message in messages {
            requests.extend(self.normalize(message)?);
        }
        Ok(requests)
    }

    pub fn normalize_generic(&self, message: &GenericMessage) -> MailjetResult<ProviderRequest> {
        validate_sender(&message.from.email)?;
        let recipients = message
            .to
            .iter()
            .map(|address| recipient(&address.email, address.name.as_deref()))
            .collect::<MailjetResult<Vec<_>>>()?;
        if recipients.is_empty() {
            return Err(MailjetError::InvalidMessage(
                "message has no recipients".to_string(),
            ));
        }

        let mut request =
            ProviderRequest::new(&message.from, &message.subject, recipients).with_tracking(self.tracking);

        match message.html_view() {
            Some(view) => {
                check_cid_references(&view.content, view.linked_resources.iter().map(|r| r.content_id.as_str()));

                let linked = view
                    .linked_resources
                    .iter()
                    .cloned()
                    .map(Attachment::from)
                    .collect::<Vec<_>>();

                request.html_part = Some(view.content.clone());
                request.push_attachments(&linked)?;
            }
            None if message.is_body_html => request.html_part = Some(message.body.clone()),
            None => request.text_part = Some(message.body.clone()),
        }

        request.push_attachments(&message.attachments)?;

        debug!(
            recipients = request.recipients.len(),
            attachments = request.attachments.len(),
            inline_attachments = request.inline_attachments.len(),
            html = request.html_part.is_some(),
            "Normalized generic message"
        );

        Ok(request)
    }

    pub fn normalize_native(&self, message: &NativeMessage) -> MailjetResult<ProviderRequest> {
        validate_sender(&message.from_email)?;
        let recipients = message
            .recipients
            .iter()
            .map(|r| recipient(&r.email, r.name.as_deref()))
            .collect::<MailjetResult<Vec<_>>>()?;
        if recipients.is_empty() {
            return Err(MailjetError::InvalidMessage(
                "message has no recipients".to_string(),
            ));
        }

        let from = Address {
            email: message.from_email.clone(),
            name: message.from_name.clone(),
        };
        let mut request =
            ProviderRequest::new(&from, &message.subject, recipients).with_tracking(message.tracking);

        request.html_part = Some(message.html_part.clone());
        request.text_part = message.text_part.clone();
        request.campaign = message.campaign.clone();
        request.deduplicate_campaign = message.deduplicate_campaign;
        request.custom_id = message.custom_id;
        request.event_payload = message.event_payload.clone();
        request.headers = message.headers.clone();
        request.push_attachments(&message.attachments)?;

        debug!(
            recipients = request.recipients.len(),
            campaign = request.campaign.as_deref().unwrap_or_default(),
            "Normalized native message"
        );

        Ok(request)
    }

    pub fn normalize_template(&self, message: &TemplateMessage) -> MailjetResult<ProviderRequest> {
        validate_sender(&message.from.email)?;
        let to = recipient(&message.to.email, message.to.name.as_deref())?;

        let mut request = ProviderRequest::new(&message.from, &message.subject, vec![to])
            .with_tracking(self.tracking);
        request.template_id = Some(message.template_id);
        request.template_language = Some(true);
        request.variables = message.variables.clone();

        Ok(request)
    }
}

fn validate_sender(email: &str) -> MailjetResult<()> {
    if email.trim().is_empty() {
        return Err(MailjetError::InvalidMessage(
            "from address is empty".to_string(),
        ));
    }
    Ok(())
}

fn recipient(email: &str, name: Option<&str>) -> MailjetResult<ProviderRecipient> {
    if email.trim().is_empty() {
        return Err(MailjetError::InvalidMessage(
            "recipient address is empty".to_string(),
        ));
    }
    Ok(ProviderRecipient {
        email: email.to_string(),
        name: name.map(str::to_string),
    })
}

/// Log `cid:` tokens with no linked resource, and resources nothing references.
fn check_cid_references<'a>(html: &str, content_ids: impl Iterator<Item = &'a str>) {
    let referenced = attachment::cid_references(html);
    let provided: Vec<&str> = content_ids.map(attachment::strip_cid).collect();

    for token in &referenced {
        if !provided.contains(&token.as_str()) {
            warn!(content_id = %token, "HTML references a cid with no linked resource");
        }
    }
    for id in provided {
        if !referenced.iter().any(|token| token == id) {
            debug!(content_id = %id, "Linked resource is not referenced from the HTML");
        }
    }
}
