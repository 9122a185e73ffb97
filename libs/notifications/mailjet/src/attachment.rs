//! Attachment encoding.
//!
//! Turns caller-supplied payloads into Mailjet attachment records. `text/plain` payloads
//! travel as raw text; everything else is base64. Inline resources keep their content-id
//! so `cid:` references in the HTML body resolve on the provider side.

use crate::error::{MailjetError, MailjetResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

const CID_SCHEME: &str = "cid:";

/// A named payload attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
    /// Set for attachments referenced from the HTML body
    pub content_id: Option<String>,
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: content.into(),
            content_id: None,
        }
    }

    /// Read the payload from `reader`, exactly once
    pub fn from_reader(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        mut reader: impl Read,
    ) -> MailjetResult<Self> {
        let filename = filename.into();
        let mut content = Vec::new();
        reader.read_to_end(&mut content).map_err(|e| {
            MailjetError::InvalidAttachment(format!("failed to read '{}': {}", filename, e))
        })?;

        Ok(Self::new(filename, content_type, content))
    }

    /// Read a file from disk; the attachment is named after the file
    pub fn from_path(path: impl AsRef<Path>, content_type: impl Into<String>) -> MailjetResult<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                MailjetError::InvalidAttachment(format!("no file name in '{}'", path.display()))
            })?
            .to_string();

        let content = std::fs::read(path).map_err(|e| {
            MailjetError::InvalidAttachment(format!("failed to read '{}': {}", path.display(), e))
        })?;

        Ok(Self::new(filename, content_type, content))
    }

    pub fn with_content_id(mut self, content_id: impl AsRef<str>) -> Self {
        self.content_id = Some(strip_cid(content_id.as_ref()).to_string());
        self
    }

    pub fn is_inline(&self) -> bool {
        self.content_id.is_some()
    }
}

/// Resource linked from an HTML view through a `cid:` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineResource {
    pub content_id: String,
    pub content_type: String,
    pub content: Vec<u8>,
    /// Defaults to the content-id
    pub filename: Option<String>,
}

impl InlineResource {
    pub fn new(
        content_id: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            content_id: content_id.into(),
            content_type: content_type.into(),
            content: content.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

impl From<InlineResource> for Attachment {
    fn from(resource: InlineResource) -> Self {
        let content_id = strip_cid(&resource.content_id).to_string();
        Self {
            filename: resource.filename.unwrap_or_else(|| content_id.clone()),
            content_type: resource.content_type,
            content: resource.content,
            content_id: Some(content_id),
        }
    }
}

/// Mailjet attachment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAttachment {
    #[serde(rename = "Content-type")]
    pub content_type: String,
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "content")]
    pub content: String,
    #[serde(rename = "ContentID", default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

/// Encode an attachment into its wire record.
pub fn encode(attachment: &Attachment) -> MailjetResult<ProviderAttachment> {
    if attachment.filename.trim().is_empty() {
        return Err(MailjetError::InvalidAttachment(
            "attachment filename is empty".to_string(),
        ));
    }
    if attachment.content_type.trim().is_empty() {
        return Err(MailjetError::InvalidAttachment(format!(
            "'{}' has no content type",
            attachment.filename
        )));
    }
    if attachment.content.is_empty() {
        return Err(MailjetError::InvalidAttachment(format!(
            "'{}' is empty",
            attachment.filename
        )));
    }

    let content = if is_plain_text(&attachment.content_type) {
        String::from_utf8(attachment.content.clone()).map_err(|_| {
            MailjetError::InvalidAttachment(format!(
                "'{}' is declared text/plain but is not valid UTF-8",
                attachment.filename
            ))
        })?
    } else {
        BASE64.encode(&attachment.content)
    };

    Ok(ProviderAttachment {
        content_type: attachment.content_type.clone(),
        filename: attachment.filename.clone(),
        content,
        content_id: attachment
            .content_id
            .as_deref()
            .map(|id| strip_cid(id).to_string()),
    })
}

/// Encode an inline resource; the record carries its bare content-id.
pub fn encode_inline(resource: &InlineResource) -> MailjetResult<ProviderAttachment> {
    encode(&Attachment::from(resource.clone()))
}

/// Decode a wire record back into the payload Mailjet will deliver.
pub fn decode(record: &ProviderAttachment) -> MailjetResult<Attachment> {
    let content = if is_plain_text(&record.content_type) {
        record.content.clone().into_bytes()
    } else {
        BASE64.decode(record.content.as_bytes()).map_err(|e| {
            MailjetError::InvalidAttachment(format!(
                "'{}' is not valid base64: {}",
                record.filename, e
            ))
        })?
    };

    Ok(Attachment {
        filename: record.filename.clone(),
        content_type: record.content_type.clone(),
        content,
        content_id: record.content_id.clone(),
    })
}

/// `cid:logo.png` -> `logo.png`. Angle brackets from MIME headers are dropped too.
pub fn strip_cid(token: &str) -> &str {
    let token = token.trim();
    let token = match token.get(..CID_SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(CID_SCHEME) => &token[CID_SCHEME.len()..],
        _ => token,
    };
    token.trim_start_matches('<').trim_end_matches('>')
}

/// Content-ids referenced from `html` through `cid:` tokens, in document order.
pub fn cid_references(html: &str) -> Vec<String> {
    static CID_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = CID_PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)cid:([^"'\s)>]+)"#).expect("cid pattern is valid")
    });

    pattern
        .captures_iter(html)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// `text/html; charset=utf-8` -> `text/html`
pub(crate) fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_plain_text(content_type: &str) -> bool {
    mime_essence(content_type) == "text/plain"
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_HEADER: [u8; 6] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    #[test]
    fn test_binary_payload_is_base64() {
        let attachment = Attachment::new("test.jpg", "image/jpeg", JPEG_HEADER.to_vec());
        let record = encode(&attachment).unwrap();

        assert_eq!(record.content, "/9j/4AAQ");
        assert_eq!(record.content_type, "image/jpeg");
        assert!(record.content_id.is_none());
    }

    #[test]
    fn test_plain_text_payload_is_raw() {
        let attachment = Attachment::new("TextFile.txt", "text/plain; charset=utf-8", "hello");
        let record = encode(&attachment).unwrap();
        assert_eq!(record.content, "hello");
    }

    #[test]
    fn test_round_trip_preserves_payload() {
        let binary = Attachment::new("blob.bin", "application/octet-stream", vec![0u8, 159, 146, 150]);
        let text = Attachment::new("notes.txt", "text/plain", "line one\nline two\n");

        for original in [binary, text] {
            let decoded = decode(&encode(&original).unwrap()).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_inline_resource_strips_cid_prefix() {
        let resource = InlineResource::new("cid:test.jpg", "image/jpeg", JPEG_HEADER.to_vec());
        let record = encode_inline(&resource).unwrap();

        assert_eq!(record.content_id.as_deref(), Some("test.jpg"));
        assert_eq!(record.filename, "test.jpg");
    }

    #[test]
    fn test_rejects_empty_payload_and_content_type() {
        let empty = Attachment::new("a.pdf", "application/pdf", Vec::new());
        assert!(matches!(encode(&empty), Err(MailjetError::InvalidAttachment(_))));

        let untyped = Attachment::new("a.pdf", "  ", vec![1, 2, 3]);
        assert!(matches!(encode(&untyped), Err(MailjetError::InvalidAttachment(_))));

        let unnamed = Attachment::new("", "application/pdf", vec![1, 2, 3]);
        assert!(matches!(encode(&unnamed), Err(MailjetError::InvalidAttachment(_))));
    }

    #[test]
    fn test_rejects_non_utf8_plain_text() {
        let attachment = Attachment::new("bad.txt", "text/plain", vec![0xC3, 0x28]);
        assert!(matches!(encode(&attachment), Err(MailjetError::InvalidAttachment(_))));
    }

    #[test]
    fn test_from_reader_reads_payload() {
        let attachment =
            Attachment::from_reader("data.csv", "text/csv", &b"a,b\n1,2\n"[..]).unwrap();
        assert_eq!(attachment.content, b"a,b\n1,2\n");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Attachment::from_path("/definitely/not/here.txt", "text/plain").unwrap_err();
        assert!(matches!(err, MailjetError::InvalidAttachment(_)));
    }

    #[test]
    fn test_strip_cid_variants() {
        assert_eq!(strip_cid("cid:test.jpg"), "test.jpg");
        assert_eq!(strip_cid("CID:<test.jpg>"), "test.jpg");
        assert_eq!(strip_cid("test.jpg"), "test.jpg");
    }

    #[test]
    fn test_cid_references_in_order() {
        let html = r#"<img src="cid:logo.png"/><div style="background:url(cid:bg.jpg)"></div><img src='cid:test.jpg'>"#;
        assert_eq!(cid_references(html), vec!["logo.png", "bg.jpg", "test.jpg"]);
    }
}
