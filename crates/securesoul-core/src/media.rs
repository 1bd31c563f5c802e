//! `data:` URI codec for audio that crosses the browser boundary.
//!
//! The browser sends recordings as `data:audio/webm;base64,<payload>` and plays replies from
//! `data:audio/wav;base64,<payload>`.

use crate::error::{SoulError, SoulResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// A decoded `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Parse a base64 data URI. Only the `;base64` encoding is accepted.
    pub fn parse(uri: &str) -> SoulResult<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| SoulError::validation("audio must be a data URI (data:<mime>;base64,<data>)"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| SoulError::validation("data URI is missing the ',' separator"))?;

        // Header looks like `audio/webm;codecs=opus;base64`.
        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(SoulError::validation("data URI must be base64 encoded"));
        }
        if mime_type.is_empty() {
            return Err(SoulError::validation("data URI has no MIME type"));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| SoulError::validation(format!("data URI payload is not valid base64: {}", e)))?;
        if bytes.is_empty() {
            return Err(SoulError::validation("data URI payload is empty"));
        }

        Ok(Self { mime_type, bytes })
    }

    /// Payload as standard base64 (no prefix), as the model API expects for inline data.
    pub fn base64_payload(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_payload())
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}
