//! Deep-link payload encoding.
//!
//! Telegram only allows `[A-Za-z0-9_-]` (up to 64 chars) in a `start` parameter, so
//! payloads travel as URL-safe base64 with the `=` padding removed.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::Engine;
use std::sync::Arc;

use super::payload::StartPayload;
use super::shortener::LinkShortener;
use crate::core::error::DecodeError;

/// URL-safe decoder that ignores non-zero bits left over after the last full byte
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Encodes an ASCII payload into a start parameter.
pub fn encode(payload: &str) -> String {
    let encoded = URL_SAFE.encode(payload.as_bytes());
    encoded.trim_end_matches('=').to_string()
}

/// Decodes a start parameter produced by [`encode`].
///
/// Missing padding is restored before decoding and stray trailing bits are tolerated, as
/// other encoders produce them; the decoded bytes must be ASCII.
pub fn decode(param: &str) -> Result<String, DecodeError> {
    let mut padded = param.trim_end_matches('=').to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = URL_SAFE_LENIENT.decode(padded.as_bytes())?;
    if !bytes.is_ascii() {
        return Err(DecodeError::NotAscii);
    }
    String::from_utf8(bytes).map_err(|_| DecodeError::NotAscii)
}

/// Builds `https://<domain>/<handle>?start=<encoded payload>`.
pub fn deep_link(domain: &str, bot_handle: &str, payload: &StartPayload) -> String {
    format!(
        "https://{}/{}?start={}",
        domain,
        bot_handle.trim_start_matches('@'),
        payload.to_param()
    )
}

/// Produces user-facing deep links, shortened when a shortener is configured.
#[derive(Clone)]
pub struct LinkBuilder {
    domain: String,
    bot_handle: String,
    shortener: Option<Arc<LinkShortener>>,
}

impl LinkBuilder {
    pub fn new(domain: impl Into<String>, bot_handle: impl Into<String>, shortener: Option<Arc<LinkShortener>>) -> Self {
        Self {
            domain: domain.into(),
            bot_handle: bot_handle.into(),
            shortener,
        }
    }

    pub fn has_shortener(&self) -> bool {
        self.shortener.is_some()
    }

    /// Unshortened link for any payload.
    pub fn raw(&self, payload: &StartPayload) -> String {
        deep_link(&self.domain, &self.bot_handle, payload)
    }

    /// Link a user follows to present `token` back to the bot.
    ///
    /// Falls back to the raw deep link when shortening fails.
    pub async fn token_link(&self, token: &str) -> String {
        let raw = self.raw(&StartPayload::Token(token.to_string()));
        match &self.shortener {
            Some(shortener) => match shortener.shorten(&raw).await {
                Ok(short) => short,
                Err(e) => {
                    log::warn!("Link shortening failed, using raw deep link: {}", e);
                    raw
                }
            },
            None => raw,
        }
    }
}
