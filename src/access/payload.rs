//! Decoded `start` parameters.

use std::fmt;
use std::str::FromStr;

use super::link::{decode, encode};
use crate::core::error::DecodeError;

const TOKEN_PREFIX: &str = "token_";

/// Messages of the archive channel a user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRequest {
    Single(i32),
    /// Inclusive; `start > end` relays in descending order.
    Range { start: i32, end: i32 },
}

impl ContentRequest {
    /// Message ids in delivery order, truncated to at most `limit` entries.
    pub fn message_ids(&self, limit: usize) -> Vec<i32> {
        match *self {
            ContentRequest::Single(id) => vec![id],
            ContentRequest::Range { start, end } if start <= end => (start..=end).take(limit).collect(),
            ContentRequest::Range { start, end } => (end..=start).rev().take(limit).collect(),
        }
    }
}

/// What a deep link carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPayload {
    /// `token_<value>`: the user presents an access token
    Token(String),
    /// `<id>` or `<start>-<end>`
    Content(ContentRequest),
}

impl StartPayload {
    /// Decodes and parses a raw `start` parameter.
    pub fn from_param(param: &str) -> Result<Self, DecodeError> {
        decode(param)?.parse()
    }

    /// Encoded form suitable for a deep link.
    pub fn to_param(&self) -> String {
        encode(&self.to_string())
    }
}

fn parse_message_id(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|id| *id > 0)
}

impl FromStr for StartPayload {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(token) = s.strip_prefix(TOKEN_PREFIX) {
            return Ok(StartPayload::Token(token.to_string()));
        }

        let request = match s.split_once('-') {
            Some((start, end)) => parse_message_id(start)
                .zip(parse_message_id(end))
                .map(|(start, end)| ContentRequest::Range { start, end }),
            None => parse_message_id(s).map(ContentRequest::Single),
        };

        request
            .map(StartPayload::Content)
            .ok_or_else(|| DecodeError::Payload(s.to_string()))
    }
}

impl fmt::Display for StartPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartPayload::Token(token) => write!(f, "{}{}", TOKEN_PREFIX, token),
            StartPayload::Content(ContentRequest::Single(id)) => write!(f, "{}", id),
            StartPayload::Content(ContentRequest::Range { start, end }) => write!(f, "{}-{}", start, end),
        }
    }
}
