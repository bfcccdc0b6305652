//! Client for "adlinkfly"-style link shortening APIs
//! (`GET <api>?api=<key>&url=<long url>` → `{"status": "success", "shortenedUrl": "..."}`).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use url::Url;

use crate::core::config::{self, ShortenerSettings};
use crate::core::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct ShortenResponse {
    status: String,
    #[serde(rename = "shortenedUrl")]
    shortened_url: Option<String>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

pub struct LinkShortener {
    client: reqwest::Client,
    api_url: Url,
    api_key: SecretString,
}

impl LinkShortener {
    pub fn new(settings: ShortenerSettings) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config::network::shortener_timeout())
            .build()?;
        Ok(Self {
            client,
            api_url: settings.api_url,
            api_key: settings.api_key,
        })
    }

    pub async fn shorten(&self, long_url: &str) -> AppResult<String> {
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[("api", self.api_key.expose_secret()), ("url", long_url)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::HttpStatus(response.status()));
        }

        let body: ShortenResponse = response.json().await?;
        match (body.status.as_str(), body.shortened_url) {
            ("success", Some(short)) if !short.is_empty() => Ok(short),
            (status, _) => Err(AppError::Shortener(format!(
                "status={} message={}",
                status,
                body.message.map(|m| m.to_string()).unwrap_or_default()
            ))),
        }
    }
}
