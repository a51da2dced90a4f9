use anyhow::{Context, Result, anyhow};
use std::time::Duration;

use super::retry::{
    RATE_LIMIT_BASE_DELAY, RATE_LIMIT_MAX_RETRIES, is_rate_limited, retry_after, wait_with_backoff,
};
use super::{BackendFuture, TranslateBackend};

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Translation via the public Google Translate web endpoint
/// (`/translate_a/single`, `client=gtx`). No API key required; rate limits
/// apply and are retried with backoff. A timeout is reported like any other
/// backend failure.
#[derive(Debug, Clone)]
pub struct GoogleWeb {
    client: reqwest::Client,
}

impl GoogleWeb {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .with_context(|| "failed to build http client")?;
        Ok(Self { client })
    }
}

fn base_url() -> String {
    std::env::var("GOOGLE_TRANSLATE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

impl TranslateBackend for GoogleWeb {
    fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> BackendFuture {
        let client = self.client.clone();
        let text = text.to_string();
        let source = source_lang.to_string();
        let target = target_lang.to_string();
        Box::pin(async move {
            let url = format!("{}/translate_a/single", base_url());
            let mut delay = RATE_LIMIT_BASE_DELAY;
            for attempt in 1..=RATE_LIMIT_MAX_RETRIES {
                let response = client
                    .get(&url)
                    .query(&[
                        ("client", "gtx"),
                        ("sl", source.as_str()),
                        ("tl", target.as_str()),
                        ("dt", "t"),
                        ("q", text.as_str()),
                    ])
                    .send()
                    .await
                    .with_context(|| "translation request failed")?;

                let status = response.status();
                let headers = response.headers().clone();
                let body = response
                    .text()
                    .await
                    .with_context(|| "failed to read translation response")?;

                if status.is_success() {
                    return parse_translation(&body);
                }
                if is_rate_limited(status, &body) && attempt < RATE_LIMIT_MAX_RETRIES {
                    delay = wait_with_backoff("google", attempt, delay, retry_after(&headers)).await;
                    continue;
                }
                return Err(anyhow!(
                    "translation request failed with status {}: {}",
                    status,
                    body.trim()
                ));
            }
            Err(anyhow!(
                "translation rate limited after {} attempts",
                RATE_LIMIT_MAX_RETRIES
            ))
        })
    }
}

/// The endpoint answers with nested arrays; the first element holds one
/// `[translated, original, ...]` entry per sentence.
fn parse_translation(body: &str) -> Result<String> {
    let value: serde_json::Value =
        serde_json::from_str(body).with_context(|| "failed to parse translation response")?;
    let segments = value
        .get(0)
        .and_then(|segments| segments.as_array())
        .ok_or_else(|| anyhow!("unexpected translation response shape"))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(|part| part.as_str()) {
            translated.push_str(part);
        }
    }
    Ok(translated)
}
