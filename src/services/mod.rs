use crate::config::Config;
use crate::error::RelayError;
use crate::models::generation::{generated_text, GenerationPayload};
use log::{debug, error, info};
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Instant;

/// Client for the remote text-generation endpoint. One POST per call, no
/// retries.
pub struct GenerationService {
    client: Client,
    url: String,
}

impl GenerationService {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            url: config.generate_url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, RelayError> {
        let payload = GenerationPayload::new(prompt);
        debug!(
            "Calling local LLM API with payload: {}",
            serde_json::to_string(&payload).unwrap_or_default()
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(e, start))?;

        let status = response.status();
        info!("API response status code: {}", status.as_u16());

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("(Failed to read error body: {})", e),
            };
            error!(
                "HTTP Error: {} ({:.2}s). Error body: {}",
                status,
                start.elapsed().as_secs_f64(),
                body
            );
            return Err(RelayError::RemoteHttp {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(e, start)
            } else {
                error!(
                    "Failed to read response body after {:.2}s: {}",
                    start.elapsed().as_secs_f64(),
                    e
                );
                RelayError::ProtocolViolation(format!(
                    "Could not read the response body from the local API: {}",
                    e
                ))
            }
        })?;
        info!("API request time: {:.2}s", start.elapsed().as_secs_f64());

        let data: Value = serde_json::from_slice(&body).map_err(|e| {
            error!("Undecodable API response: {}", e);
            RelayError::ProtocolViolation(format!(
                "Response from the local API is not valid JSON: {}",
                e
            ))
        })?;
        debug!("API response data: {}", data);

        generated_text(&data).inspect_err(|e| error!("{}", e))
    }
}

fn transport_error(e: reqwest::Error, start: Instant) -> RelayError {
    let elapsed = start.elapsed().as_secs_f64();
    if e.is_timeout() {
        error!("Request timed out after {:.2}s: {}", elapsed, e);
        RelayError::Timeout
    } else {
        error!("URL Error after {:.2}s: {}", elapsed, e);
        RelayError::Connection(e.to_string())
    }
}
