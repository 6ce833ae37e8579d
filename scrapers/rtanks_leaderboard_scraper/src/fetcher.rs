use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

use crate::{config::ScrapingConfig, error::ScrapeError};

pub trait HtmlFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Blocking fetcher over one reused client; a single attempt per call.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(config: &ScrapingConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl HtmlFetcher for HttpFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let transport = |source: reqwest::Error| ScrapeError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().map_err(transport)?;
        debug!("Got response from {} ({} bytes)", url, text.len());
        Ok(text)
    }
}
