//! libcurl-backed [`HttpClient`].

use anyhow::{Context, Result};
use std::str;
use std::time::Duration;
use url::Url;

use super::parse::parse_content_type;
use super::{HttpClient, HttpResponse};

const MAX_REDIRECTIONS: u32 = 10;

/// Blocking GET client. Runs in the calling thread; the fetcher drives it from `spawn_blocking`.
#[derive(Debug, Clone)]
pub struct CurlClient {
    connect_timeout: Duration,
}

impl CurlClient {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for CurlClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl HttpClient for CurlClient {
    fn get(&self, url: &Url) -> Result<HttpResponse> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str()).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTIONS)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.accept_encoding("")?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform().context("GET request failed")?;
        }

        let status = easy.response_code().context("no response code")?;
        let final_url = easy
            .effective_url()
            .ok()
            .flatten()
            .and_then(|u| Url::parse(u).ok());

        Ok(HttpResponse {
            status,
            content_type: parse_content_type(&headers),
            final_url,
            body,
        })
    }
}
