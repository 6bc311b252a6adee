// src/fetch/client.rs

use anyhow::{Context, Result};
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::{PageFetcher, PageRequest};
use crate::{error::FetchError, table::RecordTable};

pub const ENA_PORTAL_API_URL: &str = "https://www.ebi.ac.uk/ena/portal/api/search";

/// Longest slice of an error body kept in a [`FetchError::Status`].
const BODY_EXCERPT: usize = 512;

/// Page fetcher backed by the ENA Portal search endpoint.
#[derive(Clone)]
pub struct EnaClient {
    client: Client,
    base: Url,
}

impl EnaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base =
            Url::parse(base_url).with_context(|| format!("parsing base URL {}", base_url))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, base })
    }
}

impl PageFetcher for EnaClient {
    #[instrument(level = "debug", skip(self, request), fields(query = request.spec.name, offset = request.offset))]
    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<RecordTable, FetchError> {
        let resp = self
            .client
            .get(self.base.clone())
            .header(header::ACCEPT, "*/*")
            .query(&request.params())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT).collect(),
            });
        }

        let bytes = resp.bytes().await?;
        debug!(bytes = bytes.len(), "received page body");
        RecordTable::read_tsv(bytes.as_ref()).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}
