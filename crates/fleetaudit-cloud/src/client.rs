//! DigitalOcean REST client with exhaustive pagination

use async_trait::async_trait;
use fleetaudit_core::{Droplet, Error, Firewall, Inventory, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://api.digitalocean.com/v2";
const PAGE_SIZE: u32 = 200;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated DigitalOcean API client.
///
/// List calls paginate to exhaustion before returning, so callers always see
/// the whole fleet or an error, never a partial page.
pub struct DoClient {
    http: reqwest::Client,
    token: String,
    base: String,
}

#[derive(Debug, Deserialize)]
struct DropletsPage {
    #[serde(default)]
    droplets: Vec<Droplet>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct FirewallsPage {
    #[serde(default)]
    firewalls: Vec<Firewall>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct Links {
    pages: Option<Pages>,
}

#[derive(Debug, Deserialize)]
struct Pages {
    next: Option<String>,
}

impl DoClient {
    pub fn new(token: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(Error::Configuration("empty API token".into()));
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            token: token.to_string(),
            base: API_BASE.to_string(),
        })
    }

    /// Points the client at a different API base, for tests against a local
    /// stub server.
    #[doc(hidden)]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("GET {path}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("GET {path}: HTTP {status}")));
        }
        resp.json::<T>()
            .await
            .map_err(|e| Error::Transport(format!("GET {path}: invalid response body: {e}")))
    }
}

#[async_trait]
impl Inventory for DoClient {
    async fn list_droplets_by_tag(&self, tag: &str) -> Result<Vec<Droplet>> {
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let body: DropletsPage = self
                .get_page(
                    "/droplets",
                    &[
                        ("tag_name", tag.to_string()),
                        ("per_page", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            all.extend(body.droplets);
            match next_page(body.links.as_ref()) {
                Some(next) => page = next,
                None => break,
            }
        }
        debug!(tag, count = all.len(), "listed droplets");
        Ok(all)
    }

    async fn list_firewalls(&self) -> Result<Vec<Firewall>> {
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let body: FirewallsPage = self
                .get_page(
                    "/firewalls",
                    &[
                        ("per_page", PAGE_SIZE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;
            all.extend(body.firewalls);
            match next_page(body.links.as_ref()) {
                Some(next) => page = next,
                None => break,
            }
        }
        debug!(count = all.len(), "listed firewalls");
        Ok(all)
    }
}

/// Page number of the next page, taken from the `links.pages.next` URL. A
/// missing or unparsable next link ends pagination rather than erroring.
fn next_page(links: Option<&Links>) -> Option<u32> {
    let next = links?.pages.as_ref()?.next.as_deref()?;
    page_param(next)
}

fn page_param(next_url: &str) -> Option<u32> {
    let url = url::Url::parse(next_url).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse().ok())
}
