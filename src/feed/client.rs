// Song feed HTTP client.
// Issues the single page-zero feed request and converts failures into errors.

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::error::{Error, Result};

use super::types::FeedPage;

/// Client for the remote song feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    url: String,
    page: u32,
}

impl FeedClient {
    /// Create a feed client for the configured endpoint.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers())
            .build()
            .map_err(Error::Network)?;

        Ok(Self::with_client(client, config))
    }

    /// Create a feed client around an already configured reqwest client.
    pub fn with_client(client: Client, config: &FeedConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            page: config.page,
        }
    }

    /// The endpoint this client requests.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the first page of the feed.
    pub async fn fetch_songs(&self) -> Result<FeedPage> {
        info!(url = %self.url, page = self.page, "fetching song feed");

        let response = self
            .client
            .get(&self.url)
            .query(&[("page", self.page)])
            .send()
            .await
            .map_err(Error::Network)?;

        let response = check_response(response)?;
        let page: FeedPage = response.json().await?;

        debug!(items = page.items.len(), "song feed decoded");
        Ok(page)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("songsearch/", env!("CARGO_PKG_VERSION"))),
    );
    headers
}

/// Reject any non-success status.
fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status(status))
    }
}
