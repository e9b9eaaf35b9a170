use crate::{Category, DocSummary, Document, Error, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Page size requested from the categories endpoint.
pub const CATEGORIES_PER_PAGE: usize = 100;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://dash.readme.com/api/v1`
    pub base_url: String,
    /// API token, sent as the basic auth user name with an empty password
    pub token: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

/// Items collected by a paginated walk.
///
/// A walk stops at the first empty page or the first failed request. In the
/// second case the items gathered so far are kept and `stopped_by` holds the
/// failure, so a truncated listing can be told apart from a short one.
#[derive(Debug)]
pub struct Paginated<T> {
    /// Items from every page fetched, in API order
    pub items: Vec<T>,
    /// The error that ended the walk early, if any
    pub stopped_by: Option<Error>,
}

impl<T> Paginated<T> {
    /// True when the walk ended on an empty page rather than a failure.
    pub const fn is_complete(&self) -> bool {
        self.stopped_by.is_none()
    }
}

/// HTTP client for the documentation platform's REST API
pub struct ApiClient {
    client: Client,
    base: Url,
    token: String,
}

impl ApiClient {
    /// Creates a client for the given API root and credentials
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(config.base_url));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("docex/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            base,
            token: config.token,
        })
    }

    /// The underlying HTTP client, shared with the image downloader.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Fetches every category, 100 per page, until an empty page or a failure.
    pub async fn list_categories(&self) -> Paginated<Category> {
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let result = match self.categories_page_url(page) {
                Ok(url) => self.get_json::<Vec<Category>>(url).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(batch) if batch.is_empty() => {
                    debug!("Category listing complete after {} page(s)", page - 1);
                    return Paginated {
                        items,
                        stopped_by: None,
                    };
                },
                Ok(batch) => {
                    debug!("Fetched {} categories from page {}", batch.len(), page);
                    items.extend(batch);
                    page += 1;
                },
                Err(e) => {
                    warn!(
                        page,
                        collected = items.len(),
                        category = e.category(),
                        "Category listing stopped early: {e}"
                    );
                    return Paginated {
                        items,
                        stopped_by: Some(e),
                    };
                },
            }
        }
    }

    /// Fetches the document tree (summary form) of one category
    pub async fn list_documents_for_category(&self, slug: &str) -> Result<Vec<DocSummary>> {
        let url = self.endpoint(&["categories", slug, "docs"])?;
        self.get_json(url).await
    }

    /// Fetches one document in full form, including its body
    pub async fn get_document_detail(&self, slug: &str) -> Result<Document> {
        let url = self.endpoint(&["docs", slug])?;
        self.get_json(url).await
    }

    fn categories_page_url(&self, page: usize) -> Result<Url> {
        let mut url = self.endpoint(&["categories"])?;
        url.query_pairs_mut()
            .append_pair("perPage", &CATEGORIES_PER_PAGE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .basic_auth(&self.token, Some(""))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
