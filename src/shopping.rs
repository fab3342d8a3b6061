//! # Naver Shopping client
//!
//! Walks the search results page by page, one request at a time, until the
//! API returns an empty page or the offset passes [`MAX_OFFSET`].

use std::fmt;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::Config;
use crate::models::{ShoppingItem, ShoppingPage};

pub const DEFAULT_SHOPPING_URL: &str = "https://openapi.naver.com/v1/search/shop.json";

pub const FIRST_OFFSET: u32 = 1;
pub const PAGE_SIZE: u32 = 100;
pub const MAX_OFFSET: u32 = 1000;

const SORT_BY_RELEVANCE: &str = "sim";
const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

#[derive(Error, Debug)]
pub enum ShoppingError {
    #[error("Naver Shopping request at start={offset} failed: {source}")]
    Request {
        offset: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("Naver Shopping returned {status} at start={offset}")]
    Status { offset: u32, status: StatusCode },
}

#[derive(Clone)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for NaverCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaverCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Offset state for one search. `start` only moves forward, by `page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    start: u32,
    page_size: u32,
    max_offset: u32,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            start: FIRST_OFFSET,
            page_size: PAGE_SIZE,
            max_offset: MAX_OFFSET,
        }
    }
}

impl PaginationCursor {
    /// The offset to request next, or `None` once past `max_offset`.
    pub fn offset(&self) -> Option<u32> {
        (self.start <= self.max_offset).then_some(self.start)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn advance(&mut self) {
        self.start += self.page_size;
    }
}

#[derive(Clone, Debug)]
pub struct ShoppingClient {
    http: Client,
    endpoint: String,
    credentials: Option<NaverCredentials>,
}

impl ShoppingClient {
    /// Creates a client for `endpoint`. Without `credentials` every search is
    /// refused by the handler before any request goes out.
    pub fn new(endpoint: impl Into<String>, credentials: Option<NaverCredentials>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            credentials,
        }
    }

    /// Builds the client from `NAVER_SHOPPING_URL`, `CLIENT_ID` and `CLIENT_SECRET`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.naver_shopping_url.clone(), config.credentials())
    }

    pub fn credentials(&self) -> Option<&NaverCredentials> {
        self.credentials.as_ref()
    }

    async fn fetch_page(
        &self,
        credentials: &NaverCredentials,
        query: &str,
        offset: u32,
        display: u32,
    ) -> Result<Vec<ShoppingItem>, ShoppingError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("query", query.to_string()),
                ("display", display.to_string()),
                ("start", offset.to_string()),
                ("sort", SORT_BY_RELEVANCE.to_string()),
            ])
            .header(CLIENT_ID_HEADER, &credentials.client_id)
            .header(CLIENT_SECRET_HEADER, &credentials.client_secret)
            .send()
            .await
            .map_err(|source| ShoppingError::Request { offset, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShoppingError::Status { offset, status });
        }

        let page: ShoppingPage = response
            .json()
            .await
            .map_err(|source| ShoppingError::Request { offset, source })?;

        Ok(page.into_items())
    }

    /// Every item for `query`, in the order the API returned them.
    ///
    /// Any failed page fails the whole search; nothing fetched before it is
    /// returned.
    pub async fn search_all(
        &self,
        credentials: &NaverCredentials,
        query: &str,
    ) -> Result<Vec<ShoppingItem>, ShoppingError> {
        let mut cursor = PaginationCursor::default();
        let mut items = Vec::new();

        while let Some(offset) = cursor.offset() {
            let page = self
                .fetch_page(credentials, query, offset, cursor.page_size())
                .await?;
            if page.is_empty() {
                break;
            }

            tracing::debug!(query, offset, count = page.len(), "fetched shopping page");
            items.extend(page);
            cursor.advance();
        }

        Ok(items)
    }
}
