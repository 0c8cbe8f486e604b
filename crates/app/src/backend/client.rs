//! REST client for the hosted tabular backend.

use std::time::Duration;

use reqwest::{
    Client, Method, RequestBuilder, Response,
    header::{CONTENT_RANGE, HeaderMap},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::backend::{AccessToken, BackendError, Query};

const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";

/// Rows requested per page by [`RestClient::select_all`]. The server may cap
/// a page below this, so paging never relies on a full page coming back.
const PAGE_SIZE: usize = 1000;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. `"https://abc.supabase.co"`.
    pub url: String,

    /// Public API key sent as the `apikey` header on every request.
    pub anon_key: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl BackendConfig {
    pub(crate) fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub(crate) fn http_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(self.timeout).build()
    }
}

/// Table and stored-function client.
#[derive(Debug, Clone)]
pub struct RestClient {
    config: BackendConfig,
    http: Client,
}

impl RestClient {
    /// Create a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = config.http_client()?;

        Ok(Self { config, http })
    }

    /// Filtered read of a table.
    pub async fn select<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, BackendError> {
        let response = self
            .request(Method::GET, &self.table_url(table), token)
            .query(query.params())
            .send()
            .await?;

        read_json(response).await
    }

    /// Read every row matching `query`, one page at a time.
    ///
    /// The server caps each response, so a single `select` can silently
    /// return a prefix of the table. Pages are requested by offset until the
    /// exact count reported in `Content-Range` is reached.
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, BackendError> {
        let mut rows: Vec<T> = Vec::new();

        loop {
            let response = self
                .request(Method::GET, &self.table_url(table), token)
                .header(PREFER_HEADER, COUNT_EXACT)
                .query(query.params())
                .query(&[("offset", rows.len()), ("limit", PAGE_SIZE)])
                .send()
                .await?;

            let total = content_range_total(response.headers());
            let page: Vec<T> = read_json(response).await?;
            let fetched = page.len();

            rows.extend(page);

            let complete = match total {
                Some(total) => rows.len() >= total,
                None => fetched < PAGE_SIZE,
            };

            if fetched == 0 || complete {
                return Ok(rows);
            }
        }
    }

    /// Insert one row (object body) or many rows (array body).
    pub async fn insert<B, T>(
        &self,
        token: &AccessToken,
        table: &str,
        body: &B,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, &self.table_url(table), token)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(body)
            .send()
            .await?;

        read_json(response).await
    }

    /// Patch every row matching `query`, returning the updated rows.
    pub async fn update<B, T>(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
        patch: &B,
    ) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::PATCH, &self.table_url(table), token)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .query(query.params())
            .json(patch)
            .send()
            .await?;

        read_json(response).await
    }

    /// Delete every row matching `query`, returning how many were removed.
    pub async fn delete(
        &self,
        token: &AccessToken,
        table: &str,
        query: &Query,
    ) -> Result<usize, BackendError> {
        let response = self
            .request(Method::DELETE, &self.table_url(table), token)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .query(query.params())
            .send()
            .await?;

        let removed: Vec<serde_json::Value> = read_json(response).await?;

        Ok(removed.len())
    }

    /// Call a stored function with named arguments.
    pub async fn rpc<B, T>(
        &self,
        token: &AccessToken,
        function: &str,
        args: &B,
    ) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}/rest/v1/rpc/{function}", self.config.base_url());

        let response = self
            .request(Method::POST, &url, token)
            .json(args)
            .send()
            .await?;

        read_json(response).await
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.base_url())
    }

    fn request(&self, method: Method, url: &str, token: &AccessToken) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token.expose())
    }
}

/// Total row count from a `Content-Range: 0-999/1500` header, when known.
fn content_range_total(headers: &HeaderMap) -> Option<usize> {
    let (_, total) = headers.get(CONTENT_RANGE)?.to_str().ok()?.rsplit_once('/')?;

    total.parse().ok()
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        return Err(BackendError::from_response(status, &text));
    }

    Ok(response.json().await?)
}
