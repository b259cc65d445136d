//! Remote collection client.
//!
//! A thin contract over the server's per-identity collection resource.
//! Failures surface as [`RemoteError`]; there is no retry here.

use crate::{Error, ProductId, RemoteItem, RemoteItemId, UserId};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Failure of a remote call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Transient transport or server failure
    #[error("network error: {0}")]
    Network(String),

    /// The session is no longer valid
    #[error("authentication rejected: {0}")]
    Auth(String),
}

impl From<RemoteError> for Error {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Network(msg) => Error::Network(msg),
            RemoteError::Auth(msg) => Error::Auth(msg),
        }
    }
}

/// Server-side saved-item collection of one authenticated user.
///
/// Every call takes the user id, so nothing here can run while anonymous.
#[async_trait]
pub trait RemoteCollectionClient: Send + Sync {
    /// List all items in server order.
    async fn fetch_all(&self, user: &UserId) -> Result<Vec<RemoteItem>, RemoteError>;

    /// Add a product. Adding a product twice returns the existing record.
    async fn add_item(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<RemoteItem, RemoteError>;

    /// Remove a server record.
    async fn remove_item(&self, user: &UserId, item_id: &RemoteItemId) -> Result<(), RemoteError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemRequest<'a> {
    product_id: &'a str,
}

/// REST client for `{base}/users/{user}/items`.
///
/// Authentication headers and timeouts belong to the supplied
/// [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
    base_url: Url,
}

impl HttpRemoteClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| RemoteError::Network(format!("invalid base url: {}", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::Network(err.to_string())
}

pub(crate) fn classify_status(status: StatusCode) -> Option<RemoteError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Some(RemoteError::Auth(format!("server responded {status}")))
        }
        s if s.is_success() => None,
        s => Some(RemoteError::Network(format!("server responded {s}"))),
    }
}

fn check(response: Response) -> Result<Response, RemoteError> {
    match classify_status(response.status()) {
        Some(err) => Err(err),
        None => Ok(response),
    }
}

#[async_trait]
impl RemoteCollectionClient for HttpRemoteClient {
    async fn fetch_all(&self, user: &UserId) -> Result<Vec<RemoteItem>, RemoteError> {
        let url = self.endpoint(&["users", user.as_str(), "items"])?;
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        check(response)?.json().await.map_err(transport_error)
    }

    async fn add_item(
        &self,
        user: &UserId,
        product_id: &ProductId,
    ) -> Result<RemoteItem, RemoteError> {
        let url = self.endpoint(&["users", user.as_str(), "items"])?;
        let response = self
            .client
            .post(url)
            .json(&AddItemRequest {
                product_id: product_id.as_str(),
            })
            .send()
            .await
            .map_err(transport_error)?;
        check(response)?.json().await.map_err(transport_error)
    }

    async fn remove_item(&self, user: &UserId, item_id: &RemoteItemId) -> Result<(), RemoteError> {
        let url = self.endpoint(&["users", user.as_str(), "items", item_id.as_str()])?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(item_id = %item_id, "remote item already gone");
            return Ok(());
        }
        check(response).map(|_| ())
    }
}
