//! Product detail resolver.

use crate::remote::classify_status;
use crate::{ProductId, ProductSnapshot, RemoteError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("product not found: {0}")]
    NotFound(ProductId),

    #[error("catalog unavailable: {0}")]
    Network(String),
}

/// Expands a product id into display fields. Called once per added item.
#[async_trait]
pub trait ProductResolver: Send + Sync {
    async fn resolve(&self, product_id: &ProductId) -> Result<ProductSnapshot, ResolveError>;
}

/// Catalog lookup over `GET {base}/products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpProductResolver {
    client: Client,
    base_url: Url,
}

impl HttpProductResolver {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn product_url(&self, product_id: &str) -> Result<Url, ResolveError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ResolveError::Network(format!("invalid base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["products", product_id]);
        Ok(url)
    }
}

#[async_trait]
impl ProductResolver for HttpProductResolver {
    async fn resolve(&self, product_id: &ProductId) -> Result<ProductSnapshot, ResolveError> {
        let url = self.product_url(product_id)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ResolveError::NotFound(product_id.clone()));
        }
        match classify_status(response.status()) {
            Some(RemoteError::Network(msg) | RemoteError::Auth(msg)) => {
                Err(ResolveError::Network(msg))
            }
            None => response
                .json()
                .await
                .map_err(|e| ResolveError::Network(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_url() {
        let resolver = HttpProductResolver::new(
            Client::new(),
            Url::parse("https://shop.example.com/api/").unwrap(),
        );
        let url = resolver.product_url("sku 9").unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api/products/sku%209");
    }

    #[test]
    fn resolve_error_display() {
        let err = ResolveError::NotFound("12".into());
        assert_eq!(err.to_string(), "product not found: 12");
    }
}
