//! Storefront API over HTTP.

use async_trait::async_trait;
use turbo_data::{FetchClient, FetchError};

use super::{CatalogService, Product, StockRecord, StockService};

/// Stock and catalog lookups against the storefront REST API:
/// `GET /stock/{id}` and `GET /products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    client: FetchClient,
}

impl HttpStorefront {
    /// Use `client`, which should carry the API base URL.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StockService for HttpStorefront {
    async fn stock(&self, product_id: u64) -> Result<StockRecord, FetchError> {
        tracing::debug!(product_id, "checking stock");
        self.client.get_json(format!("/stock/{}", product_id)).await
    }
}

#[async_trait]
impl CatalogService for HttpStorefront {
    async fn product(&self, product_id: u64) -> Result<Option<Product>, FetchError> {
        tracing::debug!(product_id, "fetching product");
        let response = self
            .client
            .get(format!("/products/{}", product_id))
            .send()
            .await?;
        if response.is_not_found() {
            return Ok(None);
        }
        let product = response.error_for_status()?.json()?;
        Ok(Some(product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use turbo_data::RetryPolicy;

    /// One-shot JSON server: answers a single request with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> FetchClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = 0;
            while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
            }
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        FetchClient::new()
            .with_base_url(format!("http://{}", addr))
            .with_retry(RetryPolicy::none())
    }

    #[tokio::test]
    async fn test_stock_lookup() {
        let api = HttpStorefront::new(serve_once("200 OK", r#"{"id": 1, "amount": 3}"#).await);
        let stock = api.stock(1).await.unwrap();
        assert_eq!(stock.amount, 3);
    }

    #[tokio::test]
    async fn test_product_lookup() {
        let api = HttpStorefront::new(
            serve_once(
                "200 OK",
                r#"{"id": 1, "title": "Shoe", "price": 100, "image": "shoe.jpg"}"#,
            )
            .await,
        );
        let product = api.product(1).await.unwrap().unwrap();
        assert_eq!(product.valid_id(), Some(1));
        assert_eq!(product.name, "Shoe");
    }

    #[tokio::test]
    async fn test_product_not_found() {
        let api = HttpStorefront::new(serve_once("404 Not Found", "{}").await);
        assert!(api.product(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stock_server_error() {
        let api = HttpStorefront::new(serve_once("500 Internal Server Error", "oops").await);
        let err = api.stock(1).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_malformed_stock_body() {
        let api = HttpStorefront::new(serve_once("200 OK", r#"{"units": 3}"#).await);
        assert!(matches!(api.stock(1).await, Err(FetchError::ParseError(_))));
    }
}
