//! Profile store: fetches freelancer profile documents by content identifier.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the raw document bytes for `cid`.
    async fn fetch(&self, cid: &str) -> Result<Bytes, AppError>;
}

/// Reads documents through a public or private IPFS HTTP gateway.
#[derive(Clone)]
pub struct IpfsGateway {
    client: Client,
    base_url: String,
}

impl IpfsGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl ProfileStore for IpfsGateway {
    async fn fetch(&self, cid: &str) -> Result<Bytes, AppError> {
        if cid.trim().is_empty() {
            return Err(AppError::InvalidInput("content identifier is empty".to_string()));
        }

        let url = format!("{}{}", self.base_url, cid);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::from_transport("ipfs fetch", e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("ipfs content {cid}"))),
            status if !status.is_success() => Err(AppError::Connection(format!(
                "ipfs gateway returned {status} for {cid}"
            ))),
            _ => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| AppError::from_transport("ipfs fetch", e))?;
                info!("Retrieved content from IPFS: {cid}");
                Ok(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ipfs/QmProfile")
            .with_status(200)
            .with_body(r#"{"name": "John Doe"}"#)
            .create_async()
            .await;

        let gateway =
            IpfsGateway::new(&format!("{}/ipfs", server.url()), Duration::from_secs(5)).unwrap();
        let body = gateway.fetch("QmProfile").await.unwrap();
        assert_eq!(&body[..], br#"{"name": "John Doe"}"#);
    }

    #[tokio::test]
    async fn test_missing_content_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ipfs/QmGone")
            .with_status(404)
            .create_async()
            .await;

        let gateway =
            IpfsGateway::new(&format!("{}/ipfs/", server.url()), Duration::from_secs(5)).unwrap();
        let err = gateway.fetch("QmGone").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_gateway_error_is_connection_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ipfs/QmBusy")
            .with_status(502)
            .create_async()
            .await;

        let gateway =
            IpfsGateway::new(&format!("{}/ipfs/", server.url()), Duration::from_secs(5)).unwrap();
        let err = gateway.fetch("QmBusy").await.unwrap_err();
        assert!(matches!(err, AppError::Connection(_)));
    }

    #[tokio::test]
    async fn test_silent_gateway_is_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let gateway =
            IpfsGateway::new(&format!("http://{addr}/ipfs/"), Duration::from_millis(500)).unwrap();
        let err = gateway.fetch("QmSlow").await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_empty_cid_is_invalid_input() {
        let gateway = IpfsGateway::new("https://ipfs.io/ipfs/", Duration::from_secs(5)).unwrap();
        let err = gateway.fetch("").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
