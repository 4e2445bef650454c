use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
#[cfg(test)]
use mockall::automock;
use reqwest::{header::CONTENT_TYPE, Client};

use crate::error::GeneratorError;
use crate::invoice::InvoicePayload;

/// リトライ間隔の基準値。`n`回目のリトライでは`n`倍待つ。
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// invoiceのドキュメントを生成するサービス。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InvoiceGenerator {
    /// `payload`を送信し、生成されたドキュメントのバイト列を返す。
    async fn generate(&self, payload: &InvoicePayload) -> Result<Vec<u8>, GeneratorError>;
}

/// invoice-generator.comと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = InvoiceGeneratorClient::new("https://invoice-generator.com", 0);
/// let pdf = client.generate(&payload).await.unwrap();
/// ```
pub struct InvoiceGeneratorClient {
    client: Client,
    api_url: String,
    retries: u32,
}

impl InvoiceGeneratorClient {
    /// 新しい`InvoiceGeneratorClient`を返す。
    ///
    /// # Arguments
    ///
    /// * `api_url` - リクエストの送信先
    /// * `retries` - 通信エラーと5xxのときに追加で試行する回数
    pub fn new(api_url: impl Into<String>, retries: u32) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            retries,
        }
    }

    async fn send(&self, payload: &InvoicePayload) -> Result<Vec<u8>, GeneratorError> {
        let transport = |source| GeneratorError::Transport {
            url: self.api_url.clone(),
            source,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl InvoiceGenerator for InvoiceGeneratorClient {
    async fn generate(&self, payload: &InvoicePayload) -> Result<Vec<u8>, GeneratorError> {
        let mut attempt = 0;
        loop {
            match self.send(payload).await {
                Ok(bytes) => {
                    info!("Invoice generator returned {} bytes", bytes.len());
                    return Ok(bytes);
                }
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    warn!("{}, retrying ({}/{})", err, attempt, self.retries);
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
