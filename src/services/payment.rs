//! Payment gateway client.
//!
//! Orders are created on Razorpay over HTTPS with retries (exponential backoff
//! with jitter) on transport failures and 5xx responses. Without a configured
//! key id an offline gateway mints order ids locally, which keeps development
//! and tests self-contained. Both verify checkout callbacks the same way.

use crate::{
    config::PaymentConfig,
    error::{AppError, Result},
    utils::{hmac, redact_sensitive_data},
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_retry::{RetryIf, strategy::ExponentialBackoff};
use tracing::{info, warn};
use uuid::Uuid;

/// Order request in the gateway's wire format
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    /// Minor units
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub payment_capture: u8,
}

/// Order as returned by the gateway
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

#[derive(Debug, Error)]
enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("gateway returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl GatewayError {
    fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport(_) | GatewayError::Timeout => true,
            GatewayError::Status { status, .. } => *status >= 500 || *status == 429,
        }
    }
}

#[derive(Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    config: PaymentConfig,
    key_id: String,
}

impl RazorpayClient {
    pub fn new(config: PaymentConfig, key_id: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build payment client: {e}")))?;
        Ok(Self {
            client,
            config,
            key_id,
        })
    }

    fn orders_url(&self) -> Result<url::Url> {
        let base = format!("{}/", self.config.api_base.trim_end_matches('/'));
        url::Url::parse(&base)
            .and_then(|base| base.join("orders"))
            .map_err(|e| AppError::Internal(format!("Invalid payment API base: {e}")))
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<GatewayOrder> {
        let url = self.orders_url()?;
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let strategy = ExponentialBackoff::from_millis(self.config.initial_backoff_ms.max(1))
            .max_delay(Duration::from_secs(5))
            .map(tokio_retry::strategy::jitter)
            .take(self.config.max_retries);

        let started = Instant::now();
        let result = RetryIf::spawn(
            strategy,
            || {
                let request = self
                    .client
                    .post(url.clone())
                    .basic_auth(&self.key_id, Some(&self.config.key_secret))
                    .json(order);
                async move {
                    let response = tokio::time::timeout(timeout, request.send())
                        .await
                        .map_err(|_| GatewayError::Timeout)??;

                    let status = response.status();
                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        let err = GatewayError::Status {
                            status: status.as_u16(),
                            body: redact_sensitive_data(&body),
                        };
                        warn!(target: "payment", error = %err, "Order request failed");
                        return Err(err);
                    }
                    Ok(response.json::<GatewayOrder>().await?)
                }
            },
            |err: &GatewayError| err.is_retryable(),
        )
        .await;

        match result {
            Ok(created) => {
                info!(
                    target: "payment",
                    order_id = %created.id,
                    amount = created.amount,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Gateway order created"
                );
                Ok(created)
            }
            Err(e) => Err(AppError::Payment(e.to_string())),
        }
    }
}

#[derive(Clone)]
pub enum PaymentGateway {
    Razorpay(RazorpayClient),
    Offline { key_secret: String },
}

impl PaymentGateway {
    pub fn from_config(config: &PaymentConfig) -> Result<Self> {
        match &config.key_id {
            Some(key_id) => Ok(PaymentGateway::Razorpay(RazorpayClient::new(
                config.clone(),
                key_id.clone(),
            )?)),
            None => {
                warn!("RAZORPAY_KEY_ID not set; using the offline payment gateway");
                Ok(PaymentGateway::Offline {
                    key_secret: config.key_secret.clone(),
                })
            }
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, PaymentGateway::Offline { .. })
    }

    fn key_secret(&self) -> &str {
        match self {
            PaymentGateway::Razorpay(client) => &client.config.key_secret,
            PaymentGateway::Offline { key_secret } => key_secret,
        }
    }

    pub async fn create_order(&self, order: &OrderRequest) -> Result<GatewayOrder> {
        match self {
            PaymentGateway::Razorpay(client) => client.create_order(order).await,
            PaymentGateway::Offline { .. } => Ok(GatewayOrder {
                id: format!("order_offline_{}", Uuid::new_v4().simple()),
                amount: order.amount,
                currency: order.currency.clone(),
                receipt: Some(order.receipt.clone()),
                status: "created".to_string(),
            }),
        }
    }

    /// Signature the gateway attaches to a successful checkout
    pub fn checkout_signature(&self, order_id: &str, payment_id: &str) -> Result<String> {
        hmac::sign(self.key_secret(), &format!("{order_id}|{payment_id}"))
            .map_err(AppError::Internal)
    }

    /// `hex(HMAC_SHA256(order_id|payment_id, key_secret))`, compared in
    /// constant time
    pub fn verify_checkout(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        hmac::verify(
            self.key_secret(),
            &format!("{order_id}|{payment_id}"),
            signature.trim(),
        )
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> PaymentGateway {
        PaymentGateway::from_config(&PaymentConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_offline_order_echoes_request() {
        let gateway = offline();
        assert!(gateway.is_offline());
        let order = gateway
            .create_order(&OrderRequest {
                amount: 4500,
                currency: "INR".into(),
                receipt: "receipt_1".into(),
                payment_capture: 1,
            })
            .await
            .unwrap();
        assert!(order.id.starts_with("order_offline_"));
        assert_eq!(order.amount, 4500);
        assert_eq!(order.status, "created");
    }

    #[test]
    fn test_checkout_signature_round_trip() {
        let gateway = offline();
        let sig = gateway.checkout_signature("order_1", "pay_1").unwrap();
        assert!(gateway.verify_checkout("order_1", "pay_1", &sig));
        assert!(!gateway.verify_checkout("order_1", "pay_2", &sig));
        assert!(!gateway.verify_checkout("order_1", "pay_1", "deadbeef"));
    }

    #[test]
    fn test_orders_url_tolerates_trailing_slash() {
        let config = PaymentConfig {
            api_base: "https://api.example.test/v1/".into(),
            ..PaymentConfig::default()
        };
        let client = RazorpayClient::new(config, "rzp_test".into()).unwrap();
        assert_eq!(
            client.orders_url().unwrap().as_str(),
            "https://api.example.test/v1/orders"
        );
    }

    #[test]
    fn test_only_transient_errors_retry() {
        let server_error = GatewayError::Status {
            status: 503,
            body: String::new(),
        };
        let bad_request = GatewayError::Status {
            status: 400,
            body: String::new(),
        };
        assert!(server_error.is_retryable());
        assert!(!bad_request.is_retryable());
        assert!(GatewayError::Timeout.is_retryable());
    }
}
