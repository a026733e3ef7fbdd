//! Shared application state handed to every handler.

use crate::{
    config::AppConfig,
    db::Database,
    error::{AppError, Result},
    services::{
        AppMetrics, FareCalculator, PaymentGateway, SimpleRateLimiter, SuspiciousActivityTracker,
        TicketSigner,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub fares: FareCalculator,
    pub tickets: TicketSigner,
    pub payments: PaymentGateway,
    pub limiter: SimpleRateLimiter,
    pub activity: SuspiciousActivityTracker,
    pub metrics: AppMetrics,
}

impl AppState {
    /// Wires services from configuration around an open database
    pub fn new(config: AppConfig, db: Database) -> Result<Self> {
        let metrics = AppMetrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to create metrics: {e}")))?;

        Ok(Self {
            fares: FareCalculator::new(config.fare.clone()),
            tickets: TicketSigner::new(&config.ticket),
            payments: PaymentGateway::from_config(&config.payment)?,
            limiter: SimpleRateLimiter::new(config.rate_limit.clone()),
            activity: SuspiciousActivityTracker::new(&config.rate_limit),
            metrics,
            db,
            config: Arc::new(config),
        })
    }
}
