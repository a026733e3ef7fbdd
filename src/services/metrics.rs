//! Prometheus metrics for HTTP traffic and ticketing activity.

use crate::build_info;
use prometheus::{CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    /// Bookings by channel (`online`, `conductor`)
    pub bookings_created_total: CounterVec,
    /// Ticket scans by outcome (`valid`, `already_used`, `not_found`)
    pub tickets_validated_total: CounterVec,
    /// Gateway orders by outcome (`created`, `failed`, `paid`, `rejected`)
    pub payment_orders_total: CounterVec,
    pub start_time: Instant,
}

impl AppMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        let bookings_created_total = CounterVec::new(
            Opts::new("bookings_created_total", "Bookings created by channel"),
            &["channel"],
        )?;

        let tickets_validated_total = CounterVec::new(
            Opts::new("tickets_validated_total", "Ticket scans by outcome"),
            &["outcome"],
        )?;

        let payment_orders_total = CounterVec::new(
            Opts::new("payment_orders_total", "Payment orders by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(bookings_created_total.clone()))?;
        registry.register(Box::new(tickets_validated_total.clone()))?;
        registry.register(Box::new(payment_orders_total.clone()))?;

        app_info
            .with_label_values(&[
                build_info::VERSION,
                build_info::GIT_SHA,
                build_info::BUILD_TIMESTAMP,
            ])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            app_uptime_seconds,
            app_info,
            bookings_created_total,
            tickets_validated_total,
            payment_orders_total,
            start_time: Instant::now(),
        })
    }

    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        // Scrapes of the metrics endpoint would drown out real traffic
        if route == "/api/metrics" {
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    pub fn record_booking(&self, channel: &str) {
        self.bookings_created_total.with_label_values(&[channel]).inc();
    }

    pub fn record_ticket_scan(&self, outcome: &str) {
        self.tickets_validated_total.with_label_values(&[outcome]).inc();
    }

    pub fn record_payment_order(&self, outcome: &str) {
        self.payment_orders_total.with_label_values(&[outcome]).inc();
    }

    pub fn update_uptime(&self) {
        self.app_uptime_seconds
            .set(self.start_time.elapsed().as_secs_f64());
    }

    /// Prometheus text exposition format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&self.registry.gather())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_counters_render() {
        let metrics = AppMetrics::new().unwrap();
        metrics.record_booking("online");
        metrics.record_ticket_scan("already_used");
        metrics.record_payment_order("created");
        metrics.record_request("GET", "/api/routes/", 200, Duration::from_millis(3));
        metrics.record_request("GET", "/api/metrics", 200, Duration::from_millis(1));

        let text = metrics.render().unwrap();
        assert!(text.contains("bookings_created_total{channel=\"online\"} 1"));
        assert!(text.contains("tickets_validated_total{outcome=\"already_used\"} 1"));
        assert!(text.contains("payment_orders_total{outcome=\"created\"} 1"));
        assert!(text.contains("route=\"/api/routes/\""));
        assert!(!text.contains("route=\"/api/metrics\""));
    }
}
