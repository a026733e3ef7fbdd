//! Request metrics middleware.

use crate::{services::AppMetrics, utils::route::extract_route_pattern};
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    time::Instant,
};

/// Records count and latency of every request against [`AppMetrics`] when it
/// is registered as app data
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsService { service }))
    }
}

pub struct MetricsService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for MetricsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            // The pattern is only known once routing has happened
            let route = extract_route_pattern(res.request());
            if let Some(metrics) = res.request().app_data::<web::Data<AppMetrics>>() {
                metrics.record_request(&method, &route, res.status().as_u16(), start_time.elapsed());
                metrics.update_uptime();
            }

            Ok(res)
        })
    }
}
