//! Request id propagation and request logging.

use crate::utils::http::{RequestFields, RequestId};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
};
use uuid::Uuid;

const MAX_INBOUND_ID_LEN: usize = 128;

/// Reuses an inbound `X-Request-ID` (when short and printable) or generates a
/// UUID v4. The id is stored in request extensions as [`RequestId`] and
/// echoed on the response.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

fn inbound_request_id(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("X-Request-ID")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_INBOUND_ID_LEN)
        .map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
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
        let start_time = std::time::Instant::now();
        let request_id = inbound_request_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut().insert(RequestId(request_id.clone()));
        let fields = RequestFields::from_request(req.request());

        tracing::info!(
            target: "request",
            request_id = %request_id,
            method = %fields.method,
            path = %fields.path,
            ip_address = %fields.ip_address,
            user_agent = ?fields.user_agent,
            "Incoming request"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            res.headers_mut().insert(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_str(&request_id)
                    .unwrap_or_else(|_| HeaderValue::from_static("invalid")),
            );

            tracing::info!(
                target: "request",
                request_id = %request_id,
                status = res.status().as_u16(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Request completed"
            );

            Ok(res)
        })
    }
}
