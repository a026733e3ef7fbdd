//! Security response headers.

use crate::config::SecurityHeadersConfig;
use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
};

/// Adds the configured security headers to every response. Responses also
/// get `Cache-Control: no-store` since they may carry session tokens or
/// ticket payloads.
pub struct SecurityHeaders {
    config: Rc<SecurityHeadersConfig>,
}

impl SecurityHeaders {
    pub fn new(config: SecurityHeadersConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service,
            config: Rc::clone(&self.config),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: S,
    config: Rc<SecurityHeadersConfig>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
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
        let fut = self.service.call(req);
        let config = Rc::clone(&self.config);

        Box::pin(async move {
            let mut res = fut.await?;
            let headers = res.headers_mut();

            if config.content_type_options {
                headers.insert(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                );
            }

            if let Ok(value) = HeaderValue::from_str(&config.frame_options) {
                headers.insert(header::X_FRAME_OPTIONS, value);
            }

            if let Ok(value) = HeaderValue::from_str(&config.referrer_policy) {
                headers.insert(header::REFERRER_POLICY, value);
            }

            if config.csp_enabled
                && let Ok(value) = HeaderValue::from_str(&config.csp_directives)
            {
                headers.insert(HeaderName::from_static("content-security-policy"), value);
            }

            if config.hsts_enabled
                && let Ok(value) = HeaderValue::from_str(&format!("max-age={}", config.hsts_max_age))
            {
                headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
            }

            if !headers.contains_key(header::CACHE_CONTROL) {
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            }

            Ok(res)
        })
    }
}
