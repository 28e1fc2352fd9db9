//! One `request_completed` event per request.
//!
//! Besides method, path, status and duration the event names the document
//! resource that served the request (if any) and whether a verified token was
//! attached, so guard rejections and authorized cart writes can be told apart
//! in the logs without logging any claim values.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{web, Error as ActixError, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::auth::claims::TokenPayload;
use crate::resources::Resource;

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

/// What the routing layer learned about a finished request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteContext {
    /// Resource whose handlers were matched; `None` for `/jwt`, health and 404s
    pub resource: Option<Resource>,
    /// A verified token payload was attached by the guard
    pub authorized: bool,
}

impl RouteContext {
    pub fn of(req: &HttpRequest) -> Self {
        Self {
            resource: req.app_data::<web::Data<Resource>>().map(|r| ***r),
            authorized: req.extensions().contains::<TokenPayload>(),
        }
    }

    fn resource_name(&self) -> &'static str {
        self.resource.map_or("-", Resource::name)
    }
}

fn log_completion(
    method: &str,
    path: &str,
    status: StatusCode,
    duration_us: u64,
    trace_id: &str,
    route: RouteContext,
) {
    let status_code = status.as_u16();
    let resource = route.resource_name();
    let authorized = route.authorized;

    if status.is_server_error() {
        error!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, %trace_id, resource, authorized, "request_completed");
    } else if status.is_client_error() {
        warn!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, %trace_id, resource, authorized, "request_completed");
    } else {
        info!(http.method = %method, url.path = %path, http.status_code = status_code, duration_us, %trace_id, resource, authorized, "request_completed");
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            // Extensions are shared with the handler's request, so the guard's
            // payload is visible on the response. An `Err` carries no request.
            let (status, route) = match &result {
                Ok(res) => (res.status(), RouteContext::of(res.request())),
                Err(err) => (err.as_response_error().status_code(), RouteContext::default()),
            };
            let duration_us = start.elapsed().as_micros() as u64;

            log_completion(&method, &path, status, duration_us, &trace_id, route);
            result
        })
    }
}
