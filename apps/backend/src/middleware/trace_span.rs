//! Per-request tracing span.
//!
//! Opens a `request` span carrying `trace_id`, `method` and `path` and
//! instruments the downstream future with it, so handler and store logs
//! inherit those fields. Must be wrapped inside `RequestTrace`, which
//! provides the trace id:
//!
//! App::new()
//!     .wrap(StructuredLogger)
//!     .wrap(TraceSpan)
//!     .wrap(RequestTrace)

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{info_span, Instrument};

#[derive(Clone, Default)]
pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "missing-trace-id".to_string());

        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path(),
        );

        // Entering the span for the synchronous part of `call` covers guards
        // that decide before returning their future.
        let fut = span.in_scope(|| self.service.call(req));
        Box::pin(fut.instrument(span))
    }
}
