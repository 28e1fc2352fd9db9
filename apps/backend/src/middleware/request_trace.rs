//! Assigns each request a trace id.
//!
//! The id is stored in request extensions (as a `String`), made available to
//! the rest of the pipeline through `trace_ctx`, and echoed back in the
//! `x-trace-id` response header.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    HttpMessage,
};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use uuid::Uuid;

use crate::trace_ctx;

pub const TRACE_HEADER: &str = "x-trace-id";

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = Uuid::new_v4().to_string();

        req.extensions_mut().insert(trace_id.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = trace_ctx::with_trace_id(trace_id.clone(), fut).await?;

            // Error responses already carry the header.
            if !res.headers().contains_key(TRACE_HEADER) {
                res.headers_mut().insert(
                    header::HeaderName::from_static(TRACE_HEADER),
                    header::HeaderValue::from_str(&trace_id)
                        .unwrap_or_else(|_| header::HeaderValue::from_static("invalid-uuid")),
                );
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpMessage, HttpRequest, HttpResponse};

    use super::*;

    #[actix_web::test]
    async fn header_matches_extension_and_task_local() {
        let app = test::init_service(App::new().wrap(RequestTrace).route(
            "/echo",
            web::get().to(|req: HttpRequest| async move {
                let from_ext = req.extensions().get::<String>().cloned().unwrap_or_default();
                HttpResponse::Ok().json((from_ext, trace_ctx::trace_id()))
            }),
        ))
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/echo").to_request()).await;
        let header = resp
            .headers()
            .get(TRACE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        let (from_ext, from_task): (String, String) = test::read_body_json(resp).await;

        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(from_ext, header);
        assert_eq!(from_task, header);
    }
}
