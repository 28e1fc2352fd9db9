//! Access guard for resource scopes.
//!
//! Reads the `token` cookie, verifies it, and stores the decoded
//! [`TokenPayload`] in request extensions before calling the wrapped service.
//! Verification completes before `call` returns, so a rejected request never
//! reaches the wrapped service and gets exactly one 401 response.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::TokenPayload;
use crate::auth::cookie::TOKEN_COOKIE;
use crate::auth::token::verify_token;
use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct TokenGuard;

impl<S, B> Transform<S, ServiceRequest> for TokenGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenGuardMiddleware { service }))
    }
}

pub struct TokenGuardMiddleware<S> {
    service: S,
}

/// Outcome of checking one request.
enum Decision {
    Accept(TokenPayload),
    Reject(AppError),
}

fn decide(req: &ServiceRequest) -> Decision {
    let token = match req.cookie(TOKEN_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => return Decision::Reject(AppError::unauthorized("missing_token")),
    };

    let Some(app_state) = req.app_data::<web::Data<AppState>>() else {
        return Decision::Reject(AppError::internal("AppState not available"));
    };

    match verify_token(&token, &app_state.security) {
        Ok(claims) => Decision::Accept(claims.into()),
        Err(e) => Decision::Reject(e),
    }
}

impl<S, B> Service<ServiceRequest> for TokenGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match decide(&req) {
            Decision::Accept(payload) => {
                req.extensions_mut().insert(payload);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            // The response is rendered inside the future so it picks up the
            // request's trace id.
            Decision::Reject(err) => Box::pin(async move {
                if let AppError::Unauthorized { reason } = &err {
                    security::token_rejected(reason, req.path());
                }
                Ok(req.error_response(err).map_into_right_body())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    use actix_web::cookie::Cookie;
    use actix_web::{test, web, App, HttpResponse};
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::auth::token::issue_token;
    use crate::state::security_config::SecurityConfig;

    fn state() -> AppState {
        AppState::for_tests_with_security(SecurityConfig::new(
            "test_secret_key_for_testing_purposes_only".as_bytes(),
        ))
    }

    fn payload() -> Map<String, Value> {
        match json!({"email": "viewer@example.com"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    async fn call_guarded(
        state: AppState,
        cookie: Option<Cookie<'static>>,
    ) -> (u16, Value, usize) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).service(
                web::scope("/guarded").wrap(TokenGuard).route(
                    "",
                    web::get().to(move |req: actix_web::HttpRequest| {
                        let counter = counter.clone();
                        async move {
                            counter.fetch_add(1, Ordering::SeqCst);
                            let payload = req.extensions().get::<TokenPayload>().cloned();
                            HttpResponse::Ok().json(payload.map(|p| p.claims))
                        }
                    }),
                ),
            ),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/guarded");
        if let Some(cookie) = cookie {
            req = req.cookie(cookie);
        }
        let resp = test::call_service(&app, req.to_request()).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body, hits.load(Ordering::SeqCst))
    }

    #[actix_web::test]
    async fn valid_token_reaches_handler_with_payload() {
        let state = state();
        let token = issue_token(payload(), SystemTime::now(), &state.security).unwrap();

        let (status, body, hits) = call_guarded(state, Some(Cookie::new("token", token))).await;

        assert_eq!(status, 200);
        assert_eq!(hits, 1);
        assert_eq!(body, json!({"email": "viewer@example.com"}));
    }

    #[actix_web::test]
    async fn missing_cookie_is_rejected_without_calling_handler() {
        let (status, body, hits) = call_guarded(state(), None).await;

        assert_eq!(status, 401);
        assert_eq!(hits, 0);
        assert_eq!(body, json!({"status": "unauthorized", "code": "401"}));
    }

    #[actix_web::test]
    async fn empty_cookie_is_rejected() {
        let (status, _, hits) = call_guarded(state(), Some(Cookie::new("token", ""))).await;
        assert_eq!(status, 401);
        assert_eq!(hits, 0);
    }

    #[actix_web::test]
    async fn expired_token_is_rejected_without_calling_handler() {
        let state = state();
        let issued = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
        let token = issue_token(payload(), issued, &state.security).unwrap();

        let (status, body, hits) = call_guarded(state, Some(Cookie::new("token", token))).await;

        assert_eq!(status, 401);
        assert_eq!(hits, 0);
        assert_eq!(body, json!({"status": "unauthorized", "code": "401"}));
    }

    #[actix_web::test]
    async fn foreign_signature_is_rejected_without_calling_handler() {
        let token = issue_token(
            payload(),
            SystemTime::now(),
            &SecurityConfig::new("some-other-secret".as_bytes()),
        )
        .unwrap();

        let (status, _, hits) = call_guarded(state(), Some(Cookie::new("token", token))).await;

        assert_eq!(status, 401);
        assert_eq!(hits, 0);
    }
}
