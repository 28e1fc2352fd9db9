mod common;

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use movieshub::auth::cookie::TOKEN_COOKIE;
use movieshub::test_support::create_test_app_builder;
use movieshub::{verify_token, AppState, CookieConfig, SecurityConfig};
use movieshub_test_support::problem_details::{
    assert_problem_details_from_parts, assert_unauthorized_from_parts,
};
use serde_json::json;

use crate::common::into_parts;

fn token_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == TOKEN_COOKIE)
        .map(|c| c.into_owned())
}

#[actix_web::test]
async fn jwt_sets_http_only_cookie_and_never_returns_the_token() {
    let state = AppState::for_tests();
    let security = state.security.clone();
    let app = create_test_app_builder(state)
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(json!({"email": "viewer@example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = token_cookie(&resp).expect("token cookie should be set");
    let parts = into_parts(resp).await;

    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(parts.json(), json!({"success": true}));
    assert!(!String::from_utf8_lossy(&parts.body).contains(cookie.value()));

    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::None));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::seconds(3600)));

    let claims = verify_token(cookie.value(), &security).unwrap();
    assert_eq!(claims.payload["email"], "viewer@example.com");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[actix_web::test]
async fn insecure_cookie_falls_back_to_lax() {
    let state = AppState::new(
        std::sync::Arc::new(movieshub::adapters::documents_memory::DocumentRepoMemory::new()),
        SecurityConfig::for_tests(),
        CookieConfig { secure: false },
    );
    let app = create_test_app_builder(state)
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let cookie = token_cookie(&resp).unwrap();

    assert_ne!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}

#[actix_web::test]
async fn empty_body_issues_a_token_for_an_empty_payload() {
    let state = AppState::for_tests();
    let security = state.security.clone();
    let app = create_test_app_builder(state)
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let req = test::TestRequest::post().uri("/jwt").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = token_cookie(&resp).unwrap();
    let claims = verify_token(cookie.value(), &security).unwrap();
    assert!(claims.payload.is_empty());
}

#[actix_web::test]
async fn non_object_payloads_are_rejected() {
    let app = create_test_app_builder(AppState::for_tests())
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    for body in [json!([1, 2]), json!("email"), json!(42)] {
        let req = test::TestRequest::post()
            .uri("/jwt")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(token_cookie(&resp).is_none());

        let parts = into_parts(resp).await;
        assert_problem_details_from_parts(
            parts.status,
            &parts.headers,
            &parts.body,
            "INVALID_BODY",
            StatusCode::BAD_REQUEST,
            Some("JSON object"),
        );
    }
}

#[actix_web::test]
async fn payload_exp_is_refused() {
    let app = create_test_app_builder(AppState::for_tests())
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(json!({"email": "viewer@example.com", "exp": 4102444800u64}))
        .to_request();
    let parts = into_parts(test::call_service(&app, req).await).await;

    assert_problem_details_from_parts(
        parts.status,
        &parts.headers,
        &parts.body,
        "RESERVED_CLAIM",
        StatusCode::BAD_REQUEST,
        Some("exp"),
    );
}

#[actix_web::test]
async fn issued_cookie_opens_the_guarded_cart() {
    let app = create_test_app_builder(AppState::for_tests())
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    // Without a token the cart is closed.
    let req = test::TestRequest::get().uri("/myCart").to_request();
    let parts = into_parts(test::call_service(&app, req).await).await;
    assert_unauthorized_from_parts(parts.status, &parts.headers, &parts.body);

    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(json!({"email": "viewer@example.com"}))
        .to_request();
    let cookie = token_cookie(&test::call_service(&app, req).await).unwrap();

    let req = test::TestRequest::post()
        .uri("/myCart")
        .cookie(cookie.clone())
        .set_json(json!({"title": "Heat", "price": 9.99}))
        .to_request();
    let parts = into_parts(test::call_service(&app, req).await).await;
    assert_eq!(parts.status, StatusCode::OK);
    assert_eq!(parts.json()["acknowledged"], true);

    let req = test::TestRequest::get()
        .uri("/myCart")
        .cookie(cookie)
        .to_request();
    let parts = into_parts(test::call_service(&app, req).await).await;
    assert_eq!(parts.status, StatusCode::OK);
    let items = parts.json();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["title"], "Heat");
}

#[actix_web::test]
async fn logout_expires_the_cookie() {
    let app = create_test_app_builder(AppState::for_tests())
        .with_prod_routes()
        .build()
        .await
        .unwrap();

    let req = test::TestRequest::post().uri("/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = token_cookie(&resp).expect("removal cookie should be set");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}
