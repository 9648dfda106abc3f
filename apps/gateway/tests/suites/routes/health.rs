use actix_web::http::{header, StatusCode};
use actix_web::test;
use gateway_test_support::{assert_problem_details, MockBackend};

use crate::common::{body_string, header_str};
use crate::support::{create_test_app, test_state};

#[actix_web::test]
async fn health_is_ok_without_auth_or_routing() {
    let backend = MockBackend::echo().await.unwrap();
    // A root route would otherwise swallow every path.
    let app = create_test_app(test_state().with_route("/", &backend.url(), true).build())
        .build()
        .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header_str(&resp, "x-request-id").is_some());
    assert_eq!(body_string(resp).await, "ok");
    assert_eq!(backend.hits(), 0);
    backend.stop().await;
}

#[actix_web::test]
async fn health_ignores_headers_and_method() {
    let app = create_test_app(test_state().build()).build().await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((header::AUTHORIZATION, "Bearer expired.or.garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "ok");

    let req = test::TestRequest::post().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn health_is_matched_exactly() {
    let app = create_test_app(test_state().build()).build().await;

    for path in ["/healthz", "/health/live"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_problem_details(resp, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    }
}
