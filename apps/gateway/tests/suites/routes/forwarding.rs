use std::net::SocketAddr;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, HttpResponse};
use gateway_test_support::mock_backend::ECHO_MARKER_HEADER;
use gateway_test_support::MockBackend;

use crate::common::{body_string, header_str};
use crate::support::auth::bearer_header;
use crate::support::state_builder::test_security;
use crate::support::{create_test_app, test_state};

#[actix_web::test]
async fn request_is_rewritten_and_relayed_unaltered() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/anime", &backend.url(), true)
            .build(),
    )
    .build()
    .await;

    let req = test::TestRequest::post()
        .uri("/anime/my?page=2&sort=asc")
        .insert_header((header::AUTHORIZATION, bearer_header(1, "a@b.c", &test_security())))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .insert_header(("x-custom-trace", "keep-me"))
        .set_payload(r#"{"title":"Cowboy Bebop","rating":10}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, ECHO_MARKER_HEADER), Some("echo"));

    let recorded = backend.requests();
    assert_eq!(recorded.len(), 1);
    let seen = &recorded[0];
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/my");
    assert_eq!(seen.query.as_deref(), Some("page=2&sort=asc"));
    assert_eq!(seen.body, r#"{"title":"Cowboy Bebop","rating":10}"#);
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.header("x-custom-trace"), Some("keep-me"));

    // The echo body is what the backend sent; the gateway must not touch it.
    let relayed: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(relayed["path"], "/my");
    backend.stop().await;
}

#[actix_web::test]
async fn identical_requests_each_reach_the_backend() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/anime", &backend.url(), true)
            .build(),
    )
    .build()
    .await;
    let authorization = bearer_header(1, "a@b.c", &test_security());

    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri("/anime/list")
            .insert_header((header::AUTHORIZATION, authorization.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    assert_eq!(backend.hits(), 2);
    backend.stop().await;
}

#[actix_web::test]
async fn backend_status_headers_and_body_are_relayed() {
    let backend = MockBackend::start(|cfg| {
        cfg.route(
            "/teapot",
            web::get().to(|| async {
                HttpResponse::build(StatusCode::IM_A_TEAPOT)
                    .insert_header(("x-backend-note", "brewing"))
                    .append_header((header::SET_COOKIE, "a=1"))
                    .append_header((header::SET_COOKIE, "b=2"))
                    .content_type("text/plain")
                    .body("short and stout")
            }),
        )
        .route(
            "/missing",
            web::get().to(|| async {
                HttpResponse::NotFound()
                    .content_type("application/json")
                    .body(r#"{"error":"anime not found"}"#)
            }),
        );
    })
    .await
    .unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/auth", &backend.url(), false)
            .build(),
    )
    .build()
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/auth/teapot").to_request()).await;
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(header_str(&resp, "x-backend-note"), Some("brewing"));
    assert_eq!(resp.headers().get_all(header::SET_COOKIE).count(), 2);
    assert_eq!(body_string(resp).await, "short and stout");

    // Backend errors are relayed as-is, not turned into problem details.
    let resp = test::call_service(&app, test::TestRequest::get().uri("/auth/missing").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(header_str(&resp, "content-type"), Some("application/json"));
    assert!(header_str(&resp, "x-trace-id").is_none());
    assert_eq!(body_string(resp).await, r#"{"error":"anime not found"}"#);
    backend.stop().await;
}

#[actix_web::test]
async fn redirects_are_relayed_not_followed() {
    let backend = MockBackend::start(|cfg| {
        cfg.route(
            "/old",
            web::get().to(|| async {
                HttpResponse::Found()
                    .insert_header((header::LOCATION, "/new"))
                    .finish()
            }),
        );
    })
    .await
    .unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/auth", &backend.url(), false)
            .build(),
    )
    .build()
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/auth/old").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(header_str(&resp, "location"), Some("/new"));
    // The echo handler would have recorded a followed redirect.
    assert_eq!(backend.hits(), 0);
    backend.stop().await;
}

#[actix_web::test]
async fn forwarding_metadata_is_added() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/auth", &backend.url(), false)
            .build(),
    )
    .build()
    .await;

    let peer: SocketAddr = "10.1.2.3:55555".parse().unwrap();
    let req = test::TestRequest::get()
        .uri("/auth/session")
        .peer_addr(peer)
        .insert_header(("x-forwarded-for", "203.0.113.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let response_id = header_str(&resp, "x-request-id").unwrap().to_string();

    let seen = &backend.requests()[0];
    assert_eq!(seen.header("x-forwarded-for"), Some("203.0.113.9, 10.1.2.3"));
    // The echo backend never sets x-request-id, so the gateway echoes its own.
    assert_eq!(seen.header("x-request-id"), Some(response_id.as_str()));
    backend.stop().await;
}

#[actix_web::test]
async fn inbound_request_id_is_propagated() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/auth", &backend.url(), false)
            .build(),
    )
    .build()
    .await;

    let req = test::TestRequest::get()
        .uri("/auth/session")
        .insert_header(("x-request-id", "corr-1234"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(header_str(&resp, "x-request-id"), Some("corr-1234"));
    assert_eq!(backend.requests()[0].header("x-request-id"), Some("corr-1234"));
    backend.stop().await;
}

#[actix_web::test]
async fn percent_encoded_paths_pass_through() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/anime", &backend.url(), false)
            .build(),
    )
    .build()
    .await;

    let req = test::TestRequest::get()
        .uri("/anime/search/Cowboy%20Bebop?q=a%26b")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let seen = &backend.requests()[0];
    assert_eq!(seen.path, "/search/Cowboy%20Bebop");
    assert_eq!(seen.query.as_deref(), Some("q=a%26b"));
    backend.stop().await;
}
