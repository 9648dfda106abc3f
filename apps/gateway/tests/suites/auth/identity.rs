use actix_web::http::{header, StatusCode};
use actix_web::test;
use gateway_test_support::MockBackend;
use service_contract::{USER_EMAIL_HEADER, USER_ID_HEADER};

use crate::support::auth::bearer_header;
use crate::support::state_builder::test_security;
use crate::support::{create_test_app, test_state};

#[actix_web::test]
async fn spoofed_identity_is_replaced_with_verified_claims() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/users", &backend.url(), true)
            .build(),
    )
    .build()
    .await;

    let req = test::TestRequest::get()
        .uri("/users/me")
        .insert_header((header::AUTHORIZATION, bearer_header(1, "real@example.com", &test_security())))
        .append_header((USER_ID_HEADER, "999"))
        .append_header((USER_ID_HEADER, "1000"))
        .insert_header((USER_EMAIL_HEADER, "admin@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let recorded = backend.requests();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].header_values(USER_ID_HEADER), vec!["1"]);
    assert_eq!(
        recorded[0].header_values(USER_EMAIL_HEADER),
        vec!["real@example.com"]
    );
    backend.stop().await;
}

#[actix_web::test]
async fn spoofed_identity_is_stripped_on_public_routes() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/auth", &backend.url(), false)
            .build(),
    )
    .build()
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .insert_header((USER_ID_HEADER, "999"))
        .insert_header((USER_EMAIL_HEADER, "evil@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let recorded = backend.requests();
    assert!(recorded[0].header(USER_ID_HEADER).is_none());
    assert!(recorded[0].header(USER_EMAIL_HEADER).is_none());
    backend.stop().await;
}

#[actix_web::test]
async fn authorization_is_forwarded_with_identity() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/anime", &backend.url(), true)
            .build(),
    )
    .build()
    .await;

    let authorization = bearer_header(42, "", &test_security());
    let req = test::TestRequest::get()
        .uri("/anime/my")
        .insert_header((header::AUTHORIZATION, authorization.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let recorded = backend.requests();
    assert_eq!(recorded[0].header("authorization"), Some(authorization.as_str()));
    assert_eq!(recorded[0].header(USER_ID_HEADER), Some("42"));
    // A token without an email still produces the header, empty.
    assert_eq!(recorded[0].header(USER_EMAIL_HEADER), Some(""));
    backend.stop().await;
}

#[actix_web::test]
async fn downstream_extractor_accepts_forwarded_identity() {
    use actix_web::{web, HttpResponse};
    use service_contract::TrustedIdentity;

    async fn whoami(identity: TrustedIdentity) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", identity.user_id, identity.email))
    }

    let backend = MockBackend::start(|cfg| {
        cfg.route("/whoami", web::get().to(whoami));
    })
    .await
    .unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/users", &backend.url(), true)
            .build(),
    )
    .build()
    .await;

    let req = test::TestRequest::get()
        .uri("/users/whoami")
        .insert_header((header::AUTHORIZATION, bearer_header(7, "u7@example.com", &test_security())))
        .insert_header((USER_ID_HEADER, "999"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "7:u7@example.com");
    backend.stop().await;
}
