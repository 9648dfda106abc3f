use actix_web::http::StatusCode;
use actix_web::test;
use gateway_test_support::{assert_problem_details, MockBackend};

use crate::support::{create_test_app, test_state};

#[actix_web::test]
async fn unknown_path_is_not_found_before_auth() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/anime", &backend.url(), true)
            .build(),
    )
    .build()
    .await;

    // No credential, yet 404 rather than 401.
    for path in ["/unknown", "/animes", "/", "/ani"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        let problem = assert_problem_details(resp, StatusCode::NOT_FOUND, "NOT_FOUND").await;
        assert_eq!(problem.type_, "/errors/NOT_FOUND");
    }
    assert_eq!(backend.hits(), 0);
    backend.stop().await;
}

#[actix_web::test]
async fn overlapping_prefixes_follow_configuration_order() {
    let general = MockBackend::echo().await.unwrap();
    let admin = MockBackend::echo().await.unwrap();

    let general_first = create_test_app(
        test_state()
            .with_route("/users", &general.url(), false)
            .with_route("/users/admin", &admin.url(), false)
            .build(),
    )
    .build()
    .await;
    let req = test::TestRequest::get().uri("/users/admin/panel").to_request();
    assert_eq!(test::call_service(&general_first, req).await.status(), StatusCode::OK);
    assert_eq!((general.hits(), admin.hits()), (1, 0));
    assert_eq!(general.requests()[0].path, "/admin/panel");

    let specific_first = create_test_app(
        test_state()
            .with_route("/users/admin", &admin.url(), false)
            .with_route("/users", &general.url(), false)
            .build(),
    )
    .build()
    .await;
    let req = test::TestRequest::get().uri("/users/admin/panel").to_request();
    assert_eq!(test::call_service(&specific_first, req).await.status(), StatusCode::OK);
    assert_eq!((general.hits(), admin.hits()), (1, 1));
    assert_eq!(admin.requests()[0].path, "/panel");

    general.stop().await;
    admin.stop().await;
}

#[actix_web::test]
async fn bare_prefix_is_rewritten_to_root() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/auth", &backend.url(), false)
            .build(),
    )
    .build()
    .await;

    for path in ["/auth", "/auth/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let paths: Vec<_> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/", "/"]);
    backend.stop().await;
}

#[actix_web::test]
async fn backend_base_path_is_kept() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/auth", &format!("{}/api/v1", backend.url()), false)
            .build(),
    )
    .build()
    .await;

    let req = test::TestRequest::post().uri("/auth/login").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(backend.requests()[0].path, "/api/v1/login");
    backend.stop().await;
}

#[actix_web::test]
async fn dot_segments_cannot_leave_the_base_path() {
    let backend = MockBackend::echo().await.unwrap();
    let app = create_test_app(
        test_state()
            .with_route("/auth", &format!("{}/api/v1", backend.url()), false)
            .build(),
    )
    .build()
    .await;

    for path in ["/auth/../../admin", "/auth/%2e%2e/%2e%2e/admin", "/auth/./login"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_problem_details(resp, StatusCode::NOT_FOUND, "NOT_FOUND").await;
    }
    assert_eq!(backend.hits(), 0);
    backend.stop().await;
}
