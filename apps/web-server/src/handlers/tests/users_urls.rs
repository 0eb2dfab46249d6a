use actix_web::http::StatusCode;
use actix_web::test;

use super::{Fixture, location, rendered};

const USER_TEMPLATES: [(&str, &str); 9] = [
    ("/logout/", "users/logged_out.html"),
    ("/signup/", "users/signup.html"),
    ("/login/", "users/login.html"),
    ("/password_change/done/", "users/password_change_done.html"),
    ("/password_change/", "users/password_change_form.html"),
    ("/reset/done/", "users/password_reset_complete.html"),
    ("/password_reset/done/", "users/password_reset_done.html"),
    ("/reset/test/test/", "users/password_reset_confirm.html"),
    ("/password_reset/", "users/password_reset_form.html"),
];

#[actix_web::test]
async fn test_public_pages_available_to_guest() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);

    for uri in [
        "/login/",
        "/signup/",
        "/logout/",
        "/password_reset/",
        "/password_reset/done/",
        "/reset/test/test/",
        "/reset/done/",
    ] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn test_pages_available_when_logged_in() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);

    for (uri, _) in USER_TEMPLATES {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(fx.session(&fx.user))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
    }
}

#[actix_web::test]
async fn test_urls_use_correct_template() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);

    for (uri, template) in USER_TEMPLATES {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(fx.session(&fx.user))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(rendered(&res).name, template, "{uri}");
    }
}

#[actix_web::test]
async fn test_password_change_requires_login() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);

    for uri in ["/password_change/", "/password_change/done/"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND, "{uri}");
        assert!(location(&res).starts_with("/login/?next="), "{uri}");
    }
}

#[actix_web::test]
async fn test_malformed_reset_link_is_invalid() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);

    let req = test::TestRequest::get().uri("/reset/test/test/").to_request();
    let page = rendered(&test::call_service(&app, req).await);

    assert_eq!(page.get("validlink").unwrap(), false);
}
