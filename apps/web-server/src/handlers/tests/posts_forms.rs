use actix_web::http::StatusCode;
use actix_web::test;
use uuid::Uuid;

use yatube_core::ports::PostFilter;
use yatube_shared::dto::PostFormData;

use super::{Fixture, location, rendered};

fn form(text: &str, group: Option<Uuid>) -> PostFormData {
    PostFormData {
        text: text.to_string(),
        group: group.map(|id| id.to_string()),
    }
}

async fn post_count(fx: &Fixture) -> u64 {
    fx.state.posts.count(PostFilter::All).await.unwrap()
}

#[actix_web::test]
async fn test_valid_form_creates_post() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);
    let before = post_count(&fx).await;

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.session(&fx.user))
        .set_form(form("Test posts", Some(fx.group.id)))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/User/");
    assert_eq!(post_count(&fx).await, before + 1);

    let created = fx
        .state
        .posts
        .list(PostFilter::Group(fx.group.id), 0, 10)
        .await
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].text, "Test posts");
    assert_eq!(created[0].author_id, fx.user.id);
}

#[actix_web::test]
async fn test_create_without_group() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.session(&fx.user))
        .set_form([("text", "No group"), ("group", "")])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    let posts = fx
        .state
        .posts
        .list(PostFilter::Author(fx.user.id), 0, 10)
        .await
        .unwrap();
    assert_eq!(posts[0].group_id, None);
}

#[actix_web::test]
async fn test_invalid_form_rerenders_without_saving() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);

    for data in [form("   ", None), form("Fine text", Some(Uuid::new_v4()))] {
        let req = test::TestRequest::post()
            .uri("/create/")
            .cookie(fx.session(&fx.user))
            .set_form(&data)
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let page = rendered(&res);
        assert_eq!(page.name, "posts/post_create.html");
        assert_eq!(page.get("form").unwrap()["is_bound"], true);
    }

    assert_eq!(post_count(&fx).await, 0);
}

#[actix_web::test]
async fn test_guest_cannot_create() {
    let fx = Fixture::new().await;
    let app = test_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .set_form(form("Sneaky", None))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(location(&res).starts_with("/login/"));
    assert_eq!(post_count(&fx).await, 0);
}

#[actix_web::test]
async fn test_author_edits_post() {
    let fx = Fixture::new().await;
    let post = fx.add_post(&fx.user, "Test posts", None).await;
    let app = test_app!(fx.state);
    let before = post_count(&fx).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.session(&fx.user))
        .set_form(form("Edited post", Some(fx.group.id)))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", post.id));
    assert_eq!(post_count(&fx).await, before);

    let edited = fx.find_post(post.id).await.unwrap();
    assert_eq!(edited.text, "Edited post");
    assert_eq!(edited.group_id, Some(fx.group.id));
    assert_eq!(edited.author_id, fx.user.id);
    assert_eq!(edited.pub_date, post.pub_date);
}

#[actix_web::test]
async fn test_invalid_edit_keeps_post() {
    let fx = Fixture::new().await;
    let post = fx.add_post(&fx.user, "Original", None).await;
    let app = test_app!(fx.state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.session(&fx.user))
        .set_form(form("", None))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let page = rendered(&res);
    assert_eq!(page.get("is_edit").unwrap(), true);
    assert!(page.get("form").unwrap()["fields"][0]["errors"][0].is_string());
    assert_eq!(fx.find_post(post.id).await.unwrap().text, "Original");
}

#[actix_web::test]
async fn test_non_author_cannot_edit() {
    let fx = Fixture::new().await;
    let post = fx.add_post(&fx.user, "Original", None).await;
    let stranger = fx.add_user("Stranger").await;
    let app = test_app!(fx.state);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .cookie(fx.session(&stranger))
        .set_form(form("Hijacked", None))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", post.id));
    assert_eq!(fx.find_post(post.id).await.unwrap().text, "Original");
}

#[actix_web::test]
async fn test_session_of_unknown_user_cannot_post() {
    let fx = Fixture::new().await;
    let ghost = yatube_core::domain::User::new("ghost".into(), String::new(), String::new());
    let app = test_app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/create/")
        .cookie(fx.session(&ghost))
        .set_form(form("Orphan post", None))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(location(&res).starts_with("/login/"));
    assert_eq!(post_count(&fx).await, 0);

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(rendered(&res).get("user").unwrap().is_null());
}
