//! HTTP tests: route availability, templates, context and form round-trips.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use uuid::Uuid;

use yatube_core::domain::{Group, Post, User};
use yatube_core::ports::BaseRepository;
use yatube_infra::{AuthConfig, InMemoryMailer};

use crate::middleware::auth::SESSION_COOKIE;
use crate::render::RenderedTemplate;
use crate::state::AppState;

/// Build the application service around a state.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}

mod posts_forms;
mod users_urls;

pub const PASSWORD: &str = "war-and-peace";
pub const SITE_URL: &str = "http://testserver";

/// A user `User`, a group `test-slug` and an in-memory mail outbox.
pub struct Fixture {
    pub state: AppState,
    pub mailer: Arc<InMemoryMailer>,
    pub user: User,
    pub group: Group,
}

impl Fixture {
    pub async fn new() -> Self {
        let mailer = Arc::new(InMemoryMailer::new());
        let state = AppState::in_memory(AuthConfig::default(), mailer.clone(), SITE_URL.to_string());

        let user = state
            .users
            .save(User::new("User".into(), "user@example.com".into(), String::new()))
            .await
            .unwrap();
        let group = state
            .groups
            .save(
                Group::new(
                    "Test group".into(),
                    "test-slug".into(),
                    "Test description".into(),
                )
                .unwrap(),
            )
            .await
            .unwrap();

        Self {
            state,
            mailer,
            user,
            group,
        }
    }

    /// A user without a usable password.
    pub async fn add_user(&self, username: &str) -> User {
        self.state
            .users
            .save(User::new(username.into(), String::new(), String::new()))
            .await
            .unwrap()
    }

    /// A user who can log in with [`PASSWORD`].
    pub async fn add_user_with_password(&self, username: &str, email: &str) -> User {
        let hash = self.state.passwords.hash(PASSWORD).unwrap();
        self.state
            .users
            .save(User::new(username.into(), email.into(), hash))
            .await
            .unwrap()
    }

    pub async fn add_post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        self.state
            .posts
            .save(Post::new(author.id, text.into(), group.map(|g| g.id)))
            .await
            .unwrap()
    }

    /// `count` posts by the fixture user in the fixture group.
    pub async fn add_group_posts(&self, count: usize) -> Vec<Post> {
        let mut posts = Vec::with_capacity(count);
        for i in 0..count {
            posts.push(
                self.add_post(&self.user, &format!("Test post {i}"), Some(&self.group))
                    .await,
            );
        }
        posts
    }

    pub async fn find_post(&self, id: Uuid) -> Option<Post> {
        self.state.posts.find_by_id(id).await.unwrap()
    }

    pub async fn find_user(&self, id: Uuid) -> User {
        self.state.users.find_by_id(id).await.unwrap().unwrap()
    }

    /// Session cookie of a logged-in user.
    pub fn session(&self, user: &User) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(user)
            .unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }
}

pub fn rendered<B>(res: &ServiceResponse<B>) -> RenderedTemplate {
    res.response()
        .extensions()
        .get::<RenderedTemplate>()
        .cloned()
        .expect("response was not rendered from a template")
}

pub fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Number of objects on the rendered `page_obj`.
pub fn page_len(rendered: &RenderedTemplate) -> usize {
    rendered.get("page_obj").expect("no page_obj in context")["object_list"]
        .as_array()
        .map(Vec::len)
        .unwrap_or_default()
}

/// The session cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}
