//! Template rendering.
//!
//! Templates are compiled into the binary. Every rendered response carries a
//! [`RenderedTemplate`] in its extensions so tests can see which template was
//! used and with which context.

use actix_web::{HttpResponse, http::StatusCode, http::header};
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("includes/header.html", include_str!("../templates/includes/header.html")),
    ("includes/footer.html", include_str!("../templates/includes/footer.html")),
    ("includes/paginator.html", include_str!("../templates/includes/paginator.html")),
    ("includes/post_card.html", include_str!("../templates/includes/post_card.html")),
    ("includes/form.html", include_str!("../templates/includes/form.html")),
    ("core/403.html", include_str!("../templates/core/403.html")),
    ("core/404.html", include_str!("../templates/core/404.html")),
    ("core/500.html", include_str!("../templates/core/500.html")),
    ("posts/index.html", include_str!("../templates/posts/index.html")),
    ("posts/group_list.html", include_str!("../templates/posts/group_list.html")),
    ("posts/profile.html", include_str!("../templates/posts/profile.html")),
    ("posts/post_detail.html", include_str!("../templates/posts/post_detail.html")),
    ("posts/post_create.html", include_str!("../templates/posts/post_create.html")),
    ("users/signup.html", include_str!("../templates/users/signup.html")),
    ("users/login.html", include_str!("../templates/users/login.html")),
    ("users/logged_out.html", include_str!("../templates/users/logged_out.html")),
    (
        "users/password_change_form.html",
        include_str!("../templates/users/password_change_form.html"),
    ),
    (
        "users/password_change_done.html",
        include_str!("../templates/users/password_change_done.html"),
    ),
    (
        "users/password_reset_form.html",
        include_str!("../templates/users/password_reset_form.html"),
    ),
    (
        "users/password_reset_done.html",
        include_str!("../templates/users/password_reset_done.html"),
    ),
    (
        "users/password_reset_confirm.html",
        include_str!("../templates/users/password_reset_confirm.html"),
    ),
    (
        "users/password_reset_complete.html",
        include_str!("../templates/users/password_reset_complete.html"),
    ),
];

static ENGINE: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    if let Err(e) = tera.add_raw_templates(TEMPLATES.iter().copied()) {
        tracing::error!(error = %e, "Failed to compile templates");
    }
    tera
});

/// The template a response was rendered from, with its context.
#[derive(Debug, Clone)]
pub struct RenderedTemplate {
    pub name: &'static str,
    pub context: Context,
}

impl RenderedTemplate {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.context.get(key)
    }
}

/// An HTML page: template name, context and status.
pub struct View {
    template: &'static str,
    context: Context,
    status: StatusCode,
}

impl View {
    pub fn new(template: &'static str) -> Self {
        let mut context = Context::new();
        context.insert("user", &Option::<Identity>::None);
        Self {
            template,
            context,
            status: StatusCode::OK,
        }
    }

    /// The logged-in user shown in the navigation bar.
    pub fn user(mut self, identity: Option<&Identity>) -> Self {
        self.context.insert("user", &identity);
        self
    }

    pub fn insert<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.context.insert(key, value);
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn render(self) -> AppResult<HttpResponse> {
        let html = ENGINE
            .render(self.template, &self.context)
            .map_err(|source| AppError::Template {
                template: self.template,
                source,
            })?;

        let mut response = HttpResponse::build(self.status)
            .content_type("text/html; charset=utf-8")
            .body(html);
        response.extensions_mut().insert(RenderedTemplate {
            name: self.template,
            context: self.context,
        });

        Ok(response)
    }
}

/// Render an error page. Falls back to plain text if the template itself fails.
pub fn error_page(status: StatusCode, template: &'static str) -> HttpResponse {
    let view = View::new(template)
        .status(status)
        .insert("status_code", &status.as_u16());

    match view.render() {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, template, "Failed to render error page");
            HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(status.canonical_reason().unwrap_or("Error"))
        }
    }
}

/// `302 Found` to `location`.
pub fn redirect(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}
