//! HTTP handlers and route configuration.

mod health;
mod posts;
mod users;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health/", web::get().to(health::health_check))
        // posts
        .route("/", web::get().to(posts::index))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .route("/profile/{username}/", web::get().to(posts::profile))
        .route("/posts/{post_id}/", web::get().to(posts::post_detail))
        .service(
            web::resource("/posts/{post_id}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit)),
        )
        .service(
            web::resource("/create/")
                .route(web::get().to(posts::post_create_form))
                .route(web::post().to(posts::post_create)),
        )
        // users
        .service(
            web::resource("/signup/")
                .route(web::get().to(users::signup_form))
                .route(web::post().to(users::signup)),
        )
        .service(
            web::resource("/login/")
                .route(web::get().to(users::login_form))
                .route(web::post().to(users::login)),
        )
        .service(
            web::resource("/logout/")
                .route(web::get().to(users::logout))
                .route(web::post().to(users::logout)),
        )
        .service(
            web::resource("/password_change/")
                .route(web::get().to(users::password_change_form))
                .route(web::post().to(users::password_change)),
        )
        .route(
            "/password_change/done/",
            web::get().to(users::password_change_done),
        )
        .service(
            web::resource("/password_reset/")
                .route(web::get().to(users::password_reset_form))
                .route(web::post().to(users::password_reset)),
        )
        .route(
            "/password_reset/done/",
            web::get().to(users::password_reset_done),
        )
        .route("/reset/done/", web::get().to(users::password_reset_complete))
        .service(
            web::resource("/reset/{uidb64}/{token}/")
                .route(web::get().to(users::password_reset_confirm_form))
                .route(web::post().to(users::password_reset_confirm)),
        )
        .default_service(web::to(not_found));
}

/// Fallback for every unmatched path.
async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::not_found(req.path()))
}
