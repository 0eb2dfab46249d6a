//! Signup, login, logout, password change and password reset.

use actix_web::{HttpResponse, cookie::Cookie, web};

use yatube_core::domain::User;
use yatube_core::error::RepoError;
use yatube_core::forms::{
    LoginForm, PasswordChangeForm, PasswordResetForm, SetPasswordForm, SignupForm,
};
use yatube_core::ports::{BaseRepository, EmailMessage};
use yatube_infra::{decode_uid, encode_uid};
use yatube_shared::dto::{
    LoginFormData, NextQuery, PasswordChangeFormData, PasswordResetFormData, SetPasswordFormData,
    SignupFormData,
};

use crate::middleware::auth::{self, Identity, OptionalIdentity, safe_next};
use crate::middleware::error::{AppError, AppResult};
use crate::render::{View, redirect};
use crate::state::AppState;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

fn with_session(mut response: HttpResponse, cookie: &Cookie<'_>) -> AppResult<HttpResponse> {
    response
        .add_cookie(cookie)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// GET /signup/
pub async fn signup_form(identity: OptionalIdentity) -> AppResult<HttpResponse> {
    View::new("users/signup.html")
        .user(identity.identity())
        .insert("form", &SignupForm::unbound())
        .render()
}

/// POST /signup/
pub async fn signup(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<SignupFormData>,
) -> AppResult<HttpResponse> {
    let mut bound = SignupForm::bind(&form);

    let taken = match bound.cleaned_data() {
        Some(account) => state.users.find_by_username(&account.username).await?.is_some(),
        None => false,
    };
    if taken {
        bound.reject(Some("username"), USERNAME_TAKEN);
    }

    let Some(account) = bound.cleaned_data().cloned() else {
        return View::new("users/signup.html")
            .user(identity.identity())
            .insert("form", bound.form())
            .render();
    };

    let password_hash = state.passwords.hash(&account.password)?;
    let user = User::new(account.username, account.email, password_hash)
        .with_name(account.first_name, account.last_name);

    let user = match state.users.save(user).await {
        Ok(user) => user,
        // Lost a race with another signup for the same name.
        Err(RepoError::Constraint(_)) => {
            bound.reject(Some("username"), USERNAME_TAKEN);
            return View::new("users/signup.html")
                .user(identity.identity())
                .insert("form", bound.form())
                .render();
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

    let cookie = auth::login(&state, &user)?;
    with_session(redirect("/"), &cookie)
}

/// GET /login/
pub async fn login_form(
    identity: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    View::new("users/login.html")
        .user(identity.identity())
        .insert("form", &LoginForm::unbound())
        .insert("next", &safe_next(query.next.as_deref()))
        .render()
}

/// POST /login/
pub async fn login(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<LoginFormData>,
) -> AppResult<HttpResponse> {
    let mut bound = LoginForm::bind(&form);
    let next = safe_next(form.next.as_deref());

    let mut user = None;
    if let Some(credentials) = bound.cleaned_data().cloned() {
        user = match state.users.find_by_username(&credentials.username).await? {
            Some(candidate)
                if state
                    .passwords
                    .verify(&credentials.password, &candidate.password_hash)? =>
            {
                Some(candidate)
            }
            _ => None,
        };
        if user.is_none() {
            tracing::info!(username = %credentials.username, "Failed login attempt");
            bound.reject(None, LoginForm::INVALID_LOGIN);
        }
    }

    let Some(user) = user else {
        return View::new("users/login.html")
            .user(identity.identity())
            .insert("form", bound.form())
            .insert("next", &next)
            .render();
    };

    let cookie = auth::login(&state, &user)?;
    with_session(redirect(next.unwrap_or("/")), &cookie)
}

/// GET|POST /logout/
pub async fn logout() -> AppResult<HttpResponse> {
    let response = View::new("users/logged_out.html").render()?;
    with_session(response, &auth::logout())
}

async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::LoginRequired {
            next: "/password_change/".to_string(),
        })
}

/// GET /password_change/
pub async fn password_change_form(identity: Identity) -> AppResult<HttpResponse> {
    View::new("users/password_change_form.html")
        .user(Some(&identity))
        .insert("form", &PasswordChangeForm::unbound())
        .render()
}

/// POST /password_change/
pub async fn password_change(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PasswordChangeFormData>,
) -> AppResult<HttpResponse> {
    let mut bound = PasswordChangeForm::bind(&form);
    let mut user = current_user(&state, &identity).await?;

    if !form.old_password.is_empty()
        && !state
            .passwords
            .verify(&form.old_password, &user.password_hash)?
    {
        bound.reject(Some("old_password"), PasswordChangeForm::INCORRECT_OLD_PASSWORD);
    }

    let Some(change) = bound.cleaned_data() else {
        return View::new("users/password_change_form.html")
            .user(Some(&identity))
            .insert("form", bound.form())
            .render();
    };

    user.set_password_hash(state.passwords.hash(&change.new_password)?);
    let user = state.users.save(user).await?;
    tracing::info!(user_id = %user.id, "Password changed");

    // Reissued against the new hash; every other session of this user ends.
    let cookie = auth::login(&state, &user)?;
    with_session(redirect("/password_change/done/"), &cookie)
}

/// GET /password_change/done/
pub async fn password_change_done(identity: Identity) -> AppResult<HttpResponse> {
    View::new("users/password_change_done.html")
        .user(Some(&identity))
        .render()
}

/// GET /password_reset/
pub async fn password_reset_form(identity: OptionalIdentity) -> AppResult<HttpResponse> {
    View::new("users/password_reset_form.html")
        .user(identity.identity())
        .insert("form", &PasswordResetForm::unbound())
        .render()
}

/// POST /password_reset/
///
/// Always ends on the "done" page, so the form does not reveal which
/// addresses have accounts.
pub async fn password_reset(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<PasswordResetFormData>,
) -> AppResult<HttpResponse> {
    let bound = PasswordResetForm::bind(&form);

    let Some(email) = bound.cleaned_data() else {
        return View::new("users/password_reset_form.html")
            .user(identity.identity())
            .insert("form", bound.form())
            .render();
    };

    let users = state.users.find_by_email(email).await?;
    for user in users.iter().filter(|u| !u.password_hash.is_empty()) {
        let token = state.reset_tokens.make_token(user)?;
        let link = format!(
            "{}/reset/{}/{}/",
            state.site_url,
            encode_uid(user.id),
            token
        );

        state
            .mailer
            .send(EmailMessage {
                to: user.email.clone(),
                subject: "Password reset on Yatube".to_string(),
                body: format!(
                    "You're receiving this email because you requested a password reset \
                     for your user account at Yatube.\n\n\
                     Please go to the following page and choose a new password:\n\n\
                     {link}\n\n\
                     Your username, in case you've forgotten: {}\n",
                    user.username
                ),
            })
            .await?;
        tracing::info!(user_id = %user.id, "Password reset link sent");
    }

    Ok(redirect("/password_reset/done/"))
}

/// GET /password_reset/done/
pub async fn password_reset_done(identity: OptionalIdentity) -> AppResult<HttpResponse> {
    View::new("users/password_reset_done.html")
        .user(identity.identity())
        .render()
}

/// The user a reset link belongs to, if the link is still valid.
async fn reset_link_user(state: &AppState, uidb64: &str, token: &str) -> AppResult<Option<User>> {
    let Some(user_id) = decode_uid(uidb64) else {
        return Ok(None);
    };

    let user = state.users.find_by_id(user_id).await?;
    Ok(user.filter(|user| state.reset_tokens.check_token(user, token)))
}

/// GET /reset/{uidb64}/{token}/
pub async fn password_reset_confirm_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (uidb64, token) = path.into_inner();
    let validlink = reset_link_user(&state, &uidb64, &token).await?.is_some();

    View::new("users/password_reset_confirm.html")
        .user(identity.identity())
        .insert("validlink", &validlink)
        .insert("form", &SetPasswordForm::unbound())
        .render()
}

/// POST /reset/{uidb64}/{token}/
pub async fn password_reset_confirm(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(String, String)>,
    form: web::Form<SetPasswordFormData>,
) -> AppResult<HttpResponse> {
    let (uidb64, token) = path.into_inner();

    let Some(mut user) = reset_link_user(&state, &uidb64, &token).await? else {
        tracing::info!("Rejected stale or malformed reset link");
        return View::new("users/password_reset_confirm.html")
            .user(identity.identity())
            .insert("validlink", &false)
            .insert("form", &SetPasswordForm::unbound())
            .render();
    };

    let bound = SetPasswordForm::bind(&form);
    let Some(password) = bound.cleaned_data() else {
        return View::new("users/password_reset_confirm.html")
            .user(identity.identity())
            .insert("validlink", &true)
            .insert("form", bound.form())
            .render();
    };

    user.set_password_hash(state.passwords.hash(password)?);
    let user = state.users.save(user).await?;
    tracing::info!(user_id = %user.id, "Password reset completed");

    Ok(redirect("/reset/done/"))
}

/// GET /reset/done/
pub async fn password_reset_complete(identity: OptionalIdentity) -> AppResult<HttpResponse> {
    View::new("users/password_reset_complete.html")
        .user(identity.identity())
        .render()
}
