//! Post listings, the post page and the create/edit form.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use yatube_core::domain::{Group, Post, User};
use yatube_core::forms::{Form, PostForm};
use yatube_core::ports::{BaseRepository, PostFilter};
use yatube_core::{Page, Paginator};
use yatube_shared::dto::{PageQuery, PostFormData};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::render::{View, redirect};
use crate::state::AppState;

/// A post with its author and group resolved, the way templates show it.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: User,
    pub group: Option<Group>,
}

async fn cards(state: &AppState, posts: Vec<Post>) -> AppResult<Vec<PostCard>> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let groups: HashMap<Uuid, Group> = state
        .groups
        .list_all()
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let mut authors: HashMap<Uuid, User> = HashMap::new();

    let mut cards = Vec::with_capacity(posts.len());
    for post in posts {
        let author = match authors.get(&post.author_id) {
            Some(author) => author.clone(),
            None => {
                let author = state.users.find_by_id(post.author_id).await?.ok_or_else(|| {
                    AppError::Internal(format!("post {} has no author", post.id))
                })?;
                authors.insert(author.id, author.clone());
                author
            }
        };

        cards.push(PostCard {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date,
            group: post.group_id.and_then(|id| groups.get(&id).cloned()),
            author,
        });
    }

    Ok(cards)
}

async fn paginate(
    state: &AppState,
    filter: PostFilter,
    query: &PageQuery,
) -> AppResult<Page<PostCard>> {
    let count = state.posts.count(filter).await?;
    let request = Paginator::default().get_page(count, query.page.as_deref());

    let posts = state
        .posts
        .list(filter, request.offset(), request.limit())
        .await?;

    Ok(request.into_page(cards(state, posts).await?))
}

/// Posts are addressed by id; anything that is not one is simply not found.
async fn find_post(state: &AppState, raw_id: &str) -> AppResult<Post> {
    let not_found = || AppError::not_found(format!("post {raw_id}"));
    let id = Uuid::parse_str(raw_id).map_err(|_| not_found())?;

    state.posts.find_by_id(id).await?.ok_or_else(not_found)
}

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = paginate(&state, PostFilter::All, &query).await?;

    View::new("posts/index.html")
        .user(identity.identity())
        .insert("page_obj", &page)
        .render()
}

/// GET /group/{slug}/
pub async fn group_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("group {slug}")))?;

    let page = paginate(&state, PostFilter::Group(group.id), &query).await?;

    View::new("posts/group_list.html")
        .user(identity.identity())
        .insert("group", &group)
        .insert("posts", &page.object_list)
        .insert("page_obj", &page)
        .render()
}

/// GET /profile/{username}/
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::not_found(format!("user {username}")))?;

    let page = paginate(&state, PostFilter::Author(author.id), &query).await?;

    View::new("posts/profile.html")
        .user(identity.identity())
        .insert("author_name", &author.display_name())
        .insert("author", &author)
        .insert("posts_count", &page.count)
        .insert("posts", &page.object_list)
        .insert("page_obj", &page)
        .render()
}

/// GET /posts/{post_id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &post_id).await?;
    let posts_count = state.posts.count(PostFilter::Author(post.author_id)).await?;
    let is_author = identity
        .identity()
        .is_some_and(|user| post.is_authored_by(user.user_id));

    let card = cards(&state, vec![post])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("post card missing".to_string()))?;

    View::new("posts/post_detail.html")
        .user(identity.identity())
        .insert("post", &card)
        .insert("posts_count", &posts_count)
        .insert("is_author", &is_author)
        .render()
}

fn post_form_view(identity: &Identity, form: &Form, post_id: Option<Uuid>) -> View {
    View::new("posts/post_create.html")
        .user(Some(identity))
        .insert("form", form)
        .insert("is_edit", &post_id.is_some())
        .insert("post_id", &post_id)
}

/// GET /create/
pub async fn post_create_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list_all().await?;

    post_form_view(&identity, &PostForm::unbound(&groups), None).render()
}

/// POST /create/
pub async fn post_create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list_all().await?;
    let bound = PostForm::bind(&form, &groups);

    let Some(input) = bound.cleaned_data() else {
        tracing::debug!(errors = ?bound.errors(), "Rejected new post");
        return post_form_view(&identity, bound.form(), None).render();
    };

    let post = Post::new(identity.user_id, input.text.clone(), input.group_id);
    let post = state.posts.save(post).await?;
    tracing::info!(post_id = %post.id, author = %identity.username, "Post created");

    Ok(redirect(format!("/profile/{}/", identity.username)))
}

/// GET /posts/{post_id}/edit/
pub async fn post_edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, &post_id).await?;
    if !post.is_authored_by(identity.user_id) {
        return Ok(redirect(format!("/posts/{}/", post.id)));
    }

    let groups = state.groups.list_all().await?;

    post_form_view(&identity, &PostForm::for_instance(&post, &groups), Some(post.id)).render()
}

/// POST /posts/{post_id}/edit/
pub async fn post_edit(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<String>,
    form: web::Form<PostFormData>,
) -> AppResult<HttpResponse> {
    let mut post = find_post(&state, &post_id).await?;
    if !post.is_authored_by(identity.user_id) {
        tracing::warn!(post_id = %post.id, user = %identity.username, "Edit attempt by non-author");
        return Ok(redirect(format!("/posts/{}/", post.id)));
    }

    let groups = state.groups.list_all().await?;
    let bound = PostForm::bind(&form, &groups);

    let Some(input) = bound.cleaned_data() else {
        return post_form_view(&identity, bound.form(), Some(post.id)).render();
    };

    post.edit(input.text.clone(), input.group_id);
    let post = state.posts.save(post).await?;
    tracing::info!(post_id = %post.id, "Post updated");

    Ok(redirect(format!("/posts/{}/", post.id)))
}
