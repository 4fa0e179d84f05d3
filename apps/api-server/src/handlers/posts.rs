//! Posts resource - list, create, retrieve, update, partial update, delete.

use actix_web::{HttpResponse, web};

use blog_core::error::RepoError;
use blog_core::ports::PostFilter;
use blog_core::{DomainError, PostSerializer};
use blog_shared::dto::{PostRepresentation, PostWrite};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /posts/
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let rows = state
        .posts
        .list_with_authors(&PostFilter::default())
        .await?;
    let body: Vec<PostRepresentation> =
        rows.iter().map(PostSerializer::to_representation).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /posts/
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<PostWrite>,
) -> AppResult<HttpResponse> {
    let data = PostSerializer::validate_create(&body)?;
    let created = PostSerializer::new(state.posts.as_ref())
        .create(data)
        .await?;

    Ok(HttpResponse::Created().json(PostSerializer::to_representation(&created)))
}

/// GET /posts/{id}/
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let instance = PostSerializer::new(state.posts.as_ref())
        .get(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(PostSerializer::to_representation(&instance)))
}

/// PUT /posts/{id}/
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PostWrite>,
) -> AppResult<HttpResponse> {
    save_changes(&state, path.into_inner(), &body, false).await
}

/// PATCH /posts/{id}/
pub async fn partial_update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PostWrite>,
) -> AppResult<HttpResponse> {
    save_changes(&state, path.into_inner(), &body, true).await
}

async fn save_changes(
    state: &AppState,
    id: i32,
    body: &PostWrite,
    partial: bool,
) -> AppResult<HttpResponse> {
    let serializer = PostSerializer::new(state.posts.as_ref());
    let instance = serializer.get(id).await?;

    let changes = PostSerializer::validate_update(body, partial)?;
    let updated = serializer.update(instance, changes).await?;

    Ok(HttpResponse::Ok().json(PostSerializer::to_representation(&updated)))
}

/// DELETE /posts/{id}/
pub async fn destroy(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.posts.delete(id).await.map_err(|e| -> AppError {
        match e {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "Post",
                id,
            }
            .into(),
            other => other.into(),
        }
    })?;

    tracing::info!(post_id = id, "Post deleted");
    Ok(HttpResponse::NoContent().finish())
}
