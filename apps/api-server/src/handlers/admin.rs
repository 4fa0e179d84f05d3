//! Admin surface - list, search, filter and inline editing driven by `AdminSite`.

use std::collections::{BTreeSet, HashMap};

use actix_web::{HttpResponse, web};
use serde_json::{Map, Value, json};

use blog_core::domain::{Author, Post, PostWithAuthor};
use blog_core::error::RepoError;
use blog_core::ports::{PostColumn, PostFilter};
use blog_core::{AuthorSerializer, PostSerializer};
use blog_shared::dto::{AuthorWrite, PostWrite};

use crate::admin::{AdminEntity, ModelAdmin};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn registration(state: &AppState, entity: AdminEntity) -> AppResult<&ModelAdmin> {
    state
        .admin
        .get(entity)
        .ok_or_else(|| AppError::NotFound(format!("{} is not registered", entity.path())))
}

fn post_cell(field: &str, row: &PostWithAuthor) -> Value {
    let PostWithAuthor { post, author } = row;
    match field {
        "id" => json!(post.id),
        "title" => json!(post.title),
        "content" => json!(post.content),
        "author" => json!(author.to_string()),
        "published_at" => json!(post.published_at),
        "is_published" => json!(post.is_published),
        _ => Value::Null,
    }
}

fn author_cell(field: &str, author: &Author) -> Value {
    match field {
        "id" => json!(author.id),
        "name" => json!(author.name),
        "bio" => json!(author.bio),
        "created_at" => json!(author.created_at),
        _ => Value::Null,
    }
}

/// One list row: the record id plus every `list_display` column.
fn list_row<T>(id: i32, columns: &[&str], record: &T, cell: fn(&str, &T) -> Value) -> Value {
    let mut row = Map::new();
    row.insert("id".to_string(), json!(id));
    for field in columns {
        row.insert((*field).to_string(), cell(field, record));
    }
    Value::Object(row)
}

fn inline_post(post: &Post) -> Value {
    json!({
        "id": post.id,
        "title": post.title,
        "content": post.content,
        "published_at": post.published_at,
        "is_published": post.is_published,
    })
}

/// GET /admin/
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "models": state.admin.models() }))
}

/// GET /admin/posts/?q=..&title=..
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> AppResult<HttpResponse> {
    let model = registration(&state, AdminEntity::Post)?;

    let search = query
        .get("q")
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .map(str::to_string);

    let filter = PostFilter {
        search,
        search_in: model
            .search_fields
            .iter()
            .filter_map(|field| PostColumn::from_name(field))
            .collect(),
        equals: model
            .list_filter
            .iter()
            .filter_map(|field| {
                let column = PostColumn::from_name(field)?;
                query.get(*field).map(|value| (column, value.clone()))
            })
            .collect(),
    };

    let rows = state.posts.list_with_authors(&filter).await?;
    let results: Vec<Value> = rows
        .iter()
        .map(|row| list_row(row.post.id, &model.list_display, row, post_cell))
        .collect();

    // Filter choices come from every post, not just the matching ones.
    let mut choices = Map::new();
    if !model.list_filter.is_empty() {
        let all = state
            .posts
            .list_with_authors(&PostFilter::default())
            .await?;
        for field in &model.list_filter {
            if let Some(column) = PostColumn::from_name(field) {
                let values: BTreeSet<&str> =
                    all.iter().map(|row| column.value(&row.post)).collect();
                choices.insert((*field).to_string(), json!(values));
            }
        }
    }

    Ok(HttpResponse::Ok().json(json!({
        "columns": model.list_display,
        "search_fields": model.search_fields,
        "filters": choices,
        "count": results.len(),
        "results": results,
    })))
}

/// GET /admin/authors/
pub async fn author_list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let model = registration(&state, AdminEntity::Author)?;

    let authors = state.authors.find_all().await?;
    let results: Vec<Value> = authors
        .iter()
        .map(|author| list_row(author.id, &model.list_display, author, author_cell))
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "columns": model.list_display,
        "count": results.len(),
        "results": results,
    })))
}

/// POST /admin/authors/
pub async fn author_create(
    state: web::Data<AppState>,
    body: web::Json<AuthorWrite>,
) -> AppResult<HttpResponse> {
    registration(&state, AdminEntity::Author)?;

    let author = AuthorSerializer::validate_create(&body)?;
    let author = AuthorSerializer::new(state.authors.as_ref())
        .create(author)
        .await?;

    Ok(HttpResponse::Created().json(author))
}

async fn find_author(state: &AppState, id: i32) -> AppResult<Author> {
    state
        .authors
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {id} not found")))
}

/// GET /admin/authors/{id}/
pub async fn author_detail(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let model = registration(&state, AdminEntity::Author)?;
    let author = find_author(&state, path.into_inner()).await?;

    let mut body = json!({
        "id": author.id,
        "name": author.name,
        "bio": author.bio,
        "created_at": author.created_at,
    });

    if model.has_inline(AdminEntity::Post) {
        let posts = state.posts.find_by_author_id(author.id).await?;
        body["posts"] = Value::Array(posts.iter().map(inline_post).collect());
    }

    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /admin/authors/{id}/ - removes the author and all of its posts.
pub async fn author_delete(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    registration(&state, AdminEntity::Author)?;
    let id = path.into_inner();

    let deleted_posts = state
        .authors
        .delete_cascade(id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound(format!("Author with id {id} not found")),
            other => other.into(),
        })?;

    tracing::info!(author_id = id, deleted_posts, "Author deleted");
    Ok(HttpResponse::Ok().json(json!({ "id": id, "deleted_posts": deleted_posts })))
}

fn post_inline(state: &AppState) -> AppResult<()> {
    let model = registration(state, AdminEntity::Author)?;
    if !model.has_inline(AdminEntity::Post) {
        return Err(AppError::NotFound(
            "posts are not inline on authors".to_string(),
        ));
    }
    Ok(())
}

/// A post shown inline under `author_id`; posts of other authors are not found.
async fn find_inline_post(
    state: &AppState,
    author_id: i32,
    post_id: i32,
) -> AppResult<PostWithAuthor> {
    let instance = PostSerializer::new(state.posts.as_ref())
        .get(post_id)
        .await?;
    if instance.post.author_id != author_id {
        return Err(AppError::NotFound(format!(
            "Post with id {post_id} is not inline on author {author_id}"
        )));
    }
    Ok(instance)
}

/// POST /admin/authors/{id}/posts/ - adds an inline post to an existing author.
pub async fn author_post_create(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<PostWrite>,
) -> AppResult<HttpResponse> {
    post_inline(&state)?;

    let author = find_author(&state, path.into_inner()).await?;
    let post = PostSerializer::validate_new_post(&body)?;
    let post = state.posts.insert(author.id, post).await?;

    tracing::info!(
        post_id = post.id,
        author_id = author.id,
        "Inline post created"
    );
    Ok(HttpResponse::Created().json(inline_post(&post)))
}

/// PATCH /admin/authors/{id}/posts/{post_id}/ - edits an inline post's own fields.
///
/// The parent author is fixed by the URL, so a nested author object is ignored.
pub async fn author_post_update(
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
    body: web::Json<PostWrite>,
) -> AppResult<HttpResponse> {
    post_inline(&state)?;
    let (author_id, post_id) = path.into_inner();
    let instance = find_inline_post(&state, author_id, post_id).await?;

    let mut changes = PostSerializer::validate_update(&body, true)?;
    changes.author = None;
    let updated = PostSerializer::new(state.posts.as_ref())
        .update(instance, changes)
        .await?;

    Ok(HttpResponse::Ok().json(inline_post(&updated.post)))
}

/// DELETE /admin/authors/{id}/posts/{post_id}/ - removes an inline post.
pub async fn author_post_delete(
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    post_inline(&state)?;
    let (author_id, post_id) = path.into_inner();
    find_inline_post(&state, author_id, post_id).await?;

    state.posts.delete(post_id).await?;

    tracing::info!(post_id, author_id, "Inline post deleted");
    Ok(HttpResponse::NoContent().finish())
}
