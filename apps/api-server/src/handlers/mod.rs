//! HTTP handlers and route configuration.

mod admin;
mod health;
mod posts;
mod root;

use actix_web::{error, web};

use crate::admin::{AdminEntity, AdminSite};
use crate::middleware::error::AppError;

/// Route name of the posts collection, used for hyperlinks.
pub const POST_LIST: &str = "post-list";

/// JSON extractor settings: malformed bodies become problem-detail 400s.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        error::Error::from(AppError::BadRequest(err.to_string()))
    })
}

/// Configure the posts resource and API root at `/`, plus `/api/health`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root::api_root))
        .service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        .service(
            web::resource("/posts/")
                .name(POST_LIST)
                .route(web::get().to(posts::list))
                .route(web::post().to(posts::create)),
        )
        .service(
            web::resource("/posts/{id}/")
                .route(web::get().to(posts::retrieve))
                .route(web::put().to(posts::update))
                .route(web::patch().to(posts::partial_update))
                .route(web::delete().to(posts::destroy)),
        );
}

/// Configure the `/admin` routes for whatever the site has registered.
pub fn configure_admin(cfg: &mut web::ServiceConfig, site: &AdminSite) {
    let mut scope = web::scope("/admin").route("/", web::get().to(admin::index));

    if site.is_registered(AdminEntity::Post) {
        scope = scope.route("/posts/", web::get().to(admin::post_list));
    }

    if let Some(authors) = site.get(AdminEntity::Author) {
        scope = scope
            .service(
                web::resource("/authors/")
                    .route(web::get().to(admin::author_list))
                    .route(web::post().to(admin::author_create)),
            )
            .service(
                web::resource("/authors/{id}/")
                    .route(web::get().to(admin::author_detail))
                    .route(web::delete().to(admin::author_delete)),
            );

        if authors.has_inline(AdminEntity::Post) {
            scope = scope
                .route(
                    "/authors/{id}/posts/",
                    web::post().to(admin::author_post_create),
                )
                .service(
                    web::resource("/authors/{id}/posts/{post_id}/")
                        .route(web::patch().to(admin::author_post_update))
                        .route(web::delete().to(admin::author_post_delete)),
                );
        }
    }

    cfg.service(scope);
}
