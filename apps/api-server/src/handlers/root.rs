//! API root - links to every resource collection.

use actix_web::{HttpRequest, HttpResponse};
use serde_json::{Map, Value};

use super::POST_LIST;

/// GET /
pub async fn api_root(req: HttpRequest) -> HttpResponse {
    let mut links = Map::new();
    for (name, route) in [("posts", POST_LIST)] {
        match req.url_for_static(route) {
            Ok(url) => {
                links.insert(name.to_string(), Value::String(url.to_string()));
            }
            Err(e) => tracing::warn!(route, "Cannot build resource URL: {}", e),
        }
    }

    HttpResponse::Ok().json(Value::Object(links))
}
