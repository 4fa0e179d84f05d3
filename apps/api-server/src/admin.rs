//! Admin registration.
//!
//! The admin surface only exposes what is listed here. The site is built once
//! in `main` and handed to the router and the handlers through `AppState`.

use serde::Serialize;

/// Records the admin surface knows how to present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminEntity {
    Post,
    Author,
}

impl AdminEntity {
    /// URL segment under `/admin/`.
    pub fn path(self) -> &'static str {
        match self {
            AdminEntity::Post => "posts",
            AdminEntity::Author => "authors",
        }
    }

    /// Field holding the record's display string, the default list column.
    fn display_field(self) -> &'static str {
        match self {
            AdminEntity::Post => "title",
            AdminEntity::Author => "name",
        }
    }
}

/// Admin options for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct ModelAdmin {
    pub entity: AdminEntity,
    /// Columns shown in list views.
    pub list_display: Vec<&'static str>,
    /// Fields searched by the `q` query parameter.
    pub search_fields: Vec<&'static str>,
    /// Fields offered as exact-match filters.
    pub list_filter: Vec<&'static str>,
    /// Child records edited inline on the detail view.
    pub inlines: Vec<AdminEntity>,
}

impl ModelAdmin {
    pub fn new(entity: AdminEntity) -> Self {
        Self {
            entity,
            list_display: vec![entity.display_field()],
            search_fields: Vec::new(),
            list_filter: Vec::new(),
            inlines: Vec::new(),
        }
    }

    pub fn list_display(mut self, fields: &[&'static str]) -> Self {
        self.list_display = fields.to_vec();
        self
    }

    pub fn search_fields(mut self, fields: &[&'static str]) -> Self {
        self.search_fields = fields.to_vec();
        self
    }

    pub fn list_filter(mut self, fields: &[&'static str]) -> Self {
        self.list_filter = fields.to_vec();
        self
    }

    pub fn inline(mut self, entity: AdminEntity) -> Self {
        self.inlines.push(entity);
        self
    }

    pub fn has_inline(&self, entity: AdminEntity) -> bool {
        self.inlines.contains(&entity)
    }
}

/// The set of registered entities.
#[derive(Debug, Clone, Default)]
pub struct AdminSite {
    models: Vec<ModelAdmin>,
}

impl AdminSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// The blog's registrations: posts with search and a title filter,
    /// authors with their posts inline.
    pub fn blog() -> Self {
        Self::new()
            .register(
                ModelAdmin::new(AdminEntity::Post)
                    .list_display(&["title", "content", "author"])
                    .search_fields(&["title", "content"])
                    .list_filter(&["title"]),
            )
            .register(ModelAdmin::new(AdminEntity::Author).inline(AdminEntity::Post))
    }

    /// Register an entity, replacing an earlier registration of the same one.
    pub fn register(mut self, model: ModelAdmin) -> Self {
        self.models.retain(|m| m.entity != model.entity);
        self.models.push(model);
        self
    }

    pub fn get(&self, entity: AdminEntity) -> Option<&ModelAdmin> {
        self.models.iter().find(|m| m.entity == entity)
    }

    pub fn is_registered(&self, entity: AdminEntity) -> bool {
        self.get(entity).is_some()
    }

    pub fn models(&self) -> &[ModelAdmin] {
        &self.models
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_site_registrations() {
        let site = AdminSite::blog();

        let post = site.get(AdminEntity::Post).unwrap();
        assert_eq!(post.list_display, ["title", "content", "author"]);
        assert_eq!(post.search_fields, ["title", "content"]);
        assert_eq!(post.list_filter, ["title"]);

        let author = site.get(AdminEntity::Author).unwrap();
        assert_eq!(author.list_display, ["name"]);
        assert!(author.has_inline(AdminEntity::Post));
    }

    #[test]
    fn test_register_replaces_existing_entry() {
        let site = AdminSite::blog().register(ModelAdmin::new(AdminEntity::Post));
        assert_eq!(site.models().len(), 2);
        assert!(
            site.get(AdminEntity::Post)
                .unwrap()
                .search_fields
                .is_empty()
        );
    }
}
