//! Author entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set, Unchanged};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Author.
impl From<Model> for blog_core::domain::Author {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            bio: model.bio,
            created_at: model.created_at.into(),
        }
    }
}

/// Insert form: the database assigns the id.
impl From<blog_core::domain::NewAuthor> for ActiveModel {
    fn from(author: blog_core::domain::NewAuthor) -> Self {
        Self {
            id: NotSet,
            name: Set(author.name),
            bio: Set(author.bio),
            created_at: Set(author.created_at.into()),
        }
    }
}

/// Update form: only the name is written, `created_at` never moves.
impl From<blog_core::domain::Author> for ActiveModel {
    fn from(author: blog_core::domain::Author) -> Self {
        Self {
            id: Unchanged(author.id),
            name: Set(author.name),
            bio: Unchanged(author.bio),
            created_at: Unchanged(author.created_at.into()),
        }
    }
}
