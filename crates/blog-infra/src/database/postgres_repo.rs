//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use blog_core::domain::{Author, NewAuthor, NewPost, Post, PostWithAuthor};
use blog_core::error::RepoError;
use blog_core::ports::{AuthorRepository, PostColumn, PostFilter, PostRepository};

use super::entity::author::{self, Entity as AuthorEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL author repository.
pub type PostgresAuthorRepository = PostgresBaseRepository<AuthorEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

fn post_column(column: PostColumn) -> post::Column {
    match column {
        PostColumn::Title => post::Column::Title,
        PostColumn::Content => post::Column::Content,
    }
}

/// `%term%` with LIKE wildcards in the term escaped.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn join_author(row: (post::Model, Option<author::Model>)) -> Result<PostWithAuthor, RepoError> {
    match row {
        (post, Some(author)) => Ok(PostWithAuthor {
            post: post.into(),
            author: author.into(),
        }),
        (post, None) => Err(RepoError::Constraint(format!(
            "post {} references a missing author",
            post.id
        ))),
    }
}

#[async_trait]
impl AuthorRepository for PostgresAuthorRepository {
    async fn insert(&self, author: NewAuthor) -> Result<Author, RepoError> {
        let model = author::ActiveModel::from(author)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(author_id = model.id, "Author inserted");
        Ok(model.into())
    }

    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let posts = PostEntity::delete_many()
            .filter(post::Column::AuthorId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let authors = AuthorEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        // Dropping the uncommitted transaction rolls the post deletes back.
        if authors.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(
            author_id = id,
            posts_deleted = posts.rows_affected,
            "Author deleted with posts"
        );
        Ok(posts.rows_affected)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, author_id: i32, post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel::for_insert(author_id, post)
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(post_id = model.id, author_id, "Post inserted");
        Ok(model.into())
    }

    async fn insert_with_author(
        &self,
        author: NewAuthor,
        post: NewPost,
    ) -> Result<PostWithAuthor, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let author = author::ActiveModel::from(author)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;

        let post = post::ActiveModel::for_insert(author.id, post)
            .insert(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(PostWithAuthor {
            post: post.into(),
            author: author.into(),
        })
    }

    async fn update_with_author(
        &self,
        post: Post,
        author: Option<Author>,
    ) -> Result<PostWithAuthor, RepoError> {
        if let Some(author) = &author {
            if author.id != post.author_id {
                return Err(RepoError::Constraint(format!(
                    "post {} belongs to author {}, not {}",
                    post.id, post.author_id, author.id
                )));
            }
        }

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let author = match author {
            Some(author) => author::ActiveModel::from(author)
                .update(&txn)
                .await
                .map_err(map_db_err)?,
            None => AuthorEntity::find_by_id(post.author_id)
                .one(&txn)
                .await
                .map_err(map_db_err)?
                .ok_or(RepoError::NotFound)?,
        };

        let post = post::ActiveModel::from(post)
            .update(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(PostWithAuthor {
            post: post.into(),
            author: author.into(),
        })
    }

    async fn find_with_author(&self, id: i32) -> Result<Option<PostWithAuthor>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(AuthorEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        row.map(join_author).transpose()
    }

    async fn list_with_authors(
        &self,
        filter: &PostFilter,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let mut condition = Condition::all();

        if let Some(term) = filter.search.as_deref() {
            if !filter.search_in.is_empty() {
                let pattern = contains_pattern(term);
                let mut any = Condition::any();
                for column in &filter.search_in {
                    any = any.add(
                        Expr::col((PostEntity, post_column(*column))).ilike(pattern.clone()),
                    );
                }
                condition = condition.add(any);
            }
        }

        for (column, value) in &filter.equals {
            condition = condition.add(post_column(*column).eq(value.clone()));
        }

        let rows = PostEntity::find()
            .filter(condition)
            .order_by_asc(post::Column::Id)
            .find_also_related(AuthorEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(join_author).collect()
    }

    async fn find_by_author_id(&self, author_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
