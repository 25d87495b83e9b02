//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use inkwell_core::domain::{
    Category, Comment, Like, Post, PostChanges, PostFilter, User, UserChanges,
};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    CategoryRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

pub type PostgresLikeRepository = PostgresBaseRepository<LikeEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, RepoError> {
        let Some(model) = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };

        let mut user = User::from(model);
        changes.apply(&mut user);

        let active: user::ActiveModel = user.into();
        let model = active.update(&self.db).await.map_err(repo_err)?;
        Ok(Some(model.into()))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find();

        if let Some(published) = filter.published {
            query = query.filter(post::Column::Published.eq(published));
        }

        if let Some(slug) = &filter.category_slug {
            let category = CategoryEntity::find()
                .filter(category::Column::Slug.eq(slug.as_str()))
                .one(&self.db)
                .await
                .map_err(repo_err)?;

            match category {
                Some(category) => query = query.filter(post::Column::CategoryId.eq(category.id)),
                None => tracing::debug!(category = %slug, "Unknown category slug, filter ignored"),
            }
        }

        let result = query
            .order_by_desc(post::Column::CreatedAt)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
        else {
            return Ok(None);
        };

        let mut post = Post::from(model);
        changes.apply(&mut post);

        let active: post::ActiveModel = post.into();
        let model = active.update(&self.db).await.map_err(repo_err)?;
        Ok(Some(model.into()))
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn delete_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let result = CommentEntity::delete_many()
            .filter(comment::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected)
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Like>, RepoError> {
        let result = LikeEntity::find()
            .filter(like::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_user_like(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Like>, RepoError> {
        let result = LikeEntity::find()
            .filter(like::Column::PostId.eq(post_id))
            .filter(like::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = LikeEntity::find()
            .select_only()
            .column(like::Column::PostId)
            .column_as(Expr::col(like::Column::Id).count(), "count")
            .filter(like::Column::PostId.is_in(post_ids.iter().copied()))
            .group_by(like::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(rows
            .into_iter()
            .map(|(post_id, count)| (post_id, count.max(0) as u64))
            .collect())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let result = LikeEntity::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected)
    }
}
