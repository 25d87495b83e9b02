//! Like entity for SeaORM. `(post_id, user_id)` carries a unique index.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::Like;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "likes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Like {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            user_id: model.user_id,
            created_at: model.created_at.into(),
        }
    }
}

impl From<Like> for ActiveModel {
    fn from(like: Like) -> Self {
        Self {
            id: Set(like.id),
            post_id: Set(like.post_id),
            user_id: Set(like.user_id),
            created_at: Set(like.created_at.into()),
        }
    }
}
