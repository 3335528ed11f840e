//! Categories.
//!
//! A category is either a default one (no owner, `is_custom = false`) shared
//! by every user, or a custom one owned by exactly one user.

use sea_orm::{Condition, entity::prelude::*};

use crate::{EngineError, TransactionKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub kind: TransactionKind,
    pub is_custom: bool,
    pub user_id: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub category_id: i32,
    pub name: String,
    pub kind: String,
    pub is_custom: bool,
    pub user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::UserId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::budgets::Entity")]
    Budgets,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Categories `user_id` may see: every default one plus their own.
pub(crate) fn visible_to(user_id: i32) -> Condition {
    Condition::any()
        .add(Column::IsCustom.eq(false))
        .add(Column::UserId.eq(user_id))
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.category_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            name: model.name,
            is_custom: model.is_custom,
            user_id: model.user_id,
        })
    }
}
