//! Monthly budgets.
//!
//! A budget caps the spending of one user in one category for one calendar
//! month. `(user_id, category_id, month, year)` is unique.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::MonthPeriod;

#[derive(Clone, Debug, PartialEq)]
pub struct Budget {
    pub id: i32,
    pub user_id: i32,
    pub category_id: i32,
    pub monthly_limit: f64,
    pub period: MonthPeriod,
    pub created_at: DateTime<Utc>,
}

/// A budget enriched with its category name and the amount spent so far.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetStatus {
    pub budget: Budget,
    /// `None` when the category row is gone.
    pub category_name: Option<String>,
    pub spent: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub budget_id: i32,
    pub user_id: i32,
    pub category_id: i32,
    #[sea_orm(column_type = "Double")]
    pub monthly_limit: f64,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::UserId",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::CategoryId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Budget {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let month = u32::try_from(model.month).map_err(|_| {
            crate::EngineError::Validation(format!("invalid stored month {}", model.month))
        })?;
        Ok(Self {
            id: model.budget_id,
            user_id: model.user_id,
            category_id: model.category_id,
            monthly_limit: model.monthly_limit,
            period: MonthPeriod::new(model.year, month)?,
            created_at: model.created_at,
        })
    }
}
