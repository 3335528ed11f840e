//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense record owned by one user.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(EngineError::Validation(
                "Type must be either income or expense".to_string(),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: i32,
    pub user_id: i32,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category_id: i32,
    /// Display name of the category, when it still exists.
    pub category_name: Option<String>,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn from_model(model: Model, category_name: Option<String>) -> ResultEngine<Self> {
        Ok(Self {
            id: model.transaction_id,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: model.amount,
            category_id: model.category_id,
            category_name,
            date: model.date,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}

/// Rejects zero, negative and non-finite amounts.
pub(crate) fn validate_amount(amount: f64, label: &str) -> ResultEngine<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::Validation(format!("{label} must be positive")));
    }
    Ok(amount)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i32,
    pub user_id: i32,
    pub kind: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub category_id: i32,
    pub date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
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

impl ActiveModel {
    pub(crate) fn new(
        user_id: i32,
        kind: TransactionKind,
        amount: f64,
        category_id: i32,
        date: NaiveDate,
        notes: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            kind: ActiveValue::Set(kind.as_str().to_string()),
            amount: ActiveValue::Set(amount),
            category_id: ActiveValue::Set(category_id),
            date: ActiveValue::Set(date),
            notes: ActiveValue::Set(Some(notes)),
            created_at: ActiveValue::Set(created_at),
        }
    }
}
