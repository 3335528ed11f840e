//! Inputs of the engine write operations.
//!
//! Presence of required request fields is checked by the caller; the engine
//! validates values (positive amounts, visible categories, unique keys).

use chrono::{DateTime, NaiveDate, Utc};

use crate::TransactionKind;

#[derive(Clone, Debug)]
pub struct RegisterCmd {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update; blank values are ignored.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdateCmd {
    pub user_id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: i32,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category_id: i32,
    /// Defaults to the UTC date of `now`.
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub now: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateTransactionCmd {
    pub user_id: i32,
    pub transaction_id: i32,
    pub kind: Option<TransactionKind>,
    pub amount: Option<f64>,
    pub category_id: Option<i32>,
    pub date: Option<NaiveDate>,
    /// `Some(None)` clears the note.
    pub notes: Option<Option<String>>,
}

#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub user_id: i32,
    pub name: String,
    pub kind: TransactionKind,
}

#[derive(Clone, Debug)]
pub struct NewBudgetCmd {
    pub user_id: i32,
    pub category_id: i32,
    pub amount: f64,
    /// The budget is created for the UTC month of `now`.
    pub now: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateBudgetCmd {
    pub user_id: i32,
    pub budget_id: i32,
    pub amount: Option<f64>,
    pub category_id: Option<i32>,
}

#[derive(Clone, Debug)]
pub struct NewGoalCmd {
    pub user_id: i32,
    pub title: String,
    pub target_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub now: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct UpdateGoalCmd {
    pub user_id: i32,
    pub goal_id: i32,
    pub title: Option<String>,
    pub target_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
}
