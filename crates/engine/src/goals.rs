//! Savings goals.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct SavingsGoal {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub target_amount: f64,
    pub saved_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl SavingsGoal {
    /// Saved amount as a percentage of the target, rounded to two decimals.
    ///
    /// A non-positive target yields `0.0`.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        round_cents(self.saved_amount / self.target_amount * 100.0)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "savings_goals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub goal_id: i32,
    pub user_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Double")]
    pub target_amount: f64,
    #[sea_orm(column_type = "Double")]
    pub saved_amount: f64,
    pub deadline: Option<Date>,
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
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SavingsGoal {
    fn from(model: Model) -> Self {
        Self {
            id: model.goal_id,
            user_id: model.user_id,
            title: model.title,
            target_amount: model.target_amount,
            saved_amount: model.saved_amount,
            deadline: model.deadline,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target_amount: f64, saved_amount: f64) -> SavingsGoal {
        SavingsGoal {
            id: 1,
            user_id: 1,
            title: "Bike".to_string(),
            target_amount,
            saved_amount,
            deadline: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn progress_is_rounded_to_two_decimals() {
        assert_eq!(goal(300.0, 100.0).progress(), 33.33);
        assert_eq!(goal(3.0, 2.0).progress(), 66.67);
    }

    #[test]
    fn progress_can_exceed_one_hundred() {
        assert_eq!(goal(100.0, 150.0).progress(), 150.0);
    }

    #[test]
    fn zero_target_has_zero_progress() {
        assert_eq!(goal(0.0, 50.0).progress(), 0.0);
    }
}
