use sea_orm::{
    ActiveValue, ConnectionTrait, ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    EngineError, NewGoalCmd, ResultEngine, SavingsGoal, UpdateGoalCmd, goals,
    transactions::validate_amount,
    util::{optional_text, required_text},
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn list_goals(&self, user_id: i32) -> ResultEngine<Vec<SavingsGoal>> {
        Ok(goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_asc(goals::Column::GoalId)
            .all(&self.database)
            .await?
            .into_iter()
            .map(SavingsGoal::from)
            .collect())
    }

    pub async fn create_goal(&self, cmd: NewGoalCmd) -> ResultEngine<SavingsGoal> {
        let title = required_text(&cmd.title, "Name and target amount are required")?;
        let target_amount = validate_amount(cmd.target_amount, "Target amount")?;

        with_tx!(self, |db_tx| {
            let model = goals::ActiveModel {
                goal_id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(cmd.user_id),
                title: ActiveValue::Set(title),
                target_amount: ActiveValue::Set(target_amount),
                saved_amount: ActiveValue::Set(0.0),
                deadline: ActiveValue::Set(cmd.deadline),
                created_at: ActiveValue::Set(cmd.now),
            }
            .insert(&db_tx)
            .await?;
            Ok(SavingsGoal::from(model))
        })
    }

    /// Partial update. A missing deadline keeps the stored one.
    pub async fn update_goal(&self, cmd: UpdateGoalCmd) -> ResultEngine<SavingsGoal> {
        let target_amount = cmd
            .target_amount
            .map(|amount| validate_amount(amount, "Target amount"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = find_owned(&db_tx, cmd.user_id, cmd.goal_id).await?;
            let mut active: goals::ActiveModel = model.into();

            if let Some(title) = optional_text(cmd.title.as_deref()) {
                active.title = ActiveValue::Set(title);
            }
            if let Some(target_amount) = target_amount {
                active.target_amount = ActiveValue::Set(target_amount);
            }
            if let Some(deadline) = cmd.deadline {
                active.deadline = ActiveValue::Set(Some(deadline));
            }

            Ok(SavingsGoal::from(active.update(&db_tx).await?))
        })
    }

    pub async fn delete_goal(&self, user_id: i32, goal_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = find_owned(&db_tx, user_id, goal_id).await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }

    /// Add `amount` to the saved amount of a goal.
    ///
    /// The increment is done by the database (`saved = saved + amount`), so
    /// concurrent contributions do not overwrite each other.
    pub async fn contribute(
        &self,
        user_id: i32,
        goal_id: i32,
        amount: f64,
    ) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |db_tx| {
            find_owned(&db_tx, user_id, goal_id).await?;
            if !amount.is_finite() || amount <= 0.0 {
                return Err(EngineError::Validation(
                    "Amount must be positive".to_string(),
                ));
            }

            goals::Entity::update_many()
                .col_expr(
                    goals::Column::SavedAmount,
                    Expr::col(goals::Column::SavedAmount).add(amount),
                )
                .filter(goals::Column::GoalId.eq(goal_id))
                .filter(goals::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?;

            let model = find_owned(&db_tx, user_id, goal_id).await?;
            tracing::debug!(
                "goal {goal_id} of user {user_id} now at {}",
                model.saved_amount
            );
            Ok(SavingsGoal::from(model))
        })
    }
}

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    goal_id: i32,
) -> ResultEngine<goals::Model> {
    goals::Entity::find_by_id(goal_id)
        .filter(goals::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("Goal".to_string()))
}
