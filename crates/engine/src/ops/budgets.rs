use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, ConnectionTrait, ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    Budget, BudgetStatus, EngineError, MonthPeriod, NewBudgetCmd, ResultEngine, TransactionKind,
    UpdateBudgetCmd, budgets, categories, transactions::validate_amount,
};

use super::{Engine, aggregates, with_tx};

const BUDGET_EXISTS: &str = "Budget already exists for this category this month";

impl Engine {
    /// The caller's budgets for the month of `today`, each with what has been
    /// spent in its category during that month.
    pub async fn list_budgets(&self, user_id: i32, today: NaiveDate) -> ResultEngine<Vec<BudgetStatus>> {
        let period = MonthPeriod::containing(today);
        let rows = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::Month.eq(period.month() as i32))
            .filter(budgets::Column::Year.eq(period.year()))
            .order_by_asc(budgets::Column::BudgetId)
            .find_also_related(categories::Entity)
            .all(&self.database)
            .await?;
        let spent = aggregates::sum_by_category_id(
            &self.database,
            user_id,
            TransactionKind::Expense,
            &period,
        )
        .await?;

        rows.into_iter()
            .map(|(model, category)| {
                let spent = spent.get(&model.category_id).copied().unwrap_or(0.0);
                Ok(BudgetStatus {
                    budget: Budget::try_from(model)?,
                    category_name: category.map(|c| c.name),
                    spent,
                })
            })
            .collect()
    }

    /// Create a budget for the caller's current month. At most one budget per
    /// category and month.
    pub async fn create_budget(&self, cmd: NewBudgetCmd) -> ResultEngine<Budget> {
        let amount = validate_amount(cmd.amount, "Amount")?;
        let period = MonthPeriod::containing(cmd.now.date_naive());

        with_tx!(self, |db_tx| {
            self.require_visible_category(&db_tx, cmd.user_id, cmd.category_id)
                .await?;
            if find_for_key(&db_tx, cmd.user_id, cmd.category_id, &period)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(BUDGET_EXISTS.to_string()));
            }

            let model = budgets::ActiveModel {
                budget_id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(cmd.user_id),
                category_id: ActiveValue::Set(cmd.category_id),
                monthly_limit: ActiveValue::Set(amount),
                month: ActiveValue::Set(period.month() as i32),
                year: ActiveValue::Set(period.year()),
                created_at: ActiveValue::Set(cmd.now),
            }
            .insert(&db_tx)
            .await
            .map_err(EngineError::on_unique_violation(BUDGET_EXISTS))?;
            Budget::try_from(model)
        })
    }

    /// Partial update of the cap and/or the category. The budget keeps its
    /// month.
    pub async fn update_budget(&self, cmd: UpdateBudgetCmd) -> ResultEngine<Budget> {
        let amount = cmd
            .amount
            .map(|amount| validate_amount(amount, "Amount"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = find_owned(&db_tx, cmd.user_id, cmd.budget_id).await?;
            let budget = Budget::try_from(model.clone())?;
            let mut active: budgets::ActiveModel = model.into();

            if let Some(category_id) = cmd.category_id
                && category_id != budget.category_id
            {
                self.require_visible_category(&db_tx, cmd.user_id, category_id)
                    .await?;
                if find_for_key(&db_tx, cmd.user_id, category_id, &budget.period)
                    .await?
                    .is_some()
                {
                    return Err(EngineError::ExistingKey(BUDGET_EXISTS.to_string()));
                }
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(amount) = amount {
                active.monthly_limit = ActiveValue::Set(amount);
            }

            let model = active
                .update(&db_tx)
                .await
                .map_err(EngineError::on_unique_violation(BUDGET_EXISTS))?;
            Budget::try_from(model)
        })
    }

    pub async fn delete_budget(&self, user_id: i32, budget_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = find_owned(&db_tx, user_id, budget_id).await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}

async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    budget_id: i32,
) -> ResultEngine<budgets::Model> {
    budgets::Entity::find_by_id(budget_id)
        .filter(budgets::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("Budget".to_string()))
}

async fn find_for_key<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    category_id: i32,
    period: &MonthPeriod,
) -> ResultEngine<Option<budgets::Model>> {
    budgets::Entity::find()
        .filter(budgets::Column::UserId.eq(user_id))
        .filter(budgets::Column::CategoryId.eq(category_id))
        .filter(budgets::Column::Month.eq(period.month() as i32))
        .filter(budgets::Column::Year.eq(period.year()))
        .one(db)
        .await
        .map_err(Into::into)
}
