//! Read-only aggregations over the caller's transactions.

use crate::{MonthPeriod, ResultEngine, SavingsGoal, TransactionKind};

use super::{Engine, aggregates};

/// Expense total of one category within a month.
#[derive(Clone, Debug, PartialEq)]
pub struct CategorySpending {
    pub category: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Dashboard {
    pub period: MonthPeriod,
    pub total_income: f64,
    pub total_expenses: f64,
    /// `total_income - total_expenses`, negative when overspending.
    pub savings: f64,
    pub category_spending: Vec<CategorySpending>,
    pub goals: Vec<SavingsGoal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyTotals {
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}

impl Engine {
    /// Totals of one month plus the caller's goals.
    pub async fn dashboard(&self, user_id: i32, period: MonthPeriod) -> ResultEngine<Dashboard> {
        let db = &self.database;
        let total_income =
            aggregates::sum_amount(db, user_id, TransactionKind::Income, &period).await?;
        let total_expenses =
            aggregates::sum_amount(db, user_id, TransactionKind::Expense, &period).await?;
        let category_spending =
            aggregates::sum_by_category_name(db, user_id, TransactionKind::Expense, &period)
                .await?
                .into_iter()
                .map(|(category, amount)| CategorySpending { category, amount })
                .collect();
        let goals = self.list_goals(user_id).await?;

        Ok(Dashboard {
            period,
            total_income,
            total_expenses,
            savings: total_income - total_expenses,
            category_spending,
            goals,
        })
    }

    /// Income, expenses and savings for each month of `year`, January first.
    /// Months without transactions are zero-filled.
    pub async fn monthly_trend(&self, user_id: i32, year: i32) -> ResultEngine<Vec<MonthlyTotals>> {
        let mut trend = Vec::with_capacity(12);
        for period in MonthPeriod::months_of(year)? {
            let income =
                aggregates::sum_amount(&self.database, user_id, TransactionKind::Income, &period)
                    .await?;
            let expenses =
                aggregates::sum_amount(&self.database, user_id, TransactionKind::Expense, &period)
                    .await?;
            trend.push(MonthlyTotals {
                month: period.month(),
                income,
                expenses,
                savings: income - expenses,
            });
        }
        Ok(trend)
    }
}
