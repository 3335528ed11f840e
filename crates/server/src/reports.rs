//! Report API endpoints

use std::str::FromStr;

use api_types::report::{
    CategorySpending, Dashboard, DashboardQuery, GoalSummary, MonthlyTrend, MonthlyTrendPoint,
    TrendQuery,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{Datelike, Utc};
use engine::{MonthPeriod, SavingsGoal};

use crate::{
    ServerError,
    extract::non_blank,
    server::{Identity, ServerState},
};

/// Parsed query value, `None` when absent or not a number.
fn query_number<T: FromStr>(value: Option<&str>) -> Option<T> {
    non_blank(value).and_then(|value| value.parse().ok())
}

fn goal_summary(goal: SavingsGoal) -> GoalSummary {
    GoalSummary {
        goal_id: goal.id,
        user_id: goal.user_id,
        progress: goal.progress(),
        title: goal.title,
        target_amount: goal.target_amount,
        saved_amount: goal.saved_amount,
        deadline: goal.deadline,
        created_at: goal.created_at,
    }
}

/// Handle requests for the monthly dashboard. Month and year default to the
/// current UTC month.
pub async fn dashboard(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, ServerError> {
    let today = Utc::now().date_naive();
    // Negative months map to 0 so that they are rejected like 13 is.
    let month = query_number::<i64>(query.month.as_deref())
        .map_or(today.month(), |month| u32::try_from(month).unwrap_or(0));
    let year = query_number(query.year.as_deref()).unwrap_or(today.year());
    let period = MonthPeriod::new(year, month)?;

    let dashboard = state.engine.dashboard(identity.user_id, period).await?;

    Ok(Json(Dashboard {
        total_income: dashboard.total_income,
        total_expenses: dashboard.total_expenses,
        savings: dashboard.savings,
        category_spending: dashboard
            .category_spending
            .into_iter()
            .map(|spending| CategorySpending {
                category: spending.category,
                amount: spending.amount,
            })
            .collect(),
        goals: dashboard.goals.into_iter().map(goal_summary).collect(),
        month: dashboard.period.month(),
        year: dashboard.period.year(),
    }))
}

pub async fn monthly_trend(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<MonthlyTrend>, ServerError> {
    let year = query_number(query.year.as_deref()).unwrap_or(Utc::now().year());
    let trend = state.engine.monthly_trend(identity.user_id, year).await?;

    Ok(Json(MonthlyTrend {
        monthly_trend: trend
            .into_iter()
            .map(|totals| MonthlyTrendPoint {
                month: totals.month,
                income: totals.income,
                expenses: totals.expenses,
                savings: totals.savings,
            })
            .collect(),
    }))
}
