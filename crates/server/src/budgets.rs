//! Budget API endpoints

use api_types::{
    Message,
    budget::{BudgetCreated, BudgetListResponse, BudgetNew, BudgetUpdate, BudgetView},
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;
use engine::{BudgetStatus, NewBudgetCmd, UpdateBudgetCmd};

use crate::{
    ServerError,
    extract::{Id, Payload},
    server::{Identity, ServerState},
};

fn budget_view(status: BudgetStatus) -> BudgetView {
    BudgetView {
        budget_id: status.budget.id,
        category_id: status.budget.category_id,
        category_name: status
            .category_name
            .unwrap_or_else(|| "Unknown".to_string()),
        amount: status.budget.monthly_limit,
        period: "monthly".to_string(),
        spent: status.spent,
    }
}

/// Handle requests for listing the current month's budgets
pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state
        .engine
        .list_budgets(identity.user_id, Utc::now().date_naive())
        .await?;

    Ok(Json(BudgetListResponse {
        budgets: budgets.into_iter().map(budget_view).collect(),
    }))
}

/// Handle requests for creating a budget in the current month
pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Payload(payload): Payload<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetCreated>), ServerError> {
    let (Some(category_id), Some(amount)) = (payload.category_id, payload.amount) else {
        return Err(ServerError::Validation(
            "Category and amount are required".to_string(),
        ));
    };

    let budget = state
        .engine
        .create_budget(NewBudgetCmd {
            user_id: identity.user_id,
            category_id,
            amount,
            now: Utc::now(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BudgetCreated {
            message: "Budget created successfully".to_string(),
            budget_id: budget.id,
        }),
    ))
}

pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Id(id): Id,
    Payload(payload): Payload<BudgetUpdate>,
) -> Result<Json<Message>, ServerError> {
    state
        .engine
        .update_budget(UpdateBudgetCmd {
            user_id: identity.user_id,
            budget_id: id,
            amount: payload.amount,
            category_id: payload.category_id,
        })
        .await?;

    Ok(Json(Message::new("Budget updated successfully")))
}

pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_budget(identity.user_id, id).await?;
    Ok(Json(Message::new("Budget deleted successfully")))
}
