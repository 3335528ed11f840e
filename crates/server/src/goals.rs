//! Savings goal API endpoints

use api_types::{
    Message,
    goal::{Contribution, GoalListResponse, GoalNew, GoalSaved, GoalUpdate, GoalView},
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use engine::{NewGoalCmd, SavingsGoal, UpdateGoalCmd, parse_calendar_date};

use crate::{
    ServerError,
    extract::{Id, Payload, non_blank},
    server::{Identity, ServerState},
};

fn goal_view(goal: SavingsGoal) -> GoalView {
    GoalView {
        goal_id: goal.id,
        progress: goal.progress(),
        name: goal.title,
        target_amount: goal.target_amount,
        current_amount: goal.saved_amount,
        deadline: goal.deadline,
    }
}

fn parse_deadline(value: Option<&str>) -> Result<Option<NaiveDate>, ServerError> {
    Ok(non_blank(value)
        .map(|value| parse_calendar_date(value, "deadline"))
        .transpose()?)
}

pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state.engine.list_goals(identity.user_id).await?;
    Ok(Json(GoalListResponse {
        goals: goals.into_iter().map(goal_view).collect(),
    }))
}

pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Payload(payload): Payload<GoalNew>,
) -> Result<(StatusCode, Json<GoalSaved>), ServerError> {
    let (Some(name), Some(target_amount)) = (
        non_blank(payload.name.as_deref()),
        payload.target_amount,
    ) else {
        return Err(ServerError::Validation(
            "Name and target amount are required".to_string(),
        ));
    };

    let goal = state
        .engine
        .create_goal(NewGoalCmd {
            user_id: identity.user_id,
            title: name.to_string(),
            target_amount,
            deadline: parse_deadline(payload.deadline.as_deref())?,
            now: Utc::now(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GoalSaved {
            message: "Goal created successfully".to_string(),
            goal: goal_view(goal),
        }),
    ))
}

pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Id(id): Id,
    Payload(payload): Payload<GoalUpdate>,
) -> Result<Json<GoalSaved>, ServerError> {
    let goal = state
        .engine
        .update_goal(UpdateGoalCmd {
            user_id: identity.user_id,
            goal_id: id,
            title: payload.name,
            target_amount: payload.target_amount,
            deadline: parse_deadline(payload.deadline.as_deref())?,
        })
        .await?;

    Ok(Json(GoalSaved {
        message: "Goal updated successfully".to_string(),
        goal: goal_view(goal),
    }))
}

pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_goal(identity.user_id, id).await?;
    Ok(Json(Message::new("Goal deleted successfully")))
}

/// Handle contributions towards a goal
pub async fn contribute(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Id(id): Id,
    Payload(payload): Payload<Contribution>,
) -> Result<Json<GoalSaved>, ServerError> {
    let goal = state
        .engine
        .contribute(identity.user_id, id, payload.amount.unwrap_or(0.0))
        .await?;

    Ok(Json(GoalSaved {
        message: "Contribution added successfully".to_string(),
        goal: goal_view(goal),
    }))
}
