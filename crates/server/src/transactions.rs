//! Transaction and category API endpoints

use api_types::{
    Kind, Message,
    category::{CategoryCreated, CategoryListResponse, CategoryNew, CategoryView},
    transaction::{
        TransactionListResponse, TransactionNew, TransactionQuery, TransactionSaved,
        TransactionUpdate, TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use engine::{
    Category, NewCategoryCmd, NewTransactionCmd, Transaction, TransactionKind,
    TransactionListFilter, UpdateTransactionCmd, parse_calendar_date,
};

use crate::{
    ServerError,
    extract::{Id, Payload, non_blank},
    server::{Identity, ServerState},
};

fn kind_view(kind: TransactionKind) -> Kind {
    match kind {
        TransactionKind::Income => Kind::Income,
        TransactionKind::Expense => Kind::Expense,
    }
}

fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        transaction_id: tx.id,
        user_id: tx.user_id,
        kind: kind_view(tx.kind),
        amount: tx.amount,
        category_id: tx.category_id,
        category_name: tx.category_name,
        date: tx.date,
        notes: tx.notes,
        created_at: tx.created_at,
    }
}

fn category_view(category: Category) -> CategoryView {
    CategoryView {
        category_id: category.id,
        name: category.name,
        kind: kind_view(category.kind),
        is_custom: category.is_custom,
    }
}

fn parse_kind(value: Option<&str>) -> Result<Option<TransactionKind>, ServerError> {
    Ok(non_blank(value)
        .map(|value| TransactionKind::try_from(value))
        .transpose()?)
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, ServerError> {
    Ok(non_blank(value)
        .map(|value| parse_calendar_date(value, "date"))
        .transpose()?)
}

/// Handle requests for listing the caller's transactions
pub async fn list(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let category_id = non_blank(query.category_id.as_deref())
        .map(|value| {
            value
                .parse::<i32>()
                .map_err(|_| ServerError::Validation("Invalid category_id".to_string()))
        })
        .transpose()?;
    let filter = TransactionListFilter {
        kind: parse_kind(query.kind.as_deref())?,
        category_id,
        start: parse_date(query.start_date.as_deref())?,
        end: parse_date(query.end_date.as_deref())?,
    };

    let transactions = state
        .engine
        .list_transactions(identity.user_id, &filter)
        .await?;

    Ok(Json(TransactionListResponse {
        transactions: transactions.into_iter().map(transaction_view).collect(),
    }))
}

/// Handle requests for creating a new transaction
pub async fn create(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Payload(payload): Payload<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionSaved>), ServerError> {
    let (Some(kind), Some(amount), Some(category_id)) = (
        non_blank(payload.kind.as_deref()),
        payload.amount,
        payload.category_id,
    ) else {
        return Err(ServerError::Validation(
            "Type, amount, and category are required".to_string(),
        ));
    };

    let transaction = state
        .engine
        .create_transaction(NewTransactionCmd {
            user_id: identity.user_id,
            kind: TransactionKind::try_from(kind)?,
            amount,
            category_id,
            date: parse_date(payload.date.as_deref())?,
            notes: payload.notes,
            now: Utc::now(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionSaved {
            message: "Transaction added successfully".to_string(),
            transaction: transaction_view(transaction),
        }),
    ))
}

/// Handle partial updates of a transaction
pub async fn update(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Id(id): Id,
    Payload(payload): Payload<TransactionUpdate>,
) -> Result<Json<TransactionSaved>, ServerError> {
    let transaction = state
        .engine
        .update_transaction(UpdateTransactionCmd {
            user_id: identity.user_id,
            transaction_id: id,
            kind: parse_kind(payload.kind.as_deref())?,
            amount: payload.amount,
            category_id: payload.category_id,
            date: parse_date(payload.date.as_deref())?,
            notes: payload.notes,
        })
        .await?;

    Ok(Json(TransactionSaved {
        message: "Transaction updated successfully".to_string(),
        transaction: transaction_view(transaction),
    }))
}

pub async fn delete(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Id(id): Id,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_transaction(identity.user_id, id).await?;
    Ok(Json(Message::new("Transaction deleted successfully")))
}

/// Handle requests for listing default and custom categories
pub async fn list_categories(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state.engine.list_categories(identity.user_id).await?;
    Ok(Json(CategoryListResponse {
        categories: categories.into_iter().map(category_view).collect(),
    }))
}

pub async fn create_category(
    Extension(identity): Extension<Identity>,
    State(state): State<ServerState>,
    Payload(payload): Payload<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let (Some(name), Some(kind)) = (
        non_blank(payload.name.as_deref()),
        non_blank(payload.kind.as_deref()),
    ) else {
        return Err(ServerError::Validation(
            "Name and type are required".to_string(),
        ));
    };

    let category = state
        .engine
        .create_category(NewCategoryCmd {
            user_id: identity.user_id,
            name: name.to_string(),
            kind: TransactionKind::try_from(kind)?,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryCreated {
            message: "Category created successfully".to_string(),
            category: category_view(category),
        }),
    ))
}
