//! SQL sums over the transactions table, shared by budgets and reports.
//!
//! Every query is scoped to one user, one kind and one month. Missing rows
//! sum to `0.0`.

use std::collections::HashMap;

use sea_orm::{
    ConnectionTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    prelude::*, sea_query::Expr,
};

use crate::{MonthPeriod, ResultEngine, TransactionKind, categories, transactions};

fn bucket(user_id: i32, kind: TransactionKind, period: &MonthPeriod) -> Select<transactions::Entity> {
    transactions::Entity::find()
        .filter(transactions::Column::UserId.eq(user_id))
        .filter(transactions::Column::Kind.eq(kind.as_str()))
        .filter(transactions::Column::Date.gte(period.start()))
        .filter(transactions::Column::Date.lt(period.end()))
}

fn amount_sum() -> sea_orm::sea_query::SimpleExpr {
    Expr::col((transactions::Entity, transactions::Column::Amount)).sum()
}

pub(super) async fn sum_amount<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    kind: TransactionKind,
    period: &MonthPeriod,
) -> ResultEngine<f64> {
    let total = bucket(user_id, kind, period)
        .select_only()
        .column_as(amount_sum(), "total")
        .into_tuple::<Option<f64>>()
        .one(db)
        .await?;
    Ok(total.flatten().unwrap_or(0.0))
}

/// Totals keyed by category id.
pub(super) async fn sum_by_category_id<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    kind: TransactionKind,
    period: &MonthPeriod,
) -> ResultEngine<HashMap<i32, f64>> {
    let rows = bucket(user_id, kind, period)
        .select_only()
        .column(transactions::Column::CategoryId)
        .column_as(amount_sum(), "total")
        .group_by(transactions::Column::CategoryId)
        .into_tuple::<(i32, f64)>()
        .all(db)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Totals labelled with the category display name, sorted by name.
///
/// Transactions whose category row is gone are left out.
pub(super) async fn sum_by_category_name<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    kind: TransactionKind,
    period: &MonthPeriod,
) -> ResultEngine<Vec<(String, f64)>> {
    bucket(user_id, kind, period)
        .select_only()
        .column_as(categories::Column::Name, "category")
        .column_as(amount_sum(), "total")
        .join(JoinType::InnerJoin, transactions::Relation::Category.def())
        .group_by(transactions::Column::CategoryId)
        .group_by(categories::Column::Name)
        .order_by_asc(categories::Column::Name)
        .into_tuple::<(String, f64)>()
        .all(db)
        .await
        .map_err(Into::into)
}
