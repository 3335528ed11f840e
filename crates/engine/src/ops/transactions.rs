use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, ConnectionTrait, ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    EngineError, NewTransactionCmd, ResultEngine, Transaction, TransactionKind,
    UpdateTransactionCmd, categories, transactions,
    transactions::validate_amount,
};

use super::{Engine, with_tx};

/// Filters for listing transactions. Every filter is optional and they are
/// combined with AND.
///
/// `start` and `end` are both inclusive.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<i32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(start) = filter.start {
            self = self.filter(transactions::Column::Date.gte(start));
        }
        if let Some(end) = filter.end {
            self = self.filter(transactions::Column::Date.lte(end));
        }
        self
    }
}

impl Engine {
    /// Lists the caller's transactions, newest date first.
    ///
    /// Rows sharing a date are ordered by id, newest first.
    pub async fn list_transactions(
        &self,
        user_id: i32,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .apply_tx_filters(filter)
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::TransactionId)
            .find_also_related(categories::Entity)
            .all(&self.database)
            .await?
            .into_iter()
            .map(|(tx, category)| Transaction::from_model(tx, category.map(|c| c.name)))
            .collect()
    }

    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Transaction> {
        let amount = validate_amount(cmd.amount, "Amount")?;
        let date = cmd.date.unwrap_or_else(|| cmd.now.date_naive());

        with_tx!(self, |db_tx| {
            let category = self
                .require_visible_category(&db_tx, cmd.user_id, cmd.category_id)
                .await?;
            let model = transactions::ActiveModel::new(
                cmd.user_id,
                cmd.kind,
                amount,
                category.category_id,
                date,
                cmd.notes.unwrap_or_default(),
                cmd.now,
            )
            .insert(&db_tx)
            .await?;
            Transaction::from_model(model, Some(category.name))
        })
    }

    /// Partial update: only the fields present in `cmd` change.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        let amount = cmd
            .amount
            .map(|amount| validate_amount(amount, "Amount"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = find_owned(&db_tx, cmd.user_id, cmd.transaction_id).await?;
            let category_id = match cmd.category_id {
                Some(category_id) => {
                    self.require_visible_category(&db_tx, cmd.user_id, category_id)
                        .await?
                        .category_id
                }
                None => model.category_id,
            };

            let mut active: transactions::ActiveModel = model.into();
            if let Some(kind) = cmd.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            if let Some(amount) = amount {
                active.amount = ActiveValue::Set(amount);
            }
            if cmd.category_id.is_some() {
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(date) = cmd.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(notes) = cmd.notes {
                active.notes = ActiveValue::Set(notes);
            }

            let model = active.update(&db_tx).await?;
            let category_name = categories::Entity::find_by_id(model.category_id)
                .one(&db_tx)
                .await?
                .map(|c| c.name);
            Transaction::from_model(model, category_name)
        })
    }

    pub async fn delete_transaction(&self, user_id: i32, transaction_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = find_owned(&db_tx, user_id, transaction_id).await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}

/// Looks the row up by id *and* owner, so foreign rows read as missing.
async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    transaction_id: i32,
) -> ResultEngine<transactions::Model> {
    transactions::Entity::find_by_id(transaction_id)
        .filter(transactions::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("Transaction".to_string()))
}
