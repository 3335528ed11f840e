use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod aggregates;
mod budgets;
mod categories;
mod goals;
mod reports;
mod transactions;
mod users;

pub use reports::{CategorySpending, Dashboard, MonthlyTotals};
pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// The block is evaluated as an `async` block, so `?` inside it still reaches
/// the rollback.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: $crate::ResultEngine<_> = async { $body }.await;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                $tx.rollback().await?;
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of every finance operation.
///
/// Every method takes the caller's user id and never touches rows owned by
/// somebody else.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
