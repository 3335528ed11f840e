//! Domain and persistence layer of fintrack.
//!
//! Every operation lives on [`Engine`] and is scoped to the id of the calling
//! user: rows owned by somebody else behave as if they did not exist.

pub use budgets::{Budget, BudgetStatus};
pub use categories::Category;
pub use commands::{
    NewBudgetCmd, NewCategoryCmd, NewGoalCmd, NewTransactionCmd, ProfileUpdateCmd, RegisterCmd,
    UpdateBudgetCmd, UpdateGoalCmd, UpdateTransactionCmd,
};
pub use error::EngineError;
pub use goals::SavingsGoal;
pub use ops::{
    CategorySpending, Dashboard, Engine, EngineBuilder, MonthlyTotals, TransactionListFilter,
};
pub use period::MonthPeriod;
pub use transactions::{Transaction, TransactionKind};
pub use users::User;
pub use util::parse_calendar_date;

mod budgets;
mod categories;
mod commands;
mod error;
mod goals;
mod ops;
mod password;
mod period;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
