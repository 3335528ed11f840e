//! Seeds the default categories every user can see.
//!
//! Default categories have `is_custom = false` and no owning user.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Categories {
    Table,
    Name,
    Kind,
    IsCustom,
}

const EXPENSE_CATEGORIES: [&str; 16] = [
    "Food & Dining",
    "Shopping",
    "Transportation",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Personal Care",
    "Travel",
    "Housing",
    "Insurance",
    "Groceries",
    "Fitness",
    "Clothing",
    "Gifts & Donations",
    "Other Expenses",
];

const INCOME_CATEGORIES: [&str; 7] = [
    "Salary",
    "Freelance",
    "Business",
    "Investments",
    "Rental Income",
    "Gifts",
    "Other Income",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Categories::Table)
            .columns([Categories::Name, Categories::Kind, Categories::IsCustom]);

        let seeds = EXPENSE_CATEGORIES
            .iter()
            .map(|name| (*name, "expense"))
            .chain(INCOME_CATEGORIES.iter().map(|name| (*name, "income")));
        for (name, kind) in seeds {
            insert
                .values([name.into(), kind.into(), false.into()])
                .map_err(|err| DbErr::Custom(err.to_string()))?;
        }

        manager.exec_stmt(insert.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Categories::Table)
                    .and_where(Expr::col(Categories::IsCustom).eq(false))
                    .to_owned(),
            )
            .await
    }
}
