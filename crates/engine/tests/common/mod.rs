#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::Database;

use engine::{Category, Engine, RegisterCmd, TransactionKind, User};
use migration::MigratorTrait;

pub async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

pub async fn register(engine: &Engine, name: &str, email: &str) -> User {
    engine
        .register(RegisterCmd {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap()
}

pub async fn category(engine: &Engine, user_id: i32, name: &str) -> Category {
    engine
        .list_categories(user_id)
        .await
        .unwrap()
        .into_iter()
        .find(|category| category.name == name)
        .unwrap_or_else(|| panic!("category {name} missing"))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub async fn record(
    engine: &Engine,
    user_id: i32,
    kind: TransactionKind,
    amount: f64,
    category_id: i32,
    on: NaiveDate,
) -> engine::Transaction {
    engine
        .create_transaction(engine::NewTransactionCmd {
            user_id,
            kind,
            amount,
            category_id,
            date: Some(on),
            notes: None,
            now: Utc::now(),
        })
        .await
        .unwrap()
}
