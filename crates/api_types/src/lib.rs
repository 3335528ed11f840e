use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Direction of money for transactions and categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Income,
    Expense,
}

/// Plain `{ "message": ... }` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deserializers for form-style request bodies.
///
/// Browsers post numeric inputs as strings, and an untouched input arrives as
/// `""`. Both numbers and numeric strings are accepted; blank strings count as
/// absent.
pub mod lenient {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText<N> {
        Number(N),
        Text(String),
    }

    fn parse_text<N, E>(text: &str) -> Result<Option<N>, E>
    where
        N: std::str::FromStr,
        E: Error,
    {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse()
            .map(Some)
            .map_err(|_| E::custom(format!("could not convert string to number: '{trimmed}'")))
    }

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText<f64>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(value)) => Ok(Some(value)),
            Some(NumberOrText::Text(text)) => parse_text(&text),
        }
    }

    pub fn opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText<i32>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(value)) => Ok(Some(value)),
            Some(NumberOrText::Text(text)) => parse_text(&text),
        }
    }

    /// Distinguishes a missing key (`None`) from an explicit `null`
    /// (`Some(None)`). Use together with `#[serde(default)]`.
    pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Register {
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Login {
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub user_id: i32,
        pub name: String,
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
        pub user: UserView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeResponse {
        pub user: UserView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileUpdated {
        pub message: String,
        pub user: UserView,
    }
}

pub mod transaction {
    use super::*;

    /// Query string of `GET /transactions/`. Values are parsed by the server so
    /// that bad input is reported as a validation error.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionQuery {
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub category_id: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionNew {
        #[serde(rename = "type")]
        pub kind: Option<String>,
        #[serde(default, deserialize_with = "lenient::opt_f64")]
        pub amount: Option<f64>,
        #[serde(default, deserialize_with = "lenient::opt_i32")]
        pub category_id: Option<i32>,
        pub date: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(rename = "type")]
        pub kind: Option<String>,
        #[serde(default, deserialize_with = "lenient::opt_f64")]
        pub amount: Option<f64>,
        #[serde(default, deserialize_with = "lenient::opt_i32")]
        pub category_id: Option<i32>,
        pub date: Option<String>,
        /// `Some(None)` clears the note, a missing key leaves it untouched.
        #[serde(
            default,
            deserialize_with = "lenient::double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub notes: Option<Option<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub transaction_id: i32,
        pub user_id: i32,
        #[serde(rename = "type")]
        pub kind: Kind,
        pub amount: f64,
        pub category_id: i32,
        pub category_name: Option<String>,
        pub date: NaiveDate,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionSaved {
        pub message: String,
        pub transaction: TransactionView,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub category_id: i32,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: Kind,
        pub is_custom: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub message: String,
        pub category: CategoryView,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetNew {
        #[serde(default, deserialize_with = "lenient::opt_i32")]
        pub category_id: Option<i32>,
        #[serde(default, deserialize_with = "lenient::opt_f64")]
        pub amount: Option<f64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        #[serde(default, deserialize_with = "lenient::opt_i32")]
        pub category_id: Option<i32>,
        #[serde(default, deserialize_with = "lenient::opt_f64")]
        pub amount: Option<f64>,
    }

    /// A current-month budget with what has been spent against it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub budget_id: i32,
        pub category_id: i32,
        pub category_name: String,
        pub amount: f64,
        /// Always `"monthly"`.
        pub period: String,
        pub spent: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreated {
        pub message: String,
        pub budget_id: i32,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "lenient::opt_f64")]
        pub target_amount: Option<f64>,
        pub deadline: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        #[serde(default, deserialize_with = "lenient::opt_f64")]
        pub target_amount: Option<f64>,
        pub deadline: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Contribution {
        #[serde(default, deserialize_with = "lenient::opt_f64")]
        pub amount: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub goal_id: i32,
        pub name: String,
        pub target_amount: f64,
        pub current_amount: f64,
        /// Percentage, rounded to two decimals.
        pub progress: f64,
        pub deadline: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalSaved {
        pub message: String,
        pub goal: GoalView,
    }
}

pub mod report {
    use super::*;

    /// Unparsable values fall back to the current month/year.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DashboardQuery {
        pub month: Option<String>,
        pub year: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TrendQuery {
        pub year: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpending {
        pub category: String,
        pub amount: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalSummary {
        pub goal_id: i32,
        pub user_id: i32,
        pub title: String,
        pub target_amount: f64,
        pub saved_amount: f64,
        pub progress: f64,
        pub deadline: Option<NaiveDate>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Dashboard {
        pub total_income: f64,
        pub total_expenses: f64,
        pub savings: f64,
        pub category_spending: Vec<CategorySpending>,
        pub goals: Vec<GoalSummary>,
        pub month: u32,
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTrendPoint {
        pub month: u32,
        pub income: f64,
        pub expenses: f64,
        pub savings: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTrend {
        pub monthly_trend: Vec<MonthlyTrendPoint>,
    }
}

#[cfg(test)]
mod tests {
    use super::{budget::BudgetNew, transaction::TransactionUpdate};

    #[test]
    fn numeric_strings_are_accepted() {
        let body: BudgetNew =
            serde_json::from_str(r#"{"category_id": "3", "amount": "120.5"}"#).unwrap();
        assert_eq!(body.category_id, Some(3));
        assert_eq!(body.amount, Some(120.5));
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let body: BudgetNew = serde_json::from_str(r#"{"category_id": "", "amount": " "}"#).unwrap();
        assert_eq!(body.category_id, None);
        assert_eq!(body.amount, None);
    }

    #[test]
    fn non_numeric_string_is_rejected() {
        let body = serde_json::from_str::<BudgetNew>(r#"{"amount": "ten"}"#);
        assert!(body.is_err());
    }

    #[test]
    fn explicit_null_notes_differs_from_missing_notes() {
        let cleared: TransactionUpdate = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));

        let untouched: TransactionUpdate = serde_json::from_str(r#"{"amount": 5}"#).unwrap();
        assert_eq!(untouched.notes, None);
        assert_eq!(untouched.amount, Some(5.0));
    }
}
