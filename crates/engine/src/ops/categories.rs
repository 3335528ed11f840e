use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, EngineError, NewCategoryCmd, ResultEngine, categories, util::required_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Default categories plus the caller's custom ones, oldest first.
    pub async fn list_categories(&self, user_id: i32) -> ResultEngine<Vec<Category>> {
        categories::Entity::find()
            .filter(categories::visible_to(user_id))
            .order_by_asc(categories::Column::CategoryId)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    /// Create a custom category owned by the caller.
    pub async fn create_category(&self, cmd: NewCategoryCmd) -> ResultEngine<Category> {
        let name = required_text(&cmd.name, "Name and type are required")?;

        with_tx!(self, |db_tx| {
            let model = categories::ActiveModel {
                category_id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(cmd.kind.as_str().to_string()),
                is_custom: ActiveValue::Set(true),
                user_id: ActiveValue::Set(Some(cmd.user_id)),
            }
            .insert(&db_tx)
            .await?;
            Category::try_from(model)
        })
    }

    /// Load a category the caller may use, or fail as if it did not exist.
    pub(super) async fn require_visible_category<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: i32,
        category_id: i32,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::visible_to(user_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Category".to_string()))
    }
}
