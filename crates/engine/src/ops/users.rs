use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ProfileUpdateCmd, RegisterCmd, ResultEngine, User,
    password::{hash_password, verify_password},
    users,
    util::{optional_text, required_text},
};

use super::{Engine, with_tx};

const REGISTER_REQUIRED: &str = "Name, email and password are required";
const LOGIN_REQUIRED: &str = "Email and password are required";
const EMAIL_REGISTERED: &str = "Email already registered";
const EMAIL_IN_USE: &str = "Email already in use";

impl Engine {
    /// Create an account. Emails are unique across all users.
    pub async fn register(&self, cmd: RegisterCmd) -> ResultEngine<User> {
        let name = required_text(&cmd.name, REGISTER_REQUIRED)?;
        let email = required_text(&cmd.email, REGISTER_REQUIRED)?;
        if cmd.password.is_empty() {
            return Err(EngineError::Validation(REGISTER_REQUIRED.to_string()));
        }
        let password_hash = hash_password(&cmd.password)?;

        let user = with_tx!(self, |db_tx| {
            if find_by_email(&db_tx, &email).await?.is_some() {
                return Err(EngineError::ExistingKey(EMAIL_REGISTERED.to_string()));
            }

            let model = users::ActiveModel {
                user_id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(password_hash),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await
            .map_err(EngineError::on_unique_violation(EMAIL_REGISTERED))?;
            Ok(User::from(model))
        })?;

        tracing::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Check credentials. Unknown email and wrong password are reported the
    /// same way.
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = required_text(email, LOGIN_REQUIRED)?;
        if password.is_empty() {
            return Err(EngineError::Validation(LOGIN_REQUIRED.to_string()));
        }

        let Some(model) = find_by_email(&self.database, &email).await? else {
            tracing::warn!("login attempt for unknown email");
            return Err(EngineError::InvalidCredentials);
        };
        if !verify_password(password, &model.password_hash) {
            tracing::warn!("wrong password for user {}", model.user_id);
            return Err(EngineError::InvalidCredentials);
        }
        Ok(User::from(model))
    }

    pub async fn user(&self, user_id: i32) -> ResultEngine<User> {
        users::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
            .map(User::from)
            .ok_or_else(|| EngineError::KeyNotFound("User".to_string()))
    }

    /// Replace the non-blank fields of `cmd` on the caller's account.
    pub async fn update_profile(&self, cmd: ProfileUpdateCmd) -> ResultEngine<User> {
        let password_hash = cmd
            .password
            .as_deref()
            .filter(|password| !password.is_empty())
            .map(hash_password)
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = users::Entity::find_by_id(cmd.user_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("User".to_string()))?;
            let mut active: users::ActiveModel = model.into();

            if let Some(name) = optional_text(cmd.name.as_deref()) {
                active.name = ActiveValue::Set(name);
            }
            if let Some(email) = optional_text(cmd.email.as_deref()) {
                if let Some(owner) = find_by_email(&db_tx, &email).await?
                    && owner.user_id != cmd.user_id
                {
                    return Err(EngineError::ExistingKey(EMAIL_IN_USE.to_string()));
                }
                active.email = ActiveValue::Set(email);
            }
            if let Some(hash) = password_hash {
                active.password_hash = ActiveValue::Set(hash);
            }

            let model = active
                .update(&db_tx)
                .await
                .map_err(EngineError::on_unique_violation(EMAIL_IN_USE))?;
            Ok(User::from(model))
        })
    }
}

async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> ResultEngine<Option<users::Model>> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}
