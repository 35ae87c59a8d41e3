use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr, TransactionError,
    TransactionTrait,
};
use uuid::Uuid;

use warden_auth_schema::{roles, user_roles, users, verification_codes};
use warden_domain::user::AuthProvider;
use warden_domain::verification::CodePurpose;

use crate::domain::repository::{RoleRepository, UserRepository, VerificationCodeRepository};
use crate::domain::types::{NewUser, Role, User, VerificationCode};
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &NewUser, role: &str) -> Result<User, AuthServiceError> {
        let user = user.clone();
        let role = role.to_owned();
        let result = self
            .db
            .transaction::<_, users::Model, DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let model = users::ActiveModel {
                        id: Set(user.id),
                        email: Set(user.email),
                        password_hash: Set(user.password_hash),
                        first_name: Set(user.first_name),
                        last_name: Set(user.last_name),
                        provider: Set(user.provider.as_str().to_owned()),
                        email_verified_at: Set(user.email_verified_at),
                        refresh_token_hash: Set(None),
                        refresh_token_expires_at: Set(None),
                        deleted_at: Set(None),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    let role_model = roles::Entity::find()
                        .filter(roles::Column::Name.eq(role.as_str()))
                        .one(txn)
                        .await?
                        .ok_or_else(|| DbErr::RecordNotFound(format!("role {role}")))?;

                    user_roles::ActiveModel {
                        user_id: Set(model.id),
                        role_id: Set(role_model.id),
                        created_at: Set(now),
                    }
                    .insert(txn)
                    .await?;

                    Ok(model)
                })
            })
            .await;

        match result {
            Ok(model) => user_from_model(model),
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(AuthServiceError::EmailTaken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash.to_owned()))
            .col_expr(users::Column::RefreshTokenHash, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::RefreshTokenExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("update user password")?;
        if result.rows_affected == 0 {
            return Err(AuthServiceError::UserNotFound);
        }
        Ok(())
    }

    async fn set_refresh_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        users::Entity::update_many()
            .col_expr(users::Column::RefreshTokenHash, Expr::value(token_hash.to_owned()))
            .col_expr(users::Column::RefreshTokenExpiresAt, Expr::value(expires_at))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("set refresh token")?;
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        current_hash: &str,
        new_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        let now = Utc::now();
        let result = users::Entity::update_many()
            .col_expr(users::Column::RefreshTokenHash, Expr::value(new_hash.to_owned()))
            .col_expr(users::Column::RefreshTokenExpiresAt, Expr::value(expires_at))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::RefreshTokenHash.eq(current_hash))
            .filter(users::Column::RefreshTokenExpiresAt.gt(now))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("rotate refresh token")?;
        Ok(result.rows_affected == 1)
    }

    async fn clear_refresh_token(&self, id: Uuid) -> Result<(), AuthServiceError> {
        users::Entity::update_many()
            .col_expr(users::Column::RefreshTokenHash, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::RefreshTokenExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("clear refresh token")?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let now = Utc::now();
        let result = users::Entity::update_many()
            .col_expr(users::Column::DeletedAt, Expr::value(now))
            .col_expr(users::Column::RefreshTokenHash, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::RefreshTokenExpiresAt,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("soft delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn user_from_model(model: users::Model) -> Result<User, AuthServiceError> {
    let provider: AuthProvider = model.provider.parse().context("parse user provider")?;
    Ok(User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        provider,
        email_verified_at: model.email_verified_at,
        refresh_token_hash: model.refresh_token_hash,
        refresh_token_expires_at: model.refresh_token_expires_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Role repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
}

impl RoleRepository for DbRoleRepository {
    async fn list(&self) -> Result<Vec<Role>, AuthServiceError> {
        let models = roles::Entity::find()
            .order_by_asc(roles::Column::Id)
            .all(&self.db)
            .await
            .context("list roles")?;
        Ok(models.into_iter().map(role_from_model).collect())
    }

    async fn names_for_user(&self, user_id: Uuid) -> Result<Vec<String>, AuthServiceError> {
        let models = roles::Entity::find()
            .join(
                sea_orm::JoinType::InnerJoin,
                roles::Relation::UserRoles.def(),
            )
            .filter(user_roles::Column::UserId.eq(user_id))
            .order_by_asc(roles::Column::Name)
            .all(&self.db)
            .await
            .context("list role names for user")?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }

    async fn replace_for_user(
        &self,
        user_id: Uuid,
        names: &[String],
    ) -> Result<(), AuthServiceError> {
        let found = roles::Entity::find()
            .filter(roles::Column::Name.is_in(names.iter().cloned()))
            .all(&self.db)
            .await
            .context("resolve role names")?;

        let unknown: Vec<&str> = names
            .iter()
            .filter(|n| !found.iter().any(|r| &r.name == *n))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(AuthServiceError::InvalidInput(format!(
                "unknown role: {}",
                unknown.join(", ")
            )));
        }

        let role_ids: Vec<i32> = found.iter().map(|r| r.id).collect();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    user_roles::Entity::delete_many()
                        .filter(user_roles::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?;
                    if role_ids.is_empty() {
                        return Ok(());
                    }
                    let now = Utc::now();
                    user_roles::Entity::insert_many(role_ids.into_iter().map(|role_id| {
                        user_roles::ActiveModel {
                            user_id: Set(user_id),
                            role_id: Set(role_id),
                            created_at: Set(now),
                        }
                    }))
                    .exec(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("replace user roles")?;
        Ok(())
    }
}

fn role_from_model(model: roles::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
        display_name: model.display_name,
        description: model.description,
    }
}

// ── Verification code repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn create_superseding(&self, code: &VerificationCode) -> Result<(), AuthServiceError> {
        let code = code.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let now = code.created_at;
                    verification_codes::Entity::update_many()
                        .col_expr(verification_codes::Column::ExpiresAt, Expr::value(now))
                        .col_expr(verification_codes::Column::UpdatedAt, Expr::value(now))
                        .filter(verification_codes::Column::Email.eq(code.email.as_str()))
                        .filter(verification_codes::Column::Purpose.eq(code.purpose.as_str()))
                        .filter(verification_codes::Column::Verified.eq(false))
                        .filter(verification_codes::Column::ExpiresAt.gt(now))
                        .exec(txn)
                        .await?;

                    verification_codes::ActiveModel {
                        id: Set(code.id),
                        first_name: Set(code.first_name),
                        last_name: Set(code.last_name),
                        email: Set(code.email),
                        code: Set(code.code),
                        purpose: Set(code.purpose.as_str().to_owned()),
                        expires_at: Set(code.expires_at),
                        verified: Set(code.verified),
                        created_at: Set(code.created_at),
                        updated_at: Set(code.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("create verification code")?;
        Ok(())
    }

    async fn find_latest(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<Option<VerificationCode>, AuthServiceError> {
        let model = verification_codes::Entity::find()
            .filter(verification_codes::Column::Email.eq(email))
            .filter(verification_codes::Column::Code.eq(code))
            .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
            .order_by_desc(verification_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find verification code")?;
        model.map(code_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationCode>, AuthServiceError> {
        let model = verification_codes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find verification code by id")?;
        model.map(code_from_model).transpose()
    }

    async fn consume(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool, AuthServiceError> {
        let result = verification_codes::Entity::update_many()
            .col_expr(verification_codes::Column::Verified, Expr::value(true))
            .col_expr(verification_codes::Column::UpdatedAt, Expr::value(now))
            .filter(verification_codes::Column::Id.eq(id))
            .filter(verification_codes::Column::Verified.eq(false))
            .filter(verification_codes::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await
            .context("consume verification code")?;
        Ok(result.rows_affected == 1)
    }
}

fn code_from_model(model: verification_codes::Model) -> Result<VerificationCode, AuthServiceError> {
    let purpose: CodePurpose = model.purpose.parse().context("parse code purpose")?;
    Ok(VerificationCode {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        code: model.code,
        purpose,
        expires_at: model.expires_at,
        verified: model.verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
