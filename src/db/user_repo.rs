// src/db/user_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        franchise::UserFranchise,
        rbac::Role,
    },
};

/// Queries de usuários e vínculos. Sem estado: o executor (pool, conexão ou
/// transação) vem de quem chama.
#[derive(Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    pub fn new() -> Self {
        Self
    }

    /// Cria um usuário. E-mail duplicado vira erro de domínio, não 500.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    pub async fn find_by_email<'e, E>(
        &self,
        executor: E,
        email: &str,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    pub async fn list_users<'e, E>(&self, executor: E) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(users)
    }

    /// Atualiza nome e/ou papel. O e-mail fica de fora de propósito.
    pub async fn update_user<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                role = COALESCE($3, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(role)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::UserNotFound)?;

        Ok(user)
    }

    pub async fn delete_user<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  VÍNCULOS USUÁRIO <-> FRANQUIA
    // =========================================================================

    pub async fn assign_franchise<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        franchise_id: Uuid,
        franchise_name: &str,
    ) -> Result<UserFranchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let binding = sqlx::query_as::<_, UserFranchise>(
            r#"
            INSERT INTO user_franchises (user_id, franchise_id, franchise_name)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, franchise_id, franchise_name
            "#,
        )
        .bind(user_id)
        .bind(franchise_id)
        .bind(franchise_name)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "O usuário já está vinculado a esta franquia.".to_string(),
                    );
                }
            }
            e.into()
        })?;

        Ok(binding)
    }

    pub async fn unassign_franchise<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        franchise_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM user_franchises WHERE user_id = $1 AND franchise_id = $2",
        )
        .bind(user_id)
        .bind(franchise_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_bindings_for_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<UserFranchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let bindings = sqlx::query_as::<_, UserFranchise>(
            r#"
            SELECT id, user_id, franchise_id, franchise_name
            FROM user_franchises
            WHERE user_id = $1
            ORDER BY franchise_name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(bindings)
    }
}
