// src/db/franchise_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::franchise::Franchise};

const FRANCHISE_COLUMNS: &str = "id, internal_name, display_name, slug, active, \
     webhook_url, message_webhook_url, created_at, updated_at";

#[derive(Clone, Default)]
pub struct FranchiseRepository;

impl FranchiseRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        internal_name: &str,
        display_name: &str,
        slug: Option<&str>,
        webhook_url: Option<&str>,
        message_webhook_url: Option<&str>,
    ) -> Result<Franchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>(&format!(
            r#"
            INSERT INTO franchises (internal_name, display_name, slug, webhook_url, message_webhook_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {FRANCHISE_COLUMNS}
            "#,
        ))
        .bind(internal_name)
        .bind(display_name)
        .bind(slug)
        .bind(webhook_url)
        .bind(message_webhook_url)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "Já existe uma franquia com o nome interno '{}' ou este slug.",
                        internal_name
                    ));
                }
            }
            e.into()
        })?;

        Ok(franchise)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>(&format!(
            "SELECT {FRANCHISE_COLUMNS} FROM franchises WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(franchise)
    }

    /// Resolve a página pública /reserva/{termo}: tenta slug, depois nome de
    /// exibição, depois nome interno, tudo case-insensitive.
    pub async fn resolve<'e, E>(
        &self,
        executor: E,
        term: &str,
    ) -> Result<Option<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>(&format!(
            r#"
            SELECT {FRANCHISE_COLUMNS}
            FROM franchises
            WHERE lower(slug) = lower($1)
               OR lower(display_name) = lower($1)
               OR lower(internal_name) = lower($1)
            ORDER BY CASE
                WHEN lower(slug) = lower($1) THEN 0
                WHEN lower(display_name) = lower($1) THEN 1
                ELSE 2
            END
            LIMIT 1
            "#,
        ))
        .bind(term)
        .fetch_optional(executor)
        .await?;

        Ok(franchise)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchises = sqlx::query_as::<_, Franchise>(&format!(
            "SELECT {FRANCHISE_COLUMNS} FROM franchises ORDER BY display_name ASC",
        ))
        .fetch_all(executor)
        .await?;

        Ok(franchises)
    }

    pub async fn list_active<'e, E>(&self, executor: E) -> Result<Vec<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchises = sqlx::query_as::<_, Franchise>(&format!(
            "SELECT {FRANCHISE_COLUMNS} FROM franchises WHERE active = TRUE ORDER BY display_name ASC",
        ))
        .fetch_all(executor)
        .await?;

        Ok(franchises)
    }

    /// Franquias ativas vinculadas ao usuário via user_franchises.
    pub async fn list_for_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchises = sqlx::query_as::<_, Franchise>(
            r#"
            SELECT f.id, f.internal_name, f.display_name, f.slug, f.active,
                   f.webhook_url, f.message_webhook_url, f.created_at, f.updated_at
            FROM franchises f
            INNER JOIN user_franchises uf ON uf.franchise_id = f.id
            WHERE uf.user_id = $1 AND f.active = TRUE
            ORDER BY f.display_name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(franchises)
    }

    /// Atualização parcial do perfil. `internal_name` fica de fora: é imutável.
    ///
    /// `None` mantém o valor atual; string vazia limpa o campo (volta a NULL)
    /// para slug e webhooks.
    pub async fn update_profile<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        display_name: Option<&str>,
        slug: Option<&str>,
        webhook_url: Option<&str>,
        message_webhook_url: Option<&str>,
    ) -> Result<Franchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>(&format!(
            r#"
            UPDATE franchises
            SET display_name = COALESCE($2, display_name),
                slug = NULLIF(COALESCE($3, slug), ''),
                webhook_url = NULLIF(COALESCE($4, webhook_url), ''),
                message_webhook_url = NULLIF(COALESCE($5, message_webhook_url), ''),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FRANCHISE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(display_name)
        .bind(slug)
        .bind(webhook_url)
        .bind(message_webhook_url)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(
                        "Este slug já pertence a outra franquia.".to_string(),
                    );
                }
            }
            AppError::from(e)
        })?
        .ok_or(AppError::FranchiseNotFound)?;

        Ok(franchise)
    }

    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        active: bool,
    ) -> Result<Franchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let franchise = sqlx::query_as::<_, Franchise>(&format!(
            r#"
            UPDATE franchises
            SET active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {FRANCHISE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::FranchiseNotFound)?;

        Ok(franchise)
    }

    // =========================================================================
    //  CASCATA DE RENOME (nome denormalizado nas outras tabelas)
    // =========================================================================

    /// Reescreve o nome denormalizado nas reservas. Retorna linhas afetadas.
    pub async fn rename_in_reservations<'e, E>(
        &self,
        executor: E,
        old_name: &str,
        new_name: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE reservations SET franchise_name = $2, updated_at = NOW() WHERE franchise_name = $1",
        )
        .bind(old_name)
        .bind(new_name)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Reescreve o nome denormalizado nos vínculos usuário-franquia.
    pub async fn rename_in_user_franchises<'e, E>(
        &self,
        executor: E,
        old_name: &str,
        new_name: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE user_franchises SET franchise_name = $2 WHERE franchise_name = $1",
        )
        .bind(old_name)
        .bind(new_name)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
