// src/services/franchise_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FranchiseRepository,
    models::{
        auth::User,
        franchise::{Franchise, RenameCascadeReport},
        rbac::Role,
    },
};

/// Resultado de uma atualização de franquia. O relatório da cascata só
/// existe quando o nome de exibição mudou.
#[derive(Debug)]
pub struct FranchiseUpdate {
    pub franchise: Franchise,
    pub rename_cascade: Option<RenameCascadeReport>,
}

#[derive(Clone)]
pub struct FranchiseService {
    repo: FranchiseRepository,
}

impl FranchiseService {
    pub fn new(repo: FranchiseRepository) -> Self {
        Self { repo }
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
        if let Some(slug) = slug {
            validate_slug(slug)?;
        }

        self.repo
            .create(executor, internal_name, display_name, slug, webhook_url, message_webhook_url)
            .await
    }

    pub async fn list_active<'e, E>(&self, executor: E) -> Result<Vec<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_active(executor).await
    }

    /// Superadmin enxerga todas as franquias; os demais, só as vinculadas.
    pub async fn list_for_user<'e, E>(
        &self,
        executor: E,
        user: &User,
    ) -> Result<Vec<Franchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        match user.role {
            Role::Superadmin => self.repo.list_all(executor).await,
            _ => self.repo.list_for_user(executor, user.id).await,
        }
    }

    /// Resolução da página pública: slug, depois nome de exibição, depois
    /// nome interno, case-insensitive.
    pub async fn resolve<'e, E>(&self, executor: E, term: &str) -> Result<Franchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .resolve(executor, term)
            .await?
            .ok_or(AppError::FranchiseNotFound)
    }

    pub async fn get<'e, E>(&self, executor: E, id: Uuid) -> Result<Franchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::FranchiseNotFound)
    }

    /// Atualiza o perfil da franquia. Se o nome de exibição mudar, a cascata
    /// de renome roda NA MESMA transação: ou as reservas e os vínculos são
    /// reescritos junto, ou nada é.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        display_name: Option<&str>,
        slug: Option<&str>,
        webhook_url: Option<&str>,
        message_webhook_url: Option<&str>,
    ) -> Result<FranchiseUpdate, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if let Some(slug) = slug {
            validate_slug_patch(slug)?;
        }

        let mut tx = executor.begin().await?;

        let current = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::FranchiseNotFound)?;

        let franchise = self
            .repo
            .update_profile(&mut *tx, id, display_name, slug, webhook_url, message_webhook_url)
            .await?;

        // Cascata de renome: o nome denormalizado nas outras tabelas precisa
        // acompanhar o novo display_name. No-op quando nada casa.
        let rename_cascade = match display_name {
            Some(new_name) if new_name != current.display_name => {
                let reservations_updated = self
                    .repo
                    .rename_in_reservations(&mut *tx, &current.display_name, new_name)
                    .await?;
                let user_franchises_updated = self
                    .repo
                    .rename_in_user_franchises(&mut *tx, &current.display_name, new_name)
                    .await?;

                tracing::info!(
                    "Cascata de renome '{}' -> '{}': {} reservas, {} vínculos.",
                    current.display_name,
                    new_name,
                    reservations_updated,
                    user_franchises_updated,
                );

                Some(RenameCascadeReport {
                    reservations_updated,
                    user_franchises_updated,
                })
            }
            _ => None,
        };

        tx.commit().await?;

        Ok(FranchiseUpdate { franchise, rename_cascade })
    }

    /// Liga/desliga a franquia (só superadmin chega aqui).
    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        active: bool,
    ) -> Result<Franchise, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.set_active(executor, id, active).await
    }
}

/// Num PATCH, string vazia significa "limpar o slug"; qualquer outro valor
/// precisa ter forma de slug.
fn validate_slug_patch(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() {
        return Ok(());
    }
    validate_slug(slug)
}

/// Slug de URL: minúsculas, dígitos e hífen, começando por alfanumérico.
fn validate_slug(slug: &str) -> Result<(), AppError> {
    let valid = !slug.is_empty()
        && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-');

    if valid {
        Ok(())
    } else {
        let mut errors = validator::ValidationErrors::new();
        let mut error = validator::ValidationError::new("invalid_slug");
        error.message = Some("O slug deve conter apenas minúsculas, dígitos e hífens.".into());
        errors.add("slug".into(), error);
        Err(AppError::ValidationError(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_slug, validate_slug_patch};

    #[test]
    fn slugs_validos() {
        for slug in ["central", "central-sp", "unidade-2"] {
            assert!(validate_slug(slug).is_ok(), "{} deveria ser válido", slug);
        }
    }

    #[test]
    fn slugs_invalidos() {
        for slug in ["", "Central", "central sp", "central_sp", "-central", "central-", "centrál"] {
            assert!(validate_slug(slug).is_err(), "{} deveria ser inválido", slug);
        }
    }

    #[test]
    fn patch_aceita_string_vazia_como_limpeza() {
        assert!(validate_slug_patch("").is_ok());
        assert!(validate_slug_patch("central").is_ok());
        assert!(validate_slug_patch("Central").is_err());
    }
}
