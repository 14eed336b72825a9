// src/services/user_service.rs

use bcrypt::hash;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FranchiseRepository, UserRepository},
    models::{
        auth::User,
        franchise::UserFranchise,
        rbac::Role,
    },
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    franchise_repo: FranchiseRepository,
}

impl UserService {
    pub fn new(repo: UserRepository, franchise_repo: FranchiseRepository) -> Self {
        Self { repo, franchise_repo }
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_users(executor).await
    }

    /// Criação por um gestor. Só superadmin concede superadmin.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        acting: &User,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !acting.role.can_assign(role) {
            return Err(AppError::Forbidden(format!("atribuir o papel '{}'", role.as_str())));
        }

        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.repo
            .create_user(executor, name, email, &hashed_password, role)
            .await
    }

    /// Atualiza nome e/ou papel. O e-mail é imutável por design: não há
    /// caminho de atualização para ele.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        role: Option<Role>,
        acting: &User,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if let Some(role) = role {
            if !acting.role.can_assign(role) {
                return Err(AppError::Forbidden(format!(
                    "atribuir o papel '{}'",
                    role.as_str()
                )));
            }
        }

        self.repo.update_user(executor, id, name, role).await
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete_user(executor, id).await
    }

    /// Vincula o usuário a uma franquia, gravando também a cópia
    /// denormalizada do nome de exibição.
    pub async fn assign_franchise<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        franchise_id: Uuid,
    ) -> Result<UserFranchise, AppError>
    where
        E: Executor<'e, Database = Postgres> + Copy,
    {
        self.repo
            .find_by_id(executor, user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let franchise = self
            .franchise_repo
            .find_by_id(executor, franchise_id)
            .await?
            .ok_or(AppError::FranchiseNotFound)?;

        self.repo
            .assign_franchise(executor, user_id, franchise_id, &franchise.display_name)
            .await
    }

    pub async fn unassign_franchise<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        franchise_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let removed = self
            .repo
            .unassign_franchise(executor, user_id, franchise_id)
            .await?;

        if removed == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    pub async fn list_bindings<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<UserFranchise>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_bindings_for_user(executor, user_id).await
    }
}
