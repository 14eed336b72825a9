// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::rbac::Capability,
};

/// 1. O Trait que liga um tipo à capacidade que ele exige
pub trait CapabilityDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

/// 2. O Extractor (Guardião)
///
/// A checagem é o lookup puro `Role::allows`; nunca entra em pânico — sem a
/// capacidade, o handler responde 403.
pub struct RequireCapability<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o usuário que o auth_guard injetou
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        // B. Lookup puro papel -> capacidade
        let required = T::capability();
        if !user.0.role.allows(required) {
            return Err(AppError::Forbidden(required.slug().to_string()));
        }

        Ok(RequireCapability(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

pub struct CanManageUsers;
impl CapabilityDef for CanManageUsers {
    fn capability() -> Capability {
        Capability::ManageUsers
    }
}

pub struct CanCreateReservations;
impl CapabilityDef for CanCreateReservations {
    fn capability() -> Capability {
        Capability::CreateReservations
    }
}

pub struct CanUpdateReservations;
impl CapabilityDef for CanUpdateReservations {
    fn capability() -> Capability {
        Capability::UpdateReservations
    }
}

pub struct CanDeleteReservations;
impl CapabilityDef for CanDeleteReservations {
    fn capability() -> Capability {
        Capability::DeleteReservations
    }
}

pub struct CanViewReservations;
impl CapabilityDef for CanViewReservations {
    fn capability() -> Capability {
        Capability::ViewReservations
    }
}

pub struct CanSendMessages;
impl CapabilityDef for CanSendMessages {
    fn capability() -> Capability {
        Capability::SendMessages
    }
}

pub struct CanManageFranchises;
impl CapabilityDef for CanManageFranchises {
    fn capability() -> Capability {
        Capability::ManageFranchises
    }
}

pub struct CanCreateFranchises;
impl CapabilityDef for CanCreateFranchises {
    fn capability() -> Capability {
        Capability::CreateFranchises
    }
}
