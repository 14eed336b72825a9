// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    Editor,
    Viewer,
}

/// As capacidades que o portal conhece. Uma por ação gateável.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    ManageUsers,
    CreateReservations,
    UpdateReservations,
    DeleteReservations,
    ViewReservations,
    SendMessages,
    ManageFranchises,
    CreateFranchises,
}

impl Capability {
    pub fn slug(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "users:manage",
            Capability::CreateReservations => "reservations:create",
            Capability::UpdateReservations => "reservations:update",
            Capability::DeleteReservations => "reservations:delete",
            Capability::ViewReservations => "reservations:view",
            Capability::SendMessages => "messages:send",
            Capability::ManageFranchises => "franchises:manage",
            Capability::CreateFranchises => "franchises:create",
        }
    }
}

impl Role {
    /// A tabela papel -> capacidade inteira, num único lookup puro.
    /// Todos os call sites passam por aqui; nada de booleans espalhados.
    pub fn allows(&self, capability: Capability) -> bool {
        use Capability::*;

        match self {
            Role::Superadmin => true,
            Role::Admin => matches!(
                capability,
                CreateReservations
                    | UpdateReservations
                    | DeleteReservations
                    | ViewReservations
                    | SendMessages
                    | ManageFranchises
            ),
            // Editor é somente-leitura de reservas.
            Role::Editor | Role::Viewer => matches!(capability, ViewReservations),
        }
    }

    /// Quais papéis este papel pode atribuir a outros usuários.
    /// Só superadmin concede superadmin; admin concede papéis menores.
    pub fn can_assign(&self, target: Role) -> bool {
        match self {
            Role::Superadmin => true,
            Role::Admin => target != Role::Superadmin,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Capability::*;

    const ALL: [Capability; 8] = [
        ManageUsers,
        CreateReservations,
        UpdateReservations,
        DeleteReservations,
        ViewReservations,
        SendMessages,
        ManageFranchises,
        CreateFranchises,
    ];

    #[test]
    fn superadmin_tem_todas_as_capacidades() {
        for cap in ALL {
            assert!(Role::Superadmin.allows(cap), "superadmin deveria ter {:?}", cap);
        }
    }

    #[test]
    fn admin_nao_gerencia_usuarios_nem_cria_franquias() {
        assert!(!Role::Admin.allows(ManageUsers));
        assert!(!Role::Admin.allows(CreateFranchises));
        assert!(Role::Admin.allows(CreateReservations));
        assert!(Role::Admin.allows(ManageFranchises));
        assert!(Role::Admin.allows(SendMessages));
    }

    #[test]
    fn viewer_nunca_escreve() {
        for cap in [CreateReservations, UpdateReservations, DeleteReservations, SendMessages] {
            assert!(!Role::Viewer.allows(cap), "viewer não deveria ter {:?}", cap);
        }
        assert!(Role::Viewer.allows(ViewReservations));
    }

    #[test]
    fn editor_e_somente_leitura() {
        for cap in ALL {
            let expected = cap == ViewReservations;
            assert_eq!(Role::Editor.allows(cap), expected, "editor x {:?}", cap);
        }
    }

    #[test]
    fn atribuicao_de_papeis() {
        assert!(Role::Superadmin.can_assign(Role::Superadmin));
        assert!(Role::Admin.can_assign(Role::Editor));
        assert!(!Role::Admin.can_assign(Role::Superadmin));
        assert!(!Role::Editor.can_assign(Role::Viewer));
        assert!(!Role::Viewer.can_assign(Role::Viewer));
    }
}
