/*!
 * # Role-Based Access Control (RBAC) Module
 *
 * Every user holds exactly one role. Each action on a maintenance request is
 * reserved for a single role, with reads open to any authenticated user.
 * Admins do not inherit the requester or maintenance capabilities.
 */

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Capability carried by an authenticated user
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "requester")]
    Requester,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Operations exposed on maintenance requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Start,
    Finish,
    Update,
    Delete,
}

impl Action {
    /// Role required for the action; `None` means any authenticated role.
    pub fn required_role(self) -> Option<Role> {
        match self {
            Action::Create => Some(Role::Requester),
            Action::Start | Action::Finish | Action::Update => Some(Role::Maintenance),
            Action::Delete => Some(Role::Admin),
            Action::Read => None,
        }
    }
}

/// Returns true when `role` may perform `action`.
pub fn authorize(role: Role, action: Action) -> bool {
    match action.required_role() {
        Some(required) => required == role,
        None => true,
    }
}
