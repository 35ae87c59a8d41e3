use uuid::Uuid;

use crate::domain::repository::{RoleRepository, UserRepository};
use crate::domain::types::Role;
use crate::error::AuthServiceError;

pub struct ListRolesUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> ListRolesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Role>, AuthServiceError> {
        self.roles.list().await
    }
}

pub struct AssignRolesInput {
    pub actor_id: Uuid,
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

pub struct AssignRolesUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub users: U,
    pub roles: R,
}

impl<U, R> AssignRolesUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub async fn execute(&self, input: AssignRolesInput) -> Result<Vec<String>, AuthServiceError> {
        let mut names: Vec<String> = input
            .roles
            .iter()
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty())
            .collect();
        names.sort();
        names.dedup();
        if names.is_empty() {
            return Err(AuthServiceError::InvalidInput(
                "roles must not be empty".to_owned(),
            ));
        }

        if self.users.find_by_id(input.user_id).await?.is_none() {
            return Err(AuthServiceError::UserNotFound);
        }

        self.roles.replace_for_user(input.user_id, &names).await?;
        tracing::info!(
            actor_id = %input.actor_id,
            user_id = %input.user_id,
            roles = ?names,
            "user roles replaced"
        );
        Ok(names)
    }
}
