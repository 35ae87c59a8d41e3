use warden_auth_types::identity::Principal;
use warden_auth_types::token::SessionTokens;

use crate::domain::repository::{RoleRepository, UserRepository};
use crate::error::AuthServiceError;

/// The only route that accepts a refresh token as its bearer credential.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Token validation and subject resolution run by the `authenticate` middleware.
pub struct AuthenticateUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub users: U,
    pub roles: R,
    pub tokens: SessionTokens,
}

impl<U, R> AuthenticateUseCase<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub async fn execute(
        &self,
        bearer: Option<&str>,
        path: &str,
    ) -> Result<Principal, AuthServiceError> {
        let claims = self.tokens.parse_and_validate(bearer)?;

        if claims.refresh && path != REFRESH_PATH {
            return Err(AuthServiceError::RefreshTokenNotAllowed);
        }

        let user_id = claims.user_id()?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UnknownSubject)?;

        let roles = self.roles.names_for_user(user.id).await?;

        Ok(Principal {
            user_id: user.id,
            email: user.email,
            roles,
            refresh: claims.refresh,
        })
    }
}
