pub mod features;
pub mod models;
pub mod password;
pub mod repository;

use skyway_core::{EventPublisher, MediatorBuilder, RegistryError};
use std::sync::Arc;

pub use features::{
    CreateUser, DeleteUserById, GenerateToken, GetUserById, GetUsers, Login, Logout, RefreshToken,
    TokenSettings, UpdateUser, ValidateToken,
};
pub use models::{AuthDto, AuthTokenDto, Role, Token, User, UserDto};
pub use repository::{AuthRepository, InMemoryAuthRepository, InMemoryUserRepository, UserRepository};

/// Collaborators the identity handlers are built from.
#[derive(Clone)]
pub struct IdentityDependencies {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn AuthRepository>,
    pub publisher: Arc<dyn EventPublisher>,
    pub settings: TokenSettings,
}

/// Register every user and auth request handler.
///
/// `Login` and `RefreshToken` orchestrate other identity requests, so they
/// receive a handle from the builder that starts routing once it is built.
pub fn register_handlers(
    builder: &mut MediatorBuilder,
    deps: &IdentityDependencies,
) -> Result<(), RegistryError> {
    let mediator = builder.mediator();

    builder
        .register::<CreateUser, _>(features::CreateUserHandler::new(
            deps.users.clone(),
            deps.publisher.clone(),
        ))?
        .register::<GetUserById, _>(features::GetUserByIdHandler::new(deps.users.clone()))?
        .register::<GetUsers, _>(features::GetUsersHandler::new(deps.users.clone()))?
        .register::<UpdateUser, _>(features::UpdateUserHandler::new(deps.users.clone()))?
        .register::<DeleteUserById, _>(features::DeleteUserByIdHandler::new(
            deps.users.clone(),
            deps.tokens.clone(),
        ))?;

    builder
        .register::<GenerateToken, _>(features::GenerateTokenHandler::new(
            deps.users.clone(),
            deps.tokens.clone(),
            deps.settings.clone(),
        ))?
        .register::<ValidateToken, _>(features::ValidateTokenHandler::new(
            deps.tokens.clone(),
            deps.settings.clone(),
        ))?
        .register::<Login, _>(features::LoginHandler::new(deps.users.clone(), mediator.clone()))?
        .register::<Logout, _>(features::LogoutHandler::new(deps.tokens.clone()))?
        .register::<RefreshToken, _>(features::RefreshTokenHandler::new(
            deps.tokens.clone(),
            mediator,
        ))?;
    Ok(())
}
