use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{
    conflict_on_duplicate, publish, take, CoreError, CoreResult, EventPublisher, Request,
    RequestHandler, ValidationErrors, Validator,
};
use skyway_shared::contracts::UserCreated;
use skyway_shared::Masked;
use std::sync::Arc;

use crate::models::{NewUser, Role, UserDto};
use crate::password;
use crate::repository::UserRepository;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub email: Option<String>,
    pub password: Option<Masked<String>>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub passport_number: Option<String>,
}

impl Request for CreateUser {
    const NAME: &'static str = "identity.create_user";
    type Response = UserDto;
}

/// Password rules shared by create and update.
pub(crate) fn password_rules(validator: Validator, candidate: Option<&Masked<String>>) -> Validator {
    let (long_enough, strong) = match candidate {
        Some(p) => (
            p.expose().chars().count() >= MIN_PASSWORD_LEN,
            password::is_strong(p.expose()),
        ),
        None => (true, true),
    };
    validator
        .check(
            "password",
            long_enough,
            &format!("must be at least {MIN_PASSWORD_LEN} characters"),
        )
        .check("password", strong, "must contain at least 1 letter and 1 number")
}

pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { users, publisher }
    }
}

#[async_trait]
impl RequestHandler<CreateUser> for CreateUserHandler {
    fn validate(&self, request: &CreateUser) -> Result<(), ValidationErrors> {
        let validator = Validator::new()
            .required("email", &request.email)
            .email("email", request.email.as_deref())
            .required("password", &request.password);

        password_rules(validator, request.password.as_ref())
            .required("name", &request.name)
            .required("role", &request.role)
            .one_of("role", request.role.as_deref(), Role::NAMES)
            .required("passportNumber", &request.passport_number)
            .finish()
    }

    async fn handle(&self, request: CreateUser) -> CoreResult<UserDto> {
        let email = take("email", request.email)?;
        let role = take("role", request.role)?
            .parse::<Role>()
            .map_err(|e| CoreError::invalid("role", e))?;
        let secret = take("password", request.password)?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(CoreError::conflict("Email already taken"));
        }
        let password_hash = password::hash_password(secret.expose()).map_err(CoreError::internal)?;

        let user = self
            .users
            .create_user(NewUser {
                email,
                name: take("name", request.name)?,
                password_hash,
                role,
                passport_number: take("passportNumber", request.passport_number)?,
            })
            .await
            .map_err(conflict_on_duplicate("Email already taken"))?;
        tracing::info!("Created user {}", user.id);

        publish(
            self.publisher.as_ref(),
            &UserCreated {
                id: user.id,
                name: user.name.clone(),
                passport_number: user.passport_number.clone(),
            },
        )
        .await?;

        Ok(UserDto::from(user))
    }
}
