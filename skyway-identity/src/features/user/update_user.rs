use async_trait::async_trait;
use serde::Deserialize;
use skyway_core::{
    conflict_on_duplicate, take, CoreError, CoreResult, Request, RequestHandler, ValidationErrors,
    Validator,
};
use skyway_shared::Masked;
use std::sync::Arc;

use super::create_user::password_rules;
use crate::models::{Role, UserDto};
use crate::password;
use crate::repository::UserRepository;

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip)]
    pub id: Option<i64>,
    pub email: Option<String>,
    pub password: Option<Masked<String>>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub passport_number: Option<String>,
}

impl Request for UpdateUser {
    const NAME: &'static str = "identity.update_user";
    type Response = UserDto;
}

pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<UpdateUser> for UpdateUserHandler {
    fn validate(&self, request: &UpdateUser) -> Result<(), ValidationErrors> {
        let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());

        let validator = Validator::new()
            .required("id", &request.id)
            .email("email", request.email.as_deref())
            .one_of("role", request.role.as_deref(), Role::NAMES)
            .check("name", !blank(&request.name), "must not be empty")
            .check("passportNumber", !blank(&request.passport_number), "must not be empty");
        password_rules(validator, request.password.as_ref()).finish()
    }

    async fn handle(&self, request: UpdateUser) -> CoreResult<UserDto> {
        let id = take("id", request.id)?;
        let mut user = self
            .users
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("User not found"))?;

        if let Some(email) = request.email {
            if email != user.email {
                if self.users.find_user_by_email(&email).await?.is_some() {
                    return Err(CoreError::conflict("Email already taken"));
                }
                user.email = email;
                user.is_email_verified = false;
            }
        }
        if let Some(secret) = request.password {
            user.password_hash = password::hash_password(secret.expose()).map_err(CoreError::internal)?;
        }
        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(role) = request.role {
            user.role = role.parse().map_err(|e| CoreError::invalid("role", e))?;
        }
        if let Some(passport_number) = request.passport_number {
            user.passport_number = passport_number;
        }

        let user = self
            .users
            .update_user(user)
            .await
            .map_err(conflict_on_duplicate("Email already taken"))?;
        tracing::info!("Updated user {}", user.id);
        Ok(UserDto::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{create_user, Harness};

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let harness = Harness::new();
        let created = harness.mediator.send(create_user("ada@skyway.dev")).await.unwrap();

        let updated = harness
            .mediator
            .send(UpdateUser {
                id: Some(created.id),
                name: Some("Ada Byron".into()),
                role: Some("admin".into()),
                ..UpdateUser::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Ada Byron");
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.email, created.email);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_taking_another_users_email_conflicts() {
        let harness = Harness::new();
        harness.mediator.send(create_user("ada@skyway.dev")).await.unwrap();
        let other = harness.mediator.send(create_user("grace@skyway.dev")).await.unwrap();

        let err = harness
            .mediator
            .send(UpdateUser {
                id: Some(other.id),
                email: Some("ada@skyway.dev".into()),
                ..UpdateUser::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Conflict(_)));
        let stored = harness.users.find_user_by_id(other.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "grace@skyway.dev");
    }

    #[tokio::test]
    async fn test_updating_missing_user_is_not_found() {
        let harness = Harness::new();

        let err = harness
            .mediator
            .send(UpdateUser {
                id: Some(77),
                name: Some("Nobody".into()),
                ..UpdateUser::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_new_password_replaces_hash() {
        let harness = Harness::new();
        let created = harness.mediator.send(create_user("ada@skyway.dev")).await.unwrap();

        harness
            .mediator
            .send(UpdateUser {
                id: Some(created.id),
                password: Some(Masked("taxiway77".into())),
                ..UpdateUser::default()
            })
            .await
            .unwrap();

        let stored = harness.users.find_user_by_id(created.id).await.unwrap().unwrap();
        assert!(password::verify_password("taxiway77", &stored.password_hash));
        assert!(!password::verify_password("cockpit42", &stored.password_hash));
    }
}
