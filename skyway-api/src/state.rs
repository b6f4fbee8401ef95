use skyway_core::Mediator;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub mediator: Mediator,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(mediator: Mediator, secret: impl Into<String>) -> Self {
        Self {
            mediator,
            auth: AuthConfig {
                secret: secret.into(),
            },
        }
    }
}
