use std::sync::{Arc, OnceLock};

use crate::{
    handler::RequestHandler,
    registry::{HandlerRegistry, RegistryError},
    request::Request,
    CoreError, CoreResult,
};

/// Wiring-time owner of the handler registry.
///
/// Handlers are registered here during process bootstrap. Orchestrating
/// handlers that dispatch nested requests take a [`Mediator`] handle from
/// [`MediatorBuilder::mediator`] before the registry is sealed; the handle
/// starts routing once [`MediatorBuilder::build`] has run.
pub struct MediatorBuilder {
    registry: HandlerRegistry,
    sealed: Arc<OnceLock<HandlerRegistry>>,
}

impl MediatorBuilder {
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            sealed: Arc::new(OnceLock::new()),
        }
    }

    pub fn register<R, H>(&mut self, handler: H) -> Result<&mut Self, RegistryError>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        self.registry.register::<R, H>(handler)?;
        tracing::debug!("Registered handler for {}", R::NAME);
        Ok(self)
    }

    /// A handle that shares this builder's registry once it is sealed.
    pub fn mediator(&self) -> Mediator {
        Mediator {
            registry: self.sealed.clone(),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Seal the registry and return the process-wide dispatcher.
    pub fn build(self) -> Mediator {
        let count = self.registry.len();
        if self.sealed.set(self.registry).is_err() {
            tracing::error!("Mediator registry was sealed twice; keeping the first");
        }
        tracing::info!("Mediator ready with {} request handlers", count);
        Mediator {
            registry: self.sealed,
        }
    }
}

impl Default for MediatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes a request to the single handler registered for its type.
///
/// Cloning is cheap; every clone shares the same sealed registry. `send` is
/// reentrant, so handlers may dispatch nested requests through their own
/// handle.
#[derive(Clone)]
pub struct Mediator {
    registry: Arc<OnceLock<HandlerRegistry>>,
}

impl Mediator {
    pub async fn send<R: Request>(&self, request: R) -> CoreResult<R::Response> {
        let handler = self
            .registry
            .get()
            .and_then(|registry| registry.resolve::<R>())
            .ok_or_else(|| {
                tracing::error!("No handler registered for request type: {}", R::NAME);
                CoreError::UnroutedRequest(R::NAME)
            })?;

        tracing::debug!("Dispatching {}", R::NAME);
        handler.handle(request).await
    }

    /// Whether a handler for `name` is reachable through this handle.
    pub fn is_registered(&self, name: &str) -> bool {
        self.registry
            .get()
            .is_some_and(|registry| registry.contains(name))
    }
}
