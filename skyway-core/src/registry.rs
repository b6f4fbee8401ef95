use std::any::Any;
use std::collections::HashMap;

use async_trait::async_trait;

use crate::{handler::RequestHandler, request::Request, validation::ValidationErrors, CoreResult};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("A handler is already registered for request type: {0}")]
    DuplicateRegistration(&'static str),
}

type ErasedHandler = Box<dyn Any + Send + Sync>;

/// Mapping from request name to the one handler that serves it.
///
/// Entries are only ever added while the process is being wired; once the
/// registry is sealed inside a [`Mediator`](crate::Mediator) it is read-only.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, ErasedHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` as the single handler for `R`.
    ///
    /// The stored handler runs `validate` before `handle` on every invocation.
    pub fn register<R, H>(&mut self, handler: H) -> Result<(), RegistryError>
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        if self.handlers.contains_key(R::NAME) {
            return Err(RegistryError::DuplicateRegistration(R::NAME));
        }

        let gated: Box<dyn RequestHandler<R>> = Box::new(Gated { inner: handler });
        self.handlers.insert(R::NAME, Box::new(gated));
        Ok(())
    }

    /// Look up the handler for `R`.
    ///
    /// A name registered by a different Rust type is treated as absent.
    pub fn resolve<R: Request>(&self) -> Option<&dyn RequestHandler<R>> {
        self.handlers
            .get(R::NAME)?
            .downcast_ref::<Box<dyn RequestHandler<R>>>()
            .map(|handler| handler.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered request names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Runs the handler's constraint set ahead of its business logic.
struct Gated<H> {
    inner: H,
}

#[async_trait]
impl<R, H> RequestHandler<R> for Gated<H>
where
    R: Request,
    H: RequestHandler<R> + 'static,
{
    fn validate(&self, request: &R) -> Result<(), ValidationErrors> {
        self.inner.validate(request)
    }

    async fn handle(&self, request: R) -> CoreResult<R::Response> {
        self.inner.validate(&request)?;
        self.inner.handle(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    impl Request for Ping {
        const NAME: &'static str = "test.ping";
        type Response = &'static str;
    }

    // Same routing key as `Ping`, different type.
    struct Impostor;
    impl Request for Impostor {
        const NAME: &'static str = "test.ping";
        type Response = &'static str;
    }

    struct Reply(&'static str);

    #[async_trait]
    impl RequestHandler<Ping> for Reply {
        async fn handle(&self, _request: Ping) -> CoreResult<&'static str> {
            Ok(self.0)
        }
    }

    #[async_trait]
    impl RequestHandler<Impostor> for Reply {
        async fn handle(&self, _request: Impostor) -> CoreResult<&'static str> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register::<Ping, _>(Reply("first")).unwrap();

        let err = registry.register::<Ping, _>(Reply("second")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateRegistration("test.ping"));
        assert_eq!(registry.len(), 1);

        let handler = registry.resolve::<Ping>().expect("handler registered");
        assert_eq!(handler.handle(Ping).await.unwrap(), "first");
    }

    #[test]
    fn test_name_collision_across_types_is_rejected() {
        let mut registry = HandlerRegistry::new();
        registry.register::<Ping, _>(Reply("ping")).unwrap();

        let err = registry.register::<Impostor, _>(Reply("impostor")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateRegistration("test.ping"));
        assert!(registry.resolve::<Impostor>().is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        struct Other;
        impl Request for Other {
            const NAME: &'static str = "test.aaa";
            type Response = &'static str;
        }
        #[async_trait]
        impl RequestHandler<Other> for Reply {
            async fn handle(&self, _request: Other) -> CoreResult<&'static str> {
                Ok(self.0)
            }
        }

        let mut registry = HandlerRegistry::new();
        registry.register::<Ping, _>(Reply("ping")).unwrap();
        registry.register::<Other, _>(Reply("other")).unwrap();
        assert_eq!(registry.names(), vec!["test.aaa", "test.ping"]);
        assert!(registry.contains("test.ping"));
    }
}
