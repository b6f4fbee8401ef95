/// A typed command or query routed through the [`Mediator`](crate::Mediator).
///
/// `NAME` is the routing key. It must be unique across every request type
/// registered in one process and must not change between releases, so it is
/// declared explicitly rather than derived from the Rust type path.
pub trait Request: Send + Sync + 'static {
    const NAME: &'static str;

    /// The value a successful handler produces for this request.
    type Response: Send + 'static;
}
