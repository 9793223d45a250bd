//! Request handler contract.

use std::future::Future;

use async_trait::async_trait;
use phttp_proto::{Request, Response};

/// Handles one decoded [`Request`] and produces a [`Response`].
///
/// Implementations never see a correlation id or the wire — those belong
/// to [`crate::ServerEndpoint`]. A handler that panics or whose future
/// resolves via an error path of its own design is indistinguishable to
/// the endpoint from one that simply never gets invoked successfully: in
/// both cases the endpoint synthesizes a `500` response on the caller's
/// behalf, so `Handler::handle` itself is infallible.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Produce the response for `request`.
    async fn handle(&self, request: Request) -> Response;
}

/// Adapts a plain async closure into a [`Handler`].
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send,
{
    async fn handle(&self, request: Request) -> Response {
        (self.0)(request).await
    }
}
