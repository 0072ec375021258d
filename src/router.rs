//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Middleware layers are
//! resolved once, at registration time — the hot path sees a single
//! pre-composed handler per route.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::middleware::Middleware;

/// The application router.
///
/// One radix tree per HTTP method — O(path-length) lookup, no allocations on
/// the hot path. Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration call returns `self` so the whole app chains naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    stack: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), stack: Vec::new() }
    }

    /// Pushes a middleware layer onto the stack.
    ///
    /// Layers apply to routes registered **after** this call, in layering
    /// order — the first layer is outermost. Routes registered before the
    /// call are untouched, which is how public routes skip an authenticator:
    ///
    /// ```rust,no_run
    /// # use janus::middleware::Identify;
    /// # use janus::{Request, Response, Router};
    /// # async fn login(_: Request) -> Response { Response::text("") }
    /// # async fn me(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .post("/login", login)      // no layers
    ///     .layer(Identify)
    ///     .get("/me", me);            // Identify → me
    /// ```
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.stack.push(Arc::new(middleware));
        self
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler.into_boxed_handler())
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    fn add(mut self, method: Method, path: &str, handler: BoxedHandler) -> Self {
        // Compose leaf-first: the last pushed layer wraps the handler
        // directly, the first pushed layer ends up outermost.
        let handler = self
            .stack
            .iter()
            .rev()
            .fold(handler, |inner, layer| layer.wrap(inner));
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}
