//! Middleware layer.
//!
//! Middleware intercepts requests before the leaf handler runs and is the
//! right place for cross-cutting concerns. janus ships the two stages of its
//! request-scoped identity pipeline:
//!
//! - [`Identify`] — derives a raw caller identifier from the peer address
//!   and stores it in the request scope. Best-effort: a remote address it
//!   cannot parse leaves the request untouched.
//! - [`Authenticate`] — runs a caller-supplied [`IdentityResolver`] and then
//!   a [`ProfileResolver`], stores the resulting
//!   [`Principal`](crate::Principal) in the request scope, and delegates to
//!   the wrapped handler. A resolver error aborts the request before the
//!   handler runs.
//!
//! Downstream handlers read the enriched scope through
//! [`Request::identifier`](crate::Request::identifier) and
//! [`Request::authentication`](crate::Request::authentication) — the stages
//! never write a response and never decide allow/deny.
//!
//! # Composition
//!
//! Stages wrap handlers leaf-first. The usual way is the router facility:
//!
//! ```rust,no_run
//! use janus::middleware::{Authenticate, Identify};
//! use janus::{BoxError, Principal, Request, Response, Router};
//!
//! # fn resolvers() -> (impl janus::middleware::IdentityResolver,
//! #                    impl janus::middleware::ProfileResolver) {
//! #     (|req: &Request| -> Result<Option<String>, BoxError> {
//! #          Ok(req.identifier().ok().map(str::to_owned))
//! #      },
//! #      |_: &Request, _: Option<&str>| -> Result<Principal, BoxError> {
//! #          Ok(Principal::denied("unknown"))
//! #      })
//! # }
//! # async fn me(_req: Request) -> Response { Response::text("") }
//! let (identity, profile) = resolvers();
//! let app = Router::new()
//!     .layer(Identify)
//!     .layer(Authenticate::new(identity, profile))
//!     .get("/me", me);
//! ```
//!
//! `layer` calls apply to routes registered *after* them, outermost first:
//! above, a request flows `Identify` → `Authenticate` → `me`.
//!
//! [`Middleware::wrap`] is public, so chains can also be built by hand when
//! a handler is composed outside a router.

mod authenticate;
mod identify;

pub use authenticate::{Authenticate, IdentityResolver, ProfileResolver};
pub use identify::Identify;

use crate::handler::BoxedHandler;

/// A handler-wrapping stage.
///
/// `wrap` takes the next handler in the chain and returns a handler with the
/// identical erased signature, so stages compose with each other and with
/// leaf handlers freely. Implementations must not write a response on the
/// request path — they enrich the request or fail it.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}
