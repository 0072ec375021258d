//! Authenticator stage: pluggable identity and profile resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{BoxError, Error};
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::Middleware;
use crate::principal::Principal;
use crate::request::Request;

/// Resolves a raw caller identifier from an inbound request.
///
/// External collaborator: may perform I/O, is invoked exactly once per
/// request, and must be safe to invoke concurrently across independent
/// requests (each call gets its own request; any state the resolver closes
/// over is its own concern to synchronise). `Ok(None)` means "no identity" —
/// a valid outcome, not an error. An `Err` aborts the request.
///
/// Implemented automatically for plain closures, which keeps test doubles
/// and simple policies short:
///
/// ```rust
/// use janus::{BoxError, Request};
///
/// // Hand the identifier stage's result straight through.
/// let from_scope = |req: &Request| -> Result<Option<String>, BoxError> {
///     Ok(req.identifier().ok().map(str::to_owned))
/// };
/// # let _: &dyn janus::middleware::IdentityResolver = &from_scope;
/// ```
///
/// Resolvers that need to await something implement the trait directly:
///
/// ```rust,ignore
/// #[async_trait]
/// impl IdentityResolver for SessionStore {
///     async fn resolve(&self, req: &Request) -> Result<Option<String>, BoxError> {
///         self.lookup(req.header("x-session-id")).await
///     }
/// }
/// ```
#[async_trait]
pub trait IdentityResolver: Send + Sync + 'static {
    async fn resolve(&self, req: &Request) -> Result<Option<String>, BoxError>;
}

#[async_trait]
impl<F> IdentityResolver for F
where
    F: Fn(&Request) -> Result<Option<String>, BoxError> + Send + Sync + 'static,
{
    async fn resolve(&self, req: &Request) -> Result<Option<String>, BoxError> {
        self(req)
    }
}

/// Turns a raw identifier into a [`Principal`].
///
/// Invoked exactly once per request, strictly after identity resolution and
/// *unconditionally* — including when the identifier is `None`. The resolver
/// decides what "no identifier" means: an anonymous principal, a denial, or
/// an error. Same concurrency contract as [`IdentityResolver`]. An `Err`
/// aborts the request.
#[async_trait]
pub trait ProfileResolver: Send + Sync + 'static {
    async fn resolve(
        &self,
        req: &Request,
        identifier: Option<&str>,
    ) -> Result<Principal, BoxError>;
}

#[async_trait]
impl<F> ProfileResolver for F
where
    F: Fn(&Request, Option<&str>) -> Result<Principal, BoxError> + Send + Sync + 'static,
{
    async fn resolve(
        &self,
        req: &Request,
        identifier: Option<&str>,
    ) -> Result<Principal, BoxError> {
        self(req, identifier)
    }
}

/// Middleware factory for the authenticator stage.
///
/// Per request, the wrapped chain runs:
///
/// 1. `identity.resolve(&req)` — error → [`Error::IdentityResolver`], done.
/// 2. `profile.resolve(&req, id)` — error → [`Error::ProfileResolver`], done.
/// 3. Store the principal in the request scope, delegate to the next handler.
///
/// The two resolutions are sequential within a request, never concurrent.
/// The wrapped handler runs only after both succeed, and then always finds a
/// principal via [`Request::authentication`](crate::Request::authentication).
/// The stage never looks inside the principal and never retries a resolver —
/// retry policy, if any, belongs to the resolver itself.
pub struct Authenticate<I, P> {
    identity: Arc<I>,
    profile: Arc<P>,
}

impl<I, P> Authenticate<I, P>
where
    I: IdentityResolver,
    P: ProfileResolver,
{
    pub fn new(identity: I, profile: P) -> Self {
        Self { identity: Arc::new(identity), profile: Arc::new(profile) }
    }
}

impl<I, P> Middleware for Authenticate<I, P>
where
    I: IdentityResolver,
    P: ProfileResolver,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(AuthenticateHandler {
            identity: Arc::clone(&self.identity),
            profile: Arc::clone(&self.profile),
            next,
        })
    }
}

struct AuthenticateHandler<I, P> {
    identity: Arc<I>,
    profile: Arc<P>,
    next: BoxedHandler,
}

impl<I, P> ErasedHandler for AuthenticateHandler<I, P>
where
    I: IdentityResolver,
    P: ProfileResolver,
{
    fn call(&self, mut req: Request) -> BoxFuture {
        let identity = Arc::clone(&self.identity);
        let profile = Arc::clone(&self.profile);
        let next = Arc::clone(&self.next);
        Box::pin(async move {
            let id = identity.resolve(&req).await.map_err(Error::IdentityResolver)?;
            let principal = profile
                .resolve(&req, id.as_deref())
                .await
                .map_err(Error::ProfileResolver)?;
            debug!(
                identifier = id.as_deref(),
                authenticated = principal.is_authenticated(),
                "principal resolved"
            );
            req.set_principal(principal);
            next.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::handler::Handler;
    use crate::request::test_request;
    use crate::response::Response;

    fn fixed_identity(id: &'static str) -> impl IdentityResolver {
        move |_: &Request| -> Result<Option<String>, BoxError> { Ok(Some(id.to_owned())) }
    }

    fn no_identity() -> impl IdentityResolver {
        |_: &Request| -> Result<Option<String>, BoxError> { Ok(None) }
    }

    async fn echo_principal(req: Request) -> Response {
        let principal = req.authentication().expect("principal must be present");
        Response::text(principal.payload::<String>().expect("string payload").clone())
    }

    async fn verdict(req: Request) -> Response {
        match req.authentication() {
            Ok(principal) if principal.is_authenticated() => Response::text("in"),
            Ok(_) | Err(_) => Response::status(http::StatusCode::UNAUTHORIZED),
        }
    }

    /// A leaf handler that records whether it ran.
    fn counting_handler(invoked: Arc<AtomicUsize>) -> BoxedHandler {
        (move |_: Request| {
            let invoked = Arc::clone(&invoked);
            async move {
                invoked.fetch_add(1, Ordering::SeqCst);
                Response::text("unreachable")
            }
        })
        .into_boxed_handler()
    }

    #[tokio::test]
    async fn handler_sees_exact_principal_on_success() {
        let profile = |_: &Request, id: Option<&str>| -> Result<Principal, BoxError> {
            assert_eq!(id, Some("192.0.2.1"));
            Ok(Principal::authenticated(String::from("USERAUTH")))
        };
        let auth = Authenticate::new(fixed_identity("192.0.2.1"), profile);
        let handler = auth.wrap(echo_principal.into_boxed_handler());

        let resp = handler.call(test_request("/get", "192.0.2.1:1234")).await.unwrap();
        assert_eq!(resp.body, b"USERAUTH");
    }

    #[tokio::test]
    async fn identity_error_short_circuits_profile_and_handler() {
        let invoked = Arc::new(AtomicUsize::new(0));
        let profile_calls = Arc::new(AtomicUsize::new(0));

        let failing_identity = |_: &Request| -> Result<Option<String>, BoxError> {
            Err("transport down".into())
        };
        let counting_profile = {
            let profile_calls = Arc::clone(&profile_calls);
            move |_: &Request, _: Option<&str>| -> Result<Principal, BoxError> {
                profile_calls.fetch_add(1, Ordering::SeqCst);
                Ok(Principal::denied("unreachable"))
            }
        };

        let auth = Authenticate::new(failing_identity, counting_profile);
        let handler = auth.wrap(counting_handler(Arc::clone(&invoked)));

        let err = handler
            .call(test_request("/get", "192.0.2.1:1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IdentityResolver(_)));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
        assert_eq!(profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn profile_error_short_circuits_handler() {
        let invoked = Arc::new(AtomicUsize::new(0));

        // Identity resolution yields no identifier; the profile resolver
        // still runs, sees None, and fails.
        let seen_none = Arc::new(AtomicUsize::new(0));
        let failing_profile = {
            let seen_none = Arc::clone(&seen_none);
            move |_: &Request, id: Option<&str>| -> Result<Principal, BoxError> {
                if id.is_none() {
                    seen_none.fetch_add(1, Ordering::SeqCst);
                }
                Err("profile store unavailable".into())
            }
        };

        let auth = Authenticate::new(no_identity(), failing_profile);
        let handler = auth.wrap(counting_handler(Arc::clone(&invoked)));

        let err = handler
            .call(test_request("/get", "192.0.2.1:1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProfileResolver(_)));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);
        assert_eq!(seen_none.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn denied_principal_still_delegates() {
        let profile = |_: &Request, _: Option<&str>| -> Result<Principal, BoxError> {
            Ok(Principal::denied("FAIL"))
        };
        let auth = Authenticate::new(fixed_identity("191.0.2.1"), profile);
        let handler = auth.wrap(verdict.into_boxed_handler());

        let resp = handler.call(test_request("/get", "191.0.2.1:1234")).await.unwrap();
        assert_eq!(resp.status, http::StatusCode::UNAUTHORIZED);
        assert!(resp.body.is_empty());
    }
}
