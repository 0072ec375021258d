//! Unified error type and the identity-lookup error taxonomy.

use thiserror::Error;

/// Boxed error type accepted from resolver implementations.
///
/// Resolvers are external collaborators and may fail in ways this crate
/// cannot enumerate (a timed-out directory lookup, a poisoned cache, a
/// cancelled request deadline). Whatever they return is carried through
/// [`Error`] unchanged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type returned by janus's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// failures the handler chain cannot answer itself: binding to a port,
/// accepting a connection, or a resolver failing mid-pipeline. The server
/// decides how a resolver failure reaches the wire (it logs and answers 500);
/// the middleware stage only propagates it, never retries it.
#[derive(Debug, Error)]
pub enum Error {
    /// Infrastructure failure: bind, accept, or reading a request body.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The identity resolver returned an error. The wrapped handler was
    /// never invoked for this request.
    #[error("identity resolver: {0}")]
    IdentityResolver(#[source] BoxError),

    /// The profile resolver returned an error. The wrapped handler was
    /// never invoked for this request.
    #[error("profile resolver: {0}")]
    ProfileResolver(#[source] BoxError),
}

/// No raw identifier in the request scope.
///
/// Returned by [`Request::identifier`](crate::Request::identifier) when the
/// identifier stage never ran, when it ran but could not parse the remote
/// address, or when the accessor is called outside the enriched scope.
/// Recoverable: callers typically treat it as "anonymous".
#[derive(Debug, Eq, PartialEq, Error)]
#[error("no identifier")]
pub struct NoIdentifier;

/// No principal in the request scope.
///
/// Returned by [`Request::authentication`](crate::Request::authentication)
/// for any request that did not pass through a completed authenticator
/// stage. Recoverable: the handler decides the response, typically 401.
#[derive(Debug, Eq, PartialEq, Error)]
#[error("no authentication")]
pub struct NoAuthentication;
