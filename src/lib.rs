//! # janus
//!
//! A minimal HTTP framework whose one opinion is how a request learns who is
//! calling. Everything else stays small on purpose.
//!
//! ## The contract
//!
//! nginx handles TLS, rate limiting, slow clients, and body-size limits.
//! janus does not — by design. What janus *does* own is the request-scoped
//! identity pipeline:
//!
//! 1. [`middleware::Identify`] derives a raw, low-trust caller identifier
//!    from the peer address and stores it in the request scope.
//! 2. [`middleware::Authenticate`] runs your identity and profile resolvers,
//!    in that order, and stores the resulting [`Principal`] in the scope —
//!    or fails the request before your handler ever runs.
//! 3. Handlers read the scope through [`Request::identifier`] and
//!    [`Request::authentication`], both of which report absence as a typed
//!    error instead of panicking or inventing a default identity.
//!
//! The pipeline never writes a response. Whether a denied principal means
//! 401, a redirect, or a degraded anonymous view is the handler's call.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use janus::middleware::{Authenticate, Identify};
//! use janus::{BoxError, Principal, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let identity = |req: &Request| -> Result<Option<String>, BoxError> {
//!         Ok(req.identifier().ok().map(str::to_owned))
//!     };
//!     let profile = |_: &Request, id: Option<&str>| -> Result<Principal, BoxError> {
//!         match id {
//!             Some(host) => Ok(Principal::authenticated(host.to_owned())),
//!             None => Ok(Principal::denied("no peer identity")),
//!         }
//!     };
//!
//!     let app = Router::new()
//!         .layer(Identify)
//!         .layer(Authenticate::new(identity, profile))
//!         .get("/whoami", whoami);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn whoami(req: Request) -> Response {
//!     match req.authentication() {
//!         Ok(principal) => match principal.payload::<String>() {
//!             Some(host) => Response::text(host.clone()),
//!             None => Response::status(StatusCode::UNAUTHORIZED),
//!         },
//!         Err(_) => Response::status(StatusCode::UNAUTHORIZED),
//!     }
//! }
//! ```

mod error;
mod handler;
mod principal;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;

pub use error::{BoxError, Error, NoAuthentication, NoIdentifier};
pub use handler::Handler;
pub use principal::Principal;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response};
pub use router::Router;
pub use server::Server;

// End-to-end scenarios: router + both stages + handler verdicts.
#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use crate::handler::ErasedHandler as _;
    use crate::middleware::{Authenticate, Identify};
    use crate::request::test_request;
    use crate::*;

    fn scope_identity(req: &Request) -> Result<Option<String>, BoxError> {
        Ok(req.identifier().ok().map(str::to_owned))
    }

    /// Only the documentation's favourite caller is welcome.
    fn gate_profile(_: &Request, id: Option<&str>) -> Result<Principal, BoxError> {
        match id {
            Some("192.0.2.1") => Ok(Principal::authenticated(String::from("USERAUTH"))),
            _ => Ok(Principal::denied("FAIL")),
        }
    }

    async fn guarded(req: Request) -> Response {
        match req.authentication() {
            Ok(principal) => match principal.payload::<String>() {
                Some(profile) => Response::text(profile.clone()),
                None => Response::status(StatusCode::UNAUTHORIZED),
            },
            Err(NoAuthentication) => Response::status(StatusCode::UNAUTHORIZED),
        }
    }

    fn app() -> Router {
        Router::new()
            .layer(Identify)
            .layer(Authenticate::new(scope_identity, gate_profile))
            .get("/get", guarded)
    }

    #[tokio::test]
    async fn known_caller_gets_200_with_profile_body() {
        let (handler, _) = app().lookup(&Method::GET, "/get").unwrap();
        let resp = handler.call(test_request("/get", "192.0.2.1:1234")).await.unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, b"USERAUTH");
    }

    #[tokio::test]
    async fn unknown_caller_gets_401_with_empty_body() {
        let (handler, _) = app().lookup(&Method::GET, "/get").unwrap();
        let resp = handler.call(test_request("/get", "191.0.2.1:1234")).await.unwrap();
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert!(resp.body.is_empty());
    }

    #[tokio::test]
    async fn handler_outside_authenticator_sees_no_authentication() {
        async fn bare(req: Request) -> Response {
            match req.authentication() {
                Ok(_) => Response::text("principal"),
                Err(NoAuthentication) => Response::status(StatusCode::UNAUTHORIZED),
            }
        }

        let router = Router::new().get("/bare", bare);
        let (handler, _) = router.lookup(&Method::GET, "/bare").unwrap();
        let resp = handler.call(test_request("/bare", "192.0.2.1:1234")).await.unwrap();
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    }
}
