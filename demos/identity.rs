//! Identity pipeline demo — peer-address identification plus a toy allowlist.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example identity
//!
//! Try:
//!   curl http://localhost:3000/whoami        # 200, your profile
//!   curl http://localhost:3000/open          # 200, no identity required
//!
//! Requests from anywhere but localhost get a 401 from /whoami — the
//! handler's decision, not the middleware's.

use http::StatusCode;
use janus::middleware::{Authenticate, Identify};
use janus::{BoxError, Principal, Request, Response, Router, Server};

/// The profile a successful resolution attaches to the request.
#[derive(Clone)]
struct Profile {
    host: String,
    display_name: String,
}

/// Reads the identifier the `Identify` stage stored. Returning `Ok(None)`
/// (stage skipped, unparsable address) is not an error — the profile
/// resolver decides what anonymity means.
fn identity(req: &Request) -> Result<Option<String>, BoxError> {
    Ok(req.identifier().ok().map(str::to_owned))
}

/// A stand-in for a real profile lookup (directory service, session store).
fn profile(_req: &Request, id: Option<&str>) -> Result<Principal, BoxError> {
    match id {
        Some(host @ "127.0.0.1") => Ok(Principal::authenticated(Profile {
            host: host.to_owned(),
            display_name: "local developer".to_owned(),
        })),
        Some(host) => Ok(Principal::denied(format!("{host} is not allowlisted"))),
        None => Ok(Principal::denied("caller has no identity")),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .get("/open", open)
        .layer(Identify)
        .layer(Authenticate::new(identity, profile))
        .get("/whoami", whoami);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /open — registered before the layers, so no identity pipeline runs.
async fn open(_req: Request) -> Response {
    Response::text("no identity needed here")
}

// GET /whoami — the handler owns the verdict: a denied principal becomes a
// 401 here, not inside the middleware.
async fn whoami(req: Request) -> Response {
    let principal = match req.authentication() {
        Ok(principal) => principal,
        Err(_) => return Response::status(StatusCode::UNAUTHORIZED),
    };

    match principal.payload::<Profile>() {
        Some(profile) => Response::json(
            format!(
                r#"{{"host":"{}","name":"{}"}}"#,
                profile.host, profile.display_name
            )
            .into_bytes(),
        ),
        None => Response::status(StatusCode::UNAUTHORIZED),
    }
}
