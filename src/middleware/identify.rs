//! Identifier stage: raw caller identity from the peer address.

use std::sync::Arc;

use tracing::trace;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::Middleware;
use crate::request::Request;

/// Middleware that stores the host part of the peer address as the request's
/// raw identifier.
///
/// The remote address is expected to look like `host:port`. When splitting
/// on `:` yields exactly two components, the host component becomes the raw
/// identifier; anything else (no port, or an unbracketed IPv6 literal) leaves
/// the request unchanged. Extraction failure is silent and non-fatal —
/// downstream code discovers it only as [`NoIdentifier`](crate::NoIdentifier)
/// from the accessor.
pub struct Identify;

impl Middleware for Identify {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(IdentifyHandler { next })
    }
}

struct IdentifyHandler {
    next: BoxedHandler,
}

impl ErasedHandler for IdentifyHandler {
    fn call(&self, mut req: Request) -> BoxFuture {
        if let Some(host) = host_component(req.remote_addr()) {
            req.set_identifier(host);
        } else {
            trace!(remote_addr = req.remote_addr(), "no identifier derived");
        }
        self.next.call(req)
    }
}

fn host_component(remote_addr: &str) -> Option<String> {
    let mut parts = remote_addr.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(host), Some(_port), None) => Some(host.to_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoIdentifier;
    use crate::handler::Handler;
    use crate::request::test_request;
    use crate::response::Response;

    async fn echo_identifier(req: Request) -> Response {
        match req.identifier() {
            Ok(id) => Response::text(id),
            Err(NoIdentifier) => Response::text("anonymous"),
        }
    }

    #[tokio::test]
    async fn stores_host_from_well_formed_address() {
        let handler = Identify.wrap(echo_identifier.into_boxed_handler());
        let resp = handler.call(test_request("/", "192.0.2.1:51413")).await.unwrap();
        assert_eq!(resp.body, b"192.0.2.1");
    }

    #[tokio::test]
    async fn leaves_request_unchanged_without_port() {
        let handler = Identify.wrap(echo_identifier.into_boxed_handler());
        let resp = handler.call(test_request("/", "192.0.2.1")).await.unwrap();
        assert_eq!(resp.body, b"anonymous");
    }

    #[tokio::test]
    async fn leaves_request_unchanged_for_ipv6_literal() {
        let handler = Identify.wrap(echo_identifier.into_boxed_handler());
        let resp = handler.call(test_request("/", "[::1]:8080")).await.unwrap();
        assert_eq!(resp.body, b"anonymous");
    }

    #[test]
    fn host_component_rules() {
        assert_eq!(host_component("192.0.2.1:51413"), Some("192.0.2.1".to_owned()));
        assert_eq!(host_component("localhost:80"), Some("localhost".to_owned()));
        assert_eq!(host_component("192.0.2.1"), None);
        assert_eq!(host_component("a:b:c"), None);
        assert_eq!(host_component(""), None);
    }
}
