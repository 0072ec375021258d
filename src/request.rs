//! Incoming HTTP request type and the request-scoped identity accessors.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

use crate::error::{NoAuthentication, NoIdentifier};
use crate::principal::Principal;

/// An incoming HTTP request.
///
/// Built by the server from the parsed hyper request plus the route
/// parameters matched by the router. Each request value is owned by exactly
/// one handler chain; middleware stages receive it by value, enrich it, and
/// pass it on. Nothing outside this crate can write the identity slots —
/// downstream code reads them only through [`identifier`](Request::identifier)
/// and [`authentication`](Request::authentication), so unrelated code cannot
/// collide with or forge them.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) remote_addr: String,
    pub(crate) identifier: Option<String>,
    pub(crate) principal: Option<Principal>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        params: HashMap<String, String>,
        remote_addr: String,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            params,
            remote_addr,
            identifier: None,
            principal: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The peer address as reported by the transport, usually `host:port`.
    ///
    /// Low trust: behind a proxy this is the proxy's address, not the
    /// caller's. The identifier stage parses this field.
    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    // ── Identity accessors ────────────────────────────────────────────────────

    /// The raw caller identifier stored by the identifier stage.
    ///
    /// Errs with [`NoIdentifier`] when the stage never ran for this request
    /// or could not parse the remote address. Absence is recoverable — treat
    /// it as an anonymous caller if that fits your policy.
    pub fn identifier(&self) -> Result<&str, NoIdentifier> {
        self.identifier.as_deref().ok_or(NoIdentifier)
    }

    /// The [`Principal`] stored by a completed authenticator stage.
    ///
    /// Errs with [`NoAuthentication`] for any request that did not pass
    /// through the authenticator — the stage never silently substitutes a
    /// default principal. A `Denied` principal is still `Ok`: resolution
    /// completed, the resolver just said no. The handler owns the verdict.
    pub fn authentication(&self) -> Result<&Principal, NoAuthentication> {
        self.principal.as_ref().ok_or(NoAuthentication)
    }

    pub(crate) fn set_identifier(&mut self, identifier: String) {
        self.identifier = Some(identifier);
    }

    pub(crate) fn set_principal(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }
}

#[cfg(test)]
pub(crate) fn test_request(path: &str, remote_addr: &str) -> Request {
    Request::new(
        Method::GET,
        path.parse().unwrap(),
        HeaderMap::new(),
        Bytes::new(),
        HashMap::new(),
        remote_addr.to_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_report_absence_on_untouched_request() {
        let req = test_request("/get", "192.0.2.1:1234");
        assert_eq!(req.identifier(), Err(NoIdentifier));
        assert!(matches!(req.authentication(), Err(NoAuthentication)));
    }

    #[test]
    fn param_lookup() {
        let mut req = test_request("/users/42", "192.0.2.1:1234");
        req.params.insert("id".to_owned(), "42".to_owned());
        assert_eq!(req.param("id"), Some("42"));
        assert_eq!(req.param("name"), None);
    }
}
