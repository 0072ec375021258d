//! The authenticated principal attached to a request.
//!
//! The original pattern this crate grew out of handed an untyped value from
//! the profile resolver to downstream handlers, which compared it against
//! magic strings to decide allow/deny. That works until two handlers disagree
//! on the sentinel. [`Principal`] makes the two outcomes explicit variants
//! instead: a handler matches on `Authenticated` / `Denied` and can never
//! mistake a denial marker for a logged-in user.

use std::any::Any;
use std::fmt;

/// The outcome of profile resolution, attached to the request scope by the
/// authenticator stage.
///
/// The payload of [`Authenticated`](Principal::Authenticated) is opaque to
/// janus — the profile resolver chooses its shape, the handler downcasts it
/// back with [`payload`](Principal::payload). The middleware in between never
/// looks inside.
pub enum Principal {
    /// Resolution succeeded; the payload is whatever the profile resolver
    /// produced (a user record, a role set, a plain string).
    Authenticated(Box<dyn Any + Send + Sync>),
    /// The resolver recognised the caller as not authorised and said why.
    /// This is a *successful* resolution — the handler decides the response.
    Denied(String),
}

impl Principal {
    /// Wraps an arbitrary payload as an authenticated principal.
    pub fn authenticated<T: Any + Send + Sync>(payload: T) -> Self {
        Self::Authenticated(Box::new(payload))
    }

    /// A denied principal carrying the resolver's reason.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied(reason.into())
    }

    /// Downcasts the authenticated payload.
    ///
    /// Returns `None` if the principal is denied or the payload is not a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Authenticated(payload) => payload.downcast_ref(),
            Self::Denied(_) => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The denial reason, if this principal is denied.
    pub fn denial(&self) -> Option<&str> {
        match self {
            Self::Authenticated(_) => None,
            Self::Denied(reason) => Some(reason),
        }
    }
}

/// Payload contents are opaque; only the variant is shown.
impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated(_) => f.write_str("Principal::Authenticated(..)"),
            Self::Denied(reason) => write!(f, "Principal::Denied({reason:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_downcasts_to_original_type() {
        let principal = Principal::authenticated(String::from("USERAUTH"));
        assert!(principal.is_authenticated());
        assert_eq!(principal.payload::<String>().unwrap(), "USERAUTH");
        assert_eq!(principal.payload::<u32>(), None);
        assert_eq!(principal.denial(), None);
    }

    #[test]
    fn denied_exposes_reason_and_no_payload() {
        let principal = Principal::denied("FAIL");
        assert!(!principal.is_authenticated());
        assert_eq!(principal.denial(), Some("FAIL"));
        assert_eq!(principal.payload::<String>(), None);
    }
}
