//! Caller-supplied authentication for hosting services.
//!
//! The crate never acquires, stores, or refreshes tokens itself; the caller
//! implements [`CredentialProvider`] on its own user type and hands out one
//! opaque [`Credential`] bundle per service at query time.

use crate::domain::Service;

/// Opaque per-service token/identifier bundle.
///
/// Which fields a service needs is the adapter's business: Flickr wants an
/// API key in `token` plus the account NSID in `user_id`, Facebook wants an
/// OAuth access token and treats a missing `user_id` as "me". Values are
/// read-only for the duration of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl Credential {
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            token: Some(token.into()),
        }
    }

    /// Token-only credential, for services that don't need an account id.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            user_id: None,
            token: Some(token.into()),
        }
    }
}

/// Capability interface the caller implements to supply credentials.
///
/// Returning `None` for a service that requires auth becomes that service's
/// `MissingCredential` failure entry; its request is never sent. Services
/// that support unauthenticated public queries receive the `None` and may
/// still build a request.
pub trait CredentialProvider: Send + Sync {
    fn credential_for(&self, service: Service) -> Option<Credential>;
}
