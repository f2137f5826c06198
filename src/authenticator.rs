//! Choosing and building the `Authorization` header for a request.

use crate::{challenge, AuthContext, Challenge, Credential, CredentialStore, HttpMethod, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use http::{HeaderMap, HeaderValue, Request, Uri};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

/// Produces `Authorization` header values for outgoing requests
///
/// The methods are generic over the request body, so the trait is used through
/// generics (`A: Authenticator`) rather than as `dyn Authenticator`.
pub trait Authenticator {
    /// Header value for `req`, or `None` if no header should be sent.
    ///
    /// `resp` holds the headers of the server's previous response to this
    /// request, if there was one.
    fn try_get_auth<B>(&self, req: &Request<B>, resp: Option<&HeaderMap>) -> Option<String>;

    /// Set the `Authorization` header of `req`. Returns whether a header was set.
    fn authorize<B>(&self, req: &mut Request<B>, resp: Option<&HeaderMap>) -> bool {
        let Some(value) = self.try_get_auth(req, resp) else {
            return false;
        };

        match HeaderValue::from_str(&value) {
            Ok(value) => {
                req.headers_mut().insert(AUTHORIZATION, value);
                true
            }
            Err(e) => {
                warn!("Authorization value for {} is not a valid header: {}", req.uri(), e);
                false
            }
        }
    }
}

/// `Basic` header value for a credential
pub fn basic_authorization(cred: &Credential) -> String {
    let userpass = format!("{}:{}", cred.username(), cred.password());
    format!("Basic {}", STANDARD.encode(userpass))
}

/// Host name of a request URI, without IPv6 brackets
fn request_host(uri: &Uri) -> Option<&str> {
    uri.host()
        .map(|host| host.trim_start_matches('[').trim_end_matches(']'))
}

/// Path and query as sent on the request line
fn request_target(uri: &Uri) -> String {
    match uri.path_and_query().map(|pq| pq.as_str()) {
        Some(pq) if pq.starts_with('?') => format!("/{}", pq),
        Some(pq) if !pq.is_empty() => pq.to_string(),
        _ => "/".to_string(),
    }
}

/// [`Authenticator`] backed by a [`CredentialStore`] keyed by request host
#[derive(Debug, Clone, Default)]
pub struct HostAuthenticator {
    store: CredentialStore,
}

impl HostAuthenticator {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    /// Shortcut for [`CredentialStore::load`]
    pub fn load(file: Option<&Path>, explicit: Option<&HashMap<String, String>>) -> Result<Self> {
        CredentialStore::load(file, explicit).map(Self::new)
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    fn digest_authorization<B>(
        &self,
        cred: &Credential,
        req: &Request<B>,
        header: &str,
    ) -> Option<String> {
        let uri = request_target(req.uri());
        let context = AuthContext::from_credential(cred, &uri, HttpMethod::from(req.method()));

        match Challenge::parse(header).respond(&context) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Declining Digest challenge for {}: {}", req.uri(), e);
                None
            }
        }
    }
}

impl Authenticator for HostAuthenticator {
    fn try_get_auth<B>(&self, req: &Request<B>, resp: Option<&HeaderMap>) -> Option<String> {
        let host = request_host(req.uri())?;
        let cred = self.store.get(host)?;

        // Guess Basic, saving a round trip if it's right
        let Some(headers) = resp else {
            return Some(basic_authorization(cred));
        };

        let header = headers
            .get(WWW_AUTHENTICATE)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .unwrap_or_default();

        match challenge::scheme(header) {
            "Basic" => Some(basic_authorization(cred)),
            "Digest" => self.digest_authorization(cred, req, header),
            other => {
                debug!("No supported authentication scheme for {}: {:?}", host, other);
                None
            }
        }
    }
}
