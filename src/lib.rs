//! Client-side HTTP authentication negotiation.
//!
//! Given per-host credentials, a request, and optionally the headers of the
//! server's previous response, this crate decides whether and how to fill in
//! the `Authorization` header. Basic and Digest (IETF RFC 7616, including the
//! `-sess` variants, MD5, SHA-256, SHA-512-256, and `userhash`) are supported.
//!
//! # Examples
//!
//! Basic usage:
//!
//! ```
//! use httpauth::{Authenticator, CredentialStore, HostAuthenticator};
//! use http::{header::WWW_AUTHENTICATE, HeaderMap, Request};
//!
//! let store = CredentialStore::from_entries([("example.org", "Mufasa:Circle of Life")]).unwrap();
//! let auth = HostAuthenticator::new(store);
//!
//! let req = Request::get("http://example.org/dir/index.html").body(()).unwrap();
//!
//! // Without a previous response, Basic is tried right away
//! let value = auth.try_get_auth(&req, None).unwrap();
//! assert_eq!(value, "Basic TXVmYXNhOkNpcmNsZSBvZiBMaWZl");
//!
//! // The server asked for Digest instead
//! let mut headers = HeaderMap::new();
//! headers.insert(
//!     WWW_AUTHENTICATE,
//!     r#"Digest realm="http-auth@example.org", qop="auth", nonce="7ypf/xlj9XXwfDPEoM4URrv/xwf94BcCAzFZH4GiTo0v""#
//!         .parse()
//!         .unwrap(),
//! );
//! let value = auth.try_get_auth(&req, Some(&headers)).unwrap();
//! assert!(value.starts_with(r#"Digest username="Mufasa", realm="http-auth@example.org", uri="/dir/index.html""#));
//!
//! // Hosts without credentials get nothing
//! let other = Request::get("http://other.example/").body(()).unwrap();
//! assert_eq!(auth.try_get_auth(&other, None), None);
//! ```
//!
//! The Digest computation can also be driven directly:
//!
//! ```
//! use httpauth::AuthContext;
//!
//! let www_authenticate = r#"Digest realm="http-auth@example.org", qop="auth, auth-int", algorithm=MD5, nonce="7ypf/xlj9XXwfDPEoM4URrv/xwf94BcCAzFZH4GiTo0v", opaque="FQhe/qaU925kfnzjCev0ciny7QMkPqMAFRtzCUYo5tdS""#;
//!
//! let mut context = AuthContext::new("Mufasa", "Circle of Life", "/dir/index.html");
//! // For this test, we inject a custom cnonce. It's generated for you otherwise.
//! context.set_custom_cnonce("f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ");
//!
//! let answer = httpauth::parse(www_authenticate).respond(&context).unwrap();
//! assert_eq!(answer, r#"Digest username="Mufasa", realm="http-auth@example.org", uri="/dir/index.html", algorithm=MD5, nonce="7ypf/xlj9XXwfDPEoM4URrv/xwf94BcCAzFZH4GiTo0v", nc=00000001, cnonce="f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ", qop="auth", response="8ca523f5e9506fed4657c9700eebdbec", userhash=false, opaque="FQhe/qaU925kfnzjCev0ciny7QMkPqMAFRtzCUYo5tdS""#);
//! ```

mod authenticator;
mod challenge;
mod credentials;
mod digest;
mod enums;
mod error;
mod utils;

pub use error::{Error, Result};

pub use crate::authenticator::{basic_authorization, Authenticator, HostAuthenticator};
pub use crate::challenge::{parse_header_map, scheme, Challenge};
pub use crate::credentials::{read_credentials_file, Credential, CredentialStore};
pub use crate::digest::{compute_digest, generate_cnonce, AuthContext};
pub use crate::utils::unquote;

pub use crate::enums::*;

/// Parse the WWW-Authenticate header value.
/// It's just a convenience method to call [`Challenge::parse()`](struct.Challenge.html#method.parse).
pub fn parse(www_authenticate: &str) -> Challenge {
    Challenge::parse(www_authenticate)
}

#[test]
fn test_parse_respond() {
    let src = r#"Digest realm="test", nonce="abc123", qop="auth""#;

    let mut context = AuthContext::new("Mufasa", "Circle of Life", "/dir/index.html");
    context.set_custom_cnonce("f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ");

    let prompt = crate::parse(src);
    assert_eq!(unquote(prompt.param("realm")), "test");

    let answer = prompt.respond(&context).unwrap();
    let str = answer.replace(", ", ",\n  ");

    let md5 = Algorithm::default();
    let response = md5.hash_str(&format!(
        "{}:abc123:00000001:f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ:auth:{}",
        md5.hash_str("Mufasa:test:Circle of Life"),
        md5.hash_str("GET:/dir/index.html")
    ));

    assert_eq!(
        str,
        format!(
            r#"Digest username="Mufasa",
  realm="test",
  uri="/dir/index.html",
  algorithm=MD5,
  nonce="abc123",
  nc=00000001,
  cnonce="f2/wE4q74E6zIJEtWaHKaf5wv/H5QzzpXusqGemxURZJ",
  qop="auth",
  response="{}",
  userhash=false"#,
            response
        )
    );
}
