//! Digest `Authorization` values per RFC 7616.
//!
//! Only the `auth` quality of protection is supported. The nonce count is
//! always 1: nothing is remembered between calls, so every attempt uses a
//! fresh client nonce.

use crate::{
    unquote, utils::value_or_default, Algorithm, Challenge, Credential, Error::*, HttpMethod, Qop,
    Result,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use std::fmt;

/// Number of random bytes in a client nonce
const CNONCE_LEN: usize = 32;

const NONCE_COUNT: u32 = 1;

/// Login attempt context
///
/// All fields are borrowed; the struct is meaningful only for the one request.
pub struct AuthContext<'a> {
    /// Login username
    pub username: &'a str,
    /// Login password (plain)
    pub password: &'a str,
    /// Request-target as sent on the wire (path and query)
    pub uri: &'a str,
    /// HTTP method used (defaults to GET)
    pub method: HttpMethod<'a>,
    /// Spoofed client nonce (use only for tests; a random nonce is generated automatically)
    pub cnonce: Option<&'a str>,
}

impl<'a> AuthContext<'a> {
    /// Construct a new context with the GET verb
    pub fn new(username: &'a str, password: &'a str, uri: &'a str) -> Self {
        Self::new_with_method(username, password, uri, HttpMethod::GET)
    }

    /// Construct a new context with an arbitrary verb
    pub fn new_with_method(
        username: &'a str,
        password: &'a str,
        uri: &'a str,
        method: HttpMethod<'a>,
    ) -> Self {
        Self {
            username,
            password,
            uri,
            method,
            cnonce: None,
        }
    }

    /// Context for a stored credential
    pub fn from_credential(cred: &'a Credential, uri: &'a str, method: HttpMethod<'a>) -> Self {
        Self::new_with_method(cred.username(), cred.password(), uri, method)
    }

    pub fn set_custom_cnonce(&mut self, cnonce: &'a str) {
        self.cnonce = Some(cnonce);
    }
}

impl<'a> fmt::Debug for AuthContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("uri", &self.uri)
            .field("method", &self.method)
            .field("cnonce", &self.cnonce)
            .finish()
    }
}

/// Random client nonce, base64 encoded
pub fn generate_cnonce() -> Result<String> {
    let mut bytes = [0u8; CNONCE_LEN];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(STANDARD.encode(bytes))
}

/// First quality of protection offered, in raw form. Splitting a quoted list
/// cuts off its closing quote, which is put back.
fn select_qop(offered: &str) -> String {
    let offered = value_or_default(offered, "auth");
    let mut options = offered.split(", ");
    let first = options.next().unwrap_or(offered);

    if options.next().is_some() {
        format!("{}\"", first)
    } else {
        first.to_string()
    }
}

/// Compute the Digest `Authorization` header value for a challenge.
///
/// # Errors
/// Unknown algorithm, a qop other than `auth`, or no randomness for the client nonce.
pub fn compute_digest(challenge: &Challenge, context: &AuthContext) -> Result<String> {
    let algorithm_name = value_or_default(challenge.param("algorithm"), "MD5");
    let algorithm: Algorithm = algorithm_name.parse()?;

    let realm = challenge.param("realm");
    let nonce = challenge.param("nonce");
    let cnonce = match context.cnonce {
        Some(cnonce) => cnonce.to_owned(),
        None => generate_cnonce()?,
    };

    // RFC 7616 section 3.4.2
    let a1 = {
        let a = format!(
            "{name}:{realm}:{pw}",
            name = unquote(context.username),
            realm = unquote(realm),
            pw = context.password
        );

        if algorithm.sess {
            format!(
                "{hash}:{nonce}:{cnonce}",
                hash = algorithm.hash_str(&a),
                nonce = unquote(nonce),
                cnonce = unquote(&cnonce)
            )
        } else {
            a
        }
    };

    let qop = select_qop(challenge.param("qop"));
    match unquote(&qop).parse::<Qop>()? {
        Qop::AUTH => {}
        q @ Qop::AUTH_INT => return Err(UnsupportedQop(q)),
    }

    // RFC 7616 section 3.4.3
    let a2 = format!("{method}:{uri}", method = context.method, uri = context.uri);

    let nc = format!("{:08x}", NONCE_COUNT);

    let response = algorithm.hash_str(&format!(
        "{ha1}:{nonce}:{nc}:{cnonce}:{qop}:{ha2}",
        ha1 = algorithm.hash_str(&a1),
        nonce = unquote(nonce),
        nc = nc,
        cnonce = unquote(&cnonce),
        qop = unquote(&qop),
        ha2 = algorithm.hash_str(&a2)
    ));

    // reported as given, whether or not the username was hashed
    let userhash = value_or_default(challenge.param("userhash"), "false");
    let username = if userhash == "true" {
        algorithm.hash_str(&format!(
            "{}:{}",
            unquote(context.username),
            unquote(realm)
        ))
    } else {
        context.username.to_owned()
    };

    let mut header = format!(
        "Digest username=\"{username}\", realm={realm}, uri=\"{uri}\", algorithm={algorithm}, \
         nonce={nonce}, nc={nc}, cnonce=\"{cnonce}\", qop={qop}, response=\"{response}\", \
         userhash={userhash}",
        username = username,
        realm = realm,
        uri = context.uri,
        algorithm = algorithm,
        nonce = nonce,
        nc = nc,
        cnonce = cnonce,
        qop = qop,
        response = response,
        userhash = userhash
    );

    // Apache rejects an empty opaque
    let opaque = challenge.param("opaque");
    if !opaque.is_empty() {
        header.push_str(", opaque=");
        header.push_str(opaque);
    }

    Ok(header)
}
