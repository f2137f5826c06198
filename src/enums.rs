use crate::{Error, Error::*, Result};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use digest::{Digest, DynDigest};
use md5::Md5;
use sha2::{Sha256, Sha512_256};

/// Hash function named by the `algorithm` challenge parameter
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(non_camel_case_types)]
pub enum AlgorithmType {
    MD5,
    SHA2_256,
    SHA2_512_256,
}

/// Supported algorithm names, as they appear on the wire (without `-sess`)
pub const ALGORITHMS: [(&str, AlgorithmType); 3] = [
    ("MD5", AlgorithmType::MD5),
    ("SHA-256", AlgorithmType::SHA2_256),
    ("SHA-512-256", AlgorithmType::SHA2_512_256),
];

const SESS_SUFFIX: &str = "-sess";

/// Algorithm and the -sess flag pair
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Algorithm {
    pub algo: AlgorithmType,
    pub sess: bool,
}

impl Algorithm {
    /// Compose from algorithm type and the -sess flag
    pub fn new(algo: AlgorithmType, sess: bool) -> Algorithm {
        Algorithm { algo, sess }
    }

    /// Calculate a lowercase hex hash of bytes using the selected algorithm
    pub fn hash(self, bytes: &[u8]) -> String {
        let mut hash: Box<dyn DynDigest> = match self.algo {
            AlgorithmType::MD5 => Box::new(Md5::new()),
            AlgorithmType::SHA2_256 => Box::new(Sha256::new()),
            AlgorithmType::SHA2_512_256 => Box::new(Sha512_256::new()),
        };

        hash.update(bytes);
        hex::encode(hash.finalize())
    }

    /// Calculate a hash of string's bytes using the selected algorithm
    pub fn hash_str(self, s: &str) -> String {
        self.hash(s.as_bytes())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Parse from the format used in WWW-Authenticate. The name is matched
    /// exactly, so a quoted value (`"MD5"`) does not resolve.
    fn from_str(s: &str) -> Result<Self> {
        let (name, sess) = match s.strip_suffix(SESS_SUFFIX) {
            Some(stripped) => (stripped, true),
            None => (s, false),
        };

        ALGORITHMS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|&(_, algo)| Algorithm::new(algo, sess))
            .ok_or_else(|| UnknownAlgorithm(s.into()))
    }
}

impl Default for Algorithm {
    /// Get a MD5 instance
    fn default() -> Self {
        Algorithm::new(AlgorithmType::MD5, false)
    }
}

impl Display for Algorithm {
    /// Format to the form used in HTTP headers
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = ALGORITHMS
            .iter()
            .find(|(_, algo)| *algo == self.algo)
            .map(|(name, _)| *name)
            .unwrap_or_default();
        f.write_str(name)?;

        if self.sess {
            f.write_str(SESS_SUFFIX)?;
        }

        Ok(())
    }
}

/// QOP field values
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[allow(non_camel_case_types)]
pub enum Qop {
    AUTH,
    AUTH_INT,
}

impl FromStr for Qop {
    type Err = Error;

    /// Parse from "auth" or "auth-int" as used in HTTP headers
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auth" => Ok(Qop::AUTH),
            "auth-int" => Ok(Qop::AUTH_INT),
            _ => Err(BadQop(s.into())),
        }
    }
}

impl Display for Qop {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Qop::AUTH => "auth",
            Qop::AUTH_INT => "auth-int",
        })
    }
}

/// HTTP method (used when generating the A2 hash)
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum HttpMethod<'a> {
    #[default]
    GET,
    POST,
    HEAD,
    OTHER(&'a str),
}

impl<'a> HttpMethod<'a> {
    /// Interpret a method string; an empty string means GET.
    pub fn parse(s: &'a str) -> Self {
        match s {
            "" | "GET" => HttpMethod::GET,
            "POST" => HttpMethod::POST,
            "HEAD" => HttpMethod::HEAD,
            other => HttpMethod::OTHER(other),
        }
    }
}

impl<'a> From<&'a http::Method> for HttpMethod<'a> {
    fn from(method: &'a http::Method) -> Self {
        HttpMethod::parse(method.as_str())
    }
}

impl<'a> Display for HttpMethod<'a> {
    /// Convert to the wire form
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OTHER(s) => s,
        })
    }
}
