use crate::Qop;
use std::result;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid host in credential mapping: {0:?}")]
    InvalidHost(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Bad Qop option: {0}")]
    BadQop(String),

    #[error("Unsupported Qop option: {0}")]
    UnsupportedQop(Qop),

    #[error("Unable to generate a client nonce: {0}")]
    Random(#[from] rand::Error),
}

pub type Result<T> = result::Result<T, Error>;
