//! `WWW-Authenticate` challenge parsing.
//!
//! Values are kept in their raw wire form: a quoted value keeps its quotes
//! and escapes, use [`unquote`](crate::unquote) to decode it. Parameter names
//! are not case-normalized.

use crate::digest::{compute_digest, AuthContext};
use crate::Result;
use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

/// Tokenizer state while scanning a header for unquoted `=` signs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Plain { escaped: bool },
    InQuotes { escaped: bool },
}

impl ScanState {
    fn escaped(self) -> bool {
        match self {
            ScanState::Plain { escaped } | ScanState::InQuotes { escaped } => escaped,
        }
    }

    fn in_quotes(self) -> bool {
        matches!(self, ScanState::InQuotes { .. })
    }

    /// Advance over one character. An unescaped `"` toggles quoting; a
    /// backslash flips the escape flag and anything else clears it.
    fn next(self, c: char) -> Self {
        let toggle = c == '"' && !self.escaped();
        let escaped = c == '\\' && !self.escaped();

        if self.in_quotes() != toggle {
            ScanState::InQuotes { escaped }
        } else {
            ScanState::Plain { escaped }
        }
    }
}

impl Default for ScanState {
    fn default() -> Self {
        ScanState::Plain { escaped: false }
    }
}

/// Split a header at every `=` that is outside a quoted string.
/// The `=` itself does not change the escape flag.
fn split_segments(header: &str) -> Vec<&str> {
    let mut segments = vec![];
    let mut state = ScanState::default();
    let mut start = 0;

    for (i, c) in header.char_indices() {
        if c == '=' && !state.in_quotes() {
            segments.push(&header[start..i]);
            start = i + 1;
            continue;
        }
        state = state.next(c);
    }
    segments.push(&header[start..]);

    segments
}

/// Last space-delimited word of the segment preceding an `=`
fn param_name(segment: &str) -> &str {
    segment.rsplit(' ').next().unwrap_or(segment)
}

/// Value at the start of the segment following an `=`
fn param_value(segment: &str) -> &str {
    let value = if segment.starts_with('"') {
        // everything through the last quote of the segment
        match segment.rfind('"') {
            Some(end) => &segment[..=end],
            None => segment,
        }
    } else {
        segment.split(' ').next().unwrap_or(segment)
    };

    value.strip_suffix(',').unwrap_or(value)
}

/// Parse the parameters of a `WWW-Authenticate` header into a name -> raw value map
pub fn parse_header_map(header: &str) -> HashMap<String, String> {
    split_segments(header)
        .windows(2)
        .map(|pair| (param_name(pair[0]).to_string(), param_value(pair[1]).to_string()))
        .collect()
}

/// Authentication scheme of a raw header: its first space-delimited word
pub fn scheme(header: &str) -> &str {
    header.split(' ').next().unwrap_or(header)
}

/// Parameters of a server challenge, produced fresh for each attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Challenge {
    params: HashMap<String, String>,
}

impl Challenge {
    /// Construct from the `WWW-Authenticate` header string
    pub fn parse(header: &str) -> Self {
        Self {
            params: parse_header_map(header),
        }
    }

    /// Raw value of a parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Raw value of a parameter, or an empty string if absent
    pub fn param(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Compute the Digest `Authorization` header value answering this challenge
    pub fn respond(&self, context: &AuthContext) -> Result<String> {
        compute_digest(self, context)
    }
}

impl FromStr for Challenge {
    type Err = Infallible;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(input))
    }
}
