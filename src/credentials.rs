//! Per-host credentials.
//!
//! A [`CredentialStore`] is built once from an optional credentials file and an
//! optional explicit mapping, and is read-only afterwards.

use crate::{Error, Result};
use log::{debug, trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Username and password for one host
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Split a `username[:password]` payload on the first colon.
    ///
    /// Colons after the first one belong to the password. An empty payload
    /// gives an empty username and password.
    pub fn parse(payload: &str) -> Self {
        match payload.split_once(':') {
            Some((username, password)) => Self::new(username, password),
            None => Self::new(payload, ""),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Read `host[ username[:password]]` lines into a host -> payload map.
///
/// The host ends at the first space; the rest of the line, spaces included,
/// is the payload. Later lines for the same host replace earlier ones.
pub fn read_credentials_file(path: &Path) -> Result<HashMap<String, String>> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);

    let mut entries = HashMap::new();
    for line in content.lines() {
        if line.is_empty() {
            continue;
        }

        let (host, payload) = line.split_once(' ').unwrap_or((line, ""));
        entries.insert(host.to_string(), payload.to_string());
    }

    debug!(
        "Read {} credential entries from {}",
        entries.len(),
        path.display()
    );
    Ok(entries)
}

/// Immutable mapping from host to [`Credential`]
#[derive(Debug, Default, Clone)]
pub struct CredentialStore {
    creds: HashMap<String, Credential>,
}

impl CredentialStore {
    /// Build the store from a credentials file and an explicit mapping.
    ///
    /// Explicit entries replace file entries for the same host. A missing or
    /// unreadable file is logged and treated as empty.
    ///
    /// # Errors
    /// If the explicit mapping contains an empty host or a host with whitespace.
    pub fn load(file: Option<&Path>, explicit: Option<&HashMap<String, String>>) -> Result<Self> {
        let mut store = Self::default();

        if let Some(path) = file {
            match read_credentials_file(path) {
                Ok(entries) => store.populate(entries),
                Err(e) => warn!(
                    "Couldn't read credentials file {}: {}",
                    path.display(),
                    e
                ),
            }
        }

        if let Some(explicit) = explicit {
            validate_hosts(explicit.keys())?;
            store.populate(explicit.iter().map(|(h, p)| (h.clone(), p.clone())));
        }

        Ok(store)
    }

    /// Build from `(host, "username[:password]")` pairs
    ///
    /// # Errors
    /// If a host is empty or contains whitespace.
    pub fn from_entries<I, H, P>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (H, P)>,
        H: Into<String>,
        P: AsRef<str>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(h, p)| (h.into(), p.as_ref().to_string()))
            .collect();
        validate_hosts(entries.iter().map(|(h, _)| h))?;

        let mut store = Self::default();
        store.populate(entries);
        Ok(store)
    }

    fn populate(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        for (host, payload) in entries {
            self.creds.insert(host, Credential::parse(&payload));
        }
    }

    /// Credential for `host`, if any
    pub fn get(&self, host: &str) -> Option<&Credential> {
        let cred = self.creds.get(host);
        if cred.is_none() {
            trace!("No credentials for host {}", host);
        }
        cred
    }

    pub fn len(&self) -> usize {
        self.creds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creds.is_empty()
    }
}

fn validate_hosts<'a>(hosts: impl IntoIterator<Item = &'a String>) -> Result<()> {
    for host in hosts {
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return Err(Error::InvalidHost(host.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn creds_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_payload() {
        let cred = Credential::parse("user:pa:ss");
        assert_eq!(cred.username(), "user");
        assert_eq!(cred.password(), "pa:ss");

        let cred = Credential::parse("user");
        assert_eq!(cred.username(), "user");
        assert_eq!(cred.password(), "");

        let cred = Credential::parse("");
        assert_eq!(cred, Credential::new("", ""));

        let cred = Credential::parse(":secret");
        assert_eq!(cred, Credential::new("", "secret"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let s = format!("{:?}", Credential::new("alice", "hunter2"));
        assert!(s.contains("alice"));
        assert!(!s.contains("hunter2"));
    }

    #[test]
    fn test_file_preserves_spaces() {
        let file = creds_file("host user pass word\n");
        let entries = read_credentials_file(file.path()).unwrap();
        assert_eq!(entries.get("host").unwrap(), "user pass word");
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_file_lines() {
        let file = creds_file(
            "a.example user:pass word\r\n\nb.example\nc.example bob:x:y\na.example carol:z\n",
        );
        let store = CredentialStore::load(Some(file.path()), None).unwrap();

        assert_eq!(store.len(), 3);
        // last occurrence wins
        assert_eq!(store.get("a.example"), Some(&Credential::new("carol", "z")));
        assert_eq!(store.get("b.example"), Some(&Credential::new("", "")));
        assert_eq!(store.get("c.example"), Some(&Credential::new("bob", "x:y")));
        assert_eq!(store.get("d.example"), None);
    }

    #[test]
    fn test_file_invalid_utf8_line() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"bad.example user:p\xffw\ngood.example alice:pw\n").unwrap();
        file.flush().unwrap();

        let store = CredentialStore::load(Some(file.path()), None).unwrap();
        assert_eq!(store.get("good.example"), Some(&Credential::new("alice", "pw")));
        assert_eq!(store.get("bad.example").unwrap().username(), "user");
    }

    #[test]
    fn test_file_user_pass_with_spaces() {
        let file = creds_file("host user:pass word\n");
        let store = CredentialStore::load(Some(file.path()), None).unwrap();
        let cred = store.get("host").unwrap();
        assert_eq!(cred.username(), "user");
        assert_eq!(cred.password(), "pass word");
    }

    #[test]
    fn test_explicit_wins() {
        let file = creds_file("h a:1\nother c:3\n");
        let explicit = HashMap::from([("h".to_string(), "b:2".to_string())]);

        let store = CredentialStore::load(Some(file.path()), Some(&explicit)).unwrap();
        assert_eq!(store.get("h"), Some(&Credential::new("b", "2")));
        assert_eq!(store.get("other"), Some(&Credential::new("c", "3")));
    }

    #[test]
    fn test_missing_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(read_credentials_file(&missing), Err(Error::Io(_))));

        let explicit = HashMap::from([("h".to_string(), "b:2".to_string())]);
        let store = CredentialStore::load(Some(&missing), Some(&explicit)).unwrap();
        assert_eq!(store.len(), 1);

        let store = CredentialStore::load(Some(&missing), None).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed_explicit() {
        let explicit = HashMap::from([("".to_string(), "a:b".to_string())]);
        assert!(matches!(
            CredentialStore::load(None, Some(&explicit)),
            Err(Error::InvalidHost(_))
        ));

        assert!(matches!(
            CredentialStore::from_entries([("bad host", "a:b")]),
            Err(Error::InvalidHost(h)) if h == "bad host"
        ));
    }

    #[test]
    fn test_from_entries() {
        let store = CredentialStore::from_entries([("x", "u:p"), ("x", "v:q")]).unwrap();
        assert_eq!(store.get("x"), Some(&Credential::new("v", "q")));
    }
}
