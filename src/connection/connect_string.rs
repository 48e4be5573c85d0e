//! ODBC connection string construction.
//!
//! Maps profile fields to `Key=value` pairs in a fixed order, skips absent
//! fields and joins the pairs with `"; "`.

use crate::instance::ConnectionProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which keyword set the connection string is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordSet {
    /// DSN, Host, Port, Database, AuthMech, UserSASL, UID, PWD, SSL,
    /// AllowSelfSignedServerCert. No integrated security.
    Base,
    /// The base set plus DBCNAME after DSN, with integrated security support.
    #[default]
    Full,
}

impl KeywordSet {
    /// Parses a keyword set name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "base" => Some(Self::Base),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    /// Whether this set honours `use_integrated_security`.
    pub fn supports_integrated_security(&self) -> bool {
        matches!(self, Self::Full)
    }
}

impl fmt::Display for KeywordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Builds the connection string for `profile`.
///
/// `password` is the already-resolved plaintext password. When integrated
/// security applies, `UID` and `PWD` are never emitted.
pub fn build_connection_string(
    profile: &ConnectionProfile,
    password: Option<&str>,
    keywords: KeywordSet,
) -> String {
    let integrated = keywords.supports_integrated_security() && profile.integrated_security();

    let mut pairs: Vec<(&str, Option<String>)> = Vec::with_capacity(11);
    pairs.push(("DSN", profile.dsn.clone()));
    if keywords == KeywordSet::Full {
        pairs.push(("DBCNAME", profile.dbcname.clone()));
    }
    pairs.push(("Host", profile.host.clone()));
    pairs.push(("Port", profile.port.map(|p| p.to_string())));
    pairs.push(("Database", profile.default_db.clone()));
    pairs.push(("AuthMech", profile.authmech.clone()));
    pairs.push(("UserSASL", profile.usesasl.clone()));
    if !integrated {
        pairs.push(("UID", profile.user.clone()));
        pairs.push(("PWD", password.map(String::from)));
    }
    pairs.push(("SSL", profile.usessl.clone()));
    pairs.push(("AllowSelfSignedServerCert", profile.allowselfsignedcert.clone()));

    pairs
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={v}")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Replaces the value of any `PWD=` pair with asterisks, for logging.
pub fn redact_connection_string(connection_string: &str) -> String {
    connection_string
        .split("; ")
        .map(|pair| {
            if pair.starts_with("PWD=") {
                "PWD=****".to_string()
            } else {
                pair.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
