// Authentication types

use serde_json::Value;
use std::fmt;

/// Login identifier and secret, fixed for the lifetime of a probe
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"***")
            .finish()
    }
}

/// Wire protocol of a candidate transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Rest,
    GraphQl,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Rest => write!(f, "REST"),
            Protocol::GraphQl => write!(f, "GraphQL"),
        }
    }
}

/// One speculative authentication request
#[derive(Debug, Clone)]
pub struct CandidateTransaction {
    pub protocol: Protocol,
    /// Path suffix appended to the base URL
    pub endpoint: &'static str,
    /// JSON body: a credential payload (REST) or `{query, variables}` (GraphQL)
    pub body: Value,
    pub label: String,
}

/// Where a token was found
#[derive(Debug, Clone, PartialEq)]
pub struct TokenMatch {
    pub token: String,
    pub source_endpoint: String,
    pub source_label: String,
    pub protocol: Protocol,
}

/// Outcome of a probe run
///
/// A run that found nothing is still a successful run: `matched` is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeResult {
    pub matched: Option<TokenMatch>,
    /// Number of HTTP attempts issued
    pub attempts: usize,
}

impl ProbeResult {
    pub fn not_found(attempts: usize) -> Self {
        Self {
            matched: None,
            attempts,
        }
    }

    pub fn found(&self) -> bool {
        self.matched.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.matched.as_ref().map(|m| m.token.as_str())
    }

    pub fn source_endpoint(&self) -> Option<&str> {
        self.matched.as_ref().map(|m| m.source_endpoint.as_str())
    }

    pub fn source_label(&self) -> Option<&str> {
        self.matched.as_ref().map(|m| m.source_label.as_str())
    }
}
