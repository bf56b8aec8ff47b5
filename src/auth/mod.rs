// Authentication module
// Discovers a working login call and extracts its token

mod candidates;
mod graphql;
mod prober;
mod rest;
mod scanner;
mod types;

pub use candidates::{GRAPHQL_MUTATIONS, GRAPHQL_PATH, REST_IDENTIFIER_FIELDS, REST_PATHS};
pub use graphql::GraphqlProber;
pub use prober::CredentialProber;
pub use rest::RestProber;
pub use scanner::{find_graphql_token, find_token, is_token_key};
pub use types::{CandidateTransaction, Credentials, ProbeResult, Protocol, TokenMatch};

#[cfg(test)]
pub(crate) use prober::testing;
