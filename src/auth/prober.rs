// Credential prober
// Walks candidate login calls one at a time until a response carries a token

use serde_json::Value;

use super::candidates::redacted_body;
use super::graphql::GraphqlProber;
use super::rest::RestProber;
use super::scanner::{find_graphql_token, find_token};
use super::types::{CandidateTransaction, Credentials, ProbeResult, Protocol, TokenMatch};
use crate::http_client::{join_url, truncate_body, Transport, DEBUG_BODY_LIMIT};

/// Runs the REST prober, then the GraphQL prober, and reports the first token found
pub struct CredentialProber {
    transport: Box<dyn Transport>,
    base_url: String,
    debug: bool,
}

impl CredentialProber {
    pub fn new(transport: Box<dyn Transport>, base_url: impl Into<String>, debug: bool) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            debug,
        }
    }

    /// Probe for a token. Exhausting every candidate is not an error.
    pub async fn probe(&self, creds: &Credentials) -> ProbeResult {
        tracing::info!(
            "Probing {} for a token as {}...",
            self.base_url,
            creds.identifier()
        );

        let rest = RestProber::new(self.transport.as_ref(), &self.base_url, self.debug)
            .probe(creds)
            .await;
        if rest.found() {
            return rest;
        }
        tracing::info!(
            attempts = rest.attempts,
            "No token from REST endpoints, trying GraphQL mutations"
        );

        let graphql = GraphqlProber::new(self.transport.as_ref(), &self.base_url, self.debug)
            .probe(creds)
            .await;

        ProbeResult {
            matched: graphql.matched,
            attempts: rest.attempts + graphql.attempts,
        }
    }
}

/// Pull a token out of a decoded response the way the candidate's protocol expects
pub fn scan_response<'v>(candidate: &CandidateTransaction, response: &'v Value) -> Option<&'v str> {
    match candidate.protocol {
        Protocol::Rest => find_token(response),
        Protocol::GraphQl => find_graphql_token(response),
    }
}

/// Try each candidate in order; first token wins.
///
/// Transport failures, non-JSON bodies and token-less JSON all count as
/// "no match" and the loop moves on. Nothing is retried.
pub(crate) async fn run_candidates(
    transport: &dyn Transport,
    base_url: &str,
    candidates: &[CandidateTransaction],
    debug: bool,
) -> ProbeResult {
    let mut attempts = 0;

    for candidate in candidates {
        let url = join_url(base_url, candidate.endpoint);
        attempts += 1;

        tracing::debug!(
            protocol = %candidate.protocol,
            label = %candidate.label,
            url = %url,
            attempt = attempts,
            "Trying candidate"
        );

        let exchange = match transport.post_json(&url, &candidate.body).await {
            Ok(exchange) => exchange,
            Err(e) => {
                if debug {
                    tracing::info!("DEBUG: POST {} failed: {}", url, e);
                }
                continue;
            }
        };

        if debug {
            tracing::info!(
                "DEBUG: POST {} payload={} -> status={}",
                url,
                redacted_body(&candidate.body),
                exchange.status
            );
            tracing::info!(
                "DEBUG: response text: {}",
                truncate_body(&exchange.body, DEBUG_BODY_LIMIT)
            );
        }

        let Some(response) = exchange.json() else {
            continue;
        };

        if let Some(token) = scan_response(candidate, &response) {
            tracing::info!(
                "✅ Token found via {} ({}) at {}",
                candidate.protocol,
                candidate.label,
                url
            );
            return ProbeResult {
                matched: Some(TokenMatch {
                    token: token.to_string(),
                    source_endpoint: url,
                    source_label: candidate.label.clone(),
                    protocol: candidate.protocol,
                }),
                attempts,
            };
        }
    }

    ProbeResult::not_found(attempts)
}

/// Scripted transport for driving probers without a network
#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    use crate::error::{FleetError, Result};
    use crate::http_client::{Exchange, Transport};

    type Responder = Box<dyn Fn(&str, &Value, usize) -> Result<Exchange> + Send + Sync>;

    /// Records every call and answers from a closure `(url, body, call_index)`
    pub struct ScriptedTransport {
        responder: Responder,
        pub calls: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        pub fn new(
            responder: impl Fn(&str, &Value, usize) -> Result<Exchange> + Send + Sync + 'static,
        ) -> Self {
            Self {
                responder: Box::new(responder),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Always answers 200 with the given body
        pub fn always(body: &str) -> Self {
            let body = body.to_string();
            Self::new(move |_, _, _| Ok(ok(&body)))
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn urls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<Exchange> {
            let index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((url.to_string(), body.clone()));
                calls.len() - 1
            };
            (self.responder)(url, body, index)
        }
    }

    pub fn ok(body: &str) -> Exchange {
        with_status(200, body)
    }

    pub fn with_status(status: u16, body: &str) -> Exchange {
        Exchange {
            status,
            body: body.to_string(),
        }
    }

    /// A transport-level failure without touching the network
    pub fn transport_failure() -> FleetError {
        FleetError::Decode("connection reset by peer".to_string())
    }
}
