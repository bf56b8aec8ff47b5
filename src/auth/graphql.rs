// GraphQL prober
// Sends login-style mutations to the GraphQL endpoint

use super::candidates::graphql_candidates;
use super::prober::run_candidates;
use super::types::{Credentials, ProbeResult};
use crate::http_client::Transport;

/// Tries `login`, `authenticate` and `signIn` mutations in turn
pub struct GraphqlProber<'a> {
    transport: &'a dyn Transport,
    base_url: &'a str,
    debug: bool,
}

impl<'a> GraphqlProber<'a> {
    pub fn new(transport: &'a dyn Transport, base_url: &'a str, debug: bool) -> Self {
        Self {
            transport,
            base_url,
            debug,
        }
    }

    /// First mutation whose response carries a token, labelled with the mutation name
    pub async fn probe(&self, creds: &Credentials) -> ProbeResult {
        let candidates = graphql_candidates(creds);
        run_candidates(self.transport, self.base_url, &candidates, self.debug).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::prober::testing::*;

    #[tokio::test]
    async fn test_graphql_prober_exhaustion() {
        let transport =
            ScriptedTransport::always(r#"{"errors":[{"message":"Unknown mutation"}]}"#);
        let creds = Credentials::new("fleet@example.com", "s3cret");
        let result = GraphqlProber::new(&transport, "https://fleet.example.com", false)
            .probe(&creds)
            .await;

        assert!(!result.found());
        assert_eq!(result.attempts, 3);
        assert!(transport
            .urls()
            .iter()
            .all(|u| u == "https://fleet.example.com/api/v2/graphql"));
    }

    #[tokio::test]
    async fn test_graphql_prober_labels_with_mutation_name() {
        let transport = ScriptedTransport::new(|_, body, _| {
            let query = body["query"].as_str().unwrap_or_default();
            if query.contains("authenticate(") {
                Ok(ok(r#"{"data":{"authenticate":{"access_token":"gql-token"}}}"#))
            } else {
                Err(transport_failure())
            }
        });
        let creds = Credentials::new("fleet@example.com", "s3cret");
        let result = GraphqlProber::new(&transport, "https://fleet.example.com", false)
            .probe(&creds)
            .await;

        assert_eq!(result.token(), Some("gql-token"));
        assert_eq!(result.source_label(), Some("authenticate"));
        assert_eq!(result.attempts, 2);
    }
}
