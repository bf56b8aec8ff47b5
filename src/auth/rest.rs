// REST prober
// POSTs credential payloads to common login paths

use super::candidates::rest_candidates;
use super::prober::run_candidates;
use super::types::{Credentials, ProbeResult};
use crate::http_client::Transport;

/// Tries every login path with every payload shape, paths outermost
pub struct RestProber<'a> {
    transport: &'a dyn Transport,
    base_url: &'a str,
    debug: bool,
}

impl<'a> RestProber<'a> {
    pub fn new(transport: &'a dyn Transport, base_url: &'a str, debug: bool) -> Self {
        Self {
            transport,
            base_url,
            debug,
        }
    }

    /// First REST response carrying a token, labelled `rest`
    pub async fn probe(&self, creds: &Credentials) -> ProbeResult {
        let candidates = rest_candidates(creds);
        run_candidates(self.transport, self.base_url, &candidates, self.debug).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::prober::testing::*;

    #[tokio::test]
    async fn test_rest_prober_visits_paths_in_order() {
        let transport = ScriptedTransport::always("{}");
        let creds = Credentials::new("fleet@example.com", "s3cret");
        let result = RestProber::new(&transport, "https://fleet.example.com/", false)
            .probe(&creds)
            .await;

        assert!(!result.found());
        let urls = transport.urls();
        assert_eq!(urls.len(), 24);
        assert!(urls[..4]
            .iter()
            .all(|u| u == "https://fleet.example.com/api/v2/auth/login"));
        assert_eq!(urls[4], "https://fleet.example.com/api/v2/login");
        assert_eq!(urls[23], "https://fleet.example.com/login");
    }

    #[tokio::test]
    async fn test_rest_prober_returns_resolved_url() {
        let transport = ScriptedTransport::new(|url, body, _| {
            if url.ends_with("/api/v1/users/login") && body.get("username").is_some() {
                Ok(ok(r#"{"session":{"auth_token":"u-token","expires":3600}}"#))
            } else {
                Ok(with_status(401, r#"{"error":"unauthorized"}"#))
            }
        });
        let creds = Credentials::new("fleet@example.com", "s3cret");
        let result = RestProber::new(&transport, "https://fleet.example.com", false)
            .probe(&creds)
            .await;

        assert_eq!(result.token(), Some("u-token"));
        assert_eq!(
            result.source_endpoint(),
            Some("https://fleet.example.com/api/v1/users/login")
        );
        assert_eq!(result.source_label(), Some("rest"));
        // two full paths (8) then email, username on the third
        assert_eq!(result.attempts, 10);
    }
}
