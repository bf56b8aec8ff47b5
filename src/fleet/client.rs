use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::models::{GraphQlResponse, ServiceOrder, ServiceOrdersData, Vehicle, VehiclesData};
use crate::auth::GRAPHQL_PATH;
use crate::error::{FleetError, Result};
use crate::http_client::{build_client, error_kind, join_url};

const VEHICLES_QUERY: &str = r#"
query ($page:Int!, $perPage:Int!) {
  vehicles(page: $page, perPage: $perPage) {
    nodes { id name }
  }
}
"#;

const SERVICE_ORDERS_QUERY: &str = r#"
query ($dateFilter: DateTime!, $search: String, $perPage: Int!) {
  serviceOrders(
    page: 1,
    perPage: $perPage,
    lastIntegrationDate: $dateFilter,
    search: $search
  ) {
    nodes {
      id
      name
      status
      created_at
      vehicle { id name }
      total_cost
      problem_description
      supplier { id name }
      employee { id name }
      foreseen_service_order_items {
        id
        name
        foreseen_quantity
        item { id name }
      }
    }
    count
  }
}
"#;

/// Bearer-token GraphQL client for the fleet API
pub struct FleetClient {
    client: Client,
    graphql_url: String,
}

impl FleetClient {
    /// Create a new client; every request carries `Authorization: Bearer <token>`
    pub fn new(base_url: &str, token: &str, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs, Some(token))?,
            graphql_url: join_url(base_url, GRAPHQL_PATH),
        })
    }

    /// Run one GraphQL operation and decode its `data`
    async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let body = json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(&self.graphql_url)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error_kind = error_kind(e),
                    error = %e,
                    url = %self.graphql_url,
                    "GraphQL request error"
                )
            })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(FleetError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let raw: Value = serde_json::from_str(&text).map_err(|e| {
            FleetError::Decode(format!(
                "response is not valid JSON (status {}): {}",
                status.as_u16(),
                e
            ))
        })?;
        let envelope: GraphQlResponse<T> = serde_json::from_value(raw).map_err(|e| {
            FleetError::Decode(format!(
                "unexpected response shape (status {}): {}",
                status.as_u16(),
                e
            ))
        })?;

        if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
            return Err(FleetError::GraphQl(describe_errors(&errors)));
        }

        envelope
            .data
            .ok_or_else(|| FleetError::Decode("response has no data".to_string()))
    }

    /// Page through vehicles and return the first whose name contains `name`,
    /// case-insensitively.
    ///
    /// A page that fails to load is logged and skipped. GraphQL errors abort
    /// the search. An empty page ends it. Nodes without a usable id are
    /// ignored while the rest of their page is still searched.
    pub async fn find_vehicle_by_name(
        &self,
        name: &str,
        per_page: u32,
        max_pages: u32,
    ) -> Result<Option<Vehicle>> {
        let needle = name.to_lowercase();

        for page in 1..=max_pages {
            tracing::debug!(page = page, per_page = per_page, "Fetching vehicles page");

            let variables = json!({ "page": page, "perPage": per_page });
            let data = match self.query::<VehiclesData>(VEHICLES_QUERY, variables).await {
                Ok(data) => data,
                Err(e @ FleetError::GraphQl(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!("Failed to load vehicles page {}: {}", page, e);
                    continue;
                }
            };

            let page_nodes = data.vehicles.unwrap_or_default();
            if page_nodes.nodes.is_empty() {
                break;
            }

            let found = page_nodes.decoded::<Vehicle>().into_iter().find(|vehicle| {
                vehicle
                    .name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            });
            if found.is_some() {
                return Ok(found);
            }
        }

        Ok(None)
    }

    /// Service orders integrated since `since`, full-text searched by `search`
    pub async fn recent_service_orders(
        &self,
        search: &str,
        since: DateTime<Utc>,
        per_page: u32,
    ) -> Result<Vec<ServiceOrder>> {
        let variables = json!({
            "dateFilter": date_filter(since),
            "search": search,
            "perPage": per_page,
        });

        let data: ServiceOrdersData = self.query(SERVICE_ORDERS_QUERY, variables).await?;
        Ok(data
            .service_orders
            .map(|c| c.decoded::<ServiceOrder>())
            .unwrap_or_default())
    }
}

/// Midnight (UTC) of the given day, as the API's DateTime filter expects
pub fn date_filter(since: DateTime<Utc>) -> String {
    since.format("%Y-%m-%dT00:00:00Z").to_string()
}

/// Flatten a GraphQL `errors` array into one line
fn describe_errors(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|error| {
            error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string())
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_filter_truncates_to_midnight() {
        let since = Utc.with_ymd_and_hms(2026, 8, 19, 15, 42, 7).unwrap();
        assert_eq!(date_filter(since), "2026-08-19T00:00:00Z");
    }

    #[test]
    fn test_describe_errors() {
        let errors = vec![
            json!({"message": "Field 'search' doesn't exist"}),
            json!({"code": 500}),
        ];
        assert_eq!(
            describe_errors(&errors),
            r#"Field 'search' doesn't exist; {"code":500}"#
        );
    }

    #[test]
    fn test_graphql_url() {
        let client = FleetClient::new("https://sofitview.com.br/", "token", 10).unwrap();
        assert_eq!(client.graphql_url, "https://sofitview.com.br/api/v2/graphql");
    }
}
