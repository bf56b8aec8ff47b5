// Fleet API data models

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Record identifier; the API hands back numbers or strings depending on the type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// `{ id name }` reference
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Supplier or employee: usually an object, occasionally a bare string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PartyRef {
    Named(NamedRef),
    Text(String),
}

impl PartyRef {
    pub fn display_name(&self) -> Option<&str> {
        match self {
            PartyRef::Named(named) => named.name.as_deref(),
            PartyRef::Text(s) => Some(s.as_str()),
        }
        .filter(|s| !s.is_empty())
    }
}

/// Vehicle as listed by `vehicles(page, perPage)`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Vehicle {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
}

/// Item expected to be used by a service order
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForeseenItem {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "foreseenQuantity")]
    pub foreseen_quantity: Option<Value>,
    #[serde(default)]
    pub item: Option<NamedRef>,
}

impl ForeseenItem {
    /// Own name, falling back to the catalogue item's name
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.item.as_ref().and_then(|item| item.name.as_deref()))
            .filter(|s| !s.is_empty())
    }
}

/// Service order node. Display-only scalars stay untyped and are printed as sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceOrder {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub vehicle: Option<NamedRef>,
    /// Number or numeric string
    #[serde(default)]
    pub total_cost: Option<Value>,
    #[serde(default)]
    pub problem_description: Option<Value>,
    #[serde(default)]
    pub supplier: Option<PartyRef>,
    #[serde(default)]
    pub employee: Option<PartyRef>,
    #[serde(default)]
    pub foreseen_service_order_items: Option<Vec<ForeseenItem>>,
}

impl ServiceOrder {
    pub fn belongs_to(&self, vehicle_id: &RecordId) -> bool {
        self.vehicle
            .as_ref()
            .and_then(|v| v.id.as_ref())
            .is_some_and(|id| id == vehicle_id)
    }
}

/// `{ nodes [...] }` connection. Nodes are kept raw so one malformed node
/// does not sink the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connection {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<Value>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl Connection {
    /// Nodes that decode as `T`; the rest are logged and dropped
    pub fn decoded<T: DeserializeOwned>(&self) -> Vec<T> {
        self.nodes
            .iter()
            .filter_map(|node| match T::deserialize(node) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::debug!(error = %e, node = %node, "Skipping unusable node");
                    None
                }
            })
            .collect()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct VehiclesData {
    pub vehicles: Option<Connection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrdersData {
    pub service_orders: Option<Connection>,
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
}
