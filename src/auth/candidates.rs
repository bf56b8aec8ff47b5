// Candidate authentication transactions
// Static, ordered lists of login calls worth trying

use serde_json::{json, Value};

use super::types::{CandidateTransaction, Credentials, Protocol};

/// REST login paths, tried in this order
pub const REST_PATHS: &[&str] = &[
    "/api/v2/auth/login",
    "/api/v2/login",
    "/api/v1/users/login",
    "/api/v1/login",
    "/api/auth/login",
    "/login",
];

/// Field names the identifier may go under, each paired with `password`
pub const REST_IDENTIFIER_FIELDS: &[&str] = &["email", "username", "user_name", "user"];

/// Label reported for any REST match
pub const REST_LABEL: &str = "rest";

/// Single GraphQL endpoint all mutations go to
pub const GRAPHQL_PATH: &str = "/api/v2/graphql";

/// Mutation names, tried in this order
pub const GRAPHQL_MUTATIONS: &[&str] = &["login", "authenticate", "signIn"];

/// Credential payload with the identifier under `field`
pub fn rest_payload(field: &str, creds: &Credentials) -> Value {
    let mut payload = serde_json::Map::new();
    payload.insert(field.to_string(), Value::from(creds.identifier()));
    payload.insert("password".to_string(), Value::from(creds.secret()));
    Value::Object(payload)
}

/// Every (path, payload shape) pair, paths outermost
pub fn rest_candidates(creds: &Credentials) -> Vec<CandidateTransaction> {
    REST_PATHS
        .iter()
        .flat_map(|&path| {
            REST_IDENTIFIER_FIELDS
                .iter()
                .map(move |field| CandidateTransaction {
                    protocol: Protocol::Rest,
                    endpoint: path,
                    body: rest_payload(field, creds),
                    label: REST_LABEL.to_string(),
                })
        })
        .collect()
}

/// Mutation document asking for every token field we know of
pub fn mutation_document(name: &str) -> String {
    format!(
        "mutation($email:String!,$password:String!){{ {}(email:$email,password:$password){{ token access_token jwt }} }}",
        name
    )
}

/// One `{query, variables}` body per mutation name
pub fn graphql_candidates(creds: &Credentials) -> Vec<CandidateTransaction> {
    GRAPHQL_MUTATIONS
        .iter()
        .map(|name| CandidateTransaction {
            protocol: Protocol::GraphQl,
            endpoint: GRAPHQL_PATH,
            body: json!({
                "query": mutation_document(name),
                "variables": {
                    "email": creds.identifier(),
                    "password": creds.secret(),
                },
            }),
            label: name.to_string(),
        })
        .collect()
}

/// Copy of a candidate body safe to print: the secret is masked
pub fn redacted_body(body: &Value) -> Value {
    match body {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    if key == "password" {
                        (key.clone(), Value::from("***"))
                    } else {
                        (key.clone(), redacted_body(value))
                    }
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
