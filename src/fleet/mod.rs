// Fleet module
// Vehicle lookup and service-order reporting over the fleet GraphQL API

mod client;
mod models;
mod report;

pub use client::{date_filter, FleetClient};
pub use models::{ForeseenItem, NamedRef, PartyRef, RecordId, ServiceOrder, Vehicle};
pub use report::{format_brl, format_timestamp, parse_cost, render_report, render_service_order};
