// SofitView toolkit - Library root

pub mod auth;
pub mod config;
pub mod error;
pub mod fleet;
pub mod http_client;
