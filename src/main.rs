use anyhow::Result;
use chrono::{Duration, Utc};
use std::process::ExitCode;

use sofit_toolkit::auth::CredentialProber;
use sofit_toolkit::config::{Command, Config, ExportShell, LoginArgs, ReportOptions};
use sofit_toolkit::error::FleetError;
use sofit_toolkit::fleet::{render_report, FleetClient};
use sofit_toolkit::http_client::HttpTransport;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let config = Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level; stdout is reserved for results
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!("Base URL: {}", config.base_url);
    tracing::debug!("Debug output: {}", config.debug);

    match &config.command {
        Command::Token { login, shell } => run_token(&config, login, *shell).await,
        Command::Report(options) => run_report(&config, options).await,
    }
}

/// Prober over the configured transport
fn prober(config: &Config) -> Result<CredentialProber> {
    let transport = HttpTransport::new(config.http_timeout)?;
    Ok(CredentialProber::new(
        Box::new(transport),
        config.base_url.clone(),
        config.debug,
    ))
}

/// `token`: find a token and print it with an export line
async fn run_token(config: &Config, login: &LoginArgs, shell: ExportShell) -> Result<ExitCode> {
    let creds = login.resolve()?;
    println!(
        "Trying to obtain a token for {} at {}...",
        creds.identifier(),
        config.base_url
    );

    let result = prober(config)?.probe(&creds).await;

    let Some(found) = result.matched else {
        println!();
        println!("Unable to obtain a token automatically.");
        println!(
            "Inspect the login request in the browser (DevTools -> Network) or provide a token manually."
        );
        tracing::warn!("❌ No token after {} attempts", result.attempts);
        return Ok(ExitCode::FAILURE);
    };

    println!();
    println!(
        "Token found ({}, {}) at {}:",
        found.protocol, found.source_label, found.source_endpoint
    );
    println!("{}", found.token);
    println!();
    println!("Export for your shell:");
    println!("{}", shell.export_statement(&found.token));

    Ok(ExitCode::SUCCESS)
}

/// `report`: look up the vehicle and list its recent service orders
async fn run_report(config: &Config, options: &ReportOptions) -> Result<ExitCode> {
    let token = options.resolve_token(&prober(config)?).await?;

    let client = FleetClient::new(&config.base_url, &token, config.http_timeout)?;

    let vehicle = client
        .find_vehicle_by_name(&options.vehicle, options.per_page, options.max_pages)
        .await?
        .ok_or_else(|| FleetError::VehicleNotFound(options.vehicle.clone()))?;

    println!(
        "Vehicle found: {} (ID {})",
        vehicle.name.as_deref().unwrap_or("N/A"),
        vehicle.id
    );

    let since = Utc::now() - Duration::days(i64::from(options.days));
    let orders = client
        .recent_service_orders(&options.vehicle, since, options.orders_per_page)
        .await?;
    tracing::debug!("Fetched {} service orders", orders.len());

    println!();
    println!("{}", render_report(&vehicle, &orders));

    Ok(ExitCode::SUCCESS)
}
