use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dialoguer::{Input, Password};

use crate::auth::{CredentialProber, Credentials};
use crate::http_client::DEFAULT_TIMEOUT_SECS;

/// SofitView fleet API toolkit
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Root address of the fleet service
    #[arg(long, env = "SOFIT_BASE_URL", default_value = "https://sofitview.com.br")]
    pub base_url: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Surface every request and (truncated) response
    #[arg(long, env = "DEBUG", value_parser = clap::builder::FalseyValueParser::new())]
    pub debug: bool,

    /// HTTP request timeout in seconds
    #[arg(long, env = "SOFIT_HTTP_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: CommandArgs,
}

#[derive(Subcommand, Debug)]
pub enum CommandArgs {
    /// Discover a working login call and print its token
    Token {
        #[command(flatten)]
        login: LoginArgs,

        /// Shell syntax for the export line
        #[arg(long, value_enum, default_value_t = ExportShell::platform_default())]
        shell: ExportShell,
    },

    /// List recent service orders for a vehicle
    Report {
        /// API token (probed from credentials when absent)
        #[arg(long, env = "SOFIT_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Vehicle name, matched case-insensitively as a substring
        #[arg(long, env = "SOFIT_VEHICLE")]
        vehicle: String,

        /// Look back this many days for service orders
        #[arg(long, env = "SOFIT_REPORT_DAYS", default_value = "60")]
        days: u32,

        /// Vehicles per page while searching
        #[arg(long, default_value = "20")]
        per_page: u32,

        /// Give up the vehicle search after this many pages
        #[arg(long, default_value = "100")]
        max_pages: u32,

        /// Service orders fetched
        #[arg(long, default_value = "20")]
        orders_per_page: u32,

        #[command(flatten)]
        login: LoginArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LoginArgs {
    /// Login identifier (usually an email)
    #[arg(short, long, env = "SOFIT_USER")]
    pub user: Option<String>,

    /// Login secret
    #[arg(short, long, env = "SOFIT_PASS", hide_env_values = true)]
    pub password: Option<String>,
}

/// Shell flavour for the token export statement
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum ExportShell {
    Posix,
    Powershell,
}

impl ExportShell {
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            ExportShell::Powershell
        } else {
            ExportShell::Posix
        }
    }

    /// Copy-pasteable statement exporting `SOFIT_TOKEN`
    pub fn export_statement(&self, token: &str) -> String {
        match self {
            ExportShell::Posix => {
                format!("export SOFIT_TOKEN='{}'", token.replace('\'', r"'\''"))
            }
            ExportShell::Powershell => {
                format!("$env:SOFIT_TOKEN = \"{}\"", token.replace('"', "`\""))
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub log_level: String,
    pub debug: bool,
    pub http_timeout: u64,
    pub command: Command,
}

#[derive(Clone, Debug)]
pub enum Command {
    Token {
        login: LoginArgs,
        shell: ExportShell,
    },
    Report(ReportOptions),
}

#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub token: Option<String>,
    pub vehicle: String,
    pub days: u32,
    pub per_page: u32,
    pub max_pages: u32,
    pub orders_per_page: u32,
    pub login: LoginArgs,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Self::from_args(CliArgs::parse()))
    }

    pub fn from_args(args: CliArgs) -> Self {
        let command = match args.command {
            CommandArgs::Token { login, shell } => Command::Token { login, shell },
            CommandArgs::Report {
                token,
                vehicle,
                days,
                per_page,
                max_pages,
                orders_per_page,
                login,
            } => Command::Report(ReportOptions {
                token: token.filter(|t| !t.trim().is_empty()),
                vehicle,
                days,
                per_page,
                max_pages,
                orders_per_page,
                login,
            }),
        };

        Config {
            base_url: args.base_url,
            log_level: args.log_level,
            debug: args.debug,
            http_timeout: args.timeout,
            command,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            anyhow::bail!("SOFIT_BASE_URL must start with http:// or https://: {}", self.base_url);
        }

        if self.http_timeout == 0 {
            anyhow::bail!("SOFIT_HTTP_TIMEOUT must be at least 1 second");
        }

        if let Command::Report(report) = &self.command {
            if report.vehicle.trim().is_empty() {
                anyhow::bail!("SOFIT_VEHICLE cannot be empty");
            }
            if report.days == 0 {
                anyhow::bail!("--days must be at least 1");
            }
            if report.per_page == 0 || report.max_pages == 0 || report.orders_per_page == 0 {
                anyhow::bail!("Page sizes and page limits must be at least 1");
            }
        }

        Ok(())
    }
}

impl ReportOptions {
    /// Token for the report: an explicit `--token`/`SOFIT_TOKEN` wins,
    /// otherwise one is probed for when both credentials are set.
    pub async fn resolve_token(&self, prober: &CredentialProber) -> Result<String> {
        if let Some(token) = &self.token {
            tracing::info!("Using token from SOFIT_TOKEN");
            return Ok(token.clone());
        }

        if !self.login.is_complete() {
            anyhow::bail!(
                "Token not found. Set SOFIT_TOKEN (or --token), or SOFIT_USER and SOFIT_PASS to probe for one"
            );
        }

        tracing::info!("No SOFIT_TOKEN set, probing for one with SOFIT_USER/SOFIT_PASS");
        let creds = self.login.resolve()?;
        let result = prober.probe(&creds).await;
        match result.matched {
            Some(found) => Ok(found.token),
            None => anyhow::bail!(
                "Unable to obtain a token with the given credentials after {} attempts",
                result.attempts
            ),
        }
    }
}

impl LoginArgs {
    pub fn is_complete(&self) -> bool {
        self.user.as_deref().is_some_and(|u| !u.is_empty())
            && self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Credentials from args/env, prompting for whatever is missing
    pub fn resolve(&self) -> Result<Credentials> {
        let user = match self.user.as_deref().filter(|u| !u.is_empty()) {
            Some(user) => user.to_string(),
            None => Input::<String>::new()
                .with_prompt("User / email (SOFIT_USER)")
                .interact_text()
                .context("Failed to read SOFIT_USER")?,
        };

        let password = match self.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => password.to_string(),
            None => Password::new()
                .with_prompt("Password (SOFIT_PASS)")
                .interact()
                .context("Failed to read SOFIT_PASS")?,
        };

        if user.is_empty() || password.is_empty() {
            anyhow::bail!("SOFIT_USER and SOFIT_PASS cannot be empty");
        }

        Ok(Credentials::new(user, password))
    }
}
