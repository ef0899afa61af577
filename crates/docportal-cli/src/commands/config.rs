//! Configuration inspection CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use docportal_core::config::AppConfig;
use docportal_core::error::AppError;

/// Placeholder printed instead of secrets.
const REDACTED: &str = "****";

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = redacted(config);
            match format {
                OutputFormat::Json => output::print_item(&config, format),
                OutputFormat::Table => {
                    println!("Server");
                    output::print_kv("host", &config.server.host);
                    output::print_kv("port", &config.server.port.to_string());
                    output::print_kv(
                        "request timeout (s)",
                        &config.server.request_timeout_seconds.to_string(),
                    );
                    println!("Database");
                    output::print_kv("url", &config.database.url);
                    output::print_kv(
                        "max connections",
                        &config.database.max_connections.to_string(),
                    );
                    output::print_kv(
                        "run migrations",
                        &config.database.run_migrations.to_string(),
                    );
                    println!("Auth");
                    output::print_kv("jwt secret", &config.auth.jwt_secret);
                    output::print_kv(
                        "token ttl (min)",
                        &config.auth.jwt_access_ttl_minutes.to_string(),
                    );
                    output::print_kv("registration role", &config.auth.registration_role);
                    println!("Storage");
                    output::print_kv("root path", &config.storage.root_path);
                    output::print_kv(
                        "max upload (bytes)",
                        &config.storage.max_upload_size_bytes.to_string(),
                    );
                    println!("Logging");
                    output::print_kv("level", &config.logging.level);
                    output::print_kv("format", &config.logging.format);
                }
            }
        }
    }

    Ok(())
}

/// A copy of the configuration with secrets masked.
fn redacted(config: &AppConfig) -> AppConfig {
    let mut config = config.clone();
    config.database.url = mask_password(&config.database.url);
    config.auth.jwt_secret = REDACTED.to_string();
    config
}

/// Mask password in database URL for display
fn mask_password(url: &str) -> String {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if colon_pos > scheme_end {
                return format!("{}{}{}", &url[..=colon_pos], REDACTED, &url[at_pos..]);
            }
        }
    }
    url.to_string()
}
