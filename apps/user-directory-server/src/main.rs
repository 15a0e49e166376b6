use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use runtime::{default_logging_config, AppConfig, CliArgs};
use tokio_util::sync::CancellationToken;
use users_directory::{UsersDirectory, UsersDirectoryConfig};

/// User Directory Server - in-memory user directory over HTTP
#[derive(Parser)]
#[command(name = "user-directory-server")]
#[command(about = "User Directory Server - in-memory user directory over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

/// Typed module sections pulled out of the `modules` bag.
struct ModuleConfigs {
    api_ingress: ApiIngressConfig,
    users_directory: UsersDirectoryConfig,
}

impl ModuleConfigs {
    fn from_app(config: &AppConfig) -> Result<Self> {
        let users_directory: UsersDirectoryConfig = config.module_config("users_directory")?;
        users_directory.validate()?;
        Ok(Self {
            api_ingress: config.module_config("api_ingress")?,
            users_directory,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(default_logging_config);
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("User Directory Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config),
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");
    let modules = ModuleConfigs::from_app(&config)?;

    let directory = UsersDirectory::new(modules.users_directory)?;

    let ingress = ApiIngress::new(modules.api_ingress)
        .with_request_timeout(Duration::from_secs(config.server.timeout_sec))
        .with_openapi(UsersDirectory::openapi());
    let router = ingress.build_router(directory.router())?;

    // An explicit --port beats the module-level bind_addr
    let addr: SocketAddr = if args.port.is_some() {
        let raw = config.server.bind_addr();
        raw.parse()
            .with_context(|| format!("Invalid bind address '{raw}'"))?
    } else {
        ingress.resolve_bind_addr(&config.server.bind_addr())?
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = modkit::wait_for_shutdown().await {
                tracing::error!(error = %e, "signal handler failed; shutting down");
            }
            cancel.cancel();
        });
    }

    ingress.serve(router, addr, cancel).await?;
    tracing::info!("User Directory Server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    let modules = ModuleConfigs::from_app(&config)?;
    if let Some(raw) = &modules.api_ingress.bind_addr {
        raw.parse::<SocketAddr>()
            .with_context(|| format!("Invalid api_ingress.bind_addr '{raw}'"))?;
    }

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
