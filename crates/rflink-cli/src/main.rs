//! rflink CLI - discover RF bridge remotes and trigger them from the command line

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rflink_client::CommandClient;
use rflink_core::{KeyCode, RemoteEntry, BRIDGE_PORT};
use rflink_discovery::{BridgeResponder, Discovery, DiscoveryConfig};
use std::net::IpAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// rflink - RF-to-IP bridge discovery and control
#[derive(Parser)]
#[command(name = "rflink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the network for bridge devices and list their remotes
    Discover {
        /// Listening window in seconds
        #[arg(short, long, default_value = "10")]
        timeout: u64,

        /// Protocol port
        #[arg(short = 'P', long, default_value_t = BRIDGE_PORT)]
        port: u16,

        /// Address the probe is sent to
        #[arg(short, long, default_value = "255.255.255.255")]
        broadcast: IpAddr,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Trigger a remote key on a bridge
    Send {
        /// Bridge IP address
        ip: IpAddr,

        /// Key code (8 hex characters)
        key: String,

        /// Protocol port
        #[arg(short = 'P', long, default_value_t = BRIDGE_PORT)]
        port: u16,
    },

    /// Run a simulated bridge that answers discovery probes
    Respond {
        /// Remotes to advertise, as NAME=KEYHEX pairs
        #[arg(short, long, required = true)]
        remote: Vec<String>,

        /// Port to listen on
        #[arg(short = 'P', long, default_value_t = BRIDGE_PORT)]
        port: u16,
    },

    /// Show version and protocol info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.log_level, cli.json_logs)?;

    match cli.command {
        Commands::Discover {
            timeout,
            port,
            broadcast,
            json,
        } => run_discover(timeout, port, broadcast, json).await?,

        Commands::Send { ip, key, port } => run_send(ip, &key, port).await?,

        Commands::Respond { remote, port } => run_respond(remote, port).await?,

        Commands::Info => print_info(),
    }

    Ok(())
}

fn setup_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Failed to parse log level")?;

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).compact())
            .init();
    }

    Ok(())
}

async fn run_discover(timeout: u64, port: u16, broadcast: IpAddr, json: bool) -> Result<()> {
    if !json {
        println!(
            "{} Probing {}:{} ({}s window)",
            "RFLINK".cyan().bold(),
            broadcast,
            port,
            timeout
        );
    }

    let mut discovery = Discovery::with_config(DiscoveryConfig {
        port,
        broadcast_addr: broadcast,
        timeout: Duration::from_secs(timeout),
    });

    let found = discovery
        .run_once()
        .await
        .context("Discovery session failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("No bridges answered.");
        return Ok(());
    }

    println!();
    println!("  {:<18} {:<10} {}", "NAME".bold(), "KEY".bold(), "BRIDGE".bold());
    for remote in &found {
        println!(
            "  {:<18} {:<10} {}",
            remote.name.green(),
            remote.key,
            remote.ip
        );
    }
    println!();
    println!("{} remote(s) found", found.len());

    Ok(())
}

async fn run_send(ip: IpAddr, key: &str, port: u16) -> Result<()> {
    println!(
        "{} Sending key {} to {}:{}",
        "RFLINK".cyan().bold(),
        key.yellow(),
        ip,
        port
    );

    CommandClient::with_port(port)
        .send_key(ip, key)
        .await
        .with_context(|| format!("Failed to send key to {} - the action may not have occurred", ip))?;

    // UDP gives no acknowledgment; all we know is the packet left this host.
    println!("Command handed to the network (delivery is not confirmed by the device).");
    Ok(())
}

async fn run_respond(specs: Vec<String>, port: u16) -> Result<()> {
    let remotes = parse_remote_specs(&specs)?;

    println!(
        "{} Simulated bridge on port {} advertising {} remote(s)",
        "RFLINK".cyan().bold(),
        port,
        remotes.len()
    );

    let responder = BridgeResponder::bind(port, remotes)
        .await
        .context("Failed to bind responder")?;

    tokio::select! {
        result = responder.run() => {
            result.context("Responder stopped")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            println!("\nResponder stopped.");
        }
    }

    Ok(())
}

fn parse_remote_specs(specs: &[String]) -> Result<Vec<RemoteEntry>> {
    specs
        .iter()
        .map(|spec| {
            let Some((name, hex)) = spec.split_once('=') else {
                bail!("Invalid remote spec {:?}: expected NAME=KEYHEX", spec);
            };
            let key = KeyCode::from_hex(hex)
                .with_context(|| format!("Invalid key code in {:?}", spec))?;
            Ok(RemoteEntry::new(name, key))
        })
        .collect()
}

fn print_info() {
    println!("{} {}", "RFLINK".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!();
    println!("Protocol:  Safemate-class RF bridge over UDP");
    println!("Port:      {}", BRIDGE_PORT);
    println!("Probe:     01 01 12 00 00 00 (broadcast)");
    println!("Command:   03 01 00 00 + 4 key code bytes (unicast)");
}
