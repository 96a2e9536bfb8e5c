//! avastctl
//!
//! Command-line front-end exercising the Avast daemon client.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use avast_client::{Client, ClientConfig, Flag, PackOption, Result, SensiOption};

/// Avast daemon client
#[derive(Parser, Debug)]
#[command(name = "avastctl")]
#[command(about = "Client for the Avast antivirus scanning daemon")]
#[command(version)]
struct Args {
    /// Avast daemon Unix socket to connect to
    #[arg(short = 'S', long, default_value = avast_client::DEFAULT_SOCKET)]
    socket: PathBuf,

    /// Per-command timeout in seconds
    #[arg(short = 't', long, default_value = "60")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a file or directory
    Scan {
        /// Path to scan
        path: PathBuf,
    },

    /// Print the virus definitions (VPS) version
    Vps,

    /// Show packer options, or toggle one
    Pack {
        /// Enable a packer option (e.g. zip, rar, 7zip)
        #[arg(long, value_parser = PackOption::from_str)]
        enable: Option<PackOption>,

        /// Disable a packer option
        #[arg(long, value_parser = PackOption::from_str)]
        disable: Option<PackOption>,
    },

    /// Show scan flags, or toggle one
    Flags {
        /// Enable a flag (fullfiles, allfiles, scandevices)
        #[arg(long, value_parser = Flag::from_str)]
        enable: Option<Flag>,

        /// Disable a flag
        #[arg(long, value_parser = Flag::from_str)]
        disable: Option<Flag>,
    },

    /// Show sensitivity settings, or toggle one
    Sensitivity {
        /// Enable a sensitivity category (e.g. worm, trojan, pup)
        #[arg(long, value_parser = SensiOption::from_str)]
        enable: Option<SensiOption>,

        /// Disable a sensitivity category
        #[arg(long, value_parser = SensiOption::from_str)]
        disable: Option<SensiOption>,
    },

    /// Show the exclusion path, or set it
    Exclude {
        /// Path to exclude from scans
        #[arg(long)]
        set: Option<PathBuf>,
    },

    /// Check whether a URL is blocked
    Checkurl {
        /// URL to check
        url: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,avast_client=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .socket_path(&args.socket)
        .command_timeout(Duration::from_secs(args.timeout))
        .build();

    let client = match Client::with_config(config) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to connect to {}: {}", args.socket.display(), e);
            std::process::exit(1);
        }
    };

    let outcome = run(&client, &args.command);

    if let Err(e) = client.close() {
        tracing::warn!("Error closing connection: {}", e);
    }

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(client: &Client, command: &Commands) -> Result<()> {
    match command {
        Commands::Scan { path } => {
            for result in client.scan(path)? {
                let item = match &result.archive_item {
                    Some(member) => format!("{}|{}", result.filename, member),
                    None => result.filename.clone(),
                };
                match &result.signature {
                    Some(sig) => println!("[{}] {}\t{}", result.status.as_char(), item, sig),
                    None => println!("[{}] {}", result.status.as_char(), item),
                }
            }
        }
        Commands::Vps => {
            println!("VPS=> {}", client.vps()?);
        }
        Commands::Pack { enable, disable } => {
            if let Some(option) = enable {
                client.set_pack(*option, true)?;
            }
            if let Some(option) = disable {
                client.set_pack(*option, false)?;
            }
            println!("PACK=> {}", client.get_pack()?);
        }
        Commands::Flags { enable, disable } => {
            if let Some(flag) = enable {
                client.set_flags(*flag, true)?;
            }
            if let Some(flag) = disable {
                client.set_flags(*flag, false)?;
            }
            println!("FLAGS=> {}", client.get_flags()?);
        }
        Commands::Sensitivity { enable, disable } => {
            if let Some(option) = enable {
                client.set_sensitivity(*option, true)?;
            }
            if let Some(option) = disable {
                client.set_sensitivity(*option, false)?;
            }
            println!("SENSI=> {}", client.get_sensitivity()?);
        }
        Commands::Exclude { set } => {
            if let Some(path) = set {
                client.set_exclude(path)?;
            }
            println!("EXCLUDE=> {}", client.get_exclude()?);
        }
        Commands::Checkurl { url } => {
            if client.check_url(url)? {
                println!("{} is blocked", url);
            } else {
                println!("{} is not blocked", url);
            }
        }
    }
    Ok(())
}
