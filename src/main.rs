use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// yurline - contact notifications for the ЮРЛАЙН site
#[derive(Parser)]
#[command(name = "yurline")]
#[command(about = "Relays contact-form submissions to Telegram", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Submit one contact message through the contact form controller
    Send {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        message: String,

        /// Call Telegram directly instead of the relay function
        #[arg(long)]
        direct: bool,
    },
    /// Verify bot credentials and chat access
    TelegramCheck {
        /// Also deliver a test message to the chat
        #[arg(long)]
        send_test: bool,
    },
    /// Load the maps script with the configured key
    MapsCheck,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = yurline::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    yurline::observability::init_observability(
        "yurline",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Serve { host, port } => cli::serve(config, host, port).await,
        Commands::Send {
            name,
            email,
            message,
            direct,
        } => cli::send(config, name, email, message, direct).await,
        Commands::TelegramCheck { send_test } => cli::check(config, send_test).await,
        Commands::MapsCheck => cli::check_maps(config).await,
    }
}
