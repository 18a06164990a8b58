use anyhow::{bail, Context, Result};
use auctions_core::error::DeliveryError;
use auctions_core::{
    Auction, AuctionSnapshot, AuctionsConfig, MessageCatalog, MessageFactory, MessagePath,
    MessageRecipient, RecipientKind, SharedSettings,
};
use auctions_text::{strip_color, TextComponent};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Auctions message preview tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the config file. Missing keys are filled in with defaults.
    #[arg(long, default_value = "Config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a message the way a broadcast would send it to the console.
    Preview {
        /// Message path such as `auction.start`.
        path: Option<String>,

        /// Render this template instead of a configured message.
        #[arg(long, conflicts_with = "path")]
        raw: Option<String>,

        /// Toml file describing the auction to fill placeholders from.
        #[arg(long)]
        auction: Option<PathBuf>,

        /// Print every line as component json.
        #[arg(long)]
        json: bool,
    },
    /// List every message path and how players can filter it.
    List,
}

/// Prints every line it receives to stdout.
struct StdoutConsole {
    json: bool,
}

impl MessageRecipient for StdoutConsole {
    fn uuid(&self) -> u128 {
        0
    }

    fn name(&self) -> &str {
        "CONSOLE"
    }

    fn kind(&self) -> RecipientKind {
        RecipientKind::Console
    }

    fn send_chat_message(&self, line: &[TextComponent]) -> Result<(), DeliveryError> {
        println!("{}", TextComponent::encode_line_json(line));
        Ok(())
    }

    fn send_legacy_message(&self, text: &str) -> Result<(), DeliveryError> {
        println!("{}", strip_color(text));
        Ok(())
    }

    fn deliver(&self, line: &[TextComponent]) -> Result<(), DeliveryError> {
        if self.json {
            self.send_chat_message(line)
        } else {
            self.send_legacy_message(&TextComponent::to_legacy_text(line))
        }
    }
}

fn load_auction(path: &Path) -> Result<Arc<dyn Auction>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Could not read auction file {}", path.display()))?;
    let snapshot: AuctionSnapshot = toml::from_str(&source)
        .with_context(|| format!("Invalid auction file {}", path.display()))?;
    Ok(Arc::new(snapshot))
}

fn main() -> Result<()> {
    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "auctions.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("AUCTIONS_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stderr))
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();
    let config = AuctionsConfig::load(&args.config)?;
    let catalog = MessageCatalog::load(&config.messages_file)?;
    info!("Loaded config from {}", args.config.display());

    match args.command {
        Command::List => {
            for path in MessagePath::ALL {
                println!(
                    "{:<24} ignorable={:<5} spammy={}",
                    path.path(),
                    path.is_ignorable(),
                    path.is_spammy()
                );
            }
        }
        Command::Preview {
            path,
            raw,
            auction,
            json,
        } => {
            let message = match (path, raw) {
                (_, Some(raw)) => auctions_core::Message::new(raw.replace("\\n", "\n")),
                (Some(path), None) => match MessagePath::from_path(&path) {
                    Some(path) => catalog.get(path),
                    None => bail!("Unknown message path {}", path),
                },
                (None, None) => bail!("Give a message path or --raw"),
            };
            let auction = auction.as_deref().map(load_auction).transpose()?;

            let settings = Arc::new(SharedSettings::new(config));
            let factory = MessageFactory::builder(settings, Arc::new(StdoutConsole { json }))
                .catalog(Arc::new(catalog))
                .finish()
                .context("Could not start the message worker")?;
            factory.submit_broadcast(message, auction).wait()?;
            factory.shutdown();
        }
    }

    Ok(())
}
