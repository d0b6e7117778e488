//! Command-line front end for the draw engine

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use entropy_draw_core_rs::issuance::{InMemoryOwnershipLedger, IssuanceCoordinator, SvgRenderer};
use entropy_draw_core_rs::{
    AuditLogEntry, BlockHash, Config, DrawEngine, EntropySource, Sampler, SimulatedLedger,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-derive a draw from a known block hash
    Draw {
        /// Block hash as hex (0x prefix optional)
        #[arg(long)]
        hash: String,

        #[arg(long)]
        max: u64,

        #[arg(long)]
        count: u64,

        #[arg(long, default_value = "")]
        salt: String,
    },

    /// Commit a draw on a simulated ledger and print the audit entry
    Simulate {
        /// Blocks to mine on top of the configured initial blocks
        #[arg(long, default_value_t = 32)]
        blocks: u64,

        #[arg(long)]
        max: u64,

        #[arg(long)]
        count: u64,

        #[arg(long, default_value = "")]
        salt: String,

        /// Height to draw from (defaults to the latest sealed block)
        #[arg(long)]
        height: Option<u64>,

        /// Also report whether this value was drawn
        #[arg(long)]
        candidate: Option<u64>,

        /// Write the engine snapshot to this file
        #[arg(long, value_name = "FILE")]
        snapshot: Option<PathBuf>,
    },

    /// Check a recorded audit entry against a block hash
    Verify {
        /// Audit entry JSON file
        #[arg(long, value_name = "FILE")]
        entry: PathBuf,

        /// Block hash for the entry's height
        #[arg(long)]
        hash: String,
    },

    /// Issue one collectible on a simulated ledger and print its document
    Issue {
        #[arg(long)]
        holder: String,

        /// Unix timestamp stamped on the collectible
        #[arg(long, default_value_t = 0)]
        timestamp: u64,

        #[arg(long, default_value_t = 32)]
        blocks: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Draw {
            hash,
            max,
            count,
            salt,
        } => {
            let hash: BlockHash = hash.parse().context("parsing --hash")?;
            let result = Sampler::new(config.engine.sampler).draw(&hash, max, count, salt.as_bytes())?;
            print_json(&json!({
                "hash": hash,
                "max": max,
                "count": count,
                "salt": salt,
                "result": result.values(),
                "collisions": result.collisions(),
            }))?;
        }

        Commands::Simulate {
            blocks,
            max,
            count,
            salt,
            height,
            candidate,
            snapshot,
        } => {
            let mut ledger = SimulatedLedger::from_config(&config.ledger);
            ledger.mine_blocks(blocks);
            let height = match height {
                Some(h) => h,
                None => ledger
                    .current_height()
                    .checked_sub(1)
                    .context("ledger has no sealed blocks")?,
            };
            info!(
                current_height = ledger.current_height(),
                height, "simulated ledger ready"
            );

            let mut engine = DrawEngine::new(ledger, config.engine);
            let entry = engine.commit(max, count, height, &salt)?;
            let hash = engine
                .pinned(height)
                .context("committed height was not pinned")?;

            let mut output = json!({ "hash": hash, "entry": entry });
            if let Some(candidate) = candidate {
                output["member"] = json!(engine.is_member(max, count, height, &salt, candidate)?);
            }
            print_json(&output)?;

            if let Some(path) = snapshot {
                std::fs::write(&path, engine.snapshot()?.to_json()?)
                    .with_context(|| format!("writing snapshot to {}", path.display()))?;
                info!(path = %path.display(), "wrote snapshot");
            }
        }

        Commands::Verify { entry, hash } => {
            let contents = std::fs::read_to_string(&entry)
                .with_context(|| format!("reading {}", entry.display()))?;
            let entry: AuditLogEntry = serde_json::from_str(&contents).context("parsing entry")?;
            let hash: BlockHash = hash.parse().context("parsing --hash")?;

            verify_entry(&Sampler::new(config.engine.sampler), &entry, &hash)?;
            println!("ok");
        }

        Commands::Issue {
            holder,
            timestamp,
            blocks,
        } => {
            let mut ledger = SimulatedLedger::from_config(&config.ledger);
            ledger.mine_blocks(blocks);
            let mut engine = DrawEngine::new(ledger, config.engine);
            let mut coordinator =
                IssuanceCoordinator::new(SvgRenderer::default(), InMemoryOwnershipLedger::new());

            let issued = coordinator.issue(&mut engine, &holder, timestamp)?;
            print_json(&json!({
                "selection": issued.selection,
                "document": issued.document,
            }))?;
        }
    }

    Ok(())
}

/// Recompute `entry` from `hash` and fail unless it matches
fn verify_entry(sampler: &Sampler, entry: &AuditLogEntry, hash: &BlockHash) -> Result<()> {
    let result = sampler.draw(hash, entry.max, entry.count, entry.salt.as_bytes())?;
    if result.values() != entry.result.as_slice() {
        bail!(
            "entry does not verify: recorded {:?}, recomputed {:?}",
            entry.result,
            result.values()
        );
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
