use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon::{DungeonConfig, audit, generate_dungeon};
use tools::{Overrides, StrategyArg, init_logging, load_config};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon and print it as ASCII", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// TOML file with generation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long)]
    height: Option<i32>,
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => DungeonConfig::default(),
    };
    let overrides = Overrides { width: args.width, height: args.height, strategy: args.strategy };
    let config = overrides.apply(base);

    let dungeon = generate_dungeon(args.seed, &config)
        .with_context(|| format!("Failed to generate dungeon for seed {}", args.seed))?;
    info!(
        seed = args.seed,
        rooms = dungeon.rooms.len(),
        links = dungeon.links.len(),
        "dungeon generated"
    );
    for finding in audit(&dungeon) {
        warn!(%finding, "audit finding");
    }

    print!("{}", dungeon.map.render_ascii());
    println!("Upstair: {:?}", dungeon.upstair());
    println!("Downstair: {:?}", dungeon.downstair());
    println!("Fingerprint: {:016x}", dungeon.fingerprint());

    Ok(())
}
