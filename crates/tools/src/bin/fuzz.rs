use anyhow::{Result, bail};
use clap::Parser;
use dungeon::{CorridorStrategy, DungeonConfig, Size, audit, generate_dungeon};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tools::init_logging;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about = "Sweep seeds and audit every generated dungeon", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    runs: u32,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn random_config(rng: &mut ChaCha8Rng) -> DungeonConfig {
    let min_region = choose(rng, &[Size::new(8, 8), Size::new(10, 8), Size::new(12, 10)]);
    DungeonConfig {
        width: choose(rng, &[40, 64, 80, 120]),
        height: choose(rng, &[24, 40, 50]),
        min_region,
        max_region: Size::new(min_region.width * 2, min_region.height * 2),
        deviation: choose(rng, &[0.0, 0.3, 0.6, 1.0]),
        strategy: choose(rng, &CorridorStrategy::ALL),
        ..DungeonConfig::default()
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    info!(seed = args.seed, runs = args.runs, "starting generation fuzz");
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut failures = 0_u32;

    for run in 0..args.runs {
        let map_seed = rng.next_u64();
        let config = random_config(&mut rng);
        let dungeon = match generate_dungeon(map_seed, &config) {
            Ok(dungeon) => dungeon,
            Err(e) => {
                error!(run, map_seed, ?config, %e, "generation failed");
                failures += 1;
                continue;
            }
        };
        let findings = audit(&dungeon);
        if !findings.is_empty() {
            error!(run, map_seed, ?config, ?findings, "audit failed");
            eprintln!("{}", dungeon.map.render_ascii());
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} runs violated invariants", args.runs);
    }
    println!("All {} runs passed.", args.runs);
    Ok(())
}
