#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Wildwood **
//! A single-player wilderness survival adventure

use wildwood::style::GameStyle;
use wildwood::{World, run_repl, story};

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = build_rng()?;
    info!("Start: generating the Wildwood...");
    let mut world = World::new_game();

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush().unwrap();
    info!("Starting the game!");

    println!(
        "{:^84}",
        "WILDWOOD: A WILDERNESS SURVIVAL TALE"
            .bright_yellow()
            .underline()
    );
    println!();
    println!("{}", story::OPENING_TEXT.description_style());

    run_repl(&mut world, &mut rng)
}

/// Build the game rng: `--seed N` wins, then the `WILDWOOD_SEED`
/// environment variable, then OS entropy.
fn build_rng() -> Result<StdRng> {
    let mut args = std::env::args().skip(1);
    let mut seed = None;
    while let Some(arg) = args.next() {
        if arg == "--seed" {
            let value = args.next().context("--seed requires a number")?;
            seed = Some(
                value
                    .parse::<u64>()
                    .with_context(|| format!("invalid seed '{value}'"))?,
            );
        }
    }
    if seed.is_none()
        && let Ok(raw) = std::env::var("WILDWOOD_SEED")
    {
        seed = Some(
            raw.parse::<u64>()
                .with_context(|| format!("invalid WILDWOOD_SEED '{raw}'"))?,
        );
    }

    Ok(match seed {
        Some(seed) => {
            info!("using fixed rng seed {seed}");
            StdRng::seed_from_u64(seed)
        },
        None => StdRng::from_os_rng(),
    })
}
