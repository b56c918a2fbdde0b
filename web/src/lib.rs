use clap::{Parser, ValueEnum};
use pairflip_core::Difficulty;
use wasm_bindgen::prelude::*;

mod game;
mod utils;

#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq)]
enum DifficultyArg {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty to start with
    #[arg(short, long, value_enum, default_value_t)]
    difficulty: DifficultyArg,
}

/// Parses `#--seed=1&--difficulty=hard` style hashes, falling back to defaults on bad input.
fn args_from_hash(hash: &str) -> (Args, Option<clap::Error>) {
    match Args::try_parse_from(hash.split(['#', '&'])) {
        Ok(args) => (args, None),
        Err(err) => (Args::parse_from([""]), Some(err)),
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let (args, parse_error) = args_from_hash(&location_hash);
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    // default verbosity only shows errors
    if let Some(err) = parse_error {
        log::error!("ignoring invalid arguments, using defaults: {}", err);
    }
    log::debug!("seed: {:?}, difficulty: {:?}", args.seed, args.difficulty);

    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");

    let props = game::GameProps {
        seed: args.seed,
        difficulty: args.difficulty.into(),
    };

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, props).render();
}
