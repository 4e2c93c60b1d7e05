//! Prints the traversals of a small fixed BST and then how tall each kind of tree grows.
//!
//! Set `HEIGHTS_VERBOSE` to also log each size as it is measured.

use std::env;
use std::error::Error;

use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use search_trees::bst::Tree;
use search_trees::experiment::{self, ExperimentConfig};

const DEMO_KEYS: [u64; 10] = [79, 23, 90, 69, 85, 10, 4, 85, 61, 83];

fn main() -> Result<(), Box<dyn Error>> {
    let level = if env::var_os("HEIGHTS_VERBOSE").is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let mut demo = Tree::new();
    for key in DEMO_KEYS {
        demo.insert(key);
    }
    println!("DFS Pre-order: {:?}", demo.pre_order());
    println!("DFS In-order: {:?}", demo.in_order());
    println!("DFS Post-order: {:?}", demo.post_order());
    println!("BFS: {:?}", demo.level_order());
    println!();

    let config = ExperimentConfig::default();
    info!(
        "measuring {} sizes with seed {:#x}",
        config.sizes.len(),
        config.seed
    );
    let report = experiment::run(&config);
    print!("{report}");

    Ok(())
}
