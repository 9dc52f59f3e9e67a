//! Example loading a pretrained model payload and printing styled batches.
//!
//! Usage: generate_from_model <MODEL_JSON> <STYLE_ID> <COUNT>
//! Using `cargo run`: `cargo run --example generate_from_model -- model.json refrain 3`

use nonsensish::{Generator, Style};

use rand::thread_rng;
use std::{path::PathBuf, process::exit};

const USAGE: &str = "Usage: generate_from_model <MODEL_JSON> <STYLE_ID> <COUNT>";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() != 4 {
        println!("{USAGE}");
        println!("Styles:");
        for style in Style::ALL {
            println!("  {:<18} {}", style.id(), style.description());
        }
        exit(1);
    }

    let json =
        std::fs::read_to_string(PathBuf::from(args[1].clone())).expect("could not read model file");
    let generator = Generator::from_json(&json).expect("could not load model");

    let style = Style::from_id(&args[2]);
    let count: usize = args[3].parse().expect("did not provide a valid count");

    let mut rng = thread_rng();
    for output in generator.generate_styled(&mut rng, style, count) {
        println!("{output}");
        println!();
    }
}
