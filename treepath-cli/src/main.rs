//! Command-line interface for treepath
//! This binary drives the two halves of the pipeline: extracting coded
//! training samples from serialized trees, and running resumable
//! synthesis sessions against a prediction model.
//!
//! Usage:
//!   treepath extract `<trees...>` --out `<dir>`            - Build a coded dataset
//!   treepath start `<tree>` --session `<dir>` --vocab `<dir>` - Open a synthesis session
//!   treepath step --session `<dir>` --kind `<KIND>`        - Replay one prediction
//!   treepath render `<tree>`                               - Pretty-print a serialized tree

use clap::{value_parser, Arg, Command};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};

use treepath_core::dataset::Vocabulary;
use treepath_core::tree::json;
use treepath_synth::decode::DEFAULT_REGISTRY;
use treepath_synth::extract::{advance_session, build_dataset, start_session};
use treepath_synth::types::{TypeCatalog, WellFormedChecker};

fn main() {
    let matches = Command::new("treepath")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Path-based dataset extraction and incremental tree synthesis")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("extract")
                .about("Extract coded training samples from serialized trees")
                .arg(
                    Arg::new("inputs")
                        .help("Serialized tree files (one JSON tree per file)")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .help("Directory receiving the corpus and the vocabulary pair")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(depth_arg("min-depth", "Smallest target depth", "1"))
                .arg(depth_arg("max-depth", "Largest target depth", "15"))
                .arg(
                    Arg::new("count")
                        .long("count")
                        .help("Targets drawn per input tree")
                        .default_value("100")
                        .value_parser(value_parser!(usize)),
                )
                .arg(seed_arg()),
        )
        .subcommand(
            Command::new("start")
                .about("Cut a subtree out of a tree and open a synthesis session")
                .arg(
                    Arg::new("tree")
                        .help("Serialized tree to cut the target from")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("session")
                        .long("session")
                        .short('s')
                        .help("Session directory (overwritten on every step)")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("vocab")
                        .long("vocab")
                        .help("Directory holding the vocabulary pair of a previous extract run")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("catalog")
                        .long("catalog")
                        .help("Type catalog JSON file (defaults to an empty catalog)")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(depth_arg("min-depth", "Smallest target depth", "3"))
                .arg(depth_arg("max-depth", "Largest target depth", "8"))
                .arg(
                    Arg::new("count")
                        .long("count")
                        .help("Draws attempted before giving up on a target")
                        .default_value("100")
                        .value_parser(value_parser!(usize)),
                )
                .arg(seed_arg()),
        )
        .subcommand(
            Command::new("step")
                .about("Replay one model prediction against a session")
                .arg(
                    Arg::new("session")
                        .long("session")
                        .short('s')
                        .help("Session directory written by 'start'")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .short('k')
                        .help("Predicted kind, e.g. 'WHILE' or 'AFTER_LAST'")
                        .required(true),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .help("Predicted type id, when the model emits one")
                        .value_parser(value_parser!(i64)),
                )
                .arg(seed_arg()),
        )
        .subcommand(
            Command::new("render")
                .about("Pretty-print a serialized tree")
                .arg(
                    Arg::new("tree")
                        .help("Serialized tree file")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("extract", sub)) => handle_extract(sub),
        Some(("start", sub)) => handle_start(sub),
        Some(("step", sub)) => handle_step(sub),
        Some(("render", sub)) => handle_render(sub),
        _ => unreachable!("subcommand is required"),
    }
}

fn depth_arg(name: &'static str, help: &'static str, default: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .default_value(default)
        .value_parser(value_parser!(usize))
}

fn seed_arg() -> Arg {
    Arg::new("seed")
        .long("seed")
        .help("Seed for the sampling RNG (random when omitted)")
        .value_parser(value_parser!(u64))
}

fn rng_from(matches: &clap::ArgMatches) -> StdRng {
    match matches.get_one::<u64>("seed") {
        Some(&seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn depths_from(matches: &clap::ArgMatches) -> std::ops::RangeInclusive<usize> {
    let min = *matches.get_one::<usize>("min-depth").unwrap();
    let max = *matches.get_one::<usize>("max-depth").unwrap();
    if min > max {
        eprintln!("--min-depth {} exceeds --max-depth {}", min, max);
        std::process::exit(1);
    }
    min..=max
}

/// Handle the extract command
fn handle_extract(matches: &clap::ArgMatches) {
    let inputs: Vec<PathBuf> = matches
        .get_many::<PathBuf>("inputs")
        .unwrap()
        .cloned()
        .collect();
    let out = matches.get_one::<PathBuf>("out").unwrap();
    let count = *matches.get_one::<usize>("count").unwrap();
    let depths = depths_from(matches);
    let mut rng = rng_from(matches);

    let outcome = build_dataset(&inputs, out, depths, count, &mut rng).unwrap_or_else(|e| {
        eprintln!("Extraction error: {}", e);
        std::process::exit(1);
    });

    for (path, reason) in &outcome.skipped {
        eprintln!("Skipped {}: {}", path.display(), reason);
    }
    println!(
        "Wrote {} samples to {}",
        outcome.written,
        out.join(treepath_synth::extract::SAMPLES_FILE).display()
    );
}

/// Handle the start command
fn handle_start(matches: &clap::ArgMatches) {
    let tree_path = matches.get_one::<PathBuf>("tree").unwrap();
    let session = matches.get_one::<PathBuf>("session").unwrap();
    let vocab_dir = matches.get_one::<PathBuf>("vocab").unwrap();
    let count = *matches.get_one::<usize>("count").unwrap();
    let depths = depths_from(matches);
    let mut rng = rng_from(matches);

    let text = fs::read_to_string(tree_path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", tree_path.display(), e);
        std::process::exit(1);
    });
    let (tree, _) = json::from_json_str(&text).unwrap_or_else(|e| {
        eprintln!("Cannot parse {}: {}", tree_path.display(), e);
        std::process::exit(1);
    });
    let vocab = Vocabulary::load(vocab_dir).unwrap_or_else(|e| {
        eprintln!("Cannot load the vocabulary from {}: {}", vocab_dir.display(), e);
        std::process::exit(1);
    });
    let catalog = match matches.get_one::<PathBuf>("catalog") {
        Some(path) => load_catalog(path),
        None => TypeCatalog::default(),
    };

    fs::create_dir_all(session).unwrap_or_else(|e| {
        eprintln!("Cannot create {}: {}", session.display(), e);
        std::process::exit(1);
    });

    let checker = WellFormedChecker::new();
    let started = start_session(
        session, &tree, depths, count, &checker, &catalog, &vocab, &mut rng,
    )
    .unwrap_or_else(|e| {
        eprintln!("Session error: {}", e);
        std::process::exit(1);
    });

    let sample_json = serde_json::to_string(&started.sample).unwrap_or_else(|e| {
        eprintln!("Error formatting the sample: {}", e);
        std::process::exit(1);
    });
    println!("{}", sample_json);
}

/// Handle the step command
fn handle_step(matches: &clap::ArgMatches) {
    let session = matches.get_one::<PathBuf>("session").unwrap();
    let kind = matches.get_one::<String>("kind").unwrap();
    let predicted_type = matches.get_one::<i64>("type").copied();
    let mut rng = rng_from(matches);

    let checker = WellFormedChecker::new();
    let response = advance_session(
        session,
        kind,
        predicted_type,
        &DEFAULT_REGISTRY,
        &checker,
        &mut rng,
    )
        .unwrap_or_else(|e| {
            eprintln!("Step error: {}", e);
            std::process::exit(1);
        });

    let response_json = serde_json::to_string(&response).unwrap_or_else(|e| {
        eprintln!("Error formatting the response: {}", e);
        std::process::exit(1);
    });
    println!("{}", response_json);
}

/// Handle the render command
fn handle_render(matches: &clap::ArgMatches) {
    let tree_path = matches.get_one::<PathBuf>("tree").unwrap();
    let text = fs::read_to_string(tree_path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", tree_path.display(), e);
        std::process::exit(1);
    });
    let (tree, not_finished) = json::from_json_str(&text).unwrap_or_else(|e| {
        eprintln!("Cannot parse {}: {}", tree_path.display(), e);
        std::process::exit(1);
    });
    if tree.is_empty() {
        return;
    }

    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((node, indent)) = stack.pop() {
        let mut line = format!("{}{}", "  ".repeat(indent), tree.tag(node));
        if !tree.text(node).is_empty() {
            line.push_str(&format!(" {:?}", tree.text(node)));
        }
        if not_finished.contains(&node) {
            line.push_str(" (open)");
        }
        println!("{}", line);
        for &child in tree.children(node).iter().rev() {
            stack.push((child, indent + 1));
        }
    }
}

fn load_catalog(path: &Path) -> TypeCatalog {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", path.display(), e);
        std::process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Cannot parse {}: {}", path.display(), e);
        std::process::exit(1);
    })
}
