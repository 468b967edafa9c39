//! Benchmark pairing primitives and print estimated signature costs.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, Arg, ArgMatches, Command};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{error, info, Level};

use pairing_costs::config::{Config, DEFAULT_AGGREGATION_SIZE, DEFAULT_ITERATIONS};
use pairing_costs::pairing::PairingGroup;
use pairing_costs::params::{PairingParams, TYPE_A};
use pairing_costs::provider::HashFunction;
use pairing_costs::timing::MonotonicClock;
use pairing_costs::{cost, report, timing, Result};

fn main() -> ExitCode {
    let (config, level) = parse_arguments();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "benchmark failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    config.validate()?;

    let params = match &config.params {
        Some(path) => {
            info!(path = %path.display(), "loading pairing parameters");
            PairingParams::parse(&std::fs::read_to_string(path)?)?
        }
        None => TYPE_A.clone(),
    };
    let group = PairingGroup::new(params, config.hash);

    let mut rng: Box<dyn RngCore> = match config.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };
    let mut clock = MonotonicClock::new();

    let means = timing::run(&group, rng.as_mut(), &mut clock, config)?;
    let costs = cost::evaluate(&means, config.aggregation_size)?;
    info!(
        aggregation_size = config.aggregation_size,
        formulas = costs.entries().len(),
        "evaluated cost models"
    );

    let stdout = io::stdout();
    report::render(&mut stdout.lock(), &means, &costs)?;

    Ok(())
}

fn parse_arguments() -> (Config, Level) {
    arguments(&cli().get_matches())
}

fn cli() -> Command {
    Command::new("pairing-costs")
        .about("Benchmark pairing primitives and estimate aggregate signature costs")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("iterations")
                .long("iterations")
                .short('N')
                .value_parser(value_parser!(usize))
                .help("Timed calls per primitive [default: 1000]"),
        )
        .arg(
            Arg::new("aggregation-size")
                .long("aggregation-size")
                .short('n')
                .value_parser(value_parser!(u64))
                .help("Signatures per aggregate in the aggregate verification models [default: 10]"),
        )
        .arg(
            Arg::new("params")
                .long("params")
                .value_parser(value_parser!(PathBuf))
                .help("Pairing parameter file (PBC format, type a or a1); built-in a.param if omitted"),
        )
        .arg(
            Arg::new("hash")
                .long("hash")
                .value_parser(value_parser!(HashFunction))
                .default_value("sha256")
                .help("Hash function benchmarked as Th (sha256, sha3-256)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Seed for operand sampling"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_parser(value_parser!(Level))
                .default_value("info")
                .help("Log verbosity (error, warn, info, debug, trace)"),
        )
}

fn arguments(matches: &ArgMatches) -> (Config, Level) {
    let config = Config {
        iterations: matches
            .get_one::<usize>("iterations")
            .copied()
            .unwrap_or(DEFAULT_ITERATIONS),
        aggregation_size: matches
            .get_one::<u64>("aggregation-size")
            .copied()
            .unwrap_or(DEFAULT_AGGREGATION_SIZE),
        params: matches.get_one::<PathBuf>("params").cloned(),
        hash: matches
            .get_one::<HashFunction>("hash")
            .copied()
            .unwrap_or_default(),
        seed: matches.get_one::<u64>("seed").copied(),
    };
    let level = *matches.get_one::<Level>("log-level").unwrap_or(&Level::INFO);

    (config, level)
}
