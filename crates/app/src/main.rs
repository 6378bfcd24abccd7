//! bitcodec: run the bitcodec codecs from the command line.
//!
//! Selects a codec (or a chain of them), applies parameters, feeds it a
//! message or a generated sample, and prints every output, every diagnostic
//! and a metrics summary.

mod config;
mod input_gen;

use bitcodec_core::{
    channel::{self, ChannelConfig, NoisyChannel},
    Codec, CodecKind, Diagnostic, Error, Family, Operation, Outcome, Params, Registry, Step,
};
use config::{Config, Mode};
use log::LevelFilter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    init_logging(config.verbose);

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr as `[LEVEL] message`; RUST_LOG overrides the level.
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    builder.parse_env("RUST_LOG");
    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())
    });
    let _ = builder.try_init();
}

/// Run the configured mode; `Ok(false)` when a round trip did not match.
fn run(config: &Config) -> Result<bool, Error> {
    let mut registry = Registry::new();
    apply_parameters(&mut registry, &config.assignments);

    let family = config
        .mode
        .first_codec()
        .map_or(Family::Source, CodecKind::family);
    let message = match &config.message {
        Some(message) => message.clone(),
        None => input_gen::generate_sample_message(config.seed, config.sample_len, family),
    };
    println!("Input: {message}");
    println!();

    if config.has_noise() && !matches!(config.mode, Mode::RoundTrip(_)) {
        log::warn!("--flip-rate and --flip only apply to round trips; ignoring them");
    }

    let matched = match &config.mode {
        Mode::Single(step) => {
            let outcome = registry.run(*step, &message)?;
            print_outcome(*step, &outcome);
            true
        }
        Mode::Chain(steps) => {
            let report = registry.chain(&message, steps)?;
            for stage in &report.stages {
                print_outcome(stage.step, &stage.outcome);
            }
            true
        }
        Mode::RoundTrip(codec) => round_trip(&mut registry, config, *codec, &message)?,
    };

    if config.print_metrics {
        let mut metrics = registry.total_metrics();
        metrics.complete();
        println!("{}", metrics.summary());
    }

    Ok(matched)
}

/// Apply `name=value` assignments; rejected values are reported and the
/// codec keeps its previous parameters.
fn apply_parameters(registry: &mut Registry, assignments: &[(CodecKind, String)]) {
    for (codec, assignment) in assignments {
        let result = Params::parse(*codec, assignment)
            .and_then(|params| registry.configure(*codec, &params));
        if let Err(e) = result {
            eprintln!(
                "warning: {codec} {assignment}: {e}; keeping {}",
                registry.get(*codec).params()
            );
        }
    }
}

fn round_trip(
    registry: &mut Registry,
    config: &Config,
    codec: CodecKind,
    message: &str,
) -> Result<bool, Error> {
    let encode = Step::new(codec, Operation::Encode);
    let encoded = registry.run(encode, message)?;
    print_outcome(encode, &encoded);

    let mut received = encoded.output.clone();
    if config.has_noise() {
        received = channel::flip_at(&received, &config.flips)?;
        let mut noisy = NoisyChannel::new(ChannelConfig::with_flip_rate(config.flip_rate, config.seed))?;
        received = noisy.transmit(&received)?;
        let stats = noisy.stats();
        println!(
            "Channel: {} forced + {} random flip(s) over {} bits",
            config.flips.len(),
            stats.bits_flipped,
            stats.bits_sent
        );
        println!("  received: {received}");
        println!();
    }

    let decode = Step::new(codec, Operation::Decode);
    let decoded = registry.run(decode, &received)?;
    print_outcome(decode, &decoded);

    let output = strip_padding(&decoded.output, &encoded);
    let matched = output == message;
    println!("Round trip: {}", if matched { "match" } else { "MISMATCH" });
    println!();
    Ok(matched)
}

/// Drop the zeros Hamming encode appended to fill the last block.
fn strip_padding<'a>(decoded: &'a str, encoded: &Outcome) -> &'a str {
    let zeros: usize = encoded
        .diagnostics
        .iter()
        .map(|d| match d {
            Diagnostic::HammingPadding { zeros } => *zeros,
            _ => 0,
        })
        .sum();
    &decoded[..decoded.len().saturating_sub(zeros)]
}

fn print_outcome(step: Step, outcome: &Outcome) {
    println!("[{step}] {} symbols", outcome.output.chars().count());
    println!("  output: {}", outcome.output);
    for diagnostic in &outcome.diagnostics {
        println!("  note: {diagnostic}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_padding() {
        let encoded = Outcome::with_diagnostics(
            "1010101".to_string(),
            vec![Diagnostic::HammingPadding { zeros: 1 }],
        );
        assert_eq!(strip_padding("1010", &encoded), "101");
        assert_eq!(strip_padding("1010", &Outcome::clean(String::new())), "1010");
    }

    #[test]
    fn test_invalid_parameters_keep_defaults() {
        let mut registry = Registry::new();
        apply_parameters(
            &mut registry,
            &[
                (CodecKind::Golomb, "k=abc".to_string()),
                (CodecKind::Repetition, "r=0".to_string()),
                (CodecKind::Crc, "generator=1011".to_string()),
            ],
        );
        assert_eq!(registry.get(CodecKind::Golomb).params(), Params::Golomb { k: 64 });
        assert_eq!(registry.get(CodecKind::Repetition).params(), Params::Repetition { r: 3 });
        assert_eq!(
            registry.get(CodecKind::Crc).params(),
            Params::Crc {
                generator: "1011".to_string()
            }
        );
    }

    #[test]
    fn test_round_trip_with_forced_flip() {
        let config = Config::from_args(&[
            "--codec".to_string(),
            "hamming74".to_string(),
            "--flip".to_string(),
            "2".to_string(),
            "--seed".to_string(),
            "1".to_string(),
        ])
        .unwrap();
        let mut registry = Registry::new();
        assert!(round_trip(&mut registry, &config, CodecKind::Hamming74, "101").unwrap());
        assert_eq!(registry.metrics(CodecKind::Hamming74).corrections, 1);
    }

    #[test]
    fn test_round_trip_reports_mismatch() {
        let config = Config::from_args(&[
            "--codec".to_string(),
            "crc".to_string(),
            "--flip".to_string(),
            "0".to_string(),
        ])
        .unwrap();
        let mut registry = Registry::new();
        assert!(!round_trip(&mut registry, &config, CodecKind::Crc, "1101").unwrap());
    }
}
