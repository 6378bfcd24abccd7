//! Configuration for the bitcodec application.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including randomized defaults that are reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, using intelligent defaults.
//! All defaults are printed so runs are reproducible.

use bitcodec_core::{CodecKind, Operation, Step};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// What to run.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// One encode or decode call
    Single(Step),
    /// Encode, optionally corrupt, decode, compare
    RoundTrip(CodecKind),
    /// A sequence of steps, each fed the previous output
    Chain(Vec<Step>),
}

impl Mode {
    /// Codec that receives the message first.
    pub fn first_codec(&self) -> Option<CodecKind> {
        match self {
            Mode::Single(step) => Some(step.codec),
            Mode::RoundTrip(codec) => Some(*codec),
            Mode::Chain(steps) => steps.first().map(|step| step.codec),
        }
    }
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Selection ===
    /// Codec and operation(s) to run
    pub mode: Mode,

    // === Input ===
    /// Message to process (None = generate sample)
    pub message: Option<String>,

    /// Length of the generated sample
    pub sample_len: usize,

    // === Parameters ===
    /// `name=value` assignments, applied in order before running
    pub assignments: Vec<(CodecKind, String)>,

    // === Channel ===
    /// Per-bit flip probability between encode and decode of a round trip
    pub flip_rate: f64,

    /// Exact bit positions to flip between encode and decode of a round trip
    pub flips: Vec<usize>,

    /// Random seed for sample generation and the channel
    pub seed: u64,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    pub verbose: bool,
}

fn value<'a>(args: &'a [String], i: usize, what: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires {what}", args[i - 1]))
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If no codec is selected, a round trip through a randomly chosen codec
    /// is run. If --seed is provided, uses that seed for all randomness
    /// (fully deterministic).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut codec: Option<CodecKind> = None;
        let mut operation: Option<String> = None;
        let mut chain: Option<Vec<Step>> = None;
        let mut message: Option<String> = None;
        let mut sample_len: Option<usize> = None;
        let mut assignments = Vec::new();
        let mut flip_rate: Option<f64> = None;
        let mut flips = Vec::new();
        let mut seed: Option<u64> = None;
        let mut print_config = false;
        let mut print_metrics = true;
        let mut verbose = false;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--codec" => {
                    i += 1;
                    let name = value(args, i, "a codec name")?;
                    codec = Some(name.parse().map_err(|e| format!("{e}"))?);
                }
                "--op" => {
                    i += 1;
                    operation = Some(value(args, i, "encode, decode or roundtrip")?.to_string());
                }
                "--chain" => {
                    i += 1;
                    let list = value(args, i, "a list of codec:op steps")?;
                    let steps = Step::parse_list(list).map_err(|e| format!("{e}"))?;
                    if steps.is_empty() {
                        return Err("--chain requires at least one step".to_string());
                    }
                    chain = Some(steps);
                }
                "--message" | "-m" => {
                    i += 1;
                    message = Some(value(args, i, "a message")?.to_string());
                }
                "--sample-len" => {
                    i += 1;
                    sample_len = Some(
                        value(args, i, "a number")?
                            .parse()
                            .map_err(|_| "invalid sample-len")?,
                    );
                }
                "--k" => {
                    i += 1;
                    let k = value(args, i, "a number")?;
                    assignments.push((CodecKind::Golomb, format!("k={k}")));
                }
                "--r" => {
                    i += 1;
                    let r = value(args, i, "a number")?;
                    assignments.push((CodecKind::Repetition, format!("r={r}")));
                }
                "--generator" => {
                    i += 1;
                    let generator = value(args, i, "a bit string")?;
                    assignments.push((CodecKind::Crc, format!("generator={generator}")));
                }
                "--flip-rate" => {
                    i += 1;
                    let rate: f64 = value(args, i, "a number")?
                        .parse()
                        .map_err(|_| "invalid flip-rate")?;
                    if !(0.0..=1.0).contains(&rate) {
                        return Err("--flip-rate must be between 0 and 1".to_string());
                    }
                    flip_rate = Some(rate);
                }
                "--flip" => {
                    i += 1;
                    flips.push(
                        value(args, i, "a bit position")?
                            .parse()
                            .map_err(|_| "invalid flip position")?,
                    );
                }
                "--seed" => {
                    i += 1;
                    seed = Some(
                        value(args, i, "a number")?
                            .parse()
                            .map_err(|_| "invalid seed")?,
                    );
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--verbose" | "-v" => {
                    verbose = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

        // Generate defaults using seed
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mode = match (chain, codec, operation.as_deref()) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                return Err("--chain cannot be combined with --codec or --op".to_string());
            }
            (Some(steps), None, None) => Mode::Chain(steps),
            (None, codec, op) => {
                let codec = codec.unwrap_or_else(|| {
                    CodecKind::ALL[rng.gen_range(0..CodecKind::ALL.len())]
                });
                match op {
                    None | Some("roundtrip") | Some("round-trip") => Mode::RoundTrip(codec),
                    Some(op) => Mode::Single(Step::new(
                        codec,
                        op.parse::<Operation>().map_err(|e| format!("{e}"))?,
                    )),
                }
            }
        };

        let config = Config {
            mode,
            message,
            sample_len: sample_len.unwrap_or_else(|| rng.gen_range(8..=32)),
            assignments,
            flip_rate: flip_rate.unwrap_or(0.0),
            flips,
            seed,
            print_config,
            print_metrics,
            verbose,
        };

        Ok(config)
    }

    /// Whether a round trip should pass through the noisy channel.
    pub fn has_noise(&self) -> bool {
        self.flip_rate > 0.0 || !self.flips.is_empty()
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.mode {
            Mode::Single(step) => println!("Mode: {step}"),
            Mode::RoundTrip(codec) => println!("Mode: {codec} round trip"),
            Mode::Chain(steps) => {
                let steps: Vec<String> = steps.iter().map(Step::to_string).collect();
                println!("Mode: chain {}", steps.join(" -> "));
            }
        }
        match &self.message {
            Some(message) => println!("Message: {message:?}"),
            None => println!("Message: (generate {} symbol sample)", self.sample_len),
        }
        for (codec, assignment) in &self.assignments {
            println!("Parameter: {codec} {assignment}");
        }
        println!();
        println!("=== Channel ===");
        println!("Seed: {}", self.seed);
        println!("Flip rate: {:.2}%", self.flip_rate * 100.0);
        println!("Forced flips: {:?}", self.flips);
        println!();
    }
}

fn print_help() {
    println!("bitcodec: bit-level source and error-correcting codes");
    println!();
    println!("USAGE:");
    println!("    bitcodec [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --codec <NAME>          ascii, golomb, elias-gamma, fibonacci, huffman,");
    println!("                            repetition, crc, hamming74 (default: random)");
    println!("    --op <OP>               encode, decode or roundtrip (default: roundtrip)");
    println!("    --chain <STEPS>         Comma-separated codec:op steps, e.g.");
    println!("                            golomb:encode,hamming74:encode");
    println!();
    println!("    --message, -m <TEXT>    Input message or bit string (default: generate sample)");
    println!("    --sample-len <N>        Length of the generated sample (default: random 8-32)");
    println!();
    println!("    --k <N>                 Golomb divisor (default: 64)");
    println!("    --r <N>                 Repetition factor (default: 3)");
    println!("    --generator <BITS>      CRC generator polynomial (default: 1001)");
    println!();
    println!("    --flip-rate <P>         Per-bit flip probability for round trips (default: 0)");
    println!("    --flip <POS>            Flip the encoded bit at POS (repeatable)");
    println!("    --seed <N>              Random seed for determinism");
    println!();
    println!("    --print-config          Print resolved configuration");
    println!("    --no-metrics            Don't print metrics summary");
    println!("    --verbose, -v           Debug logging (RUST_LOG overrides)");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    bitcodec --seed 42                                 # Random codec, sample input");
    println!("    bitcodec --codec fibonacci -m 'hello'              # Round trip a message");
    println!("    bitcodec --codec hamming74 -m 1011 --flip 2        # Watch a correction");
    println!("    bitcodec --chain golomb:encode,crc:encode -m Hi    # Chain two codecs");
    println!();
}
