//! Codec registry: one long-lived instance per algorithm, selected by name.
//!
//! Front ends never see concrete codec types. They pick a [`CodecKind`] (or
//! its name), optionally configure it, then run single operations or a
//! chain of [`Step`]s where each output feeds the next step.
//!
//! Every call is recorded into the codec's [`Metrics`].

use crate::ascii::Ascii;
use crate::codec::{Codec, CodecKind, Diagnostic, Operation, Outcome, Params};
use crate::crc::Crc;
use crate::elias_gamma::EliasGamma;
use crate::error::{ConfigError, Error, Result};
use crate::fibonacci::Fibonacci;
use crate::golomb::Golomb;
use crate::hamming::Hamming74;
use crate::huffman::Huffman;
use crate::metrics::Metrics;
use crate::repetition::Repetition;
use std::fmt;
use std::str::FromStr;

/// Any codec, dispatched by variant.
#[derive(Debug, Clone)]
pub enum AnyCodec {
    Ascii(Ascii),
    Golomb(Golomb),
    EliasGamma(EliasGamma),
    Fibonacci(Fibonacci),
    Huffman(Huffman),
    Repetition(Repetition),
    Crc(Crc),
    Hamming74(Hamming74),
}

macro_rules! dispatch {
    ($any:expr, $codec:ident => $body:expr) => {
        match $any {
            AnyCodec::Ascii($codec) => $body,
            AnyCodec::Golomb($codec) => $body,
            AnyCodec::EliasGamma($codec) => $body,
            AnyCodec::Fibonacci($codec) => $body,
            AnyCodec::Huffman($codec) => $body,
            AnyCodec::Repetition($codec) => $body,
            AnyCodec::Crc($codec) => $body,
            AnyCodec::Hamming74($codec) => $body,
        }
    };
}

impl AnyCodec {
    /// A codec of `kind` with default parameters.
    pub fn new(kind: CodecKind) -> Self {
        match kind {
            CodecKind::Ascii => AnyCodec::Ascii(Ascii::new()),
            CodecKind::Golomb => AnyCodec::Golomb(Golomb::default()),
            CodecKind::EliasGamma => AnyCodec::EliasGamma(EliasGamma::new()),
            CodecKind::Fibonacci => AnyCodec::Fibonacci(Fibonacci::new()),
            CodecKind::Huffman => AnyCodec::Huffman(Huffman::new()),
            CodecKind::Repetition => AnyCodec::Repetition(Repetition::default()),
            CodecKind::Crc => AnyCodec::Crc(Crc::default()),
            CodecKind::Hamming74 => AnyCodec::Hamming74(Hamming74::new()),
        }
    }
}

impl Codec for AnyCodec {
    fn kind(&self) -> CodecKind {
        dispatch!(self, c => c.kind())
    }

    fn encode(&mut self, message: &str) -> Result<Outcome> {
        dispatch!(self, c => c.encode(message))
    }

    fn decode(&mut self, bits: &str) -> Result<Outcome> {
        dispatch!(self, c => c.decode(bits))
    }

    fn validate(&self, message: &str) -> bool {
        dispatch!(self, c => c.validate(message))
    }

    fn configure(&mut self, params: &Params) -> Result<()> {
        dispatch!(self, c => c.configure(params))
    }

    fn params(&self) -> Params {
        dispatch!(self, c => c.params())
    }
}

/// One operation of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub codec: CodecKind,
    pub operation: Operation,
}

impl Step {
    pub fn new(codec: CodecKind, operation: Operation) -> Self {
        Self { codec, operation }
    }

    /// Parse a comma-separated list such as `golomb:encode,hamming74:encode`.
    pub fn parse_list(list: &str) -> std::result::Result<Vec<Step>, ConfigError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.codec, self.operation)
    }
}

impl FromStr for Step {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (codec, operation) = s
            .split_once(':')
            .ok_or_else(|| ConfigError::UnknownOperation(s.to_string()))?;
        Ok(Step {
            codec: codec.trim().parse()?,
            operation: operation.trim().parse()?,
        })
    }
}

/// What one step of a chain received and produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub step: Step,
    pub input: String,
    pub outcome: Outcome,
}

/// Results of every step of a successful chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
    pub stages: Vec<StageReport>,
}

impl ChainReport {
    /// Output of the last step; `None` for an empty chain.
    pub fn output(&self) -> Option<&str> {
        self.stages.last().map(|stage| stage.outcome.output.as_str())
    }

    /// Diagnostics of all steps, in step order.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&Step, &Diagnostic)> {
        self.stages
            .iter()
            .flat_map(|stage| stage.outcome.diagnostics.iter().map(move |d| (&stage.step, d)))
    }
}

struct Entry {
    codec: AnyCodec,
    metrics: Metrics,
}

/// Holds one instance of every codec.
///
/// Instances are long-lived: parameters and the Huffman tree persist between
/// calls until overwritten.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entries: CodecKind::ALL
                .iter()
                .map(|&kind| Entry {
                    codec: AnyCodec::new(kind),
                    metrics: Metrics::new(),
                })
                .collect(),
        }
    }

    /// Registered codec names, in registry order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.codec.name())
    }

    /// Look up a codec by name or alias.
    pub fn resolve(&self, name: &str) -> Result<CodecKind> {
        Ok(name.parse::<CodecKind>()?)
    }

    fn entry(&self, kind: CodecKind) -> &Entry {
        &self.entries[kind as usize]
    }

    fn entry_mut(&mut self, kind: CodecKind) -> &mut Entry {
        &mut self.entries[kind as usize]
    }

    pub fn get(&self, kind: CodecKind) -> &AnyCodec {
        &self.entry(kind).codec
    }

    pub fn get_mut(&mut self, kind: CodecKind) -> &mut AnyCodec {
        &mut self.entry_mut(kind).codec
    }

    /// Replace the parameters of `kind`; on error the old ones stay.
    pub fn configure(&mut self, kind: CodecKind, params: &Params) -> Result<()> {
        let entry = self.entry_mut(kind);
        let result = entry.codec.configure(params);
        if let Err(e) = &result {
            log::warn!("{kind}: rejected {params}: {e}; keeping {}", entry.codec.params());
            entry.metrics.record_failure(e);
        }
        result
    }

    pub fn validate(&self, kind: CodecKind, message: &str) -> bool {
        self.get(kind).validate(message)
    }

    pub fn encode(&mut self, kind: CodecKind, message: &str) -> Result<Outcome> {
        self.run(Step::new(kind, Operation::Encode), message)
    }

    pub fn decode(&mut self, kind: CodecKind, bits: &str) -> Result<Outcome> {
        self.run(Step::new(kind, Operation::Decode), bits)
    }

    /// Run one step and record it in the codec's metrics.
    pub fn run(&mut self, step: Step, input: &str) -> Result<Outcome> {
        let entry = self.entry_mut(step.codec);
        let result = match step.operation {
            Operation::Encode => entry.codec.encode(input),
            Operation::Decode => entry.codec.decode(input),
        };

        match &result {
            Ok(outcome) => match step.operation {
                Operation::Encode => entry.metrics.record_encode(input, outcome),
                Operation::Decode => entry.metrics.record_decode(input, outcome),
            },
            Err(e) => {
                log::debug!("{step} failed: {e}");
                entry.metrics.record_failure(e);
            }
        }
        result
    }

    /// Run `steps` in order, feeding each output into the next step.
    ///
    /// # Errors
    /// `Error::Chain` naming the first step that failed; later steps are
    /// not run.
    pub fn chain(&mut self, input: &str, steps: &[Step]) -> Result<ChainReport> {
        let mut report = ChainReport::default();
        let mut current = input.to_string();

        for (index, &step) in steps.iter().enumerate() {
            let outcome = self.run(step, &current).map_err(|source| Error::Chain {
                step: index,
                codec: step.codec.name(),
                operation: step.operation.name(),
                source: Box::new(source),
            })?;
            let next = outcome.output.clone();
            report.stages.push(StageReport {
                step,
                input: current,
                outcome,
            });
            current = next;
        }

        log::debug!("chain of {} step(s) completed", steps.len());
        Ok(report)
    }

    pub fn metrics(&self, kind: CodecKind) -> &Metrics {
        &self.entry(kind).metrics
    }

    /// Metrics of all codecs merged into one.
    pub fn total_metrics(&self) -> Metrics {
        let mut total = Metrics::new();
        for entry in &self.entries {
            total.merge(&entry.metrics);
        }
        total
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
